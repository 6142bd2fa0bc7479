// Copyright (C) 2024-2026 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! `cargo xtask <command>` wraps the checks CI runs on the salon booking
//! workspace: formatting, clippy, docs, unused dependencies and tests.
//!
//! ### Migration Verification
//!
//! `cargo xtask verify-migrations` applies the appointment ledger migrations
//! to a scratch in-memory `SQLite` database, reverts them, and applies them
//! again. The command fails if the revert leaves any table or index behind,
//! if the two applied schemas differ, or if a table the ledger relies on is
//! missing. No external services are needed.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::BTreeMap;
use std::{fmt::Debug, io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::eyre::{Context, bail, eyre};
use color_eyre::Result;
use diesel::sql_types::Text;
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

/// Tables the appointment ledger cannot run without.
const LEDGER_TABLES: [&str; 4] = ["appointments", "employees", "salons", "services"];

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migrations)
    CI,

    /// Build the workspace
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Write an lcov report to target/lcov.info
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check for unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, clippy and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Build docs with warnings denied
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check formatting
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Apply clippy suggestions
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Format the workspace
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run lib and doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib, integration and HTTP tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Verify the ledger migrations apply, revert and re-apply cleanly
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => run_cargo(&["build", "--all-targets", "--all-features"]),
            Self::Check => run_cargo(&["check", "--all-targets", "--all-features"]),
            Self::Coverage => run_cargo(&[
                "llvm-cov",
                "--lcov",
                "--output-path",
                "target/lcov.info",
                "--all-features",
            ]),
            Self::Machete => machete(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => run_cargo_nightly(&["fmt", "--all", "--check"]),
            Self::FixClippy => run_cargo(&[
                "clippy",
                "--all-targets",
                "--all-features",
                "--fix",
                "--allow-dirty",
                "--allow-staged",
            ]),
            Self::FixFormatting => run_cargo_nightly(&["fmt", "--all"]),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    machete()?;
    run_cargo(&["build", "--all-targets", "--all-features"])?;
    test()?;
    verify_migrations()
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    run_cargo_nightly(&["fmt", "--all", "--check"])
}

fn lint_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Builds each workspace package's docs the way docs.rs would.
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

fn test() -> Result<()> {
    test_libs()?;
    // slowest, so last
    test_docs()
}

fn test_docs() -> Result<()> {
    run_cargo(&["test", "--doc", "--all-features"])
}

fn test_libs() -> Result<()> {
    run_cargo(&["test", "--all-targets", "--all-features"])
}

fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

fn run_cargo_nightly(args: &[&str]) -> Result<()> {
    cmd("cargo", args)
        // set by the outer `cargo xtask`; it would pin the stable toolchain
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Schema objects keyed by `(type, name)`, holding the `CREATE` statement
/// `SQLite` stored for each. Diesel's bookkeeping table is excluded.
type SchemaSnapshot = BTreeMap<(String, String), String>;

#[derive(QueryableByName)]
struct SchemaObject {
    #[diesel(sql_type = Text)]
    kind: String,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    definition: String,
}

fn snapshot_schema(conn: &mut SqliteConnection) -> Result<SchemaSnapshot> {
    let objects: Vec<SchemaObject> = diesel::sql_query(
        "SELECT type AS kind, name, COALESCE(sql, '') AS definition \
         FROM sqlite_master \
         WHERE name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations'",
    )
    .load(conn)
    .wrap_err("failed to read sqlite_master")?;

    Ok(objects
        .into_iter()
        .map(|object| {
            let definition: String = object
                .definition
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            ((object.kind, object.name), definition)
        })
        .collect())
}

fn table_names(schema: &SchemaSnapshot) -> Vec<&str> {
    schema
        .keys()
        .filter(|(kind, _)| kind == "table")
        .map(|(_, name)| name.as_str())
        .collect()
}

/// Verify the ledger migrations are reversible.
///
/// 1. Applies every migration to a scratch in-memory database
/// 2. Checks the tables the ledger relies on are present
/// 3. Reverts every migration and checks nothing is left behind
/// 4. Applies the migrations again and checks the schema is unchanged
fn verify_migrations() -> Result<()> {
    tracing::info!("Verifying appointment ledger migrations");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("failed to open scratch SQLite database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("failed to enable foreign keys")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to apply migrations: {e}"))?;
    let applied: SchemaSnapshot = snapshot_schema(&mut conn)?;
    let tables: Vec<&str> = table_names(&applied);
    let missing: Vec<&str> = LEDGER_TABLES
        .into_iter()
        .filter(|table| !tables.contains(table))
        .collect();
    if !missing.is_empty() {
        bail!("missing ledger tables: {}", missing.join(", "));
    }
    tracing::info!(objects = applied.len(), "Migrations applied");

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to revert migrations: {e}"))?;
    let reverted: SchemaSnapshot = snapshot_schema(&mut conn)?;
    if !reverted.is_empty() {
        let leftovers: Vec<&str> = reverted.keys().map(|(_, name)| name.as_str()).collect();
        bail!("revert left objects behind: {}", leftovers.join(", "));
    }
    tracing::info!("Migrations reverted cleanly");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to re-apply migrations: {e}"))?;
    let reapplied: SchemaSnapshot = snapshot_schema(&mut conn)?;
    let drift: Vec<String> = applied
        .iter()
        .filter(|(key, definition)| reapplied.get(*key) != Some(*definition))
        .map(|((kind, name), _)| format!("{kind} {name}"))
        .chain(
            reapplied
                .keys()
                .filter(|key| !applied.contains_key(*key))
                .map(|(kind, name)| format!("{kind} {name} (new)")),
        )
        .collect();
    if !drift.is_empty() {
        bail!("re-applied schema differs: {}", drift.join(", "));
    }

    tracing::info!("Migration verification passed");
    Ok(())
}

/// Logs a `duct` command before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // output may have scrolled the command away
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
