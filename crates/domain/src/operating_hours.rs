// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operating hours resolution.
//!
//! Salons store their hours in one of several encodings, and real data is
//! frequently encoded more than once. Resolution is a strict fallback chain of
//! named encodings tried in order; the first that validates wins in full.
//!
//! 1. `StructuredObject`: a per-weekday object, given directly or as JSON text
//!    decoded up to two times. Text with backslash-escaped quotes but no outer
//!    quoting is unescaped once before decoding.
//! 2. `SimpleRange`: a single `HH:MM-HH:MM` string applied to every weekday.
//!
//! If neither validates the result is `NotConfigured` and callers use
//! [`OperatingHours::default_window`] (09:00-18:00 every day).
//!
//! ## Invariants
//!
//! - Partial data is never blended across encodings
//! - Resolution is a pure function of the raw input
//! - A closed day's start/end times are ignored by slot generation

use crate::format::{hhmm, parse_local_time};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::macros::time;
use time::{Time, Weekday};

/// How many times JSON text is decoded before giving up.
pub const MAX_DECODE_DEPTH: usize = 2;

/// Weekday keys in the structured encoding, Monday first.
const WEEKDAY_KEYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// One weekday's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    /// Whether the salon opens on this day.
    pub is_open: bool,
    /// Local opening time.
    #[serde(with = "hhmm")]
    pub start_time: Time,
    /// Local closing time.
    #[serde(with = "hhmm")]
    pub end_time: Time,
}

impl DayHours {
    /// An open day from `start_time` to `end_time`.
    #[must_use]
    pub const fn open(start_time: Time, end_time: Time) -> Self {
        Self {
            is_open: true,
            start_time,
            end_time,
        }
    }

    /// A closed day.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            is_open: false,
            start_time: DEFAULT_OPEN,
            end_time: DEFAULT_CLOSE,
        }
    }
}

const DEFAULT_OPEN: Time = time!(09:00);
const DEFAULT_CLOSE: Time = time!(18:00);

/// Canonical per-weekday operating hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    /// Monday.
    pub monday: DayHours,
    /// Tuesday.
    pub tuesday: DayHours,
    /// Wednesday.
    pub wednesday: DayHours,
    /// Thursday.
    pub thursday: DayHours,
    /// Friday.
    pub friday: DayHours,
    /// Saturday.
    pub saturday: DayHours,
    /// Sunday.
    pub sunday: DayHours,
}

impl OperatingHours {
    /// The same hours on all seven days.
    #[must_use]
    pub const fn uniform(day: DayHours) -> Self {
        Self {
            monday: day,
            tuesday: day,
            wednesday: day,
            thursday: day,
            friday: day,
            saturday: day,
            sunday: day,
        }
    }

    /// The fallback window used when a salon's hours are not configured:
    /// open 09:00-18:00 every day.
    #[must_use]
    pub const fn default_window() -> Self {
        Self::uniform(DayHours::open(DEFAULT_OPEN, DEFAULT_CLOSE))
    }

    /// Returns the hours for a weekday.
    #[must_use]
    pub const fn for_weekday(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    fn from_days(days: [DayHours; 7]) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }
}

/// The encoding a salon's hours were successfully read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursEncoding {
    /// Per-weekday object, possibly JSON text encoded once or twice.
    StructuredObject,
    /// A single `HH:MM-HH:MM` range for every day.
    SimpleRange,
}

impl HoursEncoding {
    /// Encodings in the order they are attempted.
    pub const ALL: [Self; 2] = [Self::StructuredObject, Self::SimpleRange];

    /// Returns a stable name for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredObject => "structured_object",
            Self::SimpleRange => "simple_range",
        }
    }

    /// Attempts to read `raw` in this encoding.
    #[must_use]
    pub fn attempt(self, raw: &Value) -> Option<OperatingHours> {
        match self {
            Self::StructuredObject => parse_structured(raw),
            Self::SimpleRange => parse_simple_range(raw),
        }
    }
}

/// Outcome of resolving raw salon settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursResolution {
    /// The settings were read in full from one encoding.
    Resolved {
        /// The canonical hours.
        hours: OperatingHours,
        /// Which encoding produced them.
        encoding: HoursEncoding,
    },
    /// No known encoding matched. Not fatal: use the default window.
    NotConfigured,
}

impl HoursResolution {
    /// Returns the resolved hours, or the default window when not configured.
    #[must_use]
    pub const fn hours_or_default(&self) -> OperatingHours {
        match self {
            Self::Resolved { hours, .. } => *hours,
            Self::NotConfigured => OperatingHours::default_window(),
        }
    }

    /// Returns whether the salon's own configuration was used.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Resolves raw salon settings into canonical operating hours.
///
/// Encodings are attempted in [`HoursEncoding::ALL`] order and the first
/// success is returned unmodified.
#[must_use]
pub fn resolve_operating_hours(raw: &Value) -> HoursResolution {
    first_success(raw, &HoursEncoding::ALL)
}

/// Resolves a stored settings string.
///
/// An absent or blank setting is `NotConfigured`.
#[must_use]
pub fn resolve_stored_operating_hours(raw: Option<&str>) -> HoursResolution {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => resolve_operating_hours(&Value::String(text.to_string())),
        _ => HoursResolution::NotConfigured,
    }
}

/// The fallback combinator: the first encoding that parses wins.
fn first_success(raw: &Value, encodings: &[HoursEncoding]) -> HoursResolution {
    encodings
        .iter()
        .find_map(|encoding| {
            encoding
                .attempt(raw)
                .map(|hours| HoursResolution::Resolved {
                    hours,
                    encoding: *encoding,
                })
        })
        .unwrap_or(HoursResolution::NotConfigured)
}

fn parse_structured(raw: &Value) -> Option<OperatingHours> {
    let mut current: Value = raw.clone();

    for _ in 0..=MAX_DECODE_DEPTH {
        let next: Value = match &current {
            Value::Object(map) => return hours_from_map(map),
            Value::String(text) => decode_json_text(text)?,
            _ => return None,
        };
        current = next;
    }

    None
}

/// Decodes one level of JSON text.
///
/// Falls back to unescaping `\"` and `\\` when the text is a JSON document
/// whose quotes were escaped without being wrapped in a string literal.
fn decode_json_text(text: &str) -> Option<Value> {
    let trimmed: &str = text.trim();
    serde_json::from_str::<Value>(trimmed).ok().or_else(|| {
        let unescaped: String = trimmed.replace("\\\"", "\"").replace("\\\\", "\\");
        if unescaped == trimmed {
            None
        } else {
            serde_json::from_str::<Value>(&unescaped).ok()
        }
    })
}

fn hours_from_map(map: &Map<String, Value>) -> Option<OperatingHours> {
    let lookup = |key: &str| -> Option<&Value> {
        map.iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    };

    // The first weekday must be complete or the whole form is rejected.
    let first: &Value = lookup(WEEKDAY_KEYS[0])?;
    if !has_all_fields(first) {
        return None;
    }
    let monday: DayHours = parse_day(first)?;

    let mut days: [DayHours; 7] = [DayHours::closed(); 7];
    days[0] = monday;
    for (slot, key) in days.iter_mut().zip(WEEKDAY_KEYS.iter()).skip(1) {
        *slot = lookup(*key).and_then(parse_day).unwrap_or_else(DayHours::closed);
    }

    Some(OperatingHours::from_days(days))
}

fn has_all_fields(entry: &Value) -> bool {
    ["isOpen", "startTime", "endTime"]
        .iter()
        .all(|field| entry.get(field).is_some())
}

fn parse_day(entry: &Value) -> Option<DayHours> {
    let is_open: bool = entry.get("isOpen")?.as_bool()?;
    if !is_open {
        return Some(DayHours::closed());
    }

    let start_time: Time = parse_local_time(entry.get("startTime")?.as_str()?).ok()?;
    let end_time: Time = parse_local_time(entry.get("endTime")?.as_str()?).ok()?;
    Some(DayHours::open(start_time, end_time))
}

fn parse_simple_range(raw: &Value) -> Option<OperatingHours> {
    let text: &str = raw.as_str()?.trim().trim_matches('"');
    let (start, end) = text.split_once('-')?;
    let start_time: Time = parse_local_time(start).ok()?;
    let end_time: Time = parse_local_time(end).ok()?;
    Some(OperatingHours::uniform(DayHours::open(start_time, end_time)))
}
