// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! - `catalog`: salons, services and employees
//! - `appointments`: appointment lookups and overlap scans
//!
//! Every function takes the connection explicitly so mutations can call
//! them inside their own transactions.

pub mod appointments;
pub mod catalog;
