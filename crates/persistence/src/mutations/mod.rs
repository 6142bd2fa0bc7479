// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutations for the persistence layer.
//!
//! - `catalog`: seeding salons, services and employees
//! - `appointments`: the serialized booking commit and status changes

pub mod appointments;
pub mod catalog;
