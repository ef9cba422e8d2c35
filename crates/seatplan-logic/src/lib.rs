//! Pure seat assignment logic for SeatPlan.
//!
//! This crate seats a fixed roster in a fixed classroom grid. It is
//! independent of any UI, storage, or runtime: functions take plain data
//! and return new values, so a web front end, the headless harness, or a
//! test can drive it the same way.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`layout`] | Two-sided seat grid geometry and per-row capacity |
//! | [`seats`] | Seat occupancy state, close/reopen toggles, status counts |
//! | [`constraints`] | Lonely-occupant and row-connectivity predicates |
//! | [`assign`] | Front fill and bounded random fill strategies |
//! | [`roster`] | Validated, ordered list of people to seat |
//! | [`session`] | Engine boundary owning the current seat state |
//! | [`config`] | Classroom configuration model and validation |
//! | [`error`] | Engine error type |

pub mod assign;
pub mod config;
pub mod constraints;
pub mod error;
pub mod layout;
pub mod roster;
pub mod seats;
pub mod session;

pub use error::{Result, SeatingError};
