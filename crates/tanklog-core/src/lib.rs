//! Core types for tanklog reports.
//!
//! This crate provides the fundamental data structures shared by the report
//! engine and the host layers:
//! - `Refueling` / `OtherCost` / `Recurrence` - raw event records
//! - `TimeSeries` - ordered (x, y) container with summary helpers
//! - `Rgb` - series colors, including the derived-series variant

pub mod color;
pub mod record;
pub mod series;

pub use color::Rgb;
pub use record::{
    validate_other_cost, validate_refueling, OtherCost, Recurrence, RecurrenceInterval, Refueling,
};
pub use series::{timestamp_ms, DataPoint, TimeSeries};
