//! Raw event records consumed by the report engine.
//!
//! Records are value types owned by the host's storage layer. The engine
//! receives them pre-filtered to one car and sorted by date ascending.

use chrono::NaiveDateTime;

/// How often a cost repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceInterval {
    /// A single occurrence on the start date.
    Once,
    Day,
    Month,
    /// Three calendar months per step.
    Quarter,
    Year,
}

/// Recurrence rule: interval type plus a step multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub interval: RecurrenceInterval,
    /// Step width in interval units. Must be >= 1.
    pub multiplier: u32,
}

impl Recurrence {
    pub fn new(interval: RecurrenceInterval, multiplier: u32) -> Self {
        Self {
            interval,
            multiplier,
        }
    }

    /// Rule for a one-off cost.
    pub fn once() -> Self {
        Self::new(RecurrenceInterval::Once, 1)
    }
}

/// A refueling event.
#[derive(Debug, Clone, PartialEq)]
pub struct Refueling {
    pub date: NaiveDateTime,
    /// Odometer reading, non-decreasing within one car's history.
    pub mileage: i64,
    /// Volume added, > 0.
    pub volume: f64,
    /// Total amount paid.
    pub price: f64,
    /// True when the tank was not filled to the reference level.
    pub partial: bool,
    /// True when this record was reconstructed to fill a gap in the history.
    /// Produced upstream; carried through as an annotation only.
    pub guessed: bool,
    /// Fuel-type grouping within the car.
    pub category: String,
}

/// A one-off or recurring non-fuel cost.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherCost {
    pub title: String,
    /// First occurrence date.
    pub date: NaiveDateTime,
    /// Last possible occurrence date; `None` means open ended.
    pub end_date: Option<NaiveDateTime>,
    /// Amount per occurrence. May be negative for reimbursements.
    pub price: f64,
    pub recurrence: Recurrence,
}

/// Validate a refueling has reasonable values.
///
/// The engine itself assumes well-formed input; this is for host form layers
/// to reuse before records enter storage.
pub fn validate_refueling(refueling: &Refueling) -> bool {
    refueling.volume.is_finite()
        && refueling.volume > 0.0
        && refueling.price.is_finite()
        && refueling.price >= 0.0
        && refueling.mileage >= 0
}

/// Validate an other cost has reasonable values.
pub fn validate_other_cost(cost: &OtherCost) -> bool {
    cost.price.is_finite()
        && cost.recurrence.multiplier >= 1
        && cost.end_date.map_or(true, |end| end >= cost.date)
}
