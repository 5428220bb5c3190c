//! Report analytics engine.
//!
//! Pure, deterministic computation turning ordered raw event records into
//! report series:
//!
//! - `recurrence` - occurrence counting for recurring costs, closed form
//! - `consumption` - full-to-full cycle segmentation over refuelings
//! - `trend` - derived series (least-squares line, centered moving average)
//! - `report` - the closed set of report kinds assembled from the above
//!
//! Every function reads an immutable snapshot and returns fresh values; there
//! is no shared state between calls and no clock access (callers pass `now`).

pub mod consumption;
pub mod recurrence;
pub mod report;
pub mod trend;

pub use consumption::{cycles, Cycle, Granularity};
pub use recurrence::{count, count_between, count_since, occurrence, occurrences, Occurrences};
pub use report::{build, Report, ReportInput, ReportKind, ReportOptions, Summary};
pub use trend::{moving_average, overall_trend, overall_trend_excluding_open};
