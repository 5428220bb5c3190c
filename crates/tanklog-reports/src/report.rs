//! Report assembly: the closed set of report kinds over the shared engine
//! parts.
//!
//! Each kind builds its primary series from the raw record snapshot, then
//! the enabled derivations run per primary series. Dispatch is a plain
//! match; there is no report-kind hierarchy.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use log::debug;

use tanklog_core::{timestamp_ms, DataPoint, OtherCost, Refueling, Rgb, TimeSeries};

use crate::consumption::{self, Granularity};
use crate::recurrence;
use crate::trend;

/// The closed set of reports the application renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    FuelConsumption,
    FuelPrice,
    Costs,
    Mileage,
}

/// Derivation switches and aggregation granularity for one report build.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Derive the long-run least-squares line per primary series.
    pub overall_trend: bool,
    /// Derive the short-run centered moving average per primary series.
    pub moving_average: bool,
    /// Fit cost regressions without the still-accumulating calendar bucket.
    pub exclude_open_period: bool,
    pub granularity: Granularity,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            overall_trend: false,
            moving_average: false,
            exclude_open_period: true,
            granularity: Granularity::PerCycle,
        }
    }
}

/// Borrowed, date-sorted record snapshot for one car.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub refuelings: &'a [Refueling],
    pub other_costs: &'a [OtherCost],
    /// Upper bound for open-ended recurring costs. Passed in rather than
    /// read from the clock so identical inputs build identical reports.
    pub now: NaiveDateTime,
}

/// Scalar summary over the primary series of a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// A fully built report.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    /// Primary series, sorted ascending by x.
    pub series: Vec<TimeSeries>,
    /// Derived series, in primary order: trend before moving average.
    pub derived: Vec<TimeSeries>,
    /// Summary over all primary points; `None` when the report is empty.
    pub summary: Option<Summary>,
}

/// Build one report from a record snapshot.
pub fn build(kind: ReportKind, input: ReportInput<'_>, options: ReportOptions) -> Report {
    let mut series = match kind {
        ReportKind::FuelConsumption => consumption_primaries(input, options.granularity),
        ReportKind::FuelPrice => price_primaries(input),
        ReportKind::Costs => cost_primaries(input, options.granularity),
        ReportKind::Mileage => mileage_primaries(input, options.granularity),
    };
    for s in &mut series {
        s.sort();
    }

    let derived = derive(kind, &series, options);
    let summary = summarize(&series);
    debug!(
        "built {:?} report: {} primary, {} derived series",
        kind,
        series.len(),
        derived.len()
    );

    Report {
        kind,
        series,
        derived,
        summary,
    }
}

const PALETTE: [Rgb; 6] = [
    Rgb::new(0.2, 0.6, 1.0),
    Rgb::new(1.0, 0.5, 0.2),
    Rgb::new(0.2, 0.8, 0.4),
    Rgb::new(0.9, 0.3, 0.5),
    Rgb::new(0.7, 0.5, 1.0),
    Rgb::new(0.9, 0.8, 0.2),
];

fn palette_color(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// Refuelings grouped by fuel category, input order preserved within each
/// group. BTreeMap so series order does not depend on hash state.
fn by_category<'a>(refuelings: &'a [Refueling]) -> BTreeMap<&'a str, Vec<&'a Refueling>> {
    let mut groups: BTreeMap<&str, Vec<&Refueling>> = BTreeMap::new();
    for refueling in refuelings {
        groups
            .entry(refueling.category.as_str())
            .or_default()
            .push(refueling);
    }
    groups
}

fn consumption_primaries(input: ReportInput<'_>, granularity: Granularity) -> Vec<TimeSeries> {
    by_category(input.refuelings)
        .into_iter()
        .enumerate()
        .map(|(i, (category, group))| {
            consumption::consumption_by_bucket(
                group.iter().copied(),
                granularity,
                category,
                palette_color(i),
            )
        })
        .collect()
}

fn price_primaries(input: ReportInput<'_>) -> Vec<TimeSeries> {
    by_category(input.refuelings)
        .into_iter()
        .enumerate()
        .map(|(i, (category, group))| {
            let mut series = TimeSeries::new(category, palette_color(i));
            for refueling in group {
                if refueling.volume > 0.0 {
                    let mut point = DataPoint::new(
                        timestamp_ms(refueling.date),
                        refueling.price / refueling.volume,
                    );
                    point.marked = refueling.guessed;
                    series.push(point);
                }
            }
            series
        })
        .collect()
}

fn cost_primaries(input: ReportInput<'_>, granularity: Granularity) -> Vec<TimeSeries> {
    // Costs are inherently period totals; the per-cycle granularity of the
    // other reports means monthly here.
    let granularity = match granularity {
        Granularity::Yearly => Granularity::Yearly,
        _ => Granularity::Monthly,
    };

    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for refueling in input.refuelings {
        *buckets
            .entry(consumption::bucket_key(granularity, refueling.date))
            .or_default() += refueling.price;
    }
    for cost in input.other_costs {
        let end = cost.end_date.map_or(input.now, |end| end.min(input.now));
        for date in recurrence::occurrences(cost.recurrence, cost.date, end) {
            *buckets
                .entry(consumption::bucket_key(granularity, date))
                .or_default() += cost.price;
        }
    }

    let mut series = TimeSeries::new("Costs", palette_color(0));
    for (key, total) in buckets {
        series.push(DataPoint::new(consumption::bucket_start_ms(key), total));
    }
    vec![series]
}

fn mileage_primaries(input: ReportInput<'_>, granularity: Granularity) -> Vec<TimeSeries> {
    // Distance comes from full-to-full cycles across the whole car; fuel
    // categories share the odometer.
    vec![consumption::distance_by_bucket(
        input.refuelings,
        granularity,
        "Distance",
        palette_color(0),
    )]
}

fn derive(kind: ReportKind, primaries: &[TimeSeries], options: ReportOptions) -> Vec<TimeSeries> {
    let mut out = Vec::new();
    for series in primaries {
        if options.overall_trend {
            let fitted = if kind == ReportKind::Costs && options.exclude_open_period {
                trend::overall_trend_excluding_open(series)
            } else {
                trend::overall_trend(series)
            };
            if !fitted.is_empty() {
                out.push(fitted);
            }
        }
        if options.moving_average {
            let smoothed = trend::moving_average(series);
            if !smoothed.is_empty() {
                out.push(smoothed);
            }
        }
    }
    out
}

fn summarize(primaries: &[TimeSeries]) -> Option<Summary> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count = 0usize;
    for series in primaries {
        for point in series.iter() {
            min = min.min(point.y);
            max = max.max(point.y);
            sum += point.y;
            count += 1;
        }
    }
    (count > 0).then(|| Summary {
        min,
        max,
        average: sum / count as f64,
    })
}
