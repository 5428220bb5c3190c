//! Fuel-consumption segmentation over ordered refueling sequences.
//!
//! A consumption value exists per cycle: the span between two consecutive
//! full fill-ups. Partial fill-ups only contribute volume to the cycle they
//! fall in. Partials before the first full fill-up belong to no cycle and
//! are dropped with it.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tanklog_core::{timestamp_ms, DataPoint, Refueling, Rgb, TimeSeries};

/// Aggregation granularity for cycle-based series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// One value per full-to-full cycle.
    #[default]
    PerCycle,
    /// One value per calendar month, keyed by the cycle's closing date.
    Monthly,
    /// One value per calendar year.
    Yearly,
}

/// One closed full-to-full span.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    /// Date of the closing full fill-up.
    pub closed_at: NaiveDateTime,
    /// Odometer distance covered, > 0.
    pub distance: i64,
    /// Volume burned over the span, including the closing fill-up.
    pub volume: f64,
    /// Opening or closing record was reconstructed.
    pub marked: bool,
}

/// Walk a date-ascending refueling sequence for one car and category and
/// collect its closed cycles.
///
/// Every full fill-up re-anchors the walk and resets the volume accumulator;
/// it closes a cycle only when an anchor exists and the odometer moved
/// forward. Two full fill-ups at the same mileage close nothing, so no
/// division by a zero distance can happen downstream.
pub fn cycles<'a, I>(refuelings: I) -> Vec<Cycle>
where
    I: IntoIterator<Item = &'a Refueling>,
{
    let mut out = Vec::new();
    let mut accumulated = 0.0;
    let mut anchor: Option<(i64, bool)> = None;

    for refueling in refuelings {
        accumulated += refueling.volume;
        if refueling.partial {
            continue;
        }
        if let Some((mileage, guessed)) = anchor {
            if refueling.mileage > mileage {
                out.push(Cycle {
                    closed_at: refueling.date,
                    distance: refueling.mileage - mileage,
                    volume: accumulated,
                    marked: guessed || refueling.guessed,
                });
            }
        }
        accumulated = 0.0;
        anchor = Some((refueling.mileage, refueling.guessed));
    }

    out
}

/// Consumption per cycle, as volume per 100 distance units, one point at
/// each closing date.
pub fn consumption_series<'a, I>(refuelings: I, name: impl Into<String>, color: Rgb) -> TimeSeries
where
    I: IntoIterator<Item = &'a Refueling>,
{
    let mut series = TimeSeries::new(name, color);
    for cycle in cycles(refuelings) {
        let mut point = DataPoint::new(
            timestamp_ms(cycle.closed_at),
            cycle.volume / cycle.distance as f64 * 100.0,
        );
        point.marked = cycle.marked;
        series.push(point);
    }
    series
}

/// Consumption per calendar bucket: volumes and distances are summed over
/// the cycles closing in the bucket, then divided once.
///
/// `PerCycle` granularity falls back to [`consumption_series`].
pub fn consumption_by_bucket<'a, I>(
    refuelings: I,
    granularity: Granularity,
    name: impl Into<String>,
    color: Rgb,
) -> TimeSeries
where
    I: IntoIterator<Item = &'a Refueling>,
{
    if granularity == Granularity::PerCycle {
        return consumption_series(refuelings, name, color);
    }
    let mut series = TimeSeries::new(name, color);
    for (key, bucket) in bucketed_cycles(refuelings, granularity) {
        if bucket.distance > 0 {
            let mut point = DataPoint::new(
                bucket_start_ms(key),
                bucket.volume / bucket.distance as f64 * 100.0,
            );
            point.marked = bucket.marked;
            series.push(point);
        }
    }
    series
}

/// Distance covered per cycle, one point at each closing date.
pub fn distance_series<'a, I>(refuelings: I, name: impl Into<String>, color: Rgb) -> TimeSeries
where
    I: IntoIterator<Item = &'a Refueling>,
{
    let mut series = TimeSeries::new(name, color);
    for cycle in cycles(refuelings) {
        let mut point = DataPoint::new(timestamp_ms(cycle.closed_at), cycle.distance as f64);
        point.marked = cycle.marked;
        series.push(point);
    }
    series
}

/// Distance covered per calendar bucket.
pub fn distance_by_bucket<'a, I>(
    refuelings: I,
    granularity: Granularity,
    name: impl Into<String>,
    color: Rgb,
) -> TimeSeries
where
    I: IntoIterator<Item = &'a Refueling>,
{
    if granularity == Granularity::PerCycle {
        return distance_series(refuelings, name, color);
    }
    let mut series = TimeSeries::new(name, color);
    for (key, bucket) in bucketed_cycles(refuelings, granularity) {
        let mut point = DataPoint::new(bucket_start_ms(key), bucket.distance as f64);
        point.marked = bucket.marked;
        series.push(point);
    }
    series
}

/// Calendar bucket key: `(year, month)`, with month pinned to 1 for yearly
/// aggregation.
pub(crate) fn bucket_key(granularity: Granularity, date: NaiveDateTime) -> (i32, u32) {
    match granularity {
        Granularity::Yearly => (date.year(), 1),
        _ => (date.year(), date.month()),
    }
}

/// First instant of a bucket on the series time axis.
pub(crate) fn bucket_start_ms(key: (i32, u32)) -> f64 {
    let (year, month) = key;
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_hms_opt(0, 0, 0)
        .unwrap_or(NaiveDateTime::MIN);
    timestamp_ms(date)
}

#[derive(Debug, Default)]
struct CycleBucket {
    volume: f64,
    distance: i64,
    marked: bool,
}

fn bucketed_cycles<'a, I>(refuelings: I, granularity: Granularity) -> BTreeMap<(i32, u32), CycleBucket>
where
    I: IntoIterator<Item = &'a Refueling>,
{
    let mut buckets: BTreeMap<(i32, u32), CycleBucket> = BTreeMap::new();
    for cycle in cycles(refuelings) {
        let bucket = buckets
            .entry(bucket_key(granularity, cycle.closed_at))
            .or_default();
        bucket.volume += cycle.volume;
        bucket.distance += cycle.distance;
        bucket.marked |= cycle.marked;
    }
    buckets
}
