//! TimeSeries container shared by all reports.

use chrono::NaiveDateTime;

use crate::color::Rgb;

/// Encode a record date as a position on the series time axis
/// (epoch milliseconds).
pub fn timestamp_ms(date: NaiveDateTime) -> f64 {
    date.and_utc().timestamp_millis() as f64
}

/// A single point in a report series.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    /// Position on the time axis, epoch milliseconds.
    pub x: f64,
    pub y: f64,
    /// Optional hover text for the rendering layer.
    pub tooltip: Option<String>,
    /// True when the point was computed from reconstructed records.
    pub marked: bool,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            tooltip: None,
            marked: false,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

/// A named, colored sequence of data points.
///
/// Built fresh for every report update by its owner, then read-only.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    pub name: String,
    pub color: Rgb,
    points: Vec<DataPoint>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, point: DataPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataPoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&DataPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&DataPoint> {
        self.points.last()
    }

    /// Sorts points by x ascending; ties broken by y ascending so the order
    /// is fully determined by the point values.
    pub fn sort(&mut self) {
        self.points
            .sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    }

    /// Absorb another series' points, keeping the sort invariant.
    pub fn merge(&mut self, other: &TimeSeries) {
        self.points.extend_from_slice(other.points());
        self.sort();
    }

    pub fn min_y(&self) -> Option<f64> {
        self.points.iter().map(|p| p.y).reduce(f64::min)
    }

    pub fn max_y(&self) -> Option<f64> {
        self.points.iter().map(|p| p.y).reduce(f64::max)
    }

    pub fn mean_y(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(|p| p.y).sum();
        Some(sum / self.points.len() as f64)
    }

    /// Whether the connecting line segment from point `i` to point `i + 1`
    /// should be flagged. A segment is flagged when both of its endpoints
    /// come from reconstructed records.
    pub fn segment_marked(&self, i: usize) -> bool {
        match (self.points.get(i), self.points.get(i + 1)) {
            (Some(a), Some(b)) => a.marked && b.marked,
            _ => false,
        }
    }
}
