//! Derived trend series: least-squares line and centered moving average.
//!
//! Both take a source series sorted ascending by x and return a fresh series
//! named after it, colored with the trend variant of its color. Inputs too
//! small to carry a meaningful fit come back empty.

use tanklog_core::{DataPoint, TimeSeries};

/// Two-point least-squares line over the whole series.
///
/// Empty when the fit is underdetermined: two points or fewer (the line
/// would coincide with the data), or no variation in x.
pub fn overall_trend(series: &TimeSeries) -> TimeSeries {
    fit_line(series, series.points())
}

/// Same fit with the final point dropped.
///
/// For period-bucketed series the last bucket is the current period, still
/// accumulating; fitting through it would pull the line down. The source
/// series itself is left untouched.
pub fn overall_trend_excluding_open(series: &TimeSeries) -> TimeSeries {
    let points = series.points();
    let cut = points.len().saturating_sub(1);
    fit_line(series, &points[..cut])
}

/// Centered moving average over the series.
///
/// Window order is 5 for more than 7 points, 3 for more than 3, otherwise
/// the result is empty (an order-1 average is the input itself). The output
/// keeps the interior x positions and has `len - order + 1` points.
pub fn moving_average(series: &TimeSeries) -> TimeSeries {
    let mut out = derived(series, "avg");
    let points = series.points();
    let n = points.len();
    let order = if n > 7 {
        5
    } else if n > 3 {
        3
    } else {
        return out;
    };
    let k = (order - 1) / 2;

    for t in k..n - k {
        let window = &points[t - k..=t + k];
        let sum: f64 = window.iter().map(|p| p.y).sum();
        out.push(DataPoint::new(points[t].x, sum / order as f64));
    }
    out
}

fn derived(source: &TimeSeries, suffix: &str) -> TimeSeries {
    TimeSeries::new(
        format!("{} ({})", source.name, suffix),
        source.color.trend_variant(),
    )
}

fn fit_line(source: &TimeSeries, points: &[DataPoint]) -> TimeSeries {
    let mut out = derived(source, "trend");
    let n = points.len();
    if n <= 2 {
        return out;
    }

    let count = n as f64;
    let avg_x: f64 = points.iter().map(|p| p.x).sum::<f64>() / count;
    let avg_y: f64 = points.iter().map(|p| p.y).sum::<f64>() / count;

    // Mean-centered sums: x is epoch milliseconds, and accumulating raw
    // products of that magnitude loses the signal to cancellation.
    let mut s_xx = 0.0;
    let mut s_xy = 0.0;
    for point in points {
        let dx = point.x - avg_x;
        s_xx += dx * dx;
        s_xy += dx * (point.y - avg_y);
    }
    if s_xx == 0.0 {
        return out;
    }

    let beta1 = s_xy / s_xx;
    let beta0 = avg_y - beta1 * avg_x;
    let x_first = points[0].x;
    let x_last = points[n - 1].x;
    out.push(DataPoint::new(x_first, beta0 + beta1 * x_first));
    out.push(DataPoint::new(x_last, beta0 + beta1 * x_last));
    out
}
