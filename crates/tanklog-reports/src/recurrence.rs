//! Occurrence counting for recurring costs.
//!
//! Occurrences of a rule anchored at `start` lie at `start + k * step` for
//! `k = 0, 1, 2, ...`. Counting inside a window is closed form: the first
//! in-window `k` comes from integer division of the whole elapsed units, the
//! last from the whole-unit distance to the window end. No per-occurrence
//! loop, so arbitrarily large windows cost the same as small ones.
//!
//! Month-based steps are always re-added from the original start date.
//! Month addition clamps the day-of-month (Jan 31 + 1 month = Feb 29), so
//! stepping cumulatively from a clamped date would drift off the anchor day.

use chrono::{Datelike, Duration, Months, NaiveDateTime};
use tanklog_core::{Recurrence, RecurrenceInterval};

/// The `k`-th occurrence (0-based) of `rule` anchored at `start`.
///
/// Returns `None` past the single occurrence of a one-off rule, or when the
/// date would leave the representable calendar range.
pub fn occurrence(rule: Recurrence, start: NaiveDateTime, k: u64) -> Option<NaiveDateTime> {
    let mult = i64::from(rule.multiplier.max(1));
    let k = i64::try_from(k).ok()?;
    match rule.interval {
        RecurrenceInterval::Once => (k == 0).then_some(start),
        RecurrenceInterval::Day => add_days(start, k * mult),
        RecurrenceInterval::Month => add_months(start, k * mult),
        RecurrenceInterval::Quarter => add_months(start, k * mult * 3),
        RecurrenceInterval::Year => add_months(start, k * mult * 12),
    }
}

/// Number of occurrences of `rule` anchored at `start`, no later than `end`,
/// that fall inside the window `[from, to]` (inclusive).
///
/// `start > end` and `to < from` count zero. `end` past the window is
/// clamped to `to`.
pub fn count_between(
    rule: Recurrence,
    start: NaiveDateTime,
    end: NaiveDateTime,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> u64 {
    if start > end || to < from {
        return 0;
    }
    let end = end.min(to);
    let mult = i64::from(rule.multiplier.max(1));
    match rule.interval {
        RecurrenceInterval::Once => u64::from(start >= from && start <= end),
        RecurrenceInterval::Day => count_stepped(start, end, from, mult, whole_days, add_days),
        RecurrenceInterval::Month => count_stepped(start, end, from, mult, whole_months, add_months),
        RecurrenceInterval::Quarter => {
            count_stepped(start, end, from, mult * 3, whole_months, add_months)
        }
        RecurrenceInterval::Year => {
            count_stepped(start, end, from, mult * 12, whole_months, add_months)
        }
    }
}

/// Occurrences accrued from `start` through `now` for an open-ended rule.
pub fn count_since(rule: Recurrence, start: NaiveDateTime, now: NaiveDateTime) -> u64 {
    count_between(rule, start, now, start, now)
}

/// Occurrences accrued from `start` through `now`, capped by the rule's own
/// `end` date.
pub fn count(
    rule: Recurrence,
    start: NaiveDateTime,
    end: NaiveDateTime,
    now: NaiveDateTime,
) -> u64 {
    count_between(rule, start, end, start, now)
}

/// Forward iterator over occurrence dates, inclusive of `end`.
///
/// This is the stepping that per-calendar-bucket cost aggregation walks; it
/// visits exactly the dates `count_between` counts.
pub fn occurrences(rule: Recurrence, start: NaiveDateTime, end: NaiveDateTime) -> Occurrences {
    Occurrences {
        rule,
        start,
        end,
        next_k: 0,
    }
}

/// Iterator state for [`occurrences`].
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: Recurrence,
    start: NaiveDateTime,
    end: NaiveDateTime,
    next_k: u64,
}

impl Iterator for Occurrences {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        let date = occurrence(self.rule, self.start, self.next_k)?;
        if date > self.end {
            return None;
        }
        self.next_k += 1;
        Some(date)
    }
}

/// Closed-form count with `start <= end`, occurrences at `start + k * step`.
///
/// `dist` must return the largest `n` with `add(a, n) <= b`, and `add` must
/// be monotone in its unit argument. Both hold for whole days and for
/// clamped whole months.
fn count_stepped(
    start: NaiveDateTime,
    end: NaiveDateTime,
    from: NaiveDateTime,
    step: i64,
    dist: fn(NaiveDateTime, NaiveDateTime) -> i64,
    add: fn(NaiveDateTime, i64) -> Option<NaiveDateTime>,
) -> u64 {
    // First k whose occurrence is >= from. Integer division lands at or
    // just before the window start; at most one extra step is needed.
    let first_k = if from > start {
        let mut k = dist(start, from) / step;
        match add(start, k * step) {
            Some(date) if date >= from => {}
            _ => k += 1,
        }
        k
    } else {
        0
    };

    match add(start, first_k * step) {
        Some(date) if date <= end => {}
        _ => return 0,
    }

    let last_k = dist(start, end) / step;
    (last_k - first_k + 1) as u64
}

fn add_days(date: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    date.checked_add_signed(Duration::days(days))
}

fn add_months(date: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let months = u32::try_from(months).ok()?;
    date.checked_add_months(Months::new(months))
}

/// Whole days from `a` to `b`, for `a <= b`.
fn whole_days(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    (b - a).num_days()
}

/// Whole months from `a` to `b`, for `a <= b`: the largest `n` with
/// `a + n months <= b` under day-of-month clamping.
fn whole_months(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    let mut months = (i64::from(b.year()) - i64::from(a.year())) * 12 + i64::from(b.month())
        - i64::from(a.month());
    if months > 0 {
        match add_months(a, months) {
            Some(date) if date <= b => {}
            _ => months -= 1,
        }
    }
    months
}
