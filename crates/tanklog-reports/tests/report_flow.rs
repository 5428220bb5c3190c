//! End-to-end report builds over a realistic record history.

use chrono::{NaiveDate, NaiveDateTime};
use tanklog_core::{OtherCost, Recurrence, RecurrenceInterval, Refueling};
use tanklog_reports::{build, Granularity, ReportInput, ReportKind, ReportOptions};

fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Eight months of mixed full, partial, and reconstructed refuelings.
fn history() -> Vec<Refueling> {
    let mut records = Vec::new();
    let mut push = |date, mileage, volume: f64, partial, guessed| {
        records.push(Refueling {
            date,
            mileage,
            volume,
            price: volume * 1.6,
            partial,
            guessed,
            category: "Petrol".to_string(),
        });
    };
    push(dt(2020, 1, 3), 10_000, 42.0, false, false);
    push(dt(2020, 1, 28), 10_650, 44.0, false, false);
    push(dt(2020, 2, 14), 11_000, 20.0, true, false);
    push(dt(2020, 2, 26), 11_390, 31.0, false, false);
    push(dt(2020, 3, 20), 12_010, 43.5, false, true);
    push(dt(2020, 4, 17), 12_600, 41.0, false, false);
    push(dt(2020, 5, 12), 13_180, 40.2, false, false);
    push(dt(2020, 6, 9), 13_760, 40.8, false, false);
    push(dt(2020, 7, 7), 14_340, 40.5, false, false);
    push(dt(2020, 8, 4), 14_920, 40.9, false, false);
    records
}

fn costs() -> Vec<OtherCost> {
    vec![
        OtherCost {
            title: "Insurance".to_string(),
            date: dt(2020, 1, 1),
            end_date: None,
            price: 55.0,
            recurrence: Recurrence::new(RecurrenceInterval::Month, 1),
        },
        OtherCost {
            title: "Inspection".to_string(),
            date: dt(2020, 4, 20),
            end_date: None,
            price: 120.0,
            recurrence: Recurrence::once(),
        },
    ]
}

#[test]
fn consumption_report_with_all_derivations() {
    let refuelings = history();
    let input = ReportInput {
        refuelings: &refuelings,
        other_costs: &[],
        now: dt(2020, 8, 10),
    };
    let options = ReportOptions {
        overall_trend: true,
        moving_average: true,
        ..Default::default()
    };
    let report = build(ReportKind::FuelConsumption, input, options);

    // Nine full fill-ups close eight cycles.
    assert_eq!(report.series.len(), 1);
    let primary = &report.series[0];
    assert_eq!(primary.len(), 8);

    // The partial's volume lands in the cycle closing Feb 26:
    // (20 + 31) / 740 * 100.
    let feb = &primary.points()[1];
    assert!((feb.y - 51.0 / 740.0 * 100.0).abs() < 1e-9);

    // The reconstructed March record marks the cycles on both sides of it.
    assert!(primary.points()[2].marked);
    assert!(primary.points()[3].marked);
    assert!(!primary.points()[4].marked);
    assert!(primary.segment_marked(2));
    assert!(!primary.segment_marked(3));

    // Eight points: trend line plus an order-5 moving average of 4 points.
    assert_eq!(report.derived.len(), 2);
    assert_eq!(report.derived[0].len(), 2);
    assert_eq!(report.derived[1].len(), 4);

    let summary = report.summary.unwrap();
    assert!(summary.min > 4.0 && summary.max < 9.0);
    assert!(summary.min <= summary.average && summary.average <= summary.max);
}

#[test]
fn costs_report_accrues_recurring_and_one_off() {
    let refuelings = history();
    let other_costs = costs();
    let input = ReportInput {
        refuelings: &refuelings,
        other_costs: &other_costs,
        now: dt(2020, 8, 10),
    };
    let report = build(ReportKind::Costs, input, ReportOptions::default());

    let primary = &report.series[0];
    // One bucket per month, January through August.
    assert_eq!(primary.len(), 8);

    // April: one refueling (41.0 * 1.6), insurance, and the inspection.
    let april = primary.points()[3].y;
    assert!((april - (41.0 * 1.6 + 55.0 + 120.0)).abs() < 1e-9);

    // Every bucket carries at least the insurance.
    assert!(primary.iter().all(|p| p.y >= 55.0));
}

#[test]
fn yearly_mileage_collapses_to_one_bucket() {
    let refuelings = history();
    let input = ReportInput {
        refuelings: &refuelings,
        other_costs: &[],
        now: dt(2020, 8, 10),
    };
    let options = ReportOptions {
        granularity: Granularity::Yearly,
        ..Default::default()
    };
    let report = build(ReportKind::Mileage, input, options);

    let primary = &report.series[0];
    assert_eq!(primary.len(), 1);
    // Total distance over all closed cycles: 14 920 - 10 000.
    assert_eq!(primary.points()[0].y, 4920.0);
}

#[test]
fn rebuilding_from_the_same_snapshot_is_identical() {
    let refuelings = history();
    let other_costs = costs();
    let input = ReportInput {
        refuelings: &refuelings,
        other_costs: &other_costs,
        now: dt(2020, 8, 10),
    };
    let options = ReportOptions {
        overall_trend: true,
        moving_average: true,
        granularity: Granularity::Monthly,
        ..Default::default()
    };

    for kind in [
        ReportKind::FuelConsumption,
        ReportKind::FuelPrice,
        ReportKind::Costs,
        ReportKind::Mileage,
    ] {
        let a = build(kind, input, options);
        let b = build(kind, input, options);
        assert_eq!(a.series.len(), b.series.len());
        assert_eq!(a.derived.len(), b.derived.len());
        for (left, right) in a.series.iter().zip(&b.series).chain(a.derived.iter().zip(&b.derived)) {
            assert_eq!(left.name, right.name);
            assert_eq!(left.points(), right.points());
        }
        assert_eq!(a.summary, b.summary);
    }
}
