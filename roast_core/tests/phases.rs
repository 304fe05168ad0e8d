use roast_core::{EventKind, RoastEvent, RoastEventSet, Sample, calculate_phases};
use rstest::rstest;

fn ev(kind: EventKind, t: i64, v: f64) -> RoastEvent {
    RoastEvent::at(kind, Sample::new(t, v))
}

fn full_roast() -> RoastEventSet {
    [
        ev(EventKind::Charge, 0, 20.0),
        ev(EventKind::TurningPoint, 60, 15.0),
        ev(EventKind::DryEnd, 300, 160.0),
        ev(EventKind::FcStart, 540, 195.0),
    ]
    .into_iter()
    .collect()
}

#[test]
fn complete_roast_splits_into_three_phases() {
    let p = calculate_phases(600, 205.0, &full_roast());

    assert_eq!(p.dry.duration_secs, 240);
    assert_eq!(p.maillard.duration_secs, 240);
    assert_eq!(p.develop.duration_secs, 60);
    assert!((p.dry.percent - 44.44).abs() < 0.01);
    assert!((p.maillard.percent - 44.44).abs() < 0.01);
    assert!((p.develop.percent - 11.11).abs() < 0.01);
    assert_eq!(p.dry.temp_rise, 145.0);
    assert_eq!(p.maillard.temp_rise, 35.0);
    assert_eq!(p.develop.temp_rise, 10.0);
}

#[test]
fn drop_freezes_the_development_phase() {
    let events = full_roast().with_event(ev(EventKind::Drop, 600, 205.0));
    let at_drop = calculate_phases(600, 205.0, &events);
    let later = calculate_phases(900, 80.0, &events);
    assert_eq!(at_drop, later);
}

#[rstest]
// only CHARGE: everything so far is drying, at 100%
#[case(&[(EventKind::Charge, 10, 200.0)], 70, (60, 0, 0))]
// CHARGE + TP: dry runs to now
#[case(&[(EventKind::Charge, 0, 200.0), (EventKind::TurningPoint, 60, 90.0)], 200, (200, 0, 0))]
// no DRY_END but FC_START: maillard is skipped
#[case(
    &[(EventKind::Charge, 0, 200.0), (EventKind::TurningPoint, 60, 90.0), (EventKind::FcStart, 400, 196.0)],
    500,
    (400, 0, 100)
)]
fn partial_roasts(
    #[case] marks: &[(EventKind, i64, f64)],
    #[case] now: i64,
    #[case] expected: (i64, i64, i64),
) {
    let events: RoastEventSet = marks.iter().map(|&(k, t, v)| ev(k, t, v)).collect();
    let p = calculate_phases(now, 180.0, &events);
    assert_eq!(
        (p.dry.duration_secs, p.maillard.duration_secs, p.develop.duration_secs),
        expected
    );
    let pct = p.dry.percent + p.maillard.percent + p.develop.percent;
    assert!((pct - 100.0).abs() < 1e-9, "percentages add up to {pct}");
}

#[test]
fn no_charge_means_no_phases() {
    let events: RoastEventSet = [ev(EventKind::TurningPoint, 60, 90.0)].into_iter().collect();
    let p = calculate_phases(300, 180.0, &events);
    assert_eq!(p.total_secs(), 0);
    assert_eq!(p.dry.percent, 0.0);
}
