use std::time::Duration;

use roast_config::load_profile_str;
use roast_devices::{DeviceError, ReplayProbe, SimCfg, SimulatedRoaster};
use roast_traits::Probe;
use rstest::rstest;

const PROFILE: &str = r#"{
  "channelArr": [
    { "id": "BT", "dataArr": [
      { "timestamp": 0, "value": 180.0 },
      { "timestamp": 1, "value": 181.0 },
      { "timestamp": 2, "value": 182.5 } ] },
    { "id": "ET", "dataArr": [
      { "timestamp": 0, "value": 220.0 },
      { "timestamp": 2, "value": 221.0 } ] }
  ],
  "manualChannelArr": [],
  "roastEvents": {}
}"#;

#[test]
fn replay_emits_union_of_timestamps_then_exhausts() {
    let profile = load_profile_str(PROFILE).expect("valid profile");
    let mut probe = ReplayProbe::from_profile(&profile);
    assert_eq!(probe.remaining(), 3);

    let first = probe.read(Duration::ZERO).expect("frame 0");
    assert_eq!(first.len(), 2);
    let second = probe.read(Duration::ZERO).expect("frame 1");
    assert_eq!(second.get("BT"), Some(&181.0));
    assert!(!second.contains_key("ET"));
    assert_eq!(probe.peek_timestamp(), Some(2));
    probe.read(Duration::ZERO).expect("frame 2");

    let err = probe.read(Duration::ZERO).expect_err("exhausted");
    assert!(matches!(
        err.downcast_ref::<DeviceError>(),
        Some(DeviceError::Exhausted)
    ));
}

#[rstest]
#[case(0)]
#[case(15)]
#[case(45)]
fn preheat_length_is_configurable(#[case] charge_at: i64) {
    let sim = SimulatedRoaster::new(SimCfg {
        charge_at,
        ..SimCfg::default()
    });
    assert_eq!(sim.bt_at(charge_at), 200.0);
    assert!(sim.bt_at(charge_at + 5) < 190.0);
}

#[test]
fn no_drop_keeps_rising() {
    let sim = SimulatedRoaster::new(SimCfg {
        drop_at: None,
        ..SimCfg::default()
    });
    assert!(sim.bt_at(1200) > sim.bt_at(900));
}
