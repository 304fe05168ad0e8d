use roast_config::{ProfileEvent, ProfilePoint, load_profile, load_profile_str};
use std::fs;
use tempfile::tempdir;

const SAMPLE: &str = r#"{
  "channelArr": [
    { "id": "BT", "dataArr": [
      { "timestamp": 0, "value": 180.5 },
      { "timestamp": 1, "value": 181.0 },
      { "timestamp": 2, "value": 150.2 }
    ] },
    { "id": "ET", "dataArr": [] }
  ],
  "manualChannelArr": [
    { "id": "gas", "dataArr": [ { "timestamp": 0, "value": 50 } ] }
  ],
  "roastEvents": {
    "CHARGE": { "id": "CHARGE", "timestamp": 1, "value": 181.0 },
    "TP": { "id": "TP", "timestamp": 2, "value": 150.2 }
  },
  "title": "Kenya AA",
  "weightGreen": 200,
  "weightRoasted": 170,
  "flavorList": ["Blackberry", "Honey"]
}"#;

#[test]
fn parses_reference_app_profile() {
    let p = load_profile_str(SAMPLE).expect("parse");
    let bt = p.channel("BT").expect("BT channel");
    assert_eq!(bt.data.len(), 3);
    assert_eq!(
        bt.data[2],
        ProfilePoint {
            timestamp: 2,
            value: 150.2
        }
    );
    assert_eq!(
        p.roast_events.turning_point,
        Some(ProfileEvent {
            id: "TP".into(),
            timestamp: 2,
            value: 150.2
        })
    );
    assert!(p.roast_events.drop.is_none());
    assert_eq!(p.title, "Kenya AA");
    // Fields absent from the file default to zero/empty
    assert_eq!(p.country, "");
    assert_eq!(p.moisture_green, 0.0);
    assert_eq!(p.flavor_list, vec!["Blackberry", "Honey"]);
}

#[test]
fn write_then_load_preserves_histories_and_events() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roast.json");
    let p = load_profile_str(SAMPLE).expect("parse");
    fs::write(&path, p.to_json_pretty().unwrap()).unwrap();
    let back = load_profile(&path).expect("reload");
    assert_eq!(back, p);
}

#[test]
fn rejects_decreasing_timestamps() {
    let bad = r#"{ "channelArr": [ { "id": "BT", "dataArr": [
        { "timestamp": 5, "value": 100.0 },
        { "timestamp": 4, "value": 101.0 } ] } ] }"#;
    let err = load_profile_str(bad).expect_err("decreasing timestamps");
    assert!(err.to_string().contains("timestamps decrease"));
}

#[test]
fn reports_missing_file_with_path() {
    let dir = tempdir().unwrap();
    let err = load_profile(&dir.path().join("nope.json")).expect_err("missing");
    assert!(err.to_string().contains("open roast profile"));
}

#[test]
fn rejects_negative_channel_timestamps() {
    let bad = r#"{ "channelArr": [ { "id": "BT", "dataArr": [
        { "timestamp": -9000000000000000000, "value": 100.0 },
        { "timestamp": 9000000000000000000, "value": 101.0 } ] } ] }"#;
    let err = load_profile_str(bad).expect_err("negative timestamp");
    assert!(err.to_string().contains("negative timestamp"));
}

#[test]
fn rejects_negative_event_timestamps() {
    let bad = r#"{ "channelArr": [ { "id": "BT", "dataArr": [
        { "timestamp": 0, "value": 100.0 } ] } ],
      "roastEvents": { "CHARGE": { "id": "CHARGE", "timestamp": -5, "value": 200.0 } } }"#;
    let err = load_profile_str(bad).expect_err("negative event timestamp");
    assert!(err.to_string().contains("event 'CHARGE' has a negative timestamp"));
}
