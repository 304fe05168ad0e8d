use roast_config::load_toml;
use rstest::rstest;

const BASE: &str = r##"
primary_channel = "BT"
alarms = [150.0, 180.0, 210.0]

[[channel]]
id = "BT"
label = "Bean Temp"
color = "#ff0000"

[[channel]]
id = "ET"
label = "Env Temp"
color = "#00ff00"
"##;

#[test]
fn accepts_full_config() {
    let toml = format!(
        "{BASE}{}",
        r#"
[[manual_channel]]
id = "gas"
min = 0
max = 100
step = 5
default_value = 50

[sampling]
sample_rate_hz = 2
read_timeout_ms = 300

[ror]
window = 5
outlier_window = 5
outlier_z = 3.0

[smoothing]
kernel_len = 11
live_lag = 3

[detection]
charge_window = 5
turning_point_min_drop = 50.0
dry_end_temp = 150.0

[logging]
file = "roast.log"
level = "debug"
rotation = "daily"
"#
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.channel_ids().collect::<Vec<_>>(), vec!["BT", "ET"]);
    assert_eq!(cfg.manual_channels.len(), 1);
    assert_eq!(cfg.alarms, vec![150.0, 180.0, 210.0]);
}

#[rstest]
#[case("primary_channel = \"XT\"\n", "primary_channel")]
#[case("alarms = [180.0, 150.0]\n", "ascending")]
#[case("[sampling]\nsample_rate_hz = 0\n", "sample_rate_hz must be > 0")]
#[case("[sampling]\nread_timeout_ms = 0\n", "read_timeout_ms")]
#[case("[ror]\nwindow = 1\n", "ror.window")]
#[case("[ror]\noutlier_z = -1.0\n", "outlier_z")]
#[case("[smoothing]\nkernel_len = 10\n", "kernel_len must be odd")]
#[case("[smoothing]\nkernel_len = 5\nlive_lag = 5\n", "live_lag")]
#[case("[detection]\ndry_end_temp = 0.0\n", "dry_end_temp")]
#[case("[logging]\nrotation = \"weekly\"\n", "rotation")]
fn rejects_invalid_values(#[case] overlay: &str, #[case] needle: &str) {
    // Top-level keys must precede the first table, so put the overlay first.
    let toml = if overlay.starts_with('[') {
        format!("{}\n{overlay}", BASE.replace("primary_channel = \"BT\"\n", ""))
    } else {
        let base = BASE
            .replace("primary_channel = \"BT\"\n", "")
            .replace("alarms = [150.0, 180.0, 210.0]\n", "");
        format!("{overlay}{base}")
    };
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        err.to_string().contains(needle),
        "error '{err}' does not mention '{needle}'"
    );
}

#[test]
fn rejects_duplicate_channel_ids() {
    let toml = r#"
[[channel]]
id = "BT"

[[channel]]
id = "BT"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("duplicate ids");
    assert!(err.to_string().contains("duplicate channel id"));
}

#[test]
fn rejects_missing_channels() {
    let err = load_toml("primary_channel = \"BT\"\n");
    assert!(err.is_err(), "channel table is required");

    let cfg = load_toml("channel = []\n").expect("parse TOML");
    let err = cfg.validate().expect_err("no channels");
    assert!(err.to_string().contains("at least one"));
}
