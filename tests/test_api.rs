use std::io;
use std::path::PathBuf;

use clap::Parser;
use drone_console::api::*;
use drone_console::auth::{CredentialTable, GROUP};
use drone_console::config::{Config, DEFAULT_HOST};
use drone_console::error::{FleetError, StoreError};

use rstest::rstest;

// ── Credentials ───────────────────────────────────────────────────────────────

#[rstest]
#[case::first_user("group9", "Louay", "pass1", true)]
#[case::last_user("group9", "Mohamed", "pass4", true)]
#[case::blank_user("group9", "", "", true)]
#[case::wrong_password("group9", "Hamza", "pass3", false)]
#[case::wrong_group("group8", "Yasir", "pass3", false)]
#[case::unknown_user("group9", "Eve", "pass1", false)]
#[case::case_sensitive("Group9", "Louay", "pass1", false)]
fn builtin_credentials(
    #[case] group: &str,
    #[case] user: &str,
    #[case] pass: &str,
    #[case] expected: bool,
) {
    assert_eq!(CredentialTable::builtin().validate(group, user, pass), expected);
}

#[test]
fn custom_credential_table() {
    let table = CredentialTable::new("ops", [("ada", "secret")]);
    assert!(table.validate("ops", "ada", "secret"));
    assert!(!table.validate(GROUP, "ada", "secret"));
    assert!(!table.validate("ops", "", ""));
}

// ── Battery ───────────────────────────────────────────────────────────────────

#[rstest]
#[case(500, 2000, 25)]
#[case(1999, 2000, 100)]
#[case(1, 3, 33)]
#[case(2, 3, 67)]
#[case(0, 2000, 0)]
#[case(1234, 0, 0)]
fn battery_percentage_rounds(#[case] power: u32, #[case] capacity: u32, #[case] expected: u32) {
    assert_eq!(battery_percentage(power, capacity), expected);
}

#[rstest]
#[case(100, BatteryLevel::Full)]
#[case(80, BatteryLevel::Full)]
#[case(79, BatteryLevel::High)]
#[case(50, BatteryLevel::High)]
#[case(49, BatteryLevel::Medium)]
#[case(20, BatteryLevel::Medium)]
#[case(19, BatteryLevel::Low)]
#[case(10, BatteryLevel::Low)]
#[case(9, BatteryLevel::Critical)]
#[case(0, BatteryLevel::Critical)]
fn battery_level_buckets(#[case] percent: u32, #[case] expected: BatteryLevel) {
    assert_eq!(BatteryLevel::from_percent(percent), expected);
}

// ── Timestamps & maps ─────────────────────────────────────────────────────────

#[rstest]
#[case("2024-01-10T10:00:05.123456+01:00", "2024-January-10 10:00:05")]
#[case("2023-12-31T23:59:59Z", "2023-December-31 23:59:59")]
#[case("not a date", "not a date")]
#[case("2024-13-01T00:00:00Z", "2024-13-01T00:00:00Z")]
#[case("2024-01-10T10:0", "2024-01-10T10:0")]
#[case("2024-03-05T07:08:09", "2024-March-05 07:08:09")]
#[case("2024-02-29T12:00:00Z", "2024-February-29 12:00:00")]
#[case("2023-02-29T12:00:00Z", "2023-02-29T12:00:00Z")]
#[case("2024-02-31T99:99:99Z", "2024-02-31T99:99:99Z")]
#[case("2024-01-10T25:00:00Z", "2024-01-10T25:00:00Z")]
#[case("abcd-01-zzTxxxxxxxxx", "abcd-01-zzTxxxxxxxxx")]
fn timestamps_are_spelled_out(#[case] iso: &str, #[case] expected: &str) {
    assert_eq!(format_timestamp(iso), expected);
}

#[test]
fn maps_url_points_at_coordinates() {
    let record = DynamicsRecord {
        drone: "http://h/api/drones/71/".to_string(),
        timestamp: "2024-01-10T10:00:00+01:00".to_string(),
        speed: 12,
        align_roll: 0.0,
        align_pitch: 0.0,
        align_yaw: 0.0,
        longitude: 8.5,
        latitude: 50.25,
        battery_status: 100,
        last_seen: "2024-01-10T10:00:00+01:00".to_string(),
        status: "ON".to_string(),
    };
    let view = DynamicsView::from_record(&record, 71, 90);
    assert_eq!(
        view.maps_url(),
        "https://www.google.com/maps/search/?api=1&query=50.25,8.5"
    );
    assert_eq!(view.battery_level(), BatteryLevel::Full);
}

// ── Alerts ────────────────────────────────────────────────────────────────────

#[test]
fn io_failures_get_the_io_alert() {
    let err = FleetError::from(StoreError::Io {
        path: PathBuf::from("31.json"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    });
    assert_eq!(err.alert_title(), "IO Error");
    assert_eq!(
        err.alert_message(),
        "An error occurred while performing an IO operation."
    );
}

#[test]
fn other_failures_get_the_generic_alert() {
    let err = FleetError::Superseded;
    assert_eq!(err.alert_title(), "Error");
    assert_eq!(err.alert_message(), "An unexpected error occurred.");
}

// ── Config ────────────────────────────────────────────────────────────────────

#[test]
fn config_flags_override_defaults() {
    let config = Config::try_parse_from([
        "drone_console",
        "--host",
        "http://localhost:8000",
        "--timeout-secs",
        "3",
        "--page-size",
        "25",
        "--data-dir",
        "/tmp/drones",
    ])
    .unwrap();
    assert_eq!(config.host, "http://localhost:8000");
    assert_eq!(config.timeout().as_secs(), 3);
    assert_eq!(config.page_size, 25);
    assert_eq!(config.log_path(), PathBuf::from("/tmp/drones/drone-console.log"));
    assert_ne!(config.host, DEFAULT_HOST);
}
