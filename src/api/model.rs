//! Records returned by the drone simulation API, plus the small display
//! helpers the detail views need.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One page of a paginated list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A single telemetry sample, as served by `/api/{n}/dynamics/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DynamicsRecord {
    /// Link to the drone resource this sample belongs to.
    pub drone: String,
    pub timestamp: String,
    pub speed: i32,
    pub align_roll: f64,
    pub align_pitch: f64,
    pub align_yaw: f64,
    pub longitude: f64,
    pub latitude: f64,
    /// Remaining charge in the drone type's capacity units.
    pub battery_status: u32,
    pub last_seen: String,
    pub status: String,
}

/// A drone as listed by `/api/drones/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DroneRecord {
    pub id: u32,
    /// Link to the drone type resource.
    pub dronetype: String,
    pub created: String,
    pub serialnumber: String,
    pub carriage_weight: i32,
    pub carriage_type: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DroneTypeRecord {
    pub id: u32,
    pub manufacturer: String,
    pub typename: String,
    pub weight: i32,
    pub max_speed: i32,
    pub battery_capacity: u32,
    pub control_range: i32,
    pub max_carriage: i32,
}

/// A telemetry sample with its drone id and battery percentage resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicsView {
    pub drone_id: u32,
    pub timestamp: String,
    pub speed: i32,
    pub align_roll: f64,
    pub align_pitch: f64,
    pub align_yaw: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub battery_percent: u32,
    pub last_seen: String,
    pub status: String,
}

impl DynamicsView {
    pub fn from_record(record: &DynamicsRecord, drone_id: u32, battery_percent: u32) -> Self {
        Self {
            drone_id,
            timestamp: record.timestamp.clone(),
            speed: record.speed,
            align_roll: record.align_roll,
            align_pitch: record.align_pitch,
            align_yaw: record.align_yaw,
            longitude: record.longitude,
            latitude: record.latitude,
            battery_percent,
            last_seen: record.last_seen.clone(),
            status: record.status.clone(),
        }
    }

    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.latitude, self.longitude
        )
    }

    pub fn battery_level(&self) -> BatteryLevel {
        BatteryLevel::from_percent(self.battery_percent)
    }
}

/// A drone joined with the type it is an instance of.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogueRow {
    pub id: u32,
    pub typename: String,
    pub manufacturer: String,
    pub created: String,
    pub serialnumber: String,
    pub carriage_weight: i32,
    pub carriage_type: String,
}

// ── Display helpers ──────────────────────────────────────────────────────────

/// Five-step battery gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatteryLevel {
    Full,
    High,
    Medium,
    Low,
    Critical,
}

impl BatteryLevel {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            80.. => BatteryLevel::Full,
            50..=79 => BatteryLevel::High,
            20..=49 => BatteryLevel::Medium,
            10..=19 => BatteryLevel::Low,
            _ => BatteryLevel::Critical,
        }
    }

    pub fn gauge(&self) -> &'static str {
        match self {
            BatteryLevel::Full => "[████]",
            BatteryLevel::High => "[███ ]",
            BatteryLevel::Medium => "[██  ]",
            BatteryLevel::Low => "[█   ]",
            BatteryLevel::Critical => "[    ]",
        }
    }
}

/// `round(power * 100 / capacity)`; a zero capacity reads as empty.
pub fn battery_percentage(power: u32, capacity: u32) -> u32 {
    if capacity == 0 {
        return 0;
    }
    (f64::from(power) * 100.0 / f64::from(capacity)).round() as u32
}

/// Render an ISO-8601 date-time as `YYYY-Month-DD HH:MM:SS`, keeping the
/// wall-clock time of whatever offset it was written in.
///
/// Input that is not a valid date-time is returned as is.
pub fn format_timestamp(iso: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.naive_local())
        .or_else(|_| iso.parse::<NaiveDateTime>());
    match parsed {
        Ok(local) => local.format("%Y-%B-%d %H:%M:%S").to_string(),
        Err(_) => iso.to_string(),
    }
}
