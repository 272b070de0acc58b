use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

pub const DOMAIN: &str = "clear_sky_solar";

/// Default refresh cadence of the coordinator.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(60);

pub const GHI: &str = "ghi";
pub const DNI: &str = "dni";
pub const DHI: &str = "dhi";

pub const UNIT_IRRADIANCE: &str = "W/m²";

// ─── Sensor catalogue ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub device_class: &'static str,
    pub state_class: &'static str,
    pub unit_of_measurement: &'static str,
    pub suggested_display_precision: u8,
}

impl SensorDescription {
    const fn irradiance(key: &'static str, name: &'static str) -> Self {
        Self {
            key,
            name,
            device_class: "irradiance",
            state_class: "measurement",
            unit_of_measurement: UNIT_IRRADIANCE,
            suggested_display_precision: 1,
        }
    }

    pub fn unique_id(&self) -> String {
        format!("{}_{}", DOMAIN, self.key)
    }
}

pub static SENSOR_DESCRIPTIONS: [SensorDescription; 3] = [
    SensorDescription::irradiance(GHI, "Clear-Sky GHI"),
    SensorDescription::irradiance(DNI, "Clear-Sky DNI"),
    SensorDescription::irradiance(DHI, "Clear-Sky DHI"),
];

pub fn find_description(key: &str) -> Option<&'static SensorDescription> {
    SENSOR_DESCRIPTIONS.iter().find(|d| d.key == key)
}

// ─── Coordinator output ──────────────────────────────────────────────────────

/// Latest readings produced by one coordinator refresh.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SensorSnapshot {
    pub updated_at: DateTime<Utc>,
    pub readings: BTreeMap<String, f64>,
}

/// A sensor as exposed over the API: its description plus current value.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SensorState {
    pub unique_id: String,
    #[serde(flatten)]
    pub description: SensorDescription,
    /// `None` until the coordinator has produced data
    pub native_value: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl SensorState {
    pub fn from_snapshot(description: &SensorDescription, snapshot: Option<&SensorSnapshot>) -> Self {
        Self {
            unique_id: description.unique_id(),
            description: *description,
            native_value: snapshot.and_then(|s| s.readings.get(description.key).copied()),
            last_updated: snapshot.map(|s| s.updated_at),
        }
    }
}
