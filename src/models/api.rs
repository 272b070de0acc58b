use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::irradiance::{ClearSkyResult, SiteParameters};
use crate::services::calibration::CalibrationWindow;
use crate::services::solar_geometry::as_aware_utc;

// ─── On-demand evaluation ────────────────────────────────────────────────────

/// Query for `GET /api/clear-sky`; unset fields fall back to the configured site.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClearSkyQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// RFC 3339 instant, or a naive `YYYY-MM-DDTHH:MM:SS` taken as UTC. Defaults to now.
    pub time: Option<String>,
    pub elevation_m: Option<f64>,
    pub linke_turbidity: Option<f64>,
}

impl ClearSkyQuery {
    pub fn site(&self, defaults: &SiteParameters) -> SiteParameters {
        SiteParameters {
            latitude: self.latitude.unwrap_or(defaults.latitude),
            longitude: self.longitude.unwrap_or(defaults.longitude),
            elevation_m: self.elevation_m.unwrap_or(defaults.elevation_m),
            linke_turbidity: self.linke_turbidity.unwrap_or(defaults.linke_turbidity),
        }
    }
}

/// Parses an RFC 3339 timestamp, or a naive one as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(aware) = DateTime::<FixedOffset>::parse_from_rfc3339(raw) {
        return Some(aware.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(as_aware_utc)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearSkyResponse {
    pub site: SiteParameters,
    /// Evaluation instant in the site's local zone
    pub local_time: String,
    pub day_of_year: u32,
    pub irradiance: ClearSkyResult,
}

// ─── Calibration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CalibrationRequest {
    pub observed: Vec<f64>,
    pub modeled: Vec<f64>,
    /// Solar elevation of each sample (deg)
    pub elevations: Vec<f64>,
    #[serde(flatten)]
    pub window: CalibrationWindow,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CalibrationResponse {
    pub scale_factor: f64,
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub last_update: Option<DateTime<Utc>>,
    pub mqtt_connected: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
