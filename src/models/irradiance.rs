use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::sensor::{DHI, DNI, GHI};

// ─── Model output ────────────────────────────────────────────────────────────

/// Clear-sky irradiance components, all in W/m².
///
/// Always `dhi <= ghi`; every component is zero while the sun is at or below
/// the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ClearSkyResult {
    /// Global horizontal irradiance
    pub ghi: f64,
    /// Direct normal irradiance
    pub dni: f64,
    /// Diffuse horizontal irradiance
    pub dhi: f64,
}

impl ClearSkyResult {
    pub const ZERO: Self = Self { ghi: 0.0, dni: 0.0, dhi: 0.0 };

    /// Readings keyed the way the sensors publish them.
    pub fn as_readings(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            (GHI.to_string(), self.ghi),
            (DNI.to_string(), self.dni),
            (DHI.to_string(), self.dhi),
        ])
    }
}

// ─── Site inputs ─────────────────────────────────────────────────────────────

fn default_linke_turbidity() -> f64 { 3.0 }

/// Scalar site inputs to the model. Longitude is negative west.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SiteParameters {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Height above sea level (m)
    #[serde(default)]
    pub elevation_m: f64,
    /// Linke turbidity, typically 2-5
    #[serde(default = "default_linke_turbidity")]
    pub linke_turbidity: f64,
}

impl SiteParameters {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, ..Self::default() }
    }

    pub fn with_elevation(mut self, elevation_m: f64) -> Self {
        self.elevation_m = elevation_m;
        self
    }

    pub fn with_linke_turbidity(mut self, linke_turbidity: f64) -> Self {
        self.linke_turbidity = linke_turbidity;
        self
    }
}

impl Default for SiteParameters {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            elevation_m: 0.0,
            linke_turbidity: default_linke_turbidity(),
        }
    }
}
