use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{ClearSkyError, Result};

const GHI_NUMERIC_FLOOR: f64 = 1e-6;

fn default_min_elev() -> f64 { 10.0 }
fn default_max_elev() -> f64 { 60.0 }

/// Solar elevation band (degrees) of the samples used for calibration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, ToSchema)]
pub struct CalibrationWindow {
    #[serde(default = "default_min_elev")]
    pub min_elev: f64,
    #[serde(default = "default_max_elev")]
    pub max_elev: f64,
}

impl Default for CalibrationWindow {
    fn default() -> Self {
        Self { min_elev: default_min_elev(), max_elev: default_max_elev() }
    }
}

/// Multiplicative site correction from clear-day samples.
///
/// Pairs observed and modeled GHI with the solar elevation of each sample,
/// keeps the ones inside `window` with a usable modeled value, and returns
/// the median observed/modeled ratio. Returns 1.0 when no sample qualifies.
///
/// # Errors
/// `InvalidSequenceLengths` when the three slices differ in length.
pub fn estimate_site_scale_factor(
    observed_ghi: &[f64],
    modeled_ghi: &[f64],
    elevations_deg: &[f64],
    window: CalibrationWindow,
) -> Result<f64> {
    if observed_ghi.len() != modeled_ghi.len() || modeled_ghi.len() != elevations_deg.len() {
        return Err(ClearSkyError::InvalidSequenceLengths {
            observed: observed_ghi.len(),
            modeled: modeled_ghi.len(),
            elevations: elevations_deg.len(),
        });
    }

    let mut ratios: Vec<f64> = observed_ghi
        .iter()
        .zip(modeled_ghi)
        .zip(elevations_deg)
        .filter(|&(_, &el)| el >= window.min_elev && el <= window.max_elev)
        .filter(|&((_, &modeled), _)| modeled > GHI_NUMERIC_FLOOR)
        .map(|((&observed, &modeled), _)| observed / modeled)
        .filter(|&r| r > 0.0)
        .collect();

    Ok(median(&mut ratios).unwrap_or(1.0))
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
