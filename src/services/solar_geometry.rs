/// ============================================================
///  Solar geometry for the clear-sky model
///
///   1. Solar elevation  – delegated to an astronomical routine
///                         (NREL SPA by default, apparent elevation)
///   2. Day of year      – ordinal day in the site's local civil time
///   3. Eccentricity     – Spencer/NREL Earth-Sun distance correction
///   4. μ                – cosine of the solar zenith angle
/// ============================================================

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};
use solar_positioning::{RefractionCorrection, spa, time::DeltaT};
use std::f64::consts::PI;
use tracing::warn;

// ─── Physical constants ──────────────────────────────────────
/// Solar constant, World Radiometric Reference (W/m²)
pub const ISC: f64 = 1367.0;

// ─── Elevation provider ──────────────────────────────────────

/// Source of the sun's elevation angle above the horizon.
///
/// Implementations must follow the usual convention that an elevation
/// strictly above zero means the sun is up. `None` signals that the routine
/// could not evaluate the inputs; callers treat that as "sun down".
pub trait SolarElevation {
    fn elevation_degrees<Tz: TimeZone>(
        &self,
        latitude: f64,
        longitude: f64,
        when: &DateTime<Tz>,
    ) -> Option<f64>;
}

/// Apparent solar elevation from the NREL Solar Position Algorithm with
/// standard atmospheric refraction at sea level.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaElevation;

impl SolarElevation for SpaElevation {
    fn elevation_degrees<Tz: TimeZone>(
        &self,
        latitude: f64,
        longitude: f64,
        when: &DateTime<Tz>,
    ) -> Option<f64> {
        let utc = when.with_timezone(&Utc);
        let delta_t = match DeltaT::estimate_from_date_like(utc) {
            Ok(dt) => dt,
            Err(e) => {
                warn!(%utc, error = %e, "delta T estimate unavailable");
                return None;
            }
        };
        match spa::solar_position(
            utc,
            latitude,
            longitude,
            0.0,
            delta_t,
            Some(RefractionCorrection::standard()),
        ) {
            Ok(position) => Some(position.elevation_angle()),
            Err(e) => {
                warn!(latitude, longitude, %utc, error = %e, "solar position failed");
                None
            }
        }
    }
}

// ─── Time helpers ────────────────────────────────────────────

/// Naive timestamps are taken to be UTC.
pub fn as_aware_utc(ts: NaiveDateTime) -> DateTime<Utc> {
    ts.and_utc()
}

/// Ordinal day (1–366) of `when` in the offset it is expressed in.
///
/// Pass a timestamp already converted to the site's local zone; near
/// midnight the UTC ordinal can differ by one day.
pub fn day_of_year<Tz: TimeZone>(when: &DateTime<Tz>) -> u32 {
    when.ordinal()
}

// ─── Earth-Sun distance ──────────────────────────────────────

/// Spencer/NREL eccentricity correction factor E0 for day `n`.
pub fn eccentricity_correction(n: u32) -> f64 {
    let g = 2.0 * PI * (f64::from(n) - 1.0) / 365.0;
    1.00011
        + 0.034221 * g.cos()
        + 0.00128 * g.sin()
        + 0.000719 * (2.0 * g).cos()
        + 0.000077 * (2.0 * g).sin()
}

/// Extraterrestrial direct-normal irradiance `dni0` (W/m²) for day `n`.
pub fn extraterrestrial_normal(n: u32) -> f64 {
    ISC * eccentricity_correction(n)
}

/// μ = cos(zenith) = cos(90° − elevation). Not clamped.
pub fn mu_from_elevation(elevation_deg: f64) -> f64 {
    (90.0 - elevation_deg).to_radians().cos()
}
