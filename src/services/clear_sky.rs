/// ============================================================
///  Clear-sky irradiance engine
///
///  Algorithm pipeline:
///   1. Solar geometry   – apparent elevation, day of year, μ
///   2. Extraterrestrial – eccentricity-corrected solar constant,
///                         projected on the horizontal (GHI0)
///   3. Clear-sky GHI    – Haurwitz (1945) with a μ-shape trim,
///                         altitude gain and Linke turbidity attenuation
///   4. Physical cap     – GHI ≤ 98 % of GHI0
///   5. Diffuse split    – ERBS diffuse fraction → DHI, DNI
///
///  The shape, altitude and turbidity coefficients are calibrated
///  constants tuned to track Ineichen-like clear-sky output; treat
///  them as fixed, they are not derived from a physical model.
/// ============================================================

use chrono::{DateTime, TimeZone};
use tracing::trace;

use crate::models::irradiance::{ClearSkyResult, SiteParameters};
use crate::services::erbs;
use crate::services::solar_geometry::{
    SolarElevation, SpaElevation, day_of_year, extraterrestrial_normal, mu_from_elevation,
};

// ─── Calibrated constants ────────────────────────────────────
const HAURWITZ_SCALE: f64 = 1098.0;
const HAURWITZ_EXTINCTION: f64 = 0.057;
const MU_FLOOR: f64 = 1e-6;

const SHAPE_DEPTH: f64 = 0.05;
const SHAPE_EXPONENT: f64 = 1.6;

const ALTITUDE_GAIN_PER_KM: f64 = 0.07;
const ALTITUDE_GAIN_MIN: f64 = 0.92;
const ALTITUDE_GAIN_MAX: f64 = 1.18;

const TURBIDITY_BASELINE: f64 = 3.0;
const TURBIDITY_MIN: f64 = 1.5;
const TURBIDITY_MAX: f64 = 8.0;
const TURBIDITY_COEFF: f64 = 0.04;

/// Fraction of GHI0 that clear-sky GHI may reach.
pub const GHI0_CAP: f64 = 0.98;

// ─── Haurwitz core + corrections ─────────────────────────────

/// Haurwitz clear-sky GHI (W/m²): `1098 · μ · exp(−0.057 / μ)`.
pub fn haurwitz(mu: f64) -> f64 {
    if mu <= 0.0 {
        return 0.0;
    }
    let mu_eff = mu.max(MU_FLOOR);
    HAURWITZ_SCALE * mu_eff * (-HAURWITZ_EXTINCTION / mu_eff).exp()
}

/// Trims the slight high-sun bias of Haurwitz; 1.0 at zenith, 0.95 at the
/// horizon.
pub fn shape_correction(mu: f64) -> f64 {
    if mu <= 0.0 {
        return 0.0;
    }
    1.0 - SHAPE_DEPTH * (1.0 - mu).powf(SHAPE_EXPONENT)
}

/// ~7 %/km brightening with site altitude, clamped to [0.92, 1.18].
pub fn altitude_gain(elevation_m: f64) -> f64 {
    let f = 1.0 + ALTITUDE_GAIN_PER_KM * elevation_m.max(0.0) / 1000.0;
    f.clamp(ALTITUDE_GAIN_MIN, ALTITUDE_GAIN_MAX)
}

/// Attenuation around a Linke turbidity baseline of 3.0.
pub fn turbidity_attenuation(linke_turbidity: f64) -> f64 {
    let tl = linke_turbidity.clamp(TURBIDITY_MIN, TURBIDITY_MAX);
    (-TURBIDITY_COEFF * (tl - TURBIDITY_BASELINE)).exp()
}

/// Clear-sky GHI for a given μ and site, before the extraterrestrial cap.
pub fn ghi_uncapped(mu: f64, elevation_m: f64, linke_turbidity: f64) -> f64 {
    haurwitz(mu)
        * shape_correction(mu)
        * altitude_gain(elevation_m)
        * turbidity_attenuation(linke_turbidity)
}

/// Irradiance components from μ and the extraterrestrial normal irradiance.
///
/// This is the whole model once geometry is known; `compute_clear_sky`
/// only adds the solar-position lookup.
pub fn from_geometry(mu: f64, dni0: f64, elevation_m: f64, linke_turbidity: f64) -> ClearSkyResult {
    if mu <= 0.0 {
        return ClearSkyResult::ZERO;
    }

    let ghi0 = dni0 * mu;
    let ghi = ghi_uncapped(mu, elevation_m, linke_turbidity).min(GHI0_CAP * ghi0).max(0.0);
    let (dni, dhi) = erbs::split(ghi, ghi0, mu);

    ClearSkyResult { ghi, dni, dhi }
}

// ─── Public API ──────────────────────────────────────────────

/// Clear-sky GHI/DNI/DHI (W/m²) for `site` at `when`.
///
/// `when` should be expressed in the site's local zone so the day of year
/// matches local civil time. Never fails: the sun below the horizon, or a
/// position the astronomical routine cannot evaluate, yields all zeros.
pub fn compute_clear_sky<Tz: TimeZone>(site: &SiteParameters, when: &DateTime<Tz>) -> ClearSkyResult {
    compute_clear_sky_with(&SpaElevation, site, when)
}

/// As [`compute_clear_sky`], with a caller-supplied elevation routine.
pub fn compute_clear_sky_with<P, Tz>(
    provider: &P,
    site: &SiteParameters,
    when: &DateTime<Tz>,
) -> ClearSkyResult
where
    P: SolarElevation,
    Tz: TimeZone,
{
    let Some(elev) = provider.elevation_degrees(site.latitude, site.longitude, when) else {
        return ClearSkyResult::ZERO;
    };
    if elev <= 0.0 {
        return ClearSkyResult::ZERO;
    }

    let mu = mu_from_elevation(elev).max(0.0);
    let dni0 = extraterrestrial_normal(day_of_year(when));
    let result = from_geometry(mu, dni0, site.elevation_m, site.linke_turbidity);

    trace!(elev, mu, dni0, ghi = result.ghi, dni = result.dni, dhi = result.dhi, "clear-sky evaluated");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::solar_geometry::{eccentricity_correction, ISC};
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, FixedOffset, Utc};
    use rstest::rstest;

    const LAT: f64 = 37.7749;
    const LON: f64 = -122.4194;

    fn sf() -> SiteParameters {
        SiteParameters::new(LAT, LON).with_elevation(16.0)
    }

    fn assert_ok(r: &ClearSkyResult) {
        assert!(r.ghi >= 0.0 && r.dni >= 0.0 && r.dhi >= 0.0, "negative component: {r:?}");
        assert!(r.dhi <= r.ghi, "diffuse exceeds global: {r:?}");
    }

    /// Elevation routine pinned to a fixed angle.
    struct FixedElevation(Option<f64>);

    impl SolarElevation for FixedElevation {
        fn elevation_degrees<Tz: TimeZone>(&self, _: f64, _: f64, _: &DateTime<Tz>) -> Option<f64> {
            self.0
        }
    }

    #[test]
    fn test_haurwitz_reference_values() {
        assert_abs_diff_eq!(haurwitz(1.0), 1098.0 * (-0.057f64).exp(), epsilon = 1e-9);
        assert_eq!(haurwitz(0.0), 0.0);
        assert_eq!(haurwitz(-0.3), 0.0);
        // Tiny μ stays finite and tiny
        let tiny = haurwitz(1e-9);
        assert!(tiny.is_finite() && tiny >= 0.0);
    }

    #[test]
    fn test_shape_correction_bounds() {
        assert_abs_diff_eq!(shape_correction(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shape_correction(1e-12), 0.95, epsilon = 1e-9);
        assert_eq!(shape_correction(0.0), 0.0);
        assert!(shape_correction(0.5) > 0.95 && shape_correction(0.5) < 1.0);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(-500.0, 1.0)]
    #[case(1000.0, 1.07)]
    #[case(1609.0, 1.0 + 0.07 * 1.609)]
    #[case(5000.0, 1.18)]
    fn test_altitude_gain(#[case] h: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(altitude_gain(h), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(3.0, 1.0)]
    #[case(1.0, (0.06f64).exp())]
    #[case(5.0, (-0.08f64).exp())]
    #[case(12.0, (-0.2f64).exp())]
    fn test_turbidity_attenuation(#[case] tl: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(turbidity_attenuation(tl), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_from_geometry_applies_cap() {
        // Zenith sun against an artificially weak extraterrestrial source
        let dni0 = 900.0;
        let r = from_geometry(1.0, dni0, 0.0, 3.0);
        assert_abs_diff_eq!(r.ghi, GHI0_CAP * dni0, epsilon = 1e-9);
        assert_ok(&r);
    }

    #[test]
    fn test_from_geometry_below_horizon_is_zero() {
        assert_eq!(from_geometry(0.0, ISC, 0.0, 3.0), ClearSkyResult::ZERO);
        assert_eq!(from_geometry(-0.2, ISC, 0.0, 3.0), ClearSkyResult::ZERO);
    }

    #[test]
    fn test_midday_reasonable_magnitudes() {
        // June solstice, ~1pm local (20:00 UTC) — high sun, clear
        let when = Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap();
        let r = compute_clear_sky(&sf(), &when);
        assert_ok(&r);
        assert!((800.0..=1150.0).contains(&r.ghi), "GHI was {:.1}", r.ghi);
        assert!((800.0..=1100.0).contains(&r.dni), "DNI was {:.1}", r.dni);
        assert!((50.0..=220.0).contains(&r.dhi), "DHI was {:.1}", r.dhi);
    }

    #[test]
    fn test_horizon_zero() {
        // ~1am local (08:00 UTC) — sun well below horizon
        let night = Utc.with_ymd_and_hms(2024, 6, 21, 8, 0, 0).unwrap();
        let r = compute_clear_sky(&SiteParameters::new(LAT, LON), &night);
        assert_eq!(r, ClearSkyResult::ZERO);
    }

    #[test]
    fn test_winter_midday_lower_irradiance() {
        let summer = Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2024, 12, 21, 20, 0, 0).unwrap();
        let s = compute_clear_sky(&sf(), &summer);
        let w = compute_clear_sky(&sf(), &winter);
        assert_ok(&s);
        assert_ok(&w);
        assert!(w.ghi < s.ghi, "winter GHI {:.1} >= summer {:.1}", w.ghi, s.ghi);
        assert!(w.dni < s.dni, "winter DNI {:.1} >= summer {:.1}", w.dni, s.dni);
    }

    #[rstest]
    #[case(2.2, 5.0)]
    #[case(2.5, 4.0)]
    fn test_hazier_means_less_beam_and_global(#[case] tl_low: f64, #[case] tl_high: f64) {
        let when = Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap();
        let clear = compute_clear_sky(&sf().with_linke_turbidity(tl_low), &when);
        let hazy = compute_clear_sky(&sf().with_linke_turbidity(tl_high), &when);
        assert_ok(&clear);
        assert_ok(&hazy);
        assert!(hazy.dni < clear.dni);
        assert!(hazy.ghi < clear.ghi);
    }

    #[test]
    fn test_turbidity_clamp_bounds_hold_equal() {
        let when = Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap();
        let a = compute_clear_sky(&sf().with_linke_turbidity(8.0), &when);
        let b = compute_clear_sky(&sf().with_linke_turbidity(20.0), &when);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invariants_over_a_day_and_cap() {
        let site = SiteParameters::new(52.52, 13.405).with_elevation(34.0);
        let start = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        for step in 0..96 {
            let when = start + Duration::minutes(15 * step);
            let elev = SpaElevation.elevation_degrees(site.latitude, site.longitude, &when).unwrap();
            let r = compute_clear_sky(&site, &when);
            assert_ok(&r);
            if elev <= 0.0 {
                assert_eq!(r, ClearSkyResult::ZERO, "non-zero at night: {when}");
            } else {
                let mu = mu_from_elevation(elev);
                let dni0 = ISC * eccentricity_correction(day_of_year(&when));
                assert!(r.ghi <= GHI0_CAP * dni0 * mu + 1e-9, "cap violated at {when}");
            }
        }
    }

    #[test]
    fn test_provider_failure_yields_zero() {
        let when = Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap();
        assert_eq!(compute_clear_sky_with(&FixedElevation(None), &sf(), &when), ClearSkyResult::ZERO);
        assert_eq!(compute_clear_sky_with(&FixedElevation(Some(0.0)), &sf(), &when), ClearSkyResult::ZERO);
    }

    #[test]
    fn test_grazing_sun_stays_finite() {
        let when = Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap();
        let r = compute_clear_sky_with(&FixedElevation(Some(1e-7)), &sf(), &when);
        assert_ok(&r);
        assert!(r.ghi.is_finite() && r.dni.is_finite() && r.dhi.is_finite());
    }

    #[test]
    fn test_day_of_year_taken_from_local_offset() {
        // 00:30 on Jan 1st in UTC+14 is still Dec 31st in UTC
        let provider = FixedElevation(Some(60.0));
        let site = SiteParameters::default();
        let utc = Utc.with_ymd_and_hms(2023, 12, 31, 10, 30, 0).unwrap();
        let kiritimati = utc.with_timezone(&FixedOffset::east_opt(14 * 3600).unwrap());
        let mu = mu_from_elevation(60.0);
        assert_eq!(
            compute_clear_sky_with(&provider, &site, &utc),
            from_geometry(mu, extraterrestrial_normal(365), 0.0, 3.0)
        );
        assert_eq!(
            compute_clear_sky_with(&provider, &site, &kiritimati),
            from_geometry(mu, extraterrestrial_normal(1), 0.0, 3.0)
        );
    }
}
