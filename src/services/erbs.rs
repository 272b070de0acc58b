/// ERBS diffuse split: derive DHI and DNI from a global horizontal value
/// through the clearness index.

// ─── Guards ──────────────────────────────────────────────────
const GHI0_FLOOR: f64 = 1e-3;
const MU_FLOOR: f64 = 1e-3;
const KT_MAX: f64 = 1.2;

// ─── Regime boundaries ───────────────────────────────────────
const KT_OVERCAST: f64 = 0.22;
const KT_CLEAR: f64 = 0.80;

/// Clearness index kt = GHI / GHI0, capped at 1.2.
pub fn clearness_index(ghi: f64, ghi0: f64) -> f64 {
    (ghi / ghi0.max(GHI0_FLOOR)).min(KT_MAX)
}

/// Erbs, Klein & Duffie (1982) diffuse fraction as a function of kt.
pub fn diffuse_fraction(kt: f64) -> f64 {
    if kt < KT_OVERCAST {
        1.0 - 0.09 * kt
    } else if kt < KT_CLEAR {
        0.9511 - 0.1604 * kt + 4.388 * kt.powi(2) - 16.638 * kt.powi(3) + 12.336 * kt.powi(4)
    } else {
        0.165
    }
}

/// Splits `ghi` into `(dni, dhi)`.
///
/// `ghi0` is the extraterrestrial horizontal irradiance and `mu` the cosine
/// of the zenith angle for the same instant. DHI is clamped to `[0, ghi]`.
pub fn split(ghi: f64, ghi0: f64, mu: f64) -> (f64, f64) {
    let kt = clearness_index(ghi, ghi0);
    let fd = diffuse_fraction(kt);

    let dhi = (fd * ghi).min(ghi).max(0.0);
    let dni = ((ghi - dhi) / mu.max(MU_FLOOR)).max(0.0);
    (dni, dhi)
}
