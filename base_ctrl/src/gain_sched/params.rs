//! Gain schedule parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of a gain schedule.
///
/// Polynomial coefficients are ordered highest power first, as produced by
/// the offline fit of the calibration archives.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Proportional gain polynomial in commanded speed magnitude (deg/s).
    pub p_poly_coeffs: Vec<f64>,

    /// Integral gain polynomial in commanded speed magnitude (deg/s).
    pub i_poly_coeffs: Vec<f64>,

    /// Derivative gain used when no override is set (no fitted curve).
    pub d_default: f64,

    /// Pin the proportional gain, ignoring the polynomial.
    pub p_override: Option<f64>,

    /// Pin the integral gain, ignoring the polynomial.
    pub i_override: Option<f64>,

    /// Pin the derivative gain, ignoring the default.
    pub d_override: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            p_poly_coeffs: vec![
                5.90277778e-16,
                -2.15176282e-12,
                3.15365919e-9,
                -2.34879006e-6,
                9.20045989e-4,
                -1.77132762e-1,
                14.59,
            ],
            i_poly_coeffs: vec![
                2.14583333e-16,
                -6.96201923e-13,
                8.790625e-10,
                -5.52917468e-7,
                1.8870942e-4,
                -3.74442063e-2,
                4.30433333,
            ],
            d_default: 1.0,
            p_override: None,
            i_override: None,
            d_override: None,
        }
    }
}
