//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Apply polynomial coefficients to a value.
///
/// Coefficients are ordered highest power first, as produced by a polynomial
/// fit of the calibration data.
pub fn poly_val<T>(value: T, coeffs: &[T]) -> T
where
    T: Float + std::ops::AddAssign,
{
    let mut res = T::from(0).unwrap();

    for i in 0..(coeffs.len() as i32) {
        res += value.powi(coeffs.len() as i32 - 1 - i) * coeffs[i as usize];
    }

    res
}

/// Clamp a value between a minimum and a maximum.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Clamp the magnitude of a value between a minimum and maximum, preserving
/// its sign.
pub fn clamp_mag<T>(value: T, min_mag: T, max_mag: T) -> T
where
    T: Float,
{
    clamp(value.abs(), min_mag, max_mag) * value.signum()
}

/// Wrap an angle in degrees into the range (-180, 180].
///
/// Used to get the shortest signed heading error between two headings, so
/// that a target of 170 deg seen from -170 deg is an error of -20 deg, not
/// 340 deg.
pub fn wrap_deg_180<T>(angle_deg: T) -> T
where
    T: Float,
{
    let full = T::from(360.0).unwrap();
    let half = T::from(180.0).unwrap();

    let mut wrapped = angle_deg % full;

    if wrapped > half {
        wrapped = wrapped - full;
    }
    if wrapped <= -half {
        wrapped = wrapped + full;
    }

    wrapped
}

/// Normalise an angle in degrees into the range [0, 360).
pub fn norm_deg_360<T>(angle_deg: T) -> T
where
    T: Float,
{
    let full = T::from(360.0).unwrap();

    let r = angle_deg % full;
    if r < T::from(0).unwrap() {
        r + full
    } else {
        r
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_poly_val() {
        // 2x^2 + 3x + 1
        let coeffs = [2f64, 3f64, 1f64];

        assert_eq!(poly_val(0f64, &coeffs), 1f64);
        assert_eq!(poly_val(1f64, &coeffs), 6f64);
        assert_eq!(poly_val(2f64, &coeffs), 15f64);
    }

    #[test]
    fn test_wrap_deg_180() {
        assert_eq!(wrap_deg_180(0f64), 0f64);
        assert_eq!(wrap_deg_180(90f64), 90f64);
        assert_eq!(wrap_deg_180(180f64), 180f64);
        assert_eq!(wrap_deg_180(-180f64), 180f64);
        assert_eq!(wrap_deg_180(190f64), -170f64);
        assert_eq!(wrap_deg_180(-190f64), 170f64);
        assert_eq!(wrap_deg_180(340f64), -20f64);
        assert_eq!(wrap_deg_180(720f64), 0f64);
    }

    #[test]
    fn test_norm_deg_360() {
        assert_eq!(norm_deg_360(-10f64), 350f64);
        assert_eq!(norm_deg_360(370f64), 10f64);
        assert_eq!(norm_deg_360(0f64), 0f64);
    }

    #[test]
    fn test_clamp_mag() {
        assert_eq!(clamp_mag(50f64, 60f64, 500f64), 60f64);
        assert_eq!(clamp_mag(-50f64, 60f64, 500f64), -60f64);
        assert_eq!(clamp_mag(700f64, 60f64, 500f64), 500f64);
        assert_eq!(clamp_mag(-700f64, 60f64, 500f64), -500f64);
        assert_eq!(clamp_mag(300f64, 60f64, 500f64), 300f64);
    }
}
