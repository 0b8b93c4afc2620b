//! # Gain scheduling
//!
//! PID gains for the steering and turn controllers as a function of the
//! commanded wheel speed. The proportional and integral gains come from
//! polynomial fits of drive calibration data; the derivative gain has no
//! fitted curve and falls back to a constant. Any gain can be pinned with an
//! override, in which case the polynomial for that term is ignored.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::poly_val;

pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One evaluated PID gain triple.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Gains {
    pub p: f64,
    pub i: f64,
    pub d: f64,
}

/// Evaluates scheduled or overridden gains for a commanded speed.
#[derive(Debug, Clone)]
pub struct GainSchedule {
    params: Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GainSchedule {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Evaluate the gain triple for a commanded speed in deg/s.
    ///
    /// The polynomials are fitted on speed magnitude, so reverse drives
    /// schedule the same gains as forward drives.
    pub fn gains(&self, speed_dps: f64) -> Gains {
        let speed = speed_dps.abs();

        let p = match self.params.p_override {
            Some(p) => p,
            None => poly_val(speed, &self.params.p_poly_coeffs),
        };
        let i = match self.params.i_override {
            Some(i) => i,
            None => poly_val(speed, &self.params.i_poly_coeffs),
        };
        let d = match self.params.d_override {
            Some(d) => d,
            None => self.params.d_default,
        };

        Gains { p, i, d }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scheduled_gains_vary_with_speed() {
        let sched = GainSchedule::new(Params::default());

        let slow = sched.gains(100.0);
        let fast = sched.gains(600.0);

        assert_ne!(slow.p, fast.p);
        assert_ne!(slow.i, fast.i);
        // No derivative polynomial, both fall back to the default
        assert_eq!(slow.d, fast.d);
    }

    #[test]
    fn test_overrides_pin_gains() {
        let params = Params {
            p_override: Some(5.0),
            i_override: Some(0.0),
            d_override: Some(0.4),
            ..Params::default()
        };
        let sched = GainSchedule::new(params);

        assert_eq!(sched.gains(100.0), sched.gains(600.0));
        assert_eq!(
            sched.gains(250.0),
            Gains {
                p: 5.0,
                i: 0.0,
                d: 0.4
            }
        );
    }

    #[test]
    fn test_reverse_speed_schedules_as_forward() {
        let sched = GainSchedule::new(Params::default());
        assert_eq!(sched.gains(-600.0), sched.gains(600.0));
    }

    #[test]
    fn test_calibration_anchor_points() {
        let sched = GainSchedule::new(Params::default());

        // At zero speed the polynomials reduce to their constant terms
        let g = sched.gains(0.0);
        assert!((g.p - 14.59).abs() < 1e-9);
        assert!((g.i - 4.30433333).abs() < 1e-9);
        assert_eq!(g.d, 1.0);
    }
}
