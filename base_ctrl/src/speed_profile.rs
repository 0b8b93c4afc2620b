//! # Trapezoidal speed profile
//!
//! Distance drives run at a constant main speed until a braking threshold,
//! then ramp linearly down towards a non-zero stop speed over the remaining
//! distance. The ramp is computed against actually driven distance, not
//! time, so a stalled or slipping base never outruns its own deceleration.

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A deceleration profile over a finite rotation target.
///
/// All speeds and distances are signed and share the sign of the drive
/// direction, distances in wheel degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedProfile {
    /// Cruise speed in deg/s.
    pub main_speed_dps: f64,

    /// Final approach speed in deg/s, held until the target is reached.
    pub stop_speed_dps: f64,

    /// Driven distance at which braking starts, in wheel degrees.
    pub brake_start_deg: f64,

    /// Length of the braking window, in wheel degrees.
    pub decel_distance_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SpeedProfile {
    /// Build a profile for a rotation target, braking over the final
    /// `1 - brake_start_frac` of the distance.
    pub fn from_target(
        rotation_target_deg: f64,
        brake_start_frac: f64,
        main_speed_dps: f64,
        stop_speed_dps: f64,
    ) -> Self {
        Self {
            main_speed_dps,
            stop_speed_dps,
            brake_start_deg: rotation_target_deg * brake_start_frac,
            decel_distance_deg: rotation_target_deg * (1.0 - brake_start_frac),
        }
    }

    /// Deceleration rate in deg/s per driven degree. The braking window is
    /// clamped to at least one degree so a degenerate profile cannot divide
    /// by zero.
    pub fn decel_rate(&self) -> f64 {
        (self.main_speed_dps - self.stop_speed_dps) / self.decel_distance_deg.abs().max(1.0)
    }

    /// True once the driven distance has passed the braking threshold.
    pub fn braking(&self, driven_deg: f64) -> bool {
        driven_deg.abs() > self.brake_start_deg.abs()
    }

    /// The commanded speed for the next tick.
    ///
    /// Before the braking threshold the current speed is held. After it, the
    /// speed is decremented in proportion to the distance covered since the
    /// previous tick (at least one degree per tick, so the ramp advances
    /// even when the encoders barely move), and clamped so it never crosses
    /// the stop speed.
    pub fn next_speed(&self, current_dps: f64, driven_deg: f64, prev_driven_deg: f64) -> f64 {
        if !self.braking(driven_deg) {
            return current_dps;
        }

        let step_deg = (driven_deg.abs() - prev_driven_deg.abs()).max(1.0);
        let next = current_dps - self.decel_rate() * step_deg;

        if next.abs() < self.stop_speed_dps.abs() {
            self.stop_speed_dps
        } else {
            next
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn profile() -> SpeedProfile {
        SpeedProfile {
            main_speed_dps: 600.0,
            stop_speed_dps: 300.0,
            brake_start_deg: 700.0,
            decel_distance_deg: 100.0,
        }
    }

    #[test]
    fn test_rate() {
        assert_eq!(profile().decel_rate(), 3.0);
    }

    #[test]
    fn test_cruise_before_threshold() {
        let p = profile();
        assert!(!p.braking(500.0));
        assert_eq!(p.next_speed(600.0, 500.0, 480.0), 600.0);
    }

    #[test]
    fn test_ramp_scales_with_distance_step() {
        let p = profile();
        assert!(p.braking(710.0));

        // 10 degrees covered since last tick at rate 3 drops 30 deg/s
        assert_eq!(p.next_speed(600.0, 710.0, 700.0), 570.0);

        // A near-stationary tick still steps the ramp by one degree
        assert_eq!(p.next_speed(570.0, 710.2, 710.0), 567.0);
    }

    #[test]
    fn test_never_crosses_stop_speed() {
        let p = profile();

        let mut speed = 600.0;
        let mut driven = 700.0;
        while driven < 820.0 {
            let prev = driven;
            driven += 15.0;
            speed = p.next_speed(speed, driven, prev);
            assert!(speed >= 300.0);
        }
        assert_eq!(speed, 300.0);
    }

    #[test]
    fn test_reverse_drive_converges_from_below() {
        let p = SpeedProfile {
            main_speed_dps: -600.0,
            stop_speed_dps: -300.0,
            brake_start_deg: -700.0,
            decel_distance_deg: -100.0,
        };
        assert_eq!(p.decel_rate(), -3.0);

        // Driven distance is negative in a reverse drive
        assert!(p.braking(-710.0));
        assert_eq!(p.next_speed(-600.0, -710.0, -700.0), -570.0);

        let mut speed = -600.0;
        let mut driven = -700.0;
        while driven > -820.0 {
            let prev = driven;
            driven -= 15.0;
            speed = p.next_speed(speed, driven, prev);
            assert!(speed <= -300.0);
        }
        assert_eq!(speed, -300.0);
    }

    #[test]
    fn test_from_target_splits_distance() {
        let p = SpeedProfile::from_target(1000.0, 0.7, 600.0, 300.0);
        assert!((p.brake_start_deg - 700.0).abs() < 1e-9);
        assert!((p.decel_distance_deg - 300.0).abs() < 1e-9);
    }
}
