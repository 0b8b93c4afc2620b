//! # Drive base kinematics
//!
//! Conversions between linear distance along the ground and wheel rotation.
//! All distance-parameterised operations convert to wheel degrees at their
//! boundary and work in degrees internally, since that is what the motor
//! encoders report.

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a linear distance in centimetres into wheel rotation in degrees.
pub fn distance_to_rotation_deg(distance_cm: f64, wheel_circumference_cm: f64) -> f64 {
    distance_cm / wheel_circumference_cm * 360.0
}

/// Convert wheel rotation in degrees into linear distance in centimetres.
pub fn rotation_to_distance_cm(rotation_deg: f64, wheel_circumference_cm: f64) -> f64 {
    rotation_deg / 360.0 * wheel_circumference_cm
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_trip() {
        let circ = 17.6 / 3.0;
        let rot = distance_to_rotation_deg(123.4, circ);
        let dist = rotation_to_distance_cm(rot, circ);

        assert!((dist - 123.4).abs() < 1e-9);
    }

    #[test]
    fn test_known_values() {
        // One full wheel turn covers one circumference
        assert!((distance_to_rotation_deg(7.33, 7.33) - 360.0).abs() < 1e-9);

        // 100 cm on a 7.33 cm wheel is a bit over 13.6 rotations
        let rot = distance_to_rotation_deg(100.0, 7.33);
        assert!((rot - 4911.323).abs() < 0.001);
    }

    #[test]
    fn test_sign_preserved() {
        assert!(distance_to_rotation_deg(-50.0, 7.33) < 0.0);
        assert!(rotation_to_distance_cm(-360.0, 7.33) < 0.0);
    }
}
