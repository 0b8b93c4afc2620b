//! Collision detection from drive motor load
//!
//! The base detects contact with an obstacle purely from the drive motors:
//! pushing against something raises the duty cycle the speed controller
//! needs. A baseline is sampled after the drive has settled to cruise load,
//! and a collision is declared when the mean load rises a gate amount above
//! that baseline.

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Detects collisions as load rise over a sampled baseline.
#[derive(Debug, Clone, Copy)]
pub struct CollisionDetector {
    baseline: f64,
    gate: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CollisionDetector {
    /// Create a detector from the settled cruise load baseline and the gate
    /// rise, both in duty cycle units.
    pub fn new(baseline: f64, gate: f64) -> Self {
        Self { baseline, gate }
    }

    /// The baseline load this detector compares against.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Whether the given mean load magnitude indicates a collision.
    pub fn collided(&self, mean_load: f64) -> bool {
        mean_load - self.baseline > self.gate
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_trips_on_rise_over_baseline() {
        let det = CollisionDetector::new(2000.0, 300.0);

        assert!(!det.collided(2000.0));
        assert!(!det.collided(2300.0));
        assert!(det.collided(2301.0));
        assert!(det.collided(9000.0));
    }

    #[test]
    fn test_load_drop_never_trips() {
        let det = CollisionDetector::new(2000.0, 300.0);
        assert!(!det.collided(100.0));
    }
}
