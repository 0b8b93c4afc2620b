//! # Shared heading reference
//!
//! The base keeps one global heading reference across an entire task run.
//! Every non-isolated motion reads its yaw reference from here, and every
//! non-isolated turn commits its target here *before* the turn executes, so
//! that heading errors never accumulate across chained motions: a turn that
//! stops 2 degrees short is corrected by the following straight drive, which
//! steers towards the committed reference rather than towards whatever the
//! turn actually achieved.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::wrap_deg_180;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The global heading reference in degrees.
///
/// Unwrapped (it may grow beyond +-180 over many turns); comparisons against
/// measured yaw always go through [`heading_error_deg`].
#[derive(Debug, Clone, Copy)]
pub struct HeadingRef {
    global_turn_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HeadingRef {
    /// Create a new reference aligned with the given initial yaw.
    pub fn new(initial_yaw_deg: f64) -> Self {
        Self {
            global_turn_deg: initial_yaw_deg,
        }
    }

    /// The current global heading reference in degrees.
    pub fn global_deg(&self) -> f64 {
        self.global_turn_deg
    }

    /// Commit a new heading target as the global reference.
    ///
    /// Called before a non-isolated turn starts executing.
    pub fn commit(&mut self, target_deg: f64) {
        self.global_turn_deg = target_deg;
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The shortest signed heading error from a measured yaw to a target, in
/// degrees within (-180, 180].
pub fn heading_error_deg(target_deg: f64, measured_deg: f64) -> f64 {
    wrap_deg_180(target_deg - measured_deg)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_takes_shortest_path() {
        // 170 -> -170 is 20 deg clockwise-negative, not 340 the long way
        assert_eq!(heading_error_deg(170.0, -170.0), -20.0);
        assert_eq!(heading_error_deg(-170.0, 170.0), 20.0);
        assert_eq!(heading_error_deg(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_commit_moves_reference() {
        let mut href = HeadingRef::new(0.0);
        assert_eq!(href.global_deg(), 0.0);

        href.commit(450.0);
        assert_eq!(href.global_deg(), 450.0);

        // Unwrapped reference still yields a wrapped error
        assert_eq!(heading_error_deg(href.global_deg(), 80.0), 10.0);
    }
}
