//! # Gated motion primitives
//!
//! Gated motions run the drive pair open-loop and poll a sensor condition
//! until it trips or a timeout expires. The gate evaluation lives here; the
//! polling loops themselves sit with the `DriveBase` context since they own
//! the hub.
//!
//! Two timeout conventions coexist deliberately. Colour and reflection gates
//! treat a non-positive timeout as already expired, so a zero timeout gives
//! a single sample-and-stop. The collision gate treats a non-positive
//! timeout as infinite, since driving until contact is its normal use.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod collision;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

pub use collision::CollisionDetector;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Why a gated motion ended.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The sensor condition tripped.
    Tripped,

    /// The timeout expired first.
    TimedOut,
}

/// One channel of a raw colour reading.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
    Intensity,
}

/// Spin direction of a turning gated motion.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpinDirection {
    Clockwise,
    Anticlockwise,
}

/// A threshold condition on a scalar sensor reading.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Threshold {
    /// Trips when the reading is at or below the gate value.
    AtMost(i32),

    /// Trips when the reading is at or above the gate value.
    AtLeast(i32),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the gated motion primitives.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Sensor polling period in ms.
    pub poll_ms: u64,

    /// Settling time before the collision load baseline is sampled, in ms.
    pub baseline_settle_ms: u64,

    /// Default load rise over baseline that counts as a collision, in duty
    /// cycle units.
    pub collision_gate: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            poll_ms: 50,
            baseline_settle_ms: 500,
            collision_gate: 300.0,
        }
    }
}

impl ColorChannel {
    /// Index of this channel in an `Rgbi` reading.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl SpinDirection {
    /// The full-lock steering value spinning the pair this way.
    pub fn steering(self) -> i32 {
        match self {
            SpinDirection::Clockwise => 100,
            SpinDirection::Anticlockwise => -100,
        }
    }
}

impl Threshold {
    /// Whether a reading trips this threshold.
    pub fn met(&self, value: i32) -> bool {
        match *self {
            Threshold::AtMost(gate) => value <= gate,
            Threshold::AtLeast(gate) => value >= gate,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_threshold_inclusive_both_ways() {
        assert!(Threshold::AtMost(50).met(50));
        assert!(Threshold::AtMost(50).met(30));
        assert!(!Threshold::AtMost(50).met(51));

        assert!(Threshold::AtLeast(50).met(50));
        assert!(Threshold::AtLeast(50).met(80));
        assert!(!Threshold::AtLeast(50).met(49));
    }
}
