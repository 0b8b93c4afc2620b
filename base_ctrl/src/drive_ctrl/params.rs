//! Drive controller parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::gain_sched;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the drive controller.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Maximum steering demand magnitude.
    pub steering_limit: f64,

    /// Gain schedule. Drives run on the fitted polynomials by default, so
    /// the steering gains track the commanded speed as it ramps down.
    pub gain_sched: gain_sched::Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            steering_limit: 100.0,
            gain_sched: gain_sched::Params::default(),
        }
    }
}
