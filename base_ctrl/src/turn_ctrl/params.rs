//! Turn controller parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::gain_sched;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the turn controller.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Heading error magnitude below which the turn is on target, in
    /// degrees.
    pub tolerance_deg: f64,

    /// Exponent of the duty-cycle damping curve applied to the derivative
    /// term. Higher values keep damping negligible until the motors are
    /// close to saturation.
    pub power_exp: f64,

    /// Control cycle period in ms.
    pub tick_ms: u64,

    /// Settle delay before re-observing an in-tolerance error, in ms.
    pub settle_ms: u64,

    /// Gain schedule. Turns ship with all three gains overridden to fixed
    /// values from turn calibration, the drive polynomials are fitted for
    /// straight running.
    pub gain_sched: gain_sched::Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            tolerance_deg: 0.5,
            power_exp: 6.0,
            tick_ms: 10,
            settle_ms: 90,
            gain_sched: gain_sched::Params {
                p_override: Some(5.0),
                i_override: Some(0.0),
                d_override: Some(0.4),
                ..gain_sched::Params::default()
            },
        }
    }
}
