//! # Turn controller
//!
//! Closed-loop turns to an absolute gyro heading. Each tick compares the
//! measured yaw with the target along the shortest path, runs a PID on the
//! error and emits an actuator demand for one of three turn geometries (tank
//! turn on the spot, or a pivot about either wheel).
//!
//! With smart stop enabled the turn only completes after the error has been
//! inside tolerance for two consecutive observations separated by a settle
//! delay, which catches the base coasting through the target.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::ActuatorCmd;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use params::Params;
pub use state::TurnCtrl;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Geometry of a turn.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnKind {
    /// Both wheels counter-rotate, turning on the spot.
    Tank,

    /// The left wheel is held and the right wheel drives backwards.
    PivotOnLeft,

    /// The right wheel is held and the left wheel drives forwards.
    PivotOnRight,
}

/// Lifecycle of a turn.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnPhase {
    /// Driving the error towards tolerance.
    Running,

    /// Inside tolerance once, waiting out the settle delay before
    /// confirming.
    Settled,

    /// Inside tolerance on re-observation, turn finished.
    ConfirmedStop,
}

/// Possible errors from a turn control cycle.
#[derive(Debug, Error)]
pub enum TurnCtrlError {
    #[error("The turn has already completed and cannot be ticked again")]
    AlreadyComplete,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A request to turn the base to an absolute heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRequest {
    /// Absolute target heading in degrees.
    pub target_deg: f64,

    /// Turn geometry.
    pub kind: TurnKind,

    /// Minimum controller output magnitude in deg/s, keeping the output
    /// above stiction.
    pub min_speed_dps: f64,

    /// Maximum controller output magnitude in deg/s.
    pub max_speed_dps: f64,

    /// Skip committing the target to the global heading reference.
    pub isolated: bool,

    /// Require the error to hold inside tolerance across a settle delay
    /// before completing.
    pub smart_stop: bool,
}

impl TurnRequest {
    /// A standard smart-stopped tank turn to the given heading.
    pub fn to_heading(target_deg: f64) -> Self {
        Self {
            target_deg,
            kind: TurnKind::Tank,
            min_speed_dps: 60.0,
            max_speed_dps: 500.0,
            isolated: false,
            smart_stop: true,
        }
    }
}

/// Sensor readings consumed by one turn control cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnInput {
    /// Measured yaw in degrees.
    pub yaw_deg: f64,

    /// Mean drive motor duty cycle magnitude, full scale
    /// [`hw_if::hub::DUTY_CYCLE_FULL_SCALE`].
    pub mean_duty: f64,
}

/// Actuator demand produced by one turn control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnOutput {
    pub cmd: ActuatorCmd,

    /// How long the driver shall wait before the next tick, in ms.
    pub delay_ms: u64,
}

/// Status of one turn control cycle, archived per tick.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct StatusReport {
    /// Archive timestamp, filled in by the driver loop.
    pub time_s: f64,

    /// Heading error at this tick in degrees.
    pub error_deg: f64,

    /// Raw PID output before clamping, in deg/s.
    pub raw_output_dps: f64,

    /// Clamped controller output in deg/s.
    pub output_dps: f64,

    /// Load-based derivative damping factor in [0, 1].
    pub damping: f64,

    /// Phase after this tick.
    pub phase: TurnPhase,
}
