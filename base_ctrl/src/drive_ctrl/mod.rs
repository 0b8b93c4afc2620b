//! # Drive controller
//!
//! Closed-loop straight-line drives. Each tick runs a heading-hold PID that
//! steers the drive pair back onto its yaw reference, while a trapezoidal
//! speed profile ramps the commanded speed down towards the stop speed once
//! the driven distance passes the braking threshold. Steering is zeroed
//! during braking so the base stops straight.
//!
//! A drive may be finite (stop after a rotation-equivalent target) or
//! unlimited (run until an external stop request), and may either hard-stop
//! or coast into the next motion when it completes.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::ActuatorCmd;
use serde::Serialize;
use thiserror::Error;

pub use params::Params;
pub use state::DriveCtrl;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors from a drive control cycle.
#[derive(Debug, Error)]
pub enum DriveCtrlError {
    #[error("The drive has already completed and cannot be ticked again")]
    AlreadyComplete,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A request to drive straight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveRequest {
    /// Distance to cover in cm. Non-positive requests an unlimited drive
    /// that only ends on an external stop request. Drive direction comes
    /// from the speed signs, not from the distance.
    pub distance_cm: f64,

    /// Cruise speed in deg/s, signed (negative drives backwards).
    pub main_speed_dps: f64,

    /// Final approach speed in deg/s, same sign as the cruise speed.
    pub stop_speed_dps: f64,

    /// Fraction of the distance after which braking starts, in [0, 1].
    pub brake_start_frac: f64,

    /// Hold heading against the measured yaw at drive start instead of the
    /// global reference.
    pub isolated: bool,

    /// Hard-stop the pair at the end rather than coasting into the next
    /// motion.
    pub stop: bool,

    /// Re-align to the global heading reference with a corrective turn once
    /// the drive ends.
    pub re_align: bool,

    /// Control cycle period in ms.
    pub tick_ms: u64,
}

impl DriveRequest {
    /// A standard profiled drive over the given distance.
    pub fn over_distance(distance_cm: f64) -> Self {
        Self {
            distance_cm,
            main_speed_dps: 600.0,
            stop_speed_dps: 300.0,
            brake_start_frac: 0.7,
            isolated: false,
            stop: true,
            re_align: true,
            tick_ms: 100,
        }
    }

    /// An unlimited drive at the given speed, ended by a stop request.
    pub fn unlimited(speed_dps: f64) -> Self {
        Self {
            distance_cm: 0.0,
            main_speed_dps: speed_dps,
            stop_speed_dps: speed_dps,
            brake_start_frac: 0.7,
            isolated: false,
            stop: true,
            re_align: false,
            tick_ms: 100,
        }
    }
}

/// Sensor readings consumed by one drive control cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriveInput {
    /// Measured yaw in degrees.
    pub yaw_deg: f64,

    /// Mean driven wheel rotation since drive start, in degrees, signed.
    pub driven_deg: f64,

    /// An external stop has been requested.
    pub stop_requested: bool,
}

/// Actuator demand produced by one drive control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveOutput {
    pub cmd: ActuatorCmd,

    /// How long the driver shall wait before the next tick, in ms.
    pub delay_ms: u64,
}

/// Status of one drive control cycle, archived per tick.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct StatusReport {
    /// Archive timestamp, filled in by the driver loop.
    pub time_s: f64,

    /// Heading error at this tick in degrees.
    pub error_deg: f64,

    /// Steering demand after clamping, in [-100, 100].
    pub steering: f64,

    /// Commanded speed for this tick in deg/s.
    pub speed_dps: f64,

    /// Mean driven rotation at this tick in degrees.
    pub driven_deg: f64,

    /// True once the speed profile is braking.
    pub braking: bool,

    /// Scheduled proportional gain in use this tick.
    pub gain_p: f64,

    /// Scheduled integral gain in use this tick.
    pub gain_i: f64,

    /// Scheduled derivative gain in use this tick.
    pub gain_d: f64,
}
