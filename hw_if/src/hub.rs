//! # Hub equipment interface
//!
//! The control core never owns physical device handles. It talks to the hub
//! through the [`Hub`] trait: simple read operations (yaw, position, duty
//! cycle, colour) and command operations (velocity, stop), plus the
//! monotonic clock and sleep primitives that pace the control loops.
//!
//! Reads of possibly-absent devices return `Err(HubError::DeviceNotPresent)`
//! rather than panicking, so the device probe can use an ordinary read as a
//! capability check.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The six peripheral ports on the hub.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

/// How a motor should come to rest when stopped.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopMode {
    /// Actively hold against external torque.
    Brake,

    /// Let the motor coast out, re-braking only on large disturbances.
    SmartCoast,
}

/// Possible errors raised by the hub equipment layer.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("No device is present on port {0:?}")]
    DeviceNotPresent(Port),

    #[error("The device on port {0:?} does not support this operation")]
    WrongDeviceKind(Port),

    #[error("The hub did not respond: {0}")]
    HubUnresponsive(String),
}

/// A single actuator demand produced by a tick controller.
///
/// The driver loop owning the hub translates these into `Hub` calls, so
/// controllers themselves never touch the hardware boundary.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum ActuatorCmd {
    /// Command the drive pair with a steering value in [-100, 100] and a
    /// velocity in deg/s.
    Pair { steering: i32, velocity_dps: i32 },

    /// Hard-stop the drive pair.
    PairStop,

    /// Run a single motor at a signed velocity in deg/s.
    Motor { port: Port, speed_dps: i32 },

    /// Stop a single motor.
    MotorStop { port: Port, mode: StopMode },

    /// Leave the actuators as they are (coast into the next motion).
    Hold,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A raw colour sensor reading: red, green, blue and intensity channels.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Rgbi {
    pub channels: [i32; 4],
}

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// All hub ports in probing order.
pub const ALL_PORTS: [Port; 6] = [Port::A, Port::B, Port::C, Port::D, Port::E, Port::F];

/// Full scale of the duty cycle reading (|duty| at actuator saturation).
pub const DUTY_CYCLE_FULL_SCALE: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Operations the hub hardware layer must provide to the control core.
pub trait Hub {
    // ---- HEADING SENSOR ----

    /// Read the current yaw in degrees. The underlying sensor reports in
    /// tenths of a degree; implementations surface it as float degrees.
    fn yaw_deg(&mut self) -> Result<f64, HubError>;

    /// Rebase the yaw sensor's zero to the given value.
    fn reset_yaw(&mut self, yaw_deg: f64) -> Result<(), HubError>;

    // ---- SINGLE MOTORS ----

    /// Run the motor on `port` continuously at a signed velocity in deg/s.
    fn motor_run(&mut self, port: Port, speed_dps: i32) -> Result<(), HubError>;

    /// Stop the motor on `port`.
    fn motor_stop(&mut self, port: Port, mode: StopMode) -> Result<(), HubError>;

    /// Read the accumulated relative position of the motor in degrees.
    fn motor_relative_position(&mut self, port: Port) -> Result<f64, HubError>;

    /// Reset the relative position counter of the motor to the given value.
    fn motor_reset_relative_position(&mut self, port: Port, pos_deg: f64) -> Result<(), HubError>;

    /// Read the absolute position of the motor in degrees within one
    /// rotation.
    fn motor_absolute_position(&mut self, port: Port) -> Result<f64, HubError>;

    /// Read the instantaneous duty cycle (load) of the motor, full scale
    /// [`DUTY_CYCLE_FULL_SCALE`].
    fn motor_duty_cycle(&mut self, port: Port) -> Result<f64, HubError>;

    // ---- DRIVE PAIR ----

    /// Command the drive pair with a steering value in [-100, 100] and a
    /// velocity in deg/s. Steering 100 spins the pair on the spot.
    fn pair_move(&mut self, steering: i32, velocity_dps: i32) -> Result<(), HubError>;

    /// As [`Hub::pair_move`] but the hub stops the pair itself once the
    /// duration elapses.
    fn pair_move_for_ms(
        &mut self,
        duration_ms: u64,
        steering: i32,
        velocity_dps: i32,
    ) -> Result<(), HubError>;

    /// Hard-stop the drive pair.
    fn pair_stop(&mut self) -> Result<(), HubError>;

    // ---- COLOUR SENSOR ----

    /// Read the colour sensor on `port`.
    fn color_rgbi(&mut self, port: Port) -> Result<Rgbi, HubError>;

    /// Read the reflected light value from the sensor on `port`.
    fn color_reflection(&mut self, port: Port) -> Result<i32, HubError>;

    // ---- CLOCK ----

    /// Monotonic milliseconds since an arbitrary epoch.
    fn ticks_ms(&mut self) -> u64;

    /// Suspend for the given number of milliseconds. This is the only
    /// suspension point of every control loop.
    fn sleep_ms(&mut self, ms: u64);
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Port {
    /// Index of this port in [`ALL_PORTS`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Apply an actuator command to a hub.
pub fn apply_cmd<H: Hub>(hub: &mut H, cmd: &ActuatorCmd) -> Result<(), HubError> {
    match *cmd {
        ActuatorCmd::Pair {
            steering,
            velocity_dps,
        } => hub.pair_move(steering, velocity_dps),
        ActuatorCmd::PairStop => hub.pair_stop(),
        ActuatorCmd::Motor { port, speed_dps } => hub.motor_run(port, speed_dps),
        ActuatorCmd::MotorStop { port, mode } => hub.motor_stop(port, mode),
        ActuatorCmd::Hold => Ok(()),
    }
}
