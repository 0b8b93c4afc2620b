//! # Simulated hub
//!
//! A deterministic kinematic stand-in for the real hub, used by the demo
//! executable and the test suite. Commanded wheel velocities are integrated
//! into motor positions and yaw during [`Hub::sleep_ms`], so simulated time
//! only advances where real control loops would suspend.
//!
//! The simulation can be scripted with a line event (the reflectance/colour
//! reading changes once the base has driven past a point) and an obstacle
//! (the drive wheels stall and the duty cycle saturates), which is enough to
//! exercise every sensor-gated motion in the core. Every hub command is
//! counted, letting tests assert on exactly which commands a controller
//! issued.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use std::collections::BTreeMap;

// Internal
use crate::hub::{Hub, HubError, Port, Rgbi, StopMode, DUTY_CYCLE_FULL_SCALE};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Highest velocity the simulated motors will actually reach, in deg/s.
const MAX_MOTOR_SPEED_DPS: f64 = 1050.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Physical geometry of the simulated base.
#[derive(Debug, Clone, Copy)]
pub struct SimGeometry {
    /// Circumference of the drive wheels at the motor axle, in cm of travel
    /// per 360 deg of motor rotation.
    pub wheel_circumference_cm: f64,

    /// Distance between the two drive wheels in cm.
    pub track_width_cm: f64,
}

/// Counters of every command issued to the hub.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CmdCounts {
    pub pair_move: u32,
    pub pair_stop: u32,
    pub motor_run: u32,
    pub motor_stop: u32,
}

/// State of one simulated motor.
#[derive(Debug, Default, Clone, Copy)]
struct SimMotor {
    rel_pos_deg: f64,
    abs_pos_deg: f64,
    cmd_dps: f64,
}

/// A device attached to a simulated port.
#[derive(Debug, Clone, Copy)]
enum SimDevice {
    Motor(SimMotor),
    ColorSensor,
}

/// A scripted change of the colour sensor reading once the base has driven
/// past a point.
#[derive(Debug, Clone, Copy)]
struct LineEvent {
    at_driven_deg: f64,
    reflection: i32,
    rgbi: Rgbi,
}

/// The simulated hub.
pub struct SimHub {
    geometry: SimGeometry,
    devices: BTreeMap<Port, SimDevice>,

    /// Drive pair wiring as (left, right).
    pair: (Port, Port),

    now_ms: u64,
    yaw_deg: f64,
    yaw_drift_dps: f64,

    pair_deadline_ms: Option<u64>,

    obstacle_at_driven_deg: Option<f64>,
    stalled: bool,

    base_reflection: i32,
    base_rgbi: Rgbi,
    line: Option<LineEvent>,

    counts: CmdCounts,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimGeometry {
    fn default() -> Self {
        Self {
            // 17.6 cm wheels geared 24:8 off the motor
            wheel_circumference_cm: 17.6 / 3.0,
            track_width_cm: 11.2,
        }
    }
}

impl SimHub {
    /// Create a hub with no devices attached.
    pub fn new(geometry: SimGeometry) -> Self {
        Self {
            geometry,
            devices: BTreeMap::new(),
            pair: (Port::E, Port::A),
            now_ms: 0,
            yaw_deg: 0.0,
            yaw_drift_dps: 0.0,
            pair_deadline_ms: None,
            obstacle_at_driven_deg: None,
            stalled: false,
            base_reflection: 82,
            base_rgbi: Rgbi {
                channels: [900, 900, 900, 1000],
            },
            line: None,
            counts: CmdCounts::default(),
        }
    }

    /// Create a hub wired like the competition base: drive motors on E
    /// (left) and A (right), attachment motors on D and F, colour sensor
    /// on C, port B empty.
    pub fn standard_rig() -> Self {
        let mut hub = Self::new(SimGeometry::default());
        hub.attach_motor(Port::A);
        hub.attach_motor(Port::D);
        hub.attach_motor(Port::E);
        hub.attach_motor(Port::F);
        hub.attach_color_sensor(Port::C);
        hub.set_pair(Port::E, Port::A);
        hub
    }

    // ---- RIG CONFIGURATION ----

    pub fn attach_motor(&mut self, port: Port) {
        self.devices.insert(port, SimDevice::Motor(SimMotor::default()));
    }

    pub fn attach_color_sensor(&mut self, port: Port) {
        self.devices.insert(port, SimDevice::ColorSensor);
    }

    pub fn set_pair(&mut self, left: Port, right: Port) {
        self.pair = (left, right);
    }

    /// Set the reflectance/colour reported before any line event triggers.
    pub fn set_ambient(&mut self, reflection: i32, rgbi: Rgbi) {
        self.base_reflection = reflection;
        self.base_rgbi = rgbi;
    }

    /// Script a line crossing: once the mean driven distance exceeds
    /// `at_driven_deg` the colour sensor reports the given values.
    pub fn set_line_at(&mut self, at_driven_deg: f64, reflection: i32, rgbi: Rgbi) {
        self.line = Some(LineEvent {
            at_driven_deg,
            reflection,
            rgbi,
        });
    }

    /// Script an obstacle: once the mean driven distance exceeds
    /// `at_driven_deg` the drive wheels stall and their duty cycle
    /// saturates.
    pub fn set_obstacle_at(&mut self, at_driven_deg: f64) {
        self.obstacle_at_driven_deg = Some(at_driven_deg);
    }

    /// Apply a constant yaw disturbance, as a drifting gyro or a pulling
    /// wheel would.
    pub fn set_yaw_drift_dps(&mut self, drift_dps: f64) {
        self.yaw_drift_dps = drift_dps;
    }

    // ---- TEST OBSERVATION ----

    /// Counters of every command issued so far.
    pub fn cmd_counts(&self) -> CmdCounts {
        self.counts
    }

    /// Current simulated yaw without going through the sensor quantisation.
    pub fn true_yaw_deg(&self) -> f64 {
        self.yaw_deg
    }

    /// Mean magnitude of the drive pair's accumulated positions in degrees.
    pub fn mean_driven_deg(&self) -> f64 {
        let left = self.motor_state(self.pair.0).map(|m| m.rel_pos_deg).unwrap_or(0.0);
        let right = self.motor_state(self.pair.1).map(|m| m.rel_pos_deg).unwrap_or(0.0);
        (left.abs() + right.abs()) / 2.0
    }

    // ---- INTERNALS ----

    fn motor_state(&self, port: Port) -> Option<&SimMotor> {
        match self.devices.get(&port) {
            Some(SimDevice::Motor(m)) => Some(m),
            _ => None,
        }
    }

    fn motor_state_mut(&mut self, port: Port) -> Result<&mut SimMotor, HubError> {
        match self.devices.get_mut(&port) {
            Some(SimDevice::Motor(m)) => Ok(m),
            Some(_) => Err(HubError::WrongDeviceKind(port)),
            None => Err(HubError::DeviceNotPresent(port)),
        }
    }

    fn require_color(&self, port: Port) -> Result<(), HubError> {
        match self.devices.get(&port) {
            Some(SimDevice::ColorSensor) => Ok(()),
            Some(_) => Err(HubError::WrongDeviceKind(port)),
            None => Err(HubError::DeviceNotPresent(port)),
        }
    }

    fn set_pair_cmd(&mut self, steering: i32, velocity_dps: i32) -> Result<(), HubError> {
        let (left_dps, right_dps) = split_steering(steering, velocity_dps);
        let (left, right) = self.pair;
        self.motor_state_mut(left)?.cmd_dps = left_dps;
        self.motor_state_mut(right)?.cmd_dps = right_dps;
        Ok(())
    }

    /// Advance the simulation by `ms` of wall time.
    fn integrate(&mut self, ms: u64) {
        // Respect a pending timed pair move by splitting the step at the
        // deadline
        if let Some(deadline) = self.pair_deadline_ms {
            if self.now_ms + ms > deadline && self.now_ms < deadline {
                let first = deadline - self.now_ms;
                let rest = ms - first;
                self.integrate(first);
                let _ = self.set_pair_cmd(0, 0);
                self.pair_deadline_ms = None;
                self.integrate(rest);
                return;
            }
        }

        let dt_s = ms as f64 / 1000.0;
        let (left, right) = self.pair;

        // Stall check before moving: hitting the obstacle freezes the drive
        // wheels in place
        if let Some(at) = self.obstacle_at_driven_deg {
            if !self.stalled && self.mean_driven_deg() >= at {
                debug!("Simulated base stalled against the obstacle at {:.0} deg", at);
                self.stalled = true;
            }
        }
        let stalled = self.stalled;

        let mut left_dps = 0.0;
        let mut right_dps = 0.0;

        for (port, device) in self.devices.iter_mut() {
            if let SimDevice::Motor(m) = device {
                let is_drive = *port == left || *port == right;
                let speed = if stalled && is_drive {
                    0.0
                } else {
                    m.cmd_dps.max(-MAX_MOTOR_SPEED_DPS).min(MAX_MOTOR_SPEED_DPS)
                };

                m.rel_pos_deg += speed * dt_s;
                m.abs_pos_deg = (m.abs_pos_deg + speed * dt_s).rem_euclid(360.0);

                if *port == left {
                    left_dps = speed;
                }
                if *port == right {
                    right_dps = speed;
                }
            }
        }

        // Differential drive yaw: faster left wheel turns the base clockwise,
        // which this simulation counts as positive yaw
        let left_cm_s = left_dps / 360.0 * self.geometry.wheel_circumference_cm;
        let right_cm_s = right_dps / 360.0 * self.geometry.wheel_circumference_cm;
        let yaw_rate_dps =
            (left_cm_s - right_cm_s) / self.geometry.track_width_cm * (180.0 / std::f64::consts::PI);

        self.yaw_deg += (yaw_rate_dps + self.yaw_drift_dps) * dt_s;

        self.now_ms += ms;
    }
}

impl Hub for SimHub {
    fn yaw_deg(&mut self) -> Result<f64, HubError> {
        // The real sensor reports tenths of a degree
        Ok((self.yaw_deg * 10.0).round() / 10.0)
    }

    fn reset_yaw(&mut self, yaw_deg: f64) -> Result<(), HubError> {
        self.yaw_deg = yaw_deg;
        Ok(())
    }

    fn motor_run(&mut self, port: Port, speed_dps: i32) -> Result<(), HubError> {
        self.counts.motor_run += 1;
        self.motor_state_mut(port)?.cmd_dps = speed_dps as f64;
        Ok(())
    }

    fn motor_stop(&mut self, port: Port, _mode: StopMode) -> Result<(), HubError> {
        self.counts.motor_stop += 1;
        self.motor_state_mut(port)?.cmd_dps = 0.0;
        Ok(())
    }

    fn motor_relative_position(&mut self, port: Port) -> Result<f64, HubError> {
        match self.devices.get(&port) {
            Some(SimDevice::Motor(m)) => Ok(m.rel_pos_deg),
            Some(_) => Err(HubError::WrongDeviceKind(port)),
            None => Err(HubError::DeviceNotPresent(port)),
        }
    }

    fn motor_reset_relative_position(&mut self, port: Port, pos_deg: f64) -> Result<(), HubError> {
        self.motor_state_mut(port)?.rel_pos_deg = pos_deg;
        Ok(())
    }

    fn motor_absolute_position(&mut self, port: Port) -> Result<f64, HubError> {
        match self.devices.get(&port) {
            Some(SimDevice::Motor(m)) => Ok(m.abs_pos_deg),
            Some(_) => Err(HubError::WrongDeviceKind(port)),
            None => Err(HubError::DeviceNotPresent(port)),
        }
    }

    fn motor_duty_cycle(&mut self, port: Port) -> Result<f64, HubError> {
        let (left, right) = self.pair;
        let is_drive = port == left || port == right;
        let stalled = self.stalled;

        let m = match self.devices.get(&port) {
            Some(SimDevice::Motor(m)) => m,
            Some(_) => return Err(HubError::WrongDeviceKind(port)),
            None => return Err(HubError::DeviceNotPresent(port)),
        };

        // A stalled drive motor pulls full duty trying to hold its command
        if stalled && is_drive && m.cmd_dps != 0.0 {
            return Ok(DUTY_CYCLE_FULL_SCALE);
        }

        Ok((m.cmd_dps.abs() / MAX_MOTOR_SPEED_DPS * DUTY_CYCLE_FULL_SCALE)
            .min(DUTY_CYCLE_FULL_SCALE))
    }

    fn pair_move(&mut self, steering: i32, velocity_dps: i32) -> Result<(), HubError> {
        self.counts.pair_move += 1;
        self.pair_deadline_ms = None;
        self.set_pair_cmd(steering, velocity_dps)
    }

    fn pair_move_for_ms(
        &mut self,
        duration_ms: u64,
        steering: i32,
        velocity_dps: i32,
    ) -> Result<(), HubError> {
        self.counts.pair_move += 1;
        self.pair_deadline_ms = Some(self.now_ms + duration_ms);
        self.set_pair_cmd(steering, velocity_dps)
    }

    fn pair_stop(&mut self) -> Result<(), HubError> {
        self.counts.pair_stop += 1;
        self.pair_deadline_ms = None;
        self.set_pair_cmd(0, 0)
    }

    fn color_rgbi(&mut self, port: Port) -> Result<Rgbi, HubError> {
        self.require_color(port)?;

        match self.line {
            Some(l) if self.mean_driven_deg() >= l.at_driven_deg => Ok(l.rgbi),
            _ => Ok(self.base_rgbi),
        }
    }

    fn color_reflection(&mut self, port: Port) -> Result<i32, HubError> {
        self.require_color(port)?;

        match self.line {
            Some(l) if self.mean_driven_deg() >= l.at_driven_deg => Ok(l.reflection),
            _ => Ok(self.base_reflection),
        }
    }

    fn ticks_ms(&mut self) -> u64 {
        self.now_ms
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.integrate(ms);
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Split a steering value in [-100, 100] into per-wheel velocities.
///
/// Steering 0 drives both wheels at `velocity`, 100 spins on the spot
/// clockwise, -100 anticlockwise, matching the pair semantics of the real
/// hub.
fn split_steering(steering: i32, velocity_dps: i32) -> (f64, f64) {
    let s = steering.max(-100).min(100) as f64;
    let v = velocity_dps as f64;

    if s >= 0.0 {
        (v, v * (50.0 - s) / 50.0)
    } else {
        (v * (50.0 + s) / 50.0, v)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_split_steering() {
        assert_eq!(split_steering(0, 600), (600.0, 600.0));
        assert_eq!(split_steering(100, 600), (600.0, -600.0));
        assert_eq!(split_steering(-100, 600), (-600.0, 600.0));
        assert_eq!(split_steering(50, 600), (600.0, 0.0));
    }

    #[test]
    fn test_tank_spin_turns_clockwise() {
        let mut hub = SimHub::standard_rig();

        hub.pair_move(100, 500).unwrap();
        hub.sleep_ms(100);

        assert!(hub.true_yaw_deg() > 0.0);
    }

    #[test]
    fn test_straight_drive_accumulates_distance() {
        let mut hub = SimHub::standard_rig();

        hub.pair_move(0, 360).unwrap();
        hub.sleep_ms(1000);

        // 360 deg/s for 1 s is one rotation on each wheel
        assert!((hub.mean_driven_deg() - 360.0).abs() < 1e-9);
        assert!(hub.true_yaw_deg().abs() < 1e-9);
    }

    #[test]
    fn test_timed_move_stops_at_deadline() {
        let mut hub = SimHub::standard_rig();

        hub.pair_move_for_ms(500, 0, 360).unwrap();
        hub.sleep_ms(2000);

        assert!((hub.mean_driven_deg() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_obstacle_stalls_and_saturates_duty() {
        let mut hub = SimHub::standard_rig();
        hub.set_obstacle_at(100.0);

        hub.pair_move(0, 500).unwrap();
        for _ in 0..20 {
            hub.sleep_ms(50);
        }

        let driven = hub.mean_driven_deg();
        assert!(driven >= 100.0 && driven < 150.0);
        assert_eq!(
            hub.motor_duty_cycle(Port::A).unwrap(),
            DUTY_CYCLE_FULL_SCALE
        );
    }
}
