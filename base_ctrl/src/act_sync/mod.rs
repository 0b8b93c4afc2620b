//! # Actuator synchronization
//!
//! Drives an arbitrary set of attachment motors towards per-motor position
//! targets concurrently: all motors are started together, then a polling
//! loop retires each one individually as it arrives, so slower or
//! further-travelling motors keep running while finished ones hold. The call
//! returns once every motor has arrived.
//!
//! Also provides the simpler open-loop attachment primitives, running a set
//! of motors for a duration or through a relative angle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use thiserror::Error;

// Internal
use hw_if::{Hub, HubError, Port, StopMode};
use util::maths::{norm_deg_360, wrap_deg_180};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which position counter a synchronized move targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PositionMode {
    /// Targets are against the accumulated relative position counters.
    Relative,

    /// Targets are absolute positions within one rotation; each motor takes
    /// the shortest path and may re-reverse if it overshoots.
    Absolute,
}

/// Possible errors from the actuator synchronization primitives.
#[derive(Debug, Error)]
pub enum ActSyncError {
    #[error("No actuator ports were supplied")]
    NoActuators,

    #[error("Actuator command failed: {0}")]
    Hub(#[from] HubError),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the actuator synchronization primitives.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Arrival tolerance in degrees.
    pub tolerance_deg: f64,

    /// Polling period of the arrival loop in ms.
    pub poll_ms: u64,
}

/// One motor's goal within a synchronized move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncTarget {
    pub port: Port,

    /// Target position in degrees, interpreted per [`PositionMode`].
    pub target_deg: f64,

    /// Speed magnitude to run at, in deg/s.
    pub speed_dps: f64,
}

/// Book-keeping for one in-flight motor.
struct ActiveMotor {
    target: SyncTarget,
    direction: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            tolerance_deg: 5.0,
            poll_ms: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Run a set of motors at a common signed speed, optionally stopping them
/// after a duration.
///
/// With a non-positive duration the motors are left running and the call
/// returns immediately.
pub fn run_for_duration<H: Hub>(
    hub: &mut H,
    ports: &[Port],
    speed_dps: i32,
    duration_ms: i64,
) -> Result<(), ActSyncError> {
    if ports.is_empty() {
        return Err(ActSyncError::NoActuators);
    }

    for &port in ports {
        hub.motor_run(port, speed_dps)?;
    }

    if duration_ms > 0 {
        hub.sleep_ms(duration_ms as u64);
        for &port in ports {
            hub.motor_stop(port, StopMode::SmartCoast)?;
        }
    }

    Ok(())
}

/// Run a set of motors through a signed relative angle from their current
/// positions, all starting together and each stopping as it arrives.
pub fn run_for_degrees<H: Hub>(
    hub: &mut H,
    params: &Params,
    ports: &[Port],
    speed_dps: f64,
    delta_deg: f64,
) -> Result<(), ActSyncError> {
    if ports.is_empty() {
        return Err(ActSyncError::NoActuators);
    }

    let mut targets = Vec::with_capacity(ports.len());
    for &port in ports {
        let start = hub.motor_relative_position(port)?;
        targets.push(SyncTarget {
            port,
            target_deg: start + delta_deg,
            speed_dps,
        });
    }

    run_to_positions(hub, params, PositionMode::Relative, &targets)
}

/// Drive each listed motor to its own position target, synchronized.
///
/// All motors start together; the polling loop stops each one as it comes
/// within tolerance of its target and returns once the set is empty.
pub fn run_to_positions<H: Hub>(
    hub: &mut H,
    params: &Params,
    mode: PositionMode,
    targets: &[SyncTarget],
) -> Result<(), ActSyncError> {
    if targets.is_empty() {
        return Err(ActSyncError::NoActuators);
    }

    // Absolute moves hold their position on arrival, relative moves coast
    let stop_mode = match mode {
        PositionMode::Relative => StopMode::SmartCoast,
        PositionMode::Absolute => StopMode::Brake,
    };

    let mut active = Vec::with_capacity(targets.len());

    for &target in targets {
        let remaining = remaining_deg(hub, mode, &target)?;
        let direction = if remaining < 0.0 { -1.0 } else { 1.0 };

        hub.motor_run(target.port, (direction * target.speed_dps) as i32)?;
        active.push(ActiveMotor { target, direction });
    }

    while !active.is_empty() {
        hub.sleep_ms(params.poll_ms);

        let mut idx = 0;
        while idx < active.len() {
            let motor = &mut active[idx];
            let remaining = remaining_deg(hub, mode, &motor.target)?;

            // Arrived: signed distance-to-go along the travel direction has
            // shrunk inside tolerance (or gone past, for a shallow
            // overshoot)
            if motor.direction * remaining <= params.tolerance_deg {
                hub.motor_stop(motor.target.port, stop_mode)?;
                active.swap_remove(idx);
                continue;
            }

            // Absolute moves re-steer if the shortest path flipped sign
            if mode == PositionMode::Absolute {
                let direction = if remaining < 0.0 { -1.0 } else { 1.0 };
                if direction != motor.direction {
                    motor.direction = direction;
                    hub.motor_run(motor.target.port, (direction * motor.target.speed_dps) as i32)?;
                }
            }

            idx += 1;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Signed degrees still to travel towards a target.
fn remaining_deg<H: Hub>(
    hub: &mut H,
    mode: PositionMode,
    target: &SyncTarget,
) -> Result<f64, ActSyncError> {
    let remaining = match mode {
        PositionMode::Relative => {
            target.target_deg - hub.motor_relative_position(target.port)?
        }
        PositionMode::Absolute => {
            let pos = hub.motor_absolute_position(target.port)?;
            wrap_deg_180(norm_deg_360(target.target_deg) - pos)
        }
    };

    Ok(remaining)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use hw_if::SimHub;

    #[test]
    fn test_empty_port_set_is_an_error_before_any_command() {
        let mut hub = SimHub::standard_rig();

        assert!(matches!(
            run_for_duration(&mut hub, &[], 300, 1000),
            Err(ActSyncError::NoActuators)
        ));
        assert!(matches!(
            run_for_degrees(&mut hub, &Params::default(), &[], 300.0, 90.0),
            Err(ActSyncError::NoActuators)
        ));
        assert!(matches!(
            run_to_positions(&mut hub, &Params::default(), PositionMode::Relative, &[]),
            Err(ActSyncError::NoActuators)
        ));

        // The hub never saw a command
        assert_eq!(hub.cmd_counts(), Default::default());
    }

    #[test]
    fn test_run_for_duration_stops_all_motors() {
        let mut hub = SimHub::standard_rig();

        run_for_duration(&mut hub, &[Port::D, Port::F], 360, 1000).unwrap();

        let counts = hub.cmd_counts();
        assert_eq!(counts.motor_run, 2);
        assert_eq!(counts.motor_stop, 2);

        // One second at 360 deg/s is one rotation
        assert!((hub.motor_relative_position(Port::D).unwrap() - 360.0).abs() < 1e-9);
        assert!((hub.motor_relative_position(Port::F).unwrap() - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_duration_leaves_motors_running() {
        let mut hub = SimHub::standard_rig();

        run_for_duration(&mut hub, &[Port::D], 360, 0).unwrap();
        assert_eq!(hub.cmd_counts().motor_stop, 0);

        hub.sleep_ms(500);
        assert!(hub.motor_relative_position(Port::D).unwrap() > 0.0);
    }

    #[test]
    fn test_run_for_degrees_arrives_within_tolerance() {
        let mut hub = SimHub::standard_rig();
        let params = Params::default();

        run_for_degrees(&mut hub, &params, &[Port::D], 100.0, 90.0).unwrap();

        let pos = hub.motor_relative_position(Port::D).unwrap();
        assert!((pos - 90.0).abs() <= params.tolerance_deg);
    }

    #[test]
    fn test_sync_retires_motors_independently() {
        let mut hub = SimHub::standard_rig();
        let params = Params::default();

        // F has four times the travel of D at the same speed
        let targets = [
            SyncTarget {
                port: Port::D,
                target_deg: 90.0,
                speed_dps: 100.0,
            },
            SyncTarget {
                port: Port::F,
                target_deg: 360.0,
                speed_dps: 100.0,
            },
        ];
        run_to_positions(&mut hub, &params, PositionMode::Relative, &targets).unwrap();

        let d = hub.motor_relative_position(Port::D).unwrap();
        let f = hub.motor_relative_position(Port::F).unwrap();
        assert!((d - 90.0).abs() <= params.tolerance_deg);
        assert!((f - 360.0).abs() <= params.tolerance_deg);

        // Both motors were stopped exactly once
        assert_eq!(hub.cmd_counts().motor_stop, 2);
    }

    #[test]
    fn test_negative_delta_runs_backwards() {
        let mut hub = SimHub::standard_rig();
        let params = Params::default();

        run_for_degrees(&mut hub, &params, &[Port::D], 100.0, -90.0).unwrap();

        let pos = hub.motor_relative_position(Port::D).unwrap();
        assert!((pos + 90.0).abs() <= params.tolerance_deg);
    }

    #[test]
    fn test_absolute_move_takes_shortest_path() {
        let mut hub = SimHub::standard_rig();
        let params = Params::default();

        // From 0, a target of 350 is -10 the short way round
        let targets = [SyncTarget {
            port: Port::D,
            target_deg: 350.0,
            speed_dps: 100.0,
        }];
        run_to_positions(&mut hub, &params, PositionMode::Absolute, &targets).unwrap();

        // Went backwards, not 350 forwards
        assert!(hub.motor_relative_position(Port::D).unwrap() < 0.0);

        let abs = hub.motor_absolute_position(Port::D).unwrap();
        assert!(wrap_deg_180(350.0 - abs).abs() <= params.tolerance_deg);
    }
}
