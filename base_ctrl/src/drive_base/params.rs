//! Drive base parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::Port;
use serde::Deserialize;
use util::params::{load_or_default, LoadError};

use crate::{act_sync, drive_ctrl, gate_ctrl, turn_ctrl};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Wiring and geometry of the base.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Port of the left drive motor.
    pub left_motor_port: Port,

    /// Port of the right drive motor.
    pub right_motor_port: Port,

    /// Port of the attachment motor.
    pub attachment_port: Port,

    /// Port of the action motor.
    pub action_port: Port,

    /// Expected port of the colour sensor. Gated motions re-probe if no
    /// sensor answers here.
    pub color_sensor_port: Port,

    /// Travel in cm per 360 deg of drive motor rotation, including the
    /// gearing between motor and wheel.
    pub wheel_circumference_cm: f64,
}

/// The full parameter set of the motion control core.
#[derive(Debug, Clone, Default)]
pub struct BaseConfig {
    pub base: Params,
    pub turn: turn_ctrl::Params,
    pub drive: drive_ctrl::Params,
    pub gate: gate_ctrl::Params,
    pub act_sync: act_sync::Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            left_motor_port: Port::E,
            right_motor_port: Port::A,
            attachment_port: Port::D,
            action_port: Port::F,
            color_sensor_port: Port::C,
            wheel_circumference_cm: 17.6 / 3.0,
        }
    }
}

impl BaseConfig {
    /// Load every parameter file from the software root, falling back on
    /// compiled-in defaults where the root is not configured.
    pub fn load() -> Result<Self, LoadError> {
        Ok(Self {
            base: load_or_default("drive_base.toml")?,
            turn: load_or_default("turn_ctrl.toml")?,
            drive: load_or_default("drive_ctrl.toml")?,
            gate: load_or_default("gate_ctrl.toml")?,
            act_sync: load_or_default("act_sync.toml")?,
        })
    }
}
