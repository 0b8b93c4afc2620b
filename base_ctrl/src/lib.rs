//! # Drive base control library
//!
//! Closed-loop motion control for a two-motor differential drive base:
//! gyro-referenced turns, straight-line distance drives with trapezoidal
//! speed profiling, sensor- and collision-gated motions, synchronized
//! multi-actuator positioning and device probing.
//!
//! The library talks to the hardware exclusively through the `hw_if::Hub`
//! trait and is driven by a task layer that calls the blocking operations on
//! [`drive_base::DriveBase`] one at a time.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod act_sync;
pub mod drive_base;
pub mod drive_ctrl;
pub mod gain_sched;
pub mod gate_ctrl;
pub mod heading;
pub mod kinematics;
pub mod probe;
pub mod speed_profile;
pub mod turn_ctrl;
