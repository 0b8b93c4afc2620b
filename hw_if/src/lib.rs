//! # Hardware interface library
//!
//! This crate defines the boundary between the motion control core and the
//! hub hardware layer: the [`hub::Hub`] trait covering every actuator,
//! sensor and clock operation the core needs, the command vocabulary emitted
//! by the tick controllers, and a deterministic simulated hub used by the
//! demo executable and the test suite.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod hub;
pub mod sim;

// ---------------------------------------------------------------------------
// REEXPORTS
// ---------------------------------------------------------------------------

pub use hub::{ActuatorCmd, Hub, HubError, Port, Rgbi, StopMode, ALL_PORTS};
pub use sim::SimHub;
