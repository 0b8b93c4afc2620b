//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable giving the root of the software tree, under which the
/// `params` and `sessions` directories live.
pub const SW_ROOT_ENV_VAR: &str = "BASE_SW_ROOT";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Error raised when the software root cannot be determined.
#[derive(Debug, Error)]
#[error("The software root environment variable (BASE_SW_ROOT) is not set")]
pub struct SwRootNotSet;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the root directory of the software tree from the environment.
pub fn get_base_sw_root() -> Result<PathBuf, SwRootNotSet> {
    match std::env::var(SW_ROOT_ENV_VAR) {
        Ok(p) => Ok(PathBuf::from(p)),
        Err(_) => Err(SwRootNotSet),
    }
}
