//! Command socket path convention
//!
//! The server listens on a per-display socket file in the user's home
//! directory, so a CLI started in the same session finds the right window
//! manager without configuration. An explicit path always overrides the
//! convention.

use std::env;
use std::path::{Path, PathBuf};

/// Socket filename prefix; the display identifier is appended
pub const SOCKET_PREFIX: &str = ".gablesocket";

/// Display identifier used when the environment provides none
const DEFAULT_DISPLAY: &str = ":0.0";

/// Socket path for a given home directory and display identifier
pub fn socket_path_in(home: &Path, display: &str) -> PathBuf {
    home.join(format!("{SOCKET_PREFIX}.{display}"))
}

/// Default socket path for the current session
///
/// Derived from `$DISPLAY`, falling back to `:0.0` when unset or empty.
pub fn default_socket_path() -> PathBuf {
    let display = env::var("DISPLAY")
        .ok()
        .filter(|display| !display.is_empty())
        .unwrap_or_else(|| DEFAULT_DISPLAY.to_string());
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    socket_path_in(&home, &display)
}
