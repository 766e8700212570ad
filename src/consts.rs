//! Project-wide constants.

use std::path::PathBuf;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Variable holding the caller's input.
pub const INPUT_VARIABLE: &str = "INPUT";

/// Variable a function writes its output to.
pub const RESULT_VARIABLE: &str = "RESULT";

/// Public API that returns a random activity as JSON.
pub const DEFAULT_ACTIVITY_URL: &str = "https://www.boredapi.com/api/activity";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default settings path: `~/.skein/settings.json`.
/// `None` when the home directory cannot be determined.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".skein").join("settings.json"))
}
