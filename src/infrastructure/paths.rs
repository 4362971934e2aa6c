//! Path handling for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is mounted under `/host`, which
//! typically maps to the directory Zellij was started from (usually `~`).

use std::path::PathBuf;

/// Directory holding the storage slots and the trace file.
///
/// ```
/// use flashdeck::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/host/.local/share/zellij/flashdeck"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("flashdeck")
}

/// Maps `~` to the sandbox's `/host` mount.
///
/// ```
/// use flashdeck::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dusk.toml"), "/host/themes/dusk.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
