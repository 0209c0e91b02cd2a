// src/infra/paths.rs — Path management
//
// All paths respect the SPECIALIST_DESK_HOME environment variable for isolation.
// When SPECIALIST_DESK_HOME is set, config and logs live under that directory.
// When unset, config uses ~/.specialist-desk/ and data uses XDG_DATA_HOME/specialist-desk.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the SPECIALIST_DESK_HOME override, if set.
fn desk_home() -> Option<PathBuf> {
    std::env::var_os("SPECIALIST_DESK_HOME").map(PathBuf::from)
}

/// Home directory, falling back to the working directory on exotic platforms.
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $SPECIALIST_DESK_HOME/ or ~/.specialist-desk/
pub fn config_dir() -> PathBuf {
    if let Some(home) = desk_home() {
        return home;
    }
    dirs_home().join(".specialist-desk")
}

/// Data directory: $SPECIALIST_DESK_HOME/data/ or ~/.local/share/specialist-desk/
pub fn data_dir() -> PathBuf {
    if let Some(home) = desk_home() {
        return home.join("data");
    }
    ProjectDirs::from("", "", "specialist-desk")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| config_dir().join("data"))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Dashboard log file
pub fn log_file_path() -> PathBuf {
    data_dir().join("specialist-desk.log")
}
