//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "smart-tables";
const APPLICATION: &str = "smart-tables";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/smart-tables` or `~/.cache/smart-tables`
/// - macOS: `~/Library/Caches/dev.smart-tables.smart-tables`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding `config.json`.
///
/// - Linux: `$XDG_CONFIG_HOME/smart-tables` or `~/.config/smart-tables`
/// - macOS: `~/Library/Application Support/dev.smart-tables.smart-tables`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default grid configuration file.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Log of the current run. Earlier runs are archived beside it by
/// [`logging::init`](crate::logging::init).
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}
