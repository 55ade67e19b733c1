//! Configuration file discovery for the CLI

use std::path::{Path, PathBuf};

/// Directory name under the user's config directory
const APP_DIR: &str = "sensu-serverspec-events";

/// Config file to load: the explicit path if given, otherwise the default
/// location when a file exists there.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    default_config_path().filter(|path| path.is_file())
}

/// Default config file location (`$XDG_CONFIG_HOME/sensu-serverspec-events/config.json`)
fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}
