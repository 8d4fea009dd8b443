pub mod settings;

pub use settings::*;

use std::path::{Path, PathBuf};

/// Project-local state directory name.
pub const PROJECT_DIR: &str = ".roster-mask";

/// Returns the global config directory path: `~/.config/roster-mask/`
pub fn dirs_global() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".config").join("roster-mask")
}

/// Returns the project state directory under `root`.
pub fn dirs_project(root: &Path) -> PathBuf {
    root.join(PROJECT_DIR)
}

/// Where the saved masking configuration lives for a project.
pub fn saved_config_path(root: &Path) -> PathBuf {
    dirs_project(root).join("masking.json")
}
