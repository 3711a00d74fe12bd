// All rule logic is in plc-lint-core
// This CLI gathers repository data and hands it to the engine

// CLI-specific modules
pub mod exitcodes;
pub mod history;
pub mod skeleton;
pub mod workspace;

// Re-export core types for convenience
pub use plc_lint_core::*;

// Re-export CLI utilities
pub use skeleton::SkeletonSource;
pub use workspace::list_files;

use std::path::PathBuf;

/// `<config dir>/plc-lint/config.yaml`, when the platform has a config dir
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("plc-lint").join("config.yaml"))
}
