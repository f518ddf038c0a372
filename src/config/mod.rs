//! Declarative configuration loaded from `conf/` at process start.
pub mod registry;
pub mod tools;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub use registry::{LanguageSpec, Registry, SetupCommand, SystemTool};
pub use tools::{CoreTool, CoreTools};

/// All configuration for one run, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository root directory.
    pub root: PathBuf,
    /// The language registry.
    pub registry: Registry,
    /// The core tool table.
    pub core_tools: CoreTools,
}

impl Config {
    /// Load and validate all configuration under `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when either `conf/languages.toml` or
    /// `conf/tools.toml` cannot be read, parsed, or validated.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let registry = Registry::load(&root.join("conf").join("languages.toml"))?;
        let core_tools = CoreTools::load(&root.join("conf").join("tools.toml"))?;
        Ok(Self {
            root: root.to_path_buf(),
            registry,
            core_tools,
        })
    }

    /// Directory holding the repository's Neovim override files.
    #[must_use]
    pub fn overlay_dir(&self) -> PathBuf {
        self.root.join("nvim")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn load_from_repo_conf_dir() {
        // The crate ships its own conf/ files; loading them exercises the
        // full parse + validation path.
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let config = Config::load(root).unwrap();
        assert!(!config.registry.is_empty());
        assert!(!config.core_tools.for_platform("linux_apt").is_empty());
        assert!(config.overlay_dir().ends_with("nvim"));
    }

    #[test]
    fn load_missing_root_fails() {
        let err = Config::load(Path::new("/nonexistent-root")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
