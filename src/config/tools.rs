//! The core tool table: base tooling installed regardless of language
//! selection (editor, git, search tools, Node.js, fonts, prompt).
//!
//! Loaded from `conf/tools.toml`, keyed by platform key.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::platform::Platform;

/// One core tool entry for a platform.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CoreTool {
    /// Display name, e.g. `"Neovim"`.
    pub name: String,
    /// Shell command that installs the tool.
    pub command: String,
    /// Binary looked up on `PATH` to decide whether the tool is present.
    /// Entries without a probe are always run (their commands are expected
    /// to be idempotent, e.g. `apt install` of an existing package).
    #[serde(default)]
    pub probe: Option<String>,
}

/// Per-platform ordered core tool lists.
#[derive(Debug, Clone)]
pub struct CoreTools {
    by_platform: BTreeMap<String, Vec<CoreTool>>,
}

impl CoreTools {
    /// Load and validate the core tool table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// a top-level key is not a known platform key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let by_platform: BTreeMap<String, Vec<CoreTool>> =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_map(by_platform, path)
    }

    /// Build the table from an in-memory map, applying key validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlatformKey`] for keys outside
    /// [`Platform::KNOWN_KEYS`].
    pub fn from_map(
        by_platform: BTreeMap<String, Vec<CoreTool>>,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        for key in by_platform.keys() {
            if !Platform::KNOWN_KEYS.contains(&key.as_str()) {
                return Err(ConfigError::UnknownPlatformKey {
                    key: key.clone(),
                    context: path.display().to_string(),
                });
            }
        }
        Ok(Self { by_platform })
    }

    /// Core tools for a platform key, in declared order. Empty when the key
    /// has no entries.
    #[must_use]
    pub fn for_platform(&self, key: &str) -> &[CoreTool] {
        self.by_platform.get(key).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<CoreTools, ConfigError> {
        let map: BTreeMap<String, Vec<CoreTool>> = toml::from_str(toml).unwrap();
        CoreTools::from_map(map, Path::new("tools.toml"))
    }

    #[test]
    fn load_tools_in_order() {
        let tools = parse(
            r#"
            [[linux_apt]]
            name = "Neovim + tools"
            command = "sudo apt update && sudo apt install -y neovim git ripgrep"
            probe = "nvim"

            [[linux_apt]]
            name = "Node.js"
            command = "sudo apt install -y nodejs"
            probe = "node"
            "#,
        )
        .unwrap();
        let apt = tools.for_platform("linux_apt");
        assert_eq!(apt.len(), 2);
        assert_eq!(apt.first().unwrap().name, "Neovim + tools");
        assert_eq!(apt.last().unwrap().probe.as_deref(), Some("node"));
    }

    #[test]
    fn missing_platform_is_empty() {
        let tools = parse(
            r#"
            [[macos]]
            name = "Neovim + tools"
            command = "brew install neovim git ripgrep fd cmake"
            probe = "nvim"
            "#,
        )
        .unwrap();
        assert!(tools.for_platform("windows").is_empty());
    }

    #[test]
    fn unknown_platform_key_is_rejected() {
        let err = parse(
            r#"
            [[linux_apk]]
            name = "Neovim"
            command = "apk add neovim"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlatformKey { key, .. } if key == "linux_apk"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = CoreTools::load(Path::new("/nonexistent/tools.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
