//! The language registry: the single source of truth for language support.
//!
//! Loaded from `conf/languages.toml`. Adding a language is a registry edit,
//! never a code change — no other component hardcodes a language name.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::platform::Platform;

/// A global tool installed once per system (e.g. `csharpier` via
/// `dotnet tool install`), with the binary name used for the presence probe.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SystemTool {
    /// Shell command that installs the tool.
    pub command: String,
    /// Binary name looked up on `PATH` to decide whether the tool is present.
    pub binary: String,
}

/// A probeless toolchain setup command, run after a language's
/// prerequisites and before its system tools (e.g. registering the
/// nuget.org package source so `dotnet tool install` can resolve packages).
/// Commands must be idempotent or report an already-configured state in
/// their output.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SetupCommand {
    /// Display name.
    pub name: String,
    /// Shell command to run.
    pub command: String,
}

/// Configuration record for one supported language.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageSpec {
    /// Unique registry key, e.g. `"rust"`.
    pub id: String,
    /// Human-readable display name.
    pub label: String,
    /// Treesitter grammar identifiers.
    #[serde(default)]
    pub grammars: Vec<String>,
    /// LSP server name → opaque settings, passed through verbatim.
    #[serde(default)]
    pub lsp: BTreeMap<String, serde_json::Value>,
    /// Mason package names installed by the editor, not the OS installer.
    #[serde(default)]
    pub mason: Vec<String>,
    /// Filetype key → ordered formatter command names.
    #[serde(default)]
    pub formatters: BTreeMap<String, Vec<String>>,
    /// Filetype key → ordered linter command names.
    #[serde(default)]
    pub linters: BTreeMap<String, Vec<String>>,
    /// Platform key → shell command for toolchain prerequisites that are not
    /// covered by the generic per-OS package manager call.
    #[serde(default)]
    pub prerequisites: BTreeMap<String, String>,
    /// Binary whose presence on `PATH` makes the prerequisite a no-op.
    #[serde(default)]
    pub probe: Option<String>,
    /// Toolchain setup commands, run between the prerequisites and the
    /// system tools.
    #[serde(default)]
    pub setup: Vec<SetupCommand>,
    /// Global tools installed for this language.
    #[serde(default)]
    pub system_tools: Vec<SystemTool>,
}

/// On-disk shape of `conf/languages.toml`.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "language")]
    languages: Vec<LanguageSpec>,
}

/// Immutable, ordered collection of [`LanguageSpec`]s.
#[derive(Debug, Clone)]
pub struct Registry {
    languages: Vec<LanguageSpec>,
}

impl Registry {
    /// Load and validate the registry from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, if a
    /// language id is empty or duplicated, if a label is empty, or if a
    /// prerequisite uses an unknown platform key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RegistryFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_specs(file.languages)
    }

    /// Build a registry from in-memory specs, applying the same validation
    /// as [`Registry::load`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`Registry::load`], minus file I/O.
    pub fn from_specs(languages: Vec<LanguageSpec>) -> Result<Self, ConfigError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for lang in &languages {
            if lang.id.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    language: lang.label.clone(),
                    field: "id",
                });
            }
            if lang.label.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    language: lang.id.clone(),
                    field: "label",
                });
            }
            if !seen.insert(lang.id.as_str()) {
                return Err(ConfigError::DuplicateLanguage(lang.id.clone()));
            }
            for key in lang.prerequisites.keys() {
                if !Platform::KNOWN_KEYS.contains(&key.as_str()) {
                    return Err(ConfigError::UnknownPlatformKey {
                        key: key.clone(),
                        context: format!("language '{}'", lang.id),
                    });
                }
            }
        }
        Ok(Self { languages })
    }

    /// Iterate the languages in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &LanguageSpec> {
        self.languages.iter()
    }

    /// Look up a language by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LanguageSpec> {
        self.languages.iter().find(|l| l.id == id)
    }

    /// Number of languages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Display labels in registry order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.label.as_str()).collect()
    }
}
