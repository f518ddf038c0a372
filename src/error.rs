//! Domain-specific error types for the bootstrap engine.
//!
//! Structured errors built on [`thiserror`]. Internal modules return typed
//! errors; command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via `?`.
//!
//! Only *fatal* conditions are modelled as errors. Expected situations — a
//! tool already on `PATH`, an absent destination directory — are normal
//! branches, and per-tool install failures are recoverable outcomes carried
//! in the install report rather than propagated as errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from platform detection.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The host OS is not one of Windows, Linux, or macOS.
    #[error("unsupported platform '{os}'")]
    Unsupported {
        /// OS identifier reported by the toolchain.
        os: String,
    },

    /// A Linux host with none of the known package managers (apt, dnf, pacman).
    #[error("no supported package manager found (tried apt, dnf, pacman)")]
    NoPackageManager,
}

/// Errors from loading and validating the `conf/` files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A config file is not valid TOML for the expected shape.
    #[error("invalid TOML in {path}: {message}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// Two registry entries share the same language id.
    #[error("duplicate language id '{0}' in registry")]
    DuplicateLanguage(String),

    /// A registry entry is missing a required field.
    #[error("language '{language}' has an empty '{field}' field")]
    MissingField {
        /// Language id (or index, for entries with no id).
        language: String,
        /// Name of the empty field.
        field: &'static str,
    },

    /// A platform key not in [`crate::platform::Platform::KNOWN_KEYS`].
    #[error("unknown platform key '{key}' in {context}")]
    UnknownPlatformKey {
        /// The offending key.
        key: String,
        /// Where the key was found (file or language id).
        context: String,
    },
}

/// Fatal errors from the config overlay step.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// The pre-overlay backup could not be created.
    #[error("cannot back up {path}: {source}")]
    Backup {
        /// Destination directory that was being backed up.
        path: PathBuf,
        /// Underlying error.
        source: anyhow::Error,
    },

    /// Cloning the base configuration failed.
    #[error("cloning base configuration failed: {detail}")]
    CloneFailed {
        /// Output from the failed clone.
        detail: String,
    },

    /// Updating an existing base configuration failed.
    #[error("updating base configuration failed: {detail}")]
    UpdateFailed {
        /// Output from the failed update.
        detail: String,
    },

    /// Copying an override file onto the destination failed.
    #[error("cannot copy overlay file {path}: {source}")]
    Copy {
        /// The specific path that failed to copy.
        path: PathBuf,
        /// Underlying error.
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_unsupported_display() {
        let e = PlatformError::Unsupported {
            os: "freebsd".to_string(),
        };
        assert_eq!(e.to_string(), "unsupported platform 'freebsd'");
    }

    #[test]
    fn platform_no_manager_display() {
        assert_eq!(
            PlatformError::NoPackageManager.to_string(),
            "no supported package manager found (tried apt, dnf, pacman)"
        );
    }

    #[test]
    fn config_duplicate_language_display() {
        let e = ConfigError::DuplicateLanguage("rust".to_string());
        assert_eq!(e.to_string(), "duplicate language id 'rust' in registry");
    }

    #[test]
    fn config_missing_field_display() {
        let e = ConfigError::MissingField {
            language: "rust".to_string(),
            field: "label",
        };
        assert_eq!(e.to_string(), "language 'rust' has an empty 'label' field");
    }

    #[test]
    fn config_unknown_platform_key_display() {
        let e = ConfigError::UnknownPlatformKey {
            key: "linux_apk".to_string(),
            context: "language 'rust'".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "unknown platform key 'linux_apk' in language 'rust'"
        );
    }

    #[test]
    fn overlay_copy_names_the_path() {
        let e = OverlayError::Copy {
            path: PathBuf::from("/dest/init.lua"),
            source: anyhow::anyhow!("permission denied"),
        };
        assert!(e.to_string().contains("/dest/init.lua"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<PlatformError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<OverlayError>();
    }
}
