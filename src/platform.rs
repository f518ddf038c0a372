//! Host platform detection.
use std::fmt;
use std::path::PathBuf;

use crate::error::PlatformError;

/// Detected operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Microsoft Windows.
    Windows,
    /// Linux (any distribution).
    Linux,
    /// macOS.
    MacOs,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
        }
    }
}

/// Linux package manager, in detection preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Debian/Ubuntu `apt`.
    Apt,
    /// Fedora `dnf`.
    Dnf,
    /// Arch Linux `pacman`.
    Pacman,
}

impl PackageManager {
    /// All managers in detection preference order.
    pub const PREFERENCE: [Self; 3] = [Self::Apt, Self::Dnf, Self::Pacman];

    /// Binary name used to probe for the manager on `PATH`.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

/// Platform information for the current system.
///
/// Constructed once at process start by [`Platform::detect`] and passed
/// explicitly to every component so tests can substitute fake platforms.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// Active Linux package manager. `None` on Windows and macOS.
    pub package_manager: Option<PackageManager>,
}

impl Platform {
    /// All platform keys accepted in `conf/` files.
    pub const KNOWN_KEYS: [&'static str; 5] = [
        "windows",
        "macos",
        "linux_apt",
        "linux_dnf",
        "linux_pacman",
    ];

    /// Detect the current platform.
    ///
    /// On Linux, the first package manager found on `PATH` (apt, then dnf,
    /// then pacman) is selected.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] on an OS this tool does not
    /// know, and [`PlatformError::NoPackageManager`] on a Linux system with
    /// none of the known package managers. Detection never guesses.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::detect_with(|binary| which::which(binary).is_ok())
    }

    /// Detect the platform using a caller-supplied `PATH` probe.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Platform::detect`].
    pub fn detect_with(probe: impl Fn(&str) -> bool) -> Result<Self, PlatformError> {
        if cfg!(target_os = "windows") {
            Ok(Self::new(Os::Windows, None))
        } else if cfg!(target_os = "macos") {
            Ok(Self::new(Os::MacOs, None))
        } else if cfg!(target_os = "linux") {
            let manager = PackageManager::PREFERENCE
                .into_iter()
                .find(|m| probe(m.binary()))
                .ok_or(PlatformError::NoPackageManager)?;
            Ok(Self::new(Os::Linux, Some(manager)))
        } else {
            Err(PlatformError::Unsupported {
                os: std::env::consts::OS.to_string(),
            })
        }
    }

    /// Create a platform with explicit values (for testing).
    #[must_use]
    pub const fn new(os: Os, package_manager: Option<PackageManager>) -> Self {
        Self {
            os,
            package_manager,
        }
    }

    /// Whether this is a Windows host.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Whether this is a Linux host.
    #[must_use]
    pub fn is_linux(&self) -> bool {
        self.os == Os::Linux
    }

    /// Composite platform key used by the registry and the core tool table.
    ///
    /// One of `windows`, `macos`, `linux_apt`, `linux_dnf`, `linux_pacman`.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match (self.os, self.package_manager) {
            (Os::Windows, _) => "windows",
            (Os::MacOs, _) => "macos",
            (Os::Linux, Some(PackageManager::Dnf)) => "linux_dnf",
            (Os::Linux, Some(PackageManager::Pacman)) => "linux_pacman",
            // A Linux platform without a manager cannot come out of detect().
            (Os::Linux, _) => "linux_apt",
        }
    }

    /// Platform-specific Neovim configuration directory.
    ///
    /// `%LOCALAPPDATA%\nvim` on Windows, `$XDG_CONFIG_HOME/nvim` (default
    /// `~/.config/nvim`) elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if the relevant base directory cannot be determined
    /// from the environment.
    pub fn nvim_config_dir(&self) -> anyhow::Result<PathBuf> {
        if self.is_windows() {
            let local = std::env::var_os("LOCALAPPDATA")
                .map(PathBuf::from)
                .filter(|p| !p.as_os_str().is_empty())
                .or_else(dirs::data_local_dir)
                .ok_or_else(|| anyhow::anyhow!("LOCALAPPDATA is not set"))?;
            Ok(local.join("nvim"))
        } else {
            let config = std::env::var_os("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .filter(|p| !p.as_os_str().is_empty())
                .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
                .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
            Ok(config.join("nvim"))
        }
    }
}
