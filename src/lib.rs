//! Cross-platform bootstrap for a Neovim development environment.
//!
//! The crate detects the host platform, installs core and per-language
//! tooling through the native package manager, overlays this repository's
//! Neovim configuration onto a kickstart base (backing up any existing
//! config first), and manages shell profile entries. Every step is
//! idempotent and honours `--dry-run`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod plan;
pub mod platform;
pub mod resources;
pub mod steps;
