//! Command line interface definition.
use std::path::PathBuf;

use clap::Parser;

/// Bootstrap a Neovim development environment.
///
/// Detects the host platform, installs the core and per-language tooling
/// through the native package manager, overlays this repository's Neovim
/// configuration on top of a kickstart base, and wires up shell aliases.
#[derive(Debug, Parser)]
#[command(name = "nvim-bootstrap", version, about, long_about = None)]
pub struct Cli {
    /// Print every action without executing anything
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Skip tool installation; only apply config and shell setup
    #[arg(long)]
    pub skip_tools: bool,

    /// Repository root holding conf/ and the nvim/ overlay
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
