//! Binary entry point.
use clap::Parser as _;

use nvim_bootstrap::cli::Cli;
use nvim_bootstrap::commands;
use nvim_bootstrap::exec::SystemExecutor;
use nvim_bootstrap::logging::{self, Logger};

fn main() -> std::process::ExitCode {
    #[cfg(windows)]
    let _ = enable_ansi_support::enable_ansi_support();

    let cli = Cli::parse();
    logging::init_tracing();

    let _ = ctrlc::set_handler(|| {
        eprintln!("\ninterrupted");
        std::process::exit(130);
    });

    let log = Logger::new(cli.verbose);
    let executor = SystemExecutor::default();

    match commands::bootstrap::run(&cli, &executor, &log) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            std::process::ExitCode::FAILURE
        }
    }
}
