//! Library half of the `waha` binary: argument model, logging setup, and
//! command dispatch. Kept as a library so the CLI can be tested in-process.

pub mod cli;

use cli::Cli;
use std::process::ExitCode;

/// Install the `env_logger` backend for the `log` facade.
///
/// `RUST_LOG`, when set, takes precedence over the `-v` count.
pub fn init_logging(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Run the parsed command and map the outcome to a process exit code.
pub async fn run(cli: Cli) -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    match cli::dispatch(&cli, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
