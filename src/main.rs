use clap::Parser;
use std::process::ExitCode;
use waha_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    waha_cli::init_logging(cli.log_level());
    waha_cli::run(cli).await
}
