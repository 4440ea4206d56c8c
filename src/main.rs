mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Commands;
use commands::{run_analyze, run_compare, run_extract};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Analyze { input, pipeline } => {
            run_analyze(&raw_args, args.config, input, pipeline).await
        }
        Commands::Extract { input } => run_extract(args.config, input).await,
        Commands::Compare { input, pipeline } => {
            run_compare(&raw_args, args.config, input, pipeline).await
        }
    }
}
