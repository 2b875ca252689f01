use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cli::driver;

const USAGE: &str = "Usage: recs-query <query> [<input-path>]";

/// Streaming SELECT/WHERE query tool over the records text format.
#[derive(Parser, Debug)]
#[command(name = "recs-query", disable_help_flag = true, disable_version_flag = true)]
struct Args {
    query: Option<String>,
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let Some(query) = args.query else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    match driver::run(&query, args.input.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "query run failed");
            eprintln!("Exception: {}", e);
            ExitCode::FAILURE
        }
    }
}
