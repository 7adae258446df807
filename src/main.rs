use clap::Parser;
use gmail_quickstart::app;
use gmail_quickstart::cli::{handle_token_clear, Cli};
use gmail_quickstart::config::CacheLocation;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr so they never interleave with the program's output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = if cli.clear_token {
        CacheLocation::from_env().and_then(|location| handle_token_clear(&location))
    } else {
        app::run(&cli).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
