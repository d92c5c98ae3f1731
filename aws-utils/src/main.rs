use aws_utils::cli::{run, Cli, AMBIENT_NOTE};
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only user-facing output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Usage banner on stdout, non-zero exit.
            println!("{}", e.render());
            println!("{AMBIENT_NOTE}");
            std::process::exit(1);
        }
    };
    tracing::info!("CLI arguments parsed, invoking run");

    match run(cli).await {
        Ok(()) => tracing::info!("CLI completed successfully"),
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            eprintln!("[ERROR] {e:#}");
            std::process::exit(1);
        }
    }
}
