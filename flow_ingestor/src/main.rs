use clap::Parser;
use flow_ingestor::cli::{Cli, Commands, commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Report { config, out } => commands::report(config, out.as_deref()).await?,
        Commands::CheckConfig { config } => commands::check_config(config)?,
    }
    Ok(())
}
