mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Cli, Commands};
use tracing_subscriber::EnvFilter;
use vidsearch_config::{Config, ErrorFormatter};

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let loaded = match cli.config.as_deref() {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    loaded.map_err(|err| anyhow::anyhow!(ErrorFormatter::new(err).format()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Video { command } => commands::video::handle_video(command, &config).await?,
        Commands::Segment {
            transcript,
            max_tokens,
        } => commands::segment::handle_segment(&transcript, max_tokens, &config).await?,
    }

    Ok(())
}
