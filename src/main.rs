use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use statuswatch::config::Config;
use statuswatch::poller::Poller;
use statuswatch::report::LogReporter;

/// Get the default config file path (~/.config/statuswatch/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("statuswatch")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "statuswatch",
    about = "Polls RSS/Atom status feeds and reports new incident entries"
)]
struct Args {
    /// Path to the TOML config file (default: ~/.config/statuswatch/config.toml)
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Default filter keeps our info logs while quieting the HTTP stack
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .init();

    let args = Args::parse();
    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    let config = Config::load(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from '{}' (create it with a feeds = [...] list, or pass --config)",
            config_path.display()
        )
    })?;

    for feed in &config.feeds {
        tracing::info!(feed = %feed, "Tracking started");
    }

    let poller = Poller::new(&config, Arc::new(LogReporter))
        .context("Failed to build HTTP client")?;

    // Runs until the process is terminated externally
    poller.run().await;
    Ok(())
}
