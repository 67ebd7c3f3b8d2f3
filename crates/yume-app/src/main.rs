//! yume-rp - Discord rich presence for YNOproject dream games.
//!
//! Receives game state from the browser extension on a local port and keeps
//! the Discord activity in sync with it.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use yume_app::{client_id_from_env, AppConfig, Application, ConfigSource};
use yume_presence::LoopOutcome;

/// Default configuration path.
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Discord rich presence bridge for YNOproject dream games
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via YUME_RP_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config path: CLI arg > YUME_RP_CONFIG env var > default
    let explicit_path = args
        .config
        .or_else(|| std::env::var("YUME_RP_CONFIG").ok());
    let explicit = explicit_path.is_some();
    let config_path = explicit_path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let (config, source) = AppConfig::load(&config_path, explicit)?;

    yume_telemetry::init_logging(&config.telemetry.log_level)?;
    info!("Starting yume-rp v{}", env!("CARGO_PKG_VERSION"));

    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "Configuration loaded"),
        ConfigSource::Defaults => {
            warn!(path = %config_path, "Config file not found, using built-in defaults")
        }
    }

    let client_id = match client_id_from_env() {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "Cannot start without a Discord application id");
            return Err(e.into());
        }
    };

    let app = Application::new(config, client_id);
    match app.run().await? {
        LoopOutcome::Completed => info!("Shut down cleanly"),
        LoopOutcome::ConnectFailed { attempts } => {
            anyhow::bail!("Could not connect to Discord after {attempts} attempts")
        }
    }

    Ok(())
}
