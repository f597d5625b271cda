//! HostDeck - a terminal cockpit for 3D-printer hosts
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;

use hostdeck_app::config;
use hostdeck_core::prelude::*;

/// HostDeck - a terminal cockpit for 3D-printer hosts
#[derive(Parser, Debug)]
#[command(name = "hostdeck")]
#[command(about = "A terminal cockpit for 3D-printer hosts", long_about = None)]
struct Args {
    /// Host base URL, overriding the configured one
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// API key sent with every request
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Alternate config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize error handling
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    // Initialize logging (to file, since the TUI owns stdout)
    hostdeck_core::logging::init()?;

    let config_path = args
        .config
        .or_else(config::default_config_path)
        .ok_or_else(|| Error::config("no config directory available on this system"))?;

    if args.init_config {
        config::init_config_file(&config_path)?;
        println!("wrote {}", config_path.display());
        return Ok(());
    }

    let mut settings = config::load_settings(&config_path);
    config::apply_overrides(&mut settings, args.url, args.api_key);

    info!("═══════════════════════════════════════════════════════");
    info!("HostDeck starting");
    info!(url = %settings.server.url, "host");
    info!("═══════════════════════════════════════════════════════");

    let result = hostdeck_tui::run(settings).await;

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("HostDeck exiting");
    result
}
