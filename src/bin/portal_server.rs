//! Portal server entrypoint
//!
//! Starts the St. Austin portal HTTP server, optionally loading a
//! TOML configuration file.

use std::path::PathBuf;

use clap::Parser;

use campus_portal::config::PortalConfig;
use campus_portal::http_server::HttpServer;
use campus_portal::version::version_string;

/// St. Austin student portal server
#[derive(Parser, Debug)]
#[command(name = "portal-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match PortalConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => PortalConfig::default(),
    };
    if let Some(port) = cli.port {
        config.port = port;
    }

    println!("Starting {}...", version_string());

    let server = HttpServer::with_config(config);
    if let Err(e) = server.start().await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
