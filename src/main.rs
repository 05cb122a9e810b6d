//! Key-value server binary
//!
//! Main entry point for the HTTP key-value server

use clap::Parser;
use kvstore::{KvServer, Result, ServerConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kv-server", version, about = "In-memory key-value store over HTTP")]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long)]
    addr: Option<String>,

    /// Number of worker threads
    #[arg(long)]
    workers: Option<usize>,

    /// Maximum concurrent connections per worker
    #[arg(long)]
    max_connections: Option<usize>,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(addr) = self.addr {
            config.bind_addr = addr;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(max_connections) = self.max_connections {
            config.max_connections = max_connections;
        }
        Ok(config)
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = Args::parse().into_config()?;
    info!(?config, "starting key-value server");

    // actix installs its own Ctrl+C handler and stops gracefully
    let running = KvServer::new(config).start()?;
    running.run().await
}
