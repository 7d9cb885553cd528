//! GenMave daemon
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults
//! genmave
//!
//! # Custom config and data directory
//! genmave --config /etc/genmave/config.toml --data-dir /var/lib/genmave
//!
//! # Grant metrics access
//! genmave --admin-user ops-1 --admin-user ops-2
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use genmave::config::Overrides;
use genmave::services::events::spawn_logging_listener;
use genmave::{Config, Database, HttpServer, Services};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "genmave")]
#[command(about = "Clarity compass, skill challenges and journal API")]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "GENMAVE_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory (database and default config)
    #[arg(long, env = "GENMAVE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP API port
    #[arg(long, env = "GENMAVE_HTTP_PORT")]
    http_port: Option<u16>,

    /// Address to bind the HTTP API on
    #[arg(long, env = "GENMAVE_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Principal allowed to read platform metrics (repeatable)
    #[arg(long = "admin-user")]
    admin_users: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("genmave=info".parse()?))
        .init();

    let args = Args::parse();

    let config = Config::resolve(
        args.config.as_deref(),
        Overrides {
            data_dir: args.data_dir,
            http_port: args.http_port,
            bind_address: args.bind_address,
            admin_user_ids: args.admin_users,
        },
    )?;

    info!(
        data_dir = %config.data_dir.display(),
        http_port = config.http_port,
        admins = config.admin_user_ids.len(),
        "Starting genmave"
    );

    let db = Arc::new(Database::open(&config.data_dir, config.db_pool_size)?);
    let services = Arc::new(Services::new(db, &config)?);
    let _listener = spawn_logging_listener(services.events.clone());

    let http_addr: SocketAddr = format!("{}:{}", config.bind_address, config.http_port).parse()?;
    let http_server = Arc::new(HttpServer::new(services, http_addr));
    info!("HTTP API available at http://{}", http_addr);
    info!("Press Ctrl+C to stop.");

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutting down...");
    };

    tokio::select! {
        result = http_server.run() => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
            }
        }
        _ = shutdown => {}
    }

    Ok(())
}
