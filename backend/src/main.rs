//! Backend entry-point: parses configuration and starts the HTTP server.

use std::net::SocketAddr;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::server::{ServerConfig, run};

/// Command-line and environment configuration.
#[derive(Debug, Parser)]
#[command(name = "backend", about = "Citizen complaint portal backend")]
struct Args {
    /// Socket address to bind the HTTP listener to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind_addr: SocketAddr,

    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "DB_POOL_MAX_SIZE", default_value_t = 10)]
    pool_max_size: u32,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let args = Args::parse();
    let config = ServerConfig::new(args.bind_addr, args.database_url)
        .with_pool_max_size(args.pool_max_size);
    run(config).await
}
