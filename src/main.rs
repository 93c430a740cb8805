use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quickserve::cli::Cli;
use quickserve::net::{self, Transport};
use quickserve::{build_router, relay};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickserve=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let (mut config, password_generated) = cli.resolve()?;

    // Pipe mode is mutually exclusive with the HTTP server: relay one raw
    // connection to stdio and exit.
    if cli.pipe {
        let addr = format!("{}:{}", config.listener.host, config.listener.port).parse()?;
        relay::run_pipe_mode(addr).await?;
        return Ok(());
    }

    config.root_dir = std::fs::canonicalize(&config.root_dir)?;
    tracing::info!(root = %config.root_dir.display(), "Using root directory");

    if password_generated {
        tracing::info!(
            "Authentication data: {}:{}",
            config.auth.username,
            config.auth.password
        );
    }

    let transport = Transport::from_config(&config.listener)?;
    let router = build_router(&config);
    net::serve(transport, router).await?;

    Ok(())
}
