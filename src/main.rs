mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use mb_core::config::Config;
use std::path::{Path, PathBuf};

/// Layer config file, environment, and CLI flags, in that order.
fn load_config(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    root: Option<PathBuf>,
) -> Config {
    let mut config = Config::load_or_default(config_path).with_env();

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(root) = root {
        config.media.root = root;
    }

    config
}

async fn start_server(config: Config) -> Result<()> {
    tracing::info!("Starting mediabrowse");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let root = config.media.root.clone();
    mb_server::start(config)
        .await
        .with_context(|| format!("Failed to serve media root {}", root.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediabrowse=trace,mb_server=trace,mb_core=debug,tower_http=debug".to_string()
        } else {
            "mediabrowse=info,mb_server=info,mb_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port, root } => {
            let config = load_config(cli.config.as_deref(), host, port, root);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(config))
        }
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mediabrowse {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read {}", p.display()))?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    }
    .with_env();

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Media root: {}", config.media.root.display());
    println!(
        "  Listing concurrency: {}",
        config.media.listing_concurrency
    );
    println!("  Effective config:\n{}", serde_json::to_string_pretty(&config)?);

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("  No warnings");
    }
    for warning in warnings {
        println!("  ! {warning}");
    }

    Ok(())
}
