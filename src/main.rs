//! event-registry CLI - runs the registration backend

use std::net::IpAddr;

use clap::{Parser, Subcommand};
use colored::Colorize;

use event_registry::config::AppConfig;
use event_registry::error::{FixSuggestion, RegistryError};
use event_registry::server;

#[derive(Parser)]
#[command(name = "event-registry")]
#[command(about = "Event registration backend: submissions, protocol lookup, xlsx export")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Override PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// Override HOST
        #[arg(long)]
        host: Option<IpAddr>,
    },

    /// Print the effective configuration (secrets masked)
    Config,
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Serve {
        port: None,
        host: None,
    }) {
        Commands::Serve { port, host } => run_server(port, host).await,
        Commands::Config => show_config(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn run_server(port: Option<u16>, host: Option<IpAddr>) -> Result<(), RegistryError> {
    let mut config = AppConfig::from_env()?;

    // Apply CLI overrides
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }

    println!(
        "{} Servidor rodando na porta {}",
        "→".cyan(),
        config.server.port.to_string().cyan().bold()
    );

    server::serve(config).await
}

fn show_config() -> Result<(), RegistryError> {
    let config = AppConfig::from_env()?;

    println!("{}", "Configuration:".cyan().bold());
    for (key, value) in config.summary() {
        println!("  {:<16} {}", key, value);
    }
    Ok(())
}
