//! Calmwing CLI — the main entry point.
//!
//! Commands:
//! - `gateway` — Start the HTTP API server
//! - `send`    — Run a single support interaction from the terminal
//! - `doctor`  — Diagnose configuration and collaborator health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "calmwing",
    about = "Calmwing — in-flight companion for anxious travelers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single support interaction and print the envelope
    Send {
        /// The traveler's message
        message: String,

        /// Self-reported anxiety level (0-10)
        #[arg(short, long, default_value_t = 5)]
        anxiety: i32,

        /// Traveler id to track state under
        #[arg(short, long, default_value = "cli")]
        user: String,

        /// Use the offline mock generator regardless of config
        #[arg(long)]
        mock: bool,
    },

    /// Diagnose configuration and collaborator health
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Send {
            message,
            anxiety,
            user,
            mock,
        } => commands::send::run(message, anxiety, user, mock).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
