mod bot_commands;
mod config_commands;
mod subs_commands;

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use {
    clap::{Parser, Subcommand},
    feedwatch_config::{FeedwatchConfig, LoggingConfig},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "feedwatch", about = "Feedwatch: Reddit posts streamed into Discord channels")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level or filter directive (overrides `logging.level`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (skips discovery of ./feedwatch.toml and ~/.config/feedwatch/).
    #[arg(long, global = true, env = "FEEDWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Subscription document path (overrides `storage.path` and FILENAME).
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (default when no subcommand is provided).
    Run,
    /// Validate the configuration and verify the Reddit credentials.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
        /// Skip the Reddit credential check.
        #[arg(long)]
        offline: bool,
    },
    /// Print the persisted subscriptions and bans.
    Subs {
        /// Print the raw document as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn init_telemetry(cli: &Cli, logging: &LoggingConfig) -> anyhow::Result<()> {
    let level = cli.log_level.as_deref().unwrap_or(&logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match &logging.file {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        },
        None => None,
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if cli.json_logs || logging.json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<FeedwatchConfig> {
    let mut config = feedwatch_config::resolve(cli.config.as_deref())?;
    if let Some(path) = &cli.data_file {
        config.storage.path = path.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_telemetry(&cli, &config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "feedwatch starting");

    match cli.command {
        None | Some(Commands::Run) => bot_commands::run(config).await,
        Some(Commands::Check { verbose, offline }) => {
            config_commands::check(&config, cli.config.as_deref(), verbose, offline).await
        },
        Some(Commands::Subs { json }) => subs_commands::print(&config, json).await,
    }
}
