//! BalanceWatch CLI
//!
//! Command-line interface for the BalanceWatch balance monitor.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use balancewatch::config::{Config, LoggingConfig, StartupMode, TargetConfig};
use balancewatch::format;
use balancewatch::models::{Observation, WatchTarget};
use balancewatch::notifier::TelegramNotifier;
use balancewatch::provider::{BalanceProvider, ChainzProvider};
use balancewatch::watcher::Watcher;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// BalanceWatch - Deposit and withdrawal alerts for a ledger address
#[derive(Parser)]
#[command(name = "balancewatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "BALANCEWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the address and report balance changes until interrupted
    Watch {
        #[command(flatten)]
        target: TargetArgs,

        /// Time between balance checks (e.g. "1m", "30s")
        #[arg(long, value_parser = humantime::parse_duration)]
        interval: Option<Duration>,

        /// How the first reading is treated
        #[arg(long, value_enum)]
        startup: Option<StartupMode>,

        /// Stop when a notification cannot be delivered
        #[arg(long)]
        exit_on_delivery_failure: bool,
    },

    /// Probe the provider and print the current balance once
    Check {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Watched account, overriding file and environment settings
#[derive(Args)]
struct TargetArgs {
    /// Address to monitor for changes
    #[arg(long)]
    address: Option<String>,

    /// API key for the block explorer (https://chainz.cryptoid.info)
    #[arg(long = "apikey")]
    api_key: Option<String>,

    /// Coin of the address, abbreviated as in explorer URLs (e.g. Litecoin = ltc)
    #[arg(long)]
    coin: Option<String>,

    /// Telegram chat ID of the channel to notify
    #[arg(long = "chatid")]
    chat_id: Option<String>,

    /// Telegram bot token
    #[arg(long)]
    token: Option<String>,

    /// (Nick)name of the address, shown in messages
    #[arg(long)]
    name: Option<String>,
}

impl TargetArgs {
    fn apply(self, target: &mut TargetConfig) {
        let overrides = [
            (self.address, &mut target.address),
            (self.api_key, &mut target.api_key),
            (self.coin, &mut target.coin),
            (self.chat_id, &mut target.chat_id),
            (self.token, &mut target.token),
            (self.name, &mut target.name),
        ];

        for (value, slot) in overrides {
            if value.is_some() {
                *slot = value;
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Settings may live in a local .env file
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    // Load configuration
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Watch {
            target,
            interval,
            startup,
            exit_on_delivery_failure,
        } => {
            target.apply(&mut config.target);
            if let Some(interval) = interval {
                config.watcher.interval = interval;
            }
            if let Some(startup) = startup {
                config.watcher.startup = startup;
            }
            config.watcher.exit_on_delivery_failure |= exit_on_delivery_failure;
            run_watch(config).await
        }
        Commands::Check { target, format } => {
            target.apply(&mut config.target);
            run_check(config, format).await
        }
        Commands::Completions { .. } => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let log_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_watch(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let target = WatchTarget::from_config(&config.target)?;
    let provider = ChainzProvider::new(&config.provider)?;
    let notifier = TelegramNotifier::new(&config.telegram)?;

    info!(provider = %provider.base_url(), "Passed all checks, starting watcher now!");

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    let watcher = Watcher::new(target, provider, notifier, config.watcher);
    watcher.run(shutdown).await?;

    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckReport {
    symbol: String,
    address: String,
    available: bool,
    balance: Option<String>,
    checked_at: DateTime<Utc>,
}

async fn run_check(config: Config, output: OutputFormat) -> anyhow::Result<()> {
    let target = WatchTarget::from_config(&config.target)?;
    let provider = ChainzProvider::new(&config.provider)?;

    let available = provider.is_available().await?;
    let balance = if available {
        match provider.fetch_balance(&target).await? {
            Observation::Amount(amount) => Some(format::amount(amount)),
            Observation::Unavailable => None,
        }
    } else {
        None
    };

    let report = CheckReport {
        symbol: target.symbol(),
        address: target.address.clone(),
        available,
        balance,
        checked_at: Utc::now(),
    };

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Address:   {} ({})", report.address, report.symbol);
            println!(
                "Provider:  {}",
                if report.available { "available" } else { "down" }
            );
            match &report.balance {
                Some(balance) => println!("Balance:   {balance} {}", report.symbol),
                None => println!("Balance:   unavailable"),
            }
        }
    }

    Ok(())
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, finishing current cycle");
        shutdown.cancel();
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "balancewatch", &mut io::stdout());
}
