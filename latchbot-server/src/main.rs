use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use latchbot_common::traits::transport_traits::SecretsProvider;
use latchbot_core::{BotConfig, CommandConfig};

mod console;
mod context;
mod secrets;

use console::{spawn_console_reader, ConsoleTransport};
use context::ServerContext;
use secrets::{normalize_oauth_token, EnvSecretsProvider, BOT_OAUTH_KEY, BOT_USERNAME_KEY};

#[derive(Parser, Debug, Clone)]
#[command(name = "latchbot")]
#[command(author, version, about = "LatchBot - per-channel chat command bot")]
struct Args {
    /// Directory for latchbot.db and the per-channel databases. Omit to keep everything in memory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Account allowed to authorize new channels.
    #[arg(long)]
    owner: String,

    /// Bot login; falls back to BOT_USERNAME from the environment.
    #[arg(long)]
    bot_username: Option<String>,

    /// Comma-separated channels registered as already authorized.
    #[arg(long, value_delimiter = ',')]
    channels: Vec<String>,

    /// Seconds between command cache refreshes.
    #[arg(long, default_value_t = 300)]
    refresh_secs: u64,

    /// Timeout of a single store call, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    store_timeout_ms: u64,

    /// Retries of a store call after a transient failure.
    #[arg(long, default_value_t = 2)]
    store_retries: u32,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("latchbot=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {}", e);
    }
}

async fn build_config(args: &Args) -> anyhow::Result<BotConfig> {
    let secrets = EnvSecretsProvider;

    let bot_username = match &args.bot_username {
        Some(name) => name.clone(),
        None => secrets.get_secret(BOT_USERNAME_KEY).await?,
    };

    match secrets.get_secret(BOT_OAUTH_KEY).await {
        Ok(token) => {
            let token = normalize_oauth_token(&token);
            info!("Loaded chat credentials for '{}' ({} chars)", bot_username, token.len());
        }
        Err(e) => warn!("{}; running without chat credentials", e),
    }

    let mut config = BotConfig::new(&args.owner, &bot_username);
    config.data_dir = args.data_dir.clone();
    config.seed_channels = args.channels.clone();
    config.commands = CommandConfig {
        cache_refresh_interval: Duration::from_secs(args.refresh_secs),
        store_timeout: Duration::from_millis(args.store_timeout_ms),
        store_retries: args.store_retries,
    };
    Ok(config.validate()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let config = build_config(&args).await?;
    info!(
        "LatchBot starting as '{}' (owner '{}', data dir {:?})",
        config.bot_username, config.owner, config.data_dir
    );

    let transport = Arc::new(ConsoleTransport::new(&config.bot_username));
    let ctx = ServerContext::new(config, transport).await?;
    ctx.join_startup_channels().await?;

    let (tx, rx) = mpsc::channel(256);
    let _reader = spawn_console_reader(tx);
    let message_loop = ctx.message_service.clone().spawn(rx, ctx.shutdown_rx());

    let shutdown_tx = ctx.shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Ctrl-C handler error: {:?}", e);
            return;
        }
        info!("Ctrl-C detected; shutting down.");
        let _ = shutdown_tx.send(true);
    });

    if let Err(e) = message_loop.await {
        error!("Message loop ended abnormally: {:?}", e);
    }

    ctx.shutdown();
    ctx.close().await;
    info!("Main finished. Goodbye!");
    Ok(())
}
