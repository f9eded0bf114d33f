use std::sync::Arc;

use teloxide::types::ChatId;
use teloxide::Bot;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use suiwatch::api::{self, AppState};
use suiwatch::bot::{run_bot, BotContext};
use suiwatch::chain::{BalanceSource, SuiSweeper, Transfer};
use suiwatch::config::{Config, Secrets};
use suiwatch::error::ConfigError;
use suiwatch::keys::{SuiAddress, SuiSigner};
use suiwatch::notify::{Notifier, TelegramNotifier};
use suiwatch::rpc::RpcClient;
use suiwatch::watcher::{
    join_watcher, new_watch_list, run_watcher, SweepRoute, WatchStatus, WatchedAddress, Watcher,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    init_tracing();

    tracing::info!("Sui watch bot starting");

    // Configuration errors are fatal: nothing below runs without a complete setup
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(&config_path)?;
    let secrets = Secrets::from_env()?;
    let signer = SuiSigner::from_encoded(&secrets.private_key).map_err(ConfigError::from)?;
    let destination = config.destination()?;
    let wallets = config.watched_addresses()?;
    let chat_id = config
        .telegram
        .chat_id
        .ok_or(ConfigError::Missing("telegram.chat_id"))?;

    tracing::info!(
        wallets = wallets.len(),
        rpc_endpoints = config.chain.rpc_urls.len(),
        poll_interval_secs = config.watcher.poll_interval_secs,
        "Configuration loaded from {}",
        config_path
    );
    let signer_address = signer.address().clone();
    report_sweep_setup(&wallets, &signer_address, &destination);

    let rpc = Arc::new(
        RpcClient::new(config.chain.rpc_urls.clone(), config.request_timeout())
            .map_err(|e| eyre::eyre!("Failed to build HTTP client: {}", e))?,
    );
    let balances: Arc<dyn BalanceSource> = rpc.clone();
    let transfer: Arc<dyn Transfer> =
        Arc::new(SuiSweeper::new(rpc.clone(), signer, config.chain.gas_budget));

    let bot = Bot::new(&secrets.bot_token);
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(bot.clone(), chat_id));

    let watch_list = new_watch_list(wallets);
    let status = WatchStatus::new();
    let shutdown = CancellationToken::new();

    // Liveness endpoint
    if config.api.enabled {
        let state = AppState {
            status: status.clone(),
            wallets: watch_list.clone(),
            signer: signer_address.clone(),
        };
        let host = config.api.host.clone();
        let port = config.api.port;
        tokio::spawn(async move {
            if let Err(e) = api::serve(state, &host, port).await {
                tracing::error!(error = %e, "Liveness server failed");
            }
        });
    }

    // Chat commands
    let bot_ctx = Arc::new(BotContext {
        wallets: watch_list.clone(),
        balances: balances.clone(),
        denomination: config.denomination(),
        admin_chat: ChatId(chat_id),
    });

    // Watch loop
    let watcher = Watcher::new(
        watch_list.clone(),
        balances,
        transfer,
        notifier.clone(),
        SweepRoute {
            signer: signer_address,
            destination,
        },
        config.denomination(),
    );
    let watcher_handle = tokio::spawn(run_watcher(
        watcher,
        config.poll_interval(),
        status,
        shutdown.clone(),
    ));

    let watched = watch_list.read().await.len();
    if let Err(e) = notifier
        .send(&format!("🤖 Sui watch bot online, watching {} wallets", watched))
        .await
    {
        tracing::warn!(error = %e, "Failed to send startup message");
    }

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
        tracing::info!("Shutdown signal received, stopping...");
        signal.cancel();
    });

    tracing::info!("Bot running. Press Ctrl+C to stop.");

    // The dispatcher runs on this task until shutdown
    run_bot(bot, bot_ctx, shutdown.clone()).await;
    shutdown.cancel();
    join_watcher(watcher_handle).await;

    tracing::info!("Sui watch bot stopped gracefully");
    Ok(())
}

fn init_tracing() {
    // Set RUST_LOG=debug for per-tick output, LOG_FORMAT=json for structured logs
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Log whether the held key can actually sweep anything that is watched.
fn report_sweep_setup(wallets: &[WatchedAddress], signer: &SuiAddress, destination: &SuiAddress) {
    match wallets.iter().find(|w| &w.address == signer) {
        Some(w) if w.can_sweep => tracing::info!(
            wallet = %w.name,
            %signer,
            %destination,
            "Automatic sweep enabled"
        ),
        Some(w) => tracing::info!(
            wallet = %w.name,
            %signer,
            "Signer wallet is watched with can_sweep = false, automatic sweep disabled"
        ),
        None => tracing::warn!(
            %signer,
            "Signer address is not in the watch list, automatic sweep disabled"
        ),
    }

    for w in wallets.iter().filter(|w| w.can_sweep && &w.address != signer) {
        tracing::warn!(
            wallet = %w.name,
            address = %w.address,
            "can_sweep is set but the configured key does not control this address"
        );
    }
}
