//! Telegram command surface: liveness, live balances and watch-list edits.

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;
use tokio_util::sync::CancellationToken;

use crate::chain::BalanceSource;
use crate::keys::SuiAddress;
use crate::watcher::message::balance_line;
use crate::watcher::{Denomination, WatchList, WatchedAddress};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "check that the bot is alive.")]
    Ping,
    #[command(description = "show the balance of every watched wallet.")]
    Balance,
    #[command(
        description = "watch a wallet: /watch <name> <address>",
        parse_with = "split"
    )]
    Watch { name: String, address: String },
    #[command(description = "stop watching a wallet: /unwatch <name>")]
    Unwatch(String),
    #[command(description = "show this text.")]
    Help,
}

/// State the command handlers share with the watch loop.
pub struct BotContext {
    pub wallets: WatchList,
    pub balances: Arc<dyn BalanceSource>,
    pub denomination: Denomination,
    /// Only this chat may change the watch list.
    pub admin_chat: ChatId,
}

/// Run the command dispatcher until `shutdown` fires.
pub async fn run_bot(bot: Bot, ctx: Arc<BotContext>, shutdown: CancellationToken) {
    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(answer);

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|_| async {})
        .build();

    tracing::info!("Telegram command dispatcher started");
    tokio::select! {
        _ = dispatcher.dispatch() => {}
        _ = shutdown.cancelled() => {}
    }
    tracing::info!("Telegram command dispatcher stopped");
}

async fn answer(bot: Bot, msg: Message, cmd: Command, ctx: Arc<BotContext>) -> ResponseResult<()> {
    tracing::debug!(chat_id = msg.chat.id.0, command = ?cmd, "Command received");

    let reply = match cmd {
        Command::Ping => "✅ Bot OK!".to_string(),
        Command::Help => Command::descriptions().to_string(),
        Command::Balance => balances_reply(&ctx).await,
        Command::Watch { .. } | Command::Unwatch(_) if msg.chat.id != ctx.admin_chat => {
            tracing::warn!(chat_id = msg.chat.id.0, "Watch-list change from unauthorized chat");
            "🚫 Only the alert chat can change the watch list.".to_string()
        }
        Command::Watch { name, address } => watch(&ctx.wallets, &name, &address).await,
        Command::Unwatch(name) => unwatch(&ctx.wallets, &name).await,
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// One line per watched wallet with its live balance.
pub async fn balances_reply(ctx: &BotContext) -> String {
    let wallets = ctx.wallets.read().await.clone();
    if wallets.is_empty() {
        return "📭 No wallets are being watched.".to_string();
    }

    let mut lines = Vec::with_capacity(wallets.len());
    let mut any_ok = false;
    for wallet in &wallets {
        let balance = match ctx.balances.balance(&wallet.address).await {
            Ok(b) => {
                any_ok = true;
                Some(b)
            }
            Err(e) => {
                tracing::warn!(
                    wallet = %wallet.name,
                    error = %e,
                    "Balance query for /balance failed"
                );
                None
            }
        };
        lines.push(balance_line(&wallet.name, balance, &ctx.denomination));
    }

    if !any_ok {
        return "⚠️ RPC error, no balances available".to_string();
    }
    lines.join("\n")
}

/// Add a wallet to the watch list. Wallets added from chat are never swept.
pub async fn watch(wallets: &WatchList, name: &str, address: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return "⚠️ Usage: /watch <name> <address>".to_string();
    }
    let address: SuiAddress = match address.parse() {
        Ok(a) => a,
        Err(e) => return format!("⚠️ Invalid address: {}", e),
    };

    let mut list = wallets.write().await;
    if let Some(existing) = list.iter().find(|w| w.name == name || w.address == address) {
        return format!("⚠️ Already watching {} ({})", existing.name, existing.address.short());
    }

    tracing::info!(wallet = %name, %address, "Wallet added to watch list");
    list.push(WatchedAddress {
        name: name.to_string(),
        address,
        can_sweep: false,
    });
    format!("👀 Now watching {}", name)
}

pub async fn unwatch(wallets: &WatchList, name: &str) -> String {
    let name = name.trim();
    let mut list = wallets.write().await;
    let before = list.len();
    list.retain(|w| w.name != name);

    if list.len() < before {
        tracing::info!(wallet = %name, "Wallet removed from watch list");
        format!("🚫 Stopped watching {}", name)
    } else {
        "⚠️ No wallet with that name".to_string()
    }
}
