use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::keys::SuiAddress;
use crate::watcher::{Denomination, WatchedAddress};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub wallets: Vec<WalletConfig>,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

// ============================================================
// Chain
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    #[serde(default = "default_rpc_urls")]
    pub rpc_urls: Vec<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Gas budget for sweep transactions, in MIST.
    #[serde(default = "default_gas_budget")]
    pub gas_budget: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_urls: default_rpc_urls(),
            request_timeout_secs: default_request_timeout_secs(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            gas_budget: default_gas_budget(),
        }
    }
}

fn default_rpc_urls() -> Vec<String> {
    vec!["https://fullnode.mainnet.sui.io:443".to_string()]
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_symbol() -> String {
    "SUI".to_string()
}

fn default_decimals() -> u8 {
    9
}

fn default_gas_budget() -> u64 {
    10_000_000
}

// ============================================================
// Watcher
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct WatcherConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Where swept funds go.
    pub destination: Option<String>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            destination: None,
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub can_sweep: bool,
}

// ============================================================
// Telegram & API
// ============================================================

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    pub chat_id: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

// ============================================================
// Loading
// ============================================================

impl Config {
    /// Read `path`, apply environment overrides and validate.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override file values with `SUI_TARGET_ADDRESS`, `TELEGRAM_CHAT_ID`,
    /// `SUI_RPC_URLS`, `POLL_INTERVAL_SECS` and `PORT` when set.
    pub fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(dest) = env("SUI_TARGET_ADDRESS") {
            self.watcher.destination = Some(dest.trim().to_string());
        }
        if let Some(chat) = env("TELEGRAM_CHAT_ID") {
            let id = chat.trim().parse().map_err(|_| {
                ConfigError::invalid("TELEGRAM_CHAT_ID", format!("'{}' is not an integer", chat))
            })?;
            self.telegram.chat_id = Some(id);
        }
        if let Some(urls) = env("SUI_RPC_URLS") {
            self.chain.rpc_urls = urls
                .split(',')
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect();
        }
        if let Some(secs) = env("POLL_INTERVAL_SECS") {
            self.watcher.poll_interval_secs = secs.trim().parse().map_err(|_| {
                ConfigError::invalid("POLL_INTERVAL_SECS", format!("'{}' is not an integer", secs))
            })?;
        }
        if let Some(port) = env("PORT") {
            self.api.port = port.trim().parse().map_err(|_| {
                ConfigError::invalid("PORT", format!("'{}' is not a port number", port))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.rpc_urls.is_empty() {
            return Err(ConfigError::Missing("chain.rpc_urls"));
        }
        for url in &self.chain.rpc_urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid(
                    "chain.rpc_urls",
                    format!("'{}' is not an http(s) URL", url),
                ));
            }
        }
        if self.chain.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("chain.request_timeout_secs", "must be positive"));
        }
        if self.chain.decimals > 30 {
            return Err(ConfigError::invalid("chain.decimals", "must be at most 30"));
        }
        if self.watcher.poll_interval_secs == 0 {
            return Err(ConfigError::invalid("watcher.poll_interval_secs", "must be positive"));
        }
        if self.telegram.chat_id.is_none() {
            return Err(ConfigError::Missing("telegram.chat_id (or TELEGRAM_CHAT_ID)"));
        }

        self.destination()?;
        self.watched_addresses()?;
        Ok(())
    }

    pub fn destination(&self) -> Result<SuiAddress, ConfigError> {
        let raw = self
            .watcher
            .destination
            .as_deref()
            .ok_or(ConfigError::Missing("watcher.destination (or SUI_TARGET_ADDRESS)"))?;
        raw.parse()
            .map_err(|reason| ConfigError::invalid("watcher.destination", reason))
    }

    /// The `[[wallets]]` table as watch-list entries, checking that addresses
    /// parse and that neither names nor addresses repeat.
    pub fn watched_addresses(&self) -> Result<Vec<WatchedAddress>, ConfigError> {
        if self.wallets.is_empty() {
            return Err(ConfigError::Missing("at least one [[wallets]] entry"));
        }

        let mut names = HashSet::new();
        let mut addresses = HashSet::new();
        let mut out = Vec::with_capacity(self.wallets.len());

        for wallet in &self.wallets {
            let name = wallet.name.trim();
            if name.is_empty() {
                return Err(ConfigError::invalid("wallets.name", "must not be empty"));
            }
            let address: SuiAddress = wallet.address.parse().map_err(|reason| {
                ConfigError::invalid(format!("wallets.{}.address", name), reason)
            })?;

            if !names.insert(name.to_string()) {
                return Err(ConfigError::invalid(
                    "wallets.name",
                    format!("'{}' is listed twice", name),
                ));
            }
            if !addresses.insert(address.clone()) {
                return Err(ConfigError::invalid(
                    format!("wallets.{}.address", name),
                    format!("{} is already watched", address),
                ));
            }

            out.push(WatchedAddress {
                name: name.to_string(),
                address,
                can_sweep: wallet.can_sweep,
            });
        }

        Ok(out)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.watcher.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.chain.request_timeout_secs)
    }

    pub fn denomination(&self) -> Denomination {
        Denomination {
            symbol: self.chain.symbol.clone(),
            decimals: self.chain.decimals,
        }
    }
}

// ============================================================
// Secrets
// ============================================================

/// Credentials read from the environment only, never from the config file.
#[derive(Clone)]
pub struct Secrets {
    pub private_key: String,
    pub bot_token: String,
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let private_key = env("SUI_PRIVATE_KEY").ok_or(ConfigError::Missing("SUI_PRIVATE_KEY"))?;
        let bot_token = env("TELEGRAM_BOT_TOKEN")
            .or_else(|| env("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        Ok(Self {
            private_key: private_key.trim().to_string(),
            bot_token: bot_token.trim().to_string(),
        })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("private_key", &"<redacted>")
            .field("bot_token", &"<redacted>")
            .finish()
    }
}
