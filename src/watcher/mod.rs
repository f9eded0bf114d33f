pub mod cache;
pub mod engine;
pub mod message;
pub mod runner;
pub mod status;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::keys::SuiAddress;

pub use cache::BalanceCache;
pub use engine::{SweepRoute, TickReport, Watcher};
pub use message::Denomination;
pub use runner::{join_watcher, run_watcher};
pub use status::WatchStatus;

/// An address the loop polls every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedAddress {
    pub name: String,
    pub address: SuiAddress,
    pub can_sweep: bool,
}

/// Watch list shared between the loop and the chat commands.
/// A tick works on a snapshot taken when it starts.
pub type WatchList = Arc<RwLock<Vec<WatchedAddress>>>;

pub fn new_watch_list(wallets: Vec<WatchedAddress>) -> WatchList {
    Arc::new(RwLock::new(wallets))
}
