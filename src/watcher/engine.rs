use serde::Serialize;
use std::sync::Arc;

use crate::chain::{BalanceSource, Transfer};
use crate::keys::SuiAddress;
use crate::notify::Notifier;

use super::cache::BalanceCache;
use super::message::{self, Denomination};
use super::{WatchList, WatchedAddress};

/// Where swept funds come from and go to.
#[derive(Debug, Clone)]
pub struct SweepRoute {
    /// Address derived from the held key; the only one this process can sweep.
    pub signer: SuiAddress,
    pub destination: SuiAddress,
}

/// Counters for one pass over the watch list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub checked: usize,
    pub failed: usize,
    pub changes: usize,
    pub sweeps_attempted: usize,
    pub sweeps_failed: usize,
}

/// The balance watch & sweep loop body. Owns the balance cache; the
/// capabilities it calls are injected so tests can swap in fakes.
pub struct Watcher {
    wallets: WatchList,
    cache: BalanceCache,
    balances: Arc<dyn BalanceSource>,
    transfer: Arc<dyn Transfer>,
    notifier: Arc<dyn Notifier>,
    route: SweepRoute,
    denomination: Denomination,
}

impl Watcher {
    pub fn new(
        wallets: WatchList,
        balances: Arc<dyn BalanceSource>,
        transfer: Arc<dyn Transfer>,
        notifier: Arc<dyn Notifier>,
        route: SweepRoute,
        denomination: Denomination,
    ) -> Self {
        Self {
            wallets,
            cache: BalanceCache::new(),
            balances,
            transfer,
            notifier,
            route,
            denomination,
        }
    }

    pub fn cache(&self) -> &BalanceCache {
        &self.cache
    }

    /// Check every watched address once, in list order.
    ///
    /// Errors stay local to the address they happened on: a failed query skips
    /// that address, a failed sweep is reported, and the tick always finishes.
    pub async fn tick(&mut self) -> TickReport {
        let wallets = self.wallets.read().await.clone();
        let mut report = TickReport::default();

        for wallet in &wallets {
            report.checked += 1;

            let current = match self.balances.balance(&wallet.address).await {
                Ok(balance) => balance,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        wallet = %wallet.name,
                        address = %wallet.address,
                        error = %e,
                        "Balance query failed, skipping for this tick"
                    );
                    continue;
                }
            };

            let previous = self.cache.get(&wallet.address);
            match previous {
                Some(prev) if prev != current => {
                    report.changes += 1;
                    tracing::info!(
                        wallet = %wallet.name,
                        address = %wallet.address,
                        previous = %prev,
                        current = %current,
                        "Balance changed"
                    );
                    let text = message::balance_changed(wallet, prev, current, &self.denomination);
                    self.notify(&text).await;
                }
                Some(_) => {}
                None => {
                    tracing::debug!(
                        wallet = %wallet.name,
                        balance = %current,
                        "Baseline established"
                    );
                }
            }

            if should_sweep(wallet, &self.route.signer, previous, current) {
                report.sweeps_attempted += 1;
                if !self.sweep(wallet, current).await {
                    report.sweeps_failed += 1;
                }
            }

            self.cache.record(&wallet.address, current);
        }

        report
    }

    async fn sweep(&self, wallet: &WatchedAddress, balance: u128) -> bool {
        tracing::info!(
            wallet = %wallet.name,
            balance = %balance,
            destination = %self.route.destination,
            "New funds on signer wallet, sweeping"
        );

        match self.transfer.sweep_all(&self.route.destination).await {
            Ok(receipt) => {
                if let Some(reason) = &receipt.incomplete {
                    tracing::warn!(wallet = %wallet.name, %reason, "Sweep left coins behind");
                }
                let text = message::sweep_succeeded(
                    wallet,
                    &self.route.destination,
                    &receipt,
                    &self.denomination,
                );
                self.notify(&text).await;
                true
            }
            Err(e) => {
                tracing::error!(wallet = %wallet.name, error = %e, "Sweep failed");
                self.notify(&message::sweep_failed(wallet, &e)).await;
                false
            }
        }
    }

    async fn notify(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            tracing::warn!(error = %e, "Failed to deliver notification");
        }
    }
}

/// Sweep only the signer's own, sweep-enabled wallet, and only when its balance
/// rose above an already established baseline.
pub fn should_sweep(
    wallet: &WatchedAddress,
    signer: &SuiAddress,
    previous: Option<u128>,
    current: u128,
) -> bool {
    wallet.can_sweep
        && &wallet.address == signer
        && previous.is_some_and(|prev| current > prev)
}
