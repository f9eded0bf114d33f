#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use suiwatch::chain::{BalanceSource, SweepReceipt, Transfer};
use suiwatch::error::{NetworkError, NotificationError, TransferError};
use suiwatch::keys::SuiAddress;
use suiwatch::notify::Notifier;
use suiwatch::watcher::{
    new_watch_list, Denomination, SweepRoute, WatchList, WatchedAddress, Watcher,
};

pub const SIGNER: &str = "0x5";
pub const DESTINATION: &str = "0xdead";

pub fn addr(s: &str) -> SuiAddress {
    s.parse().unwrap()
}

pub fn wallet(name: &str, address: &str, can_sweep: bool) -> WatchedAddress {
    WatchedAddress {
        name: name.to_string(),
        address: addr(address),
        can_sweep,
    }
}

/// Balance source that replays queued readings per address.
/// `None` in the queue (or an empty queue) is a failed query.
#[derive(Default)]
pub struct ScriptedBalances {
    readings: Mutex<HashMap<SuiAddress, VecDeque<Option<u128>>>>,
}

impl ScriptedBalances {
    pub fn push(&self, address: &str, reading: Option<u128>) {
        self.readings
            .lock()
            .unwrap()
            .entry(addr(address))
            .or_default()
            .push_back(reading);
    }

    pub fn push_all(&self, address: &str, readings: &[u128]) {
        for r in readings {
            self.push(address, Some(*r));
        }
    }
}

#[async_trait]
impl BalanceSource for ScriptedBalances {
    async fn balance(&self, address: &SuiAddress) -> Result<u128, NetworkError> {
        let next = self
            .readings
            .lock()
            .unwrap()
            .get_mut(address)
            .and_then(|q| q.pop_front())
            .flatten();
        next.ok_or_else(|| NetworkError::Status {
            endpoint: "fake".to_string(),
            status: 503,
        })
    }
}

/// Transfer capability that records every attempt and reports `moved` as
/// the swept amount.
#[derive(Default)]
pub struct RecordingTransfer {
    pub attempts: Mutex<Vec<SuiAddress>>,
    pub fail: Mutex<bool>,
    pub moved: Mutex<u128>,
}

impl RecordingTransfer {
    pub fn attempts(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn set_moved(&self, amount: u128) {
        *self.moved.lock().unwrap() = amount;
    }
}

#[async_trait]
impl Transfer for RecordingTransfer {
    async fn sweep_all(&self, destination: &SuiAddress) -> Result<SweepReceipt, TransferError> {
        let mut attempts = self.attempts.lock().unwrap();
        attempts.push(destination.clone());
        if *self.fail.lock().unwrap() {
            return Err(TransferError::Rejected {
                digest: "D1".to_string(),
                reason: "InsufficientGas".to_string(),
            });
        }
        Ok(SweepReceipt {
            digests: vec![format!("digest-{}", attempts.len())],
            amount: *self.moved.lock().unwrap(),
            incomplete: None,
        })
    }
}

/// Notifier that keeps every message; optionally fails after recording.
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages().iter().filter(|m| m.contains(needle)).count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        self.messages.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(NotificationError::Delivery("chat unreachable".to_string()));
        }
        Ok(())
    }
}

pub struct Harness {
    pub watcher: Watcher,
    pub wallets: WatchList,
    pub balances: Arc<ScriptedBalances>,
    pub transfer: Arc<RecordingTransfer>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(wallets: Vec<WatchedAddress>) -> Harness {
    harness_with_notifier(wallets, RecordingNotifier::default())
}

pub fn harness_with_notifier(wallets: Vec<WatchedAddress>, notifier: RecordingNotifier) -> Harness {
    let list = new_watch_list(wallets);
    let balances = Arc::new(ScriptedBalances::default());
    let transfer = Arc::new(RecordingTransfer::default());
    let notifier = Arc::new(notifier);

    let watcher = Watcher::new(
        list.clone(),
        balances.clone(),
        transfer.clone(),
        notifier.clone(),
        SweepRoute {
            signer: addr(SIGNER),
            destination: addr(DESTINATION),
        },
        Denomination::sui(),
    );

    Harness {
        watcher,
        wallets: list,
        balances,
        transfer,
        notifier,
    }
}
