use std::collections::HashMap;

use crate::keys::SuiAddress;

/// Last observed balance per address.
///
/// Entries appear on the first successful read and are overwritten on every
/// later one. They are never removed, so re-watching an address resumes from
/// its old baseline.
#[derive(Debug, Default)]
pub struct BalanceCache {
    entries: HashMap<SuiAddress, u128>,
}

impl BalanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &SuiAddress) -> Option<u128> {
        self.entries.get(address).copied()
    }

    /// Store a reading, returning the previous one.
    pub fn record(&mut self, address: &SuiAddress, balance: u128) -> Option<u128> {
        self.entries.insert(address.clone(), balance)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
