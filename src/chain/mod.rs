pub mod sweep;

use async_trait::async_trait;

use crate::error::{NetworkError, TransferError};
use crate::keys::SuiAddress;
use crate::rpc::RpcClient;

pub use sweep::SuiSweeper;

/// Reads the current balance of an address, in the chain's smallest unit.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn balance(&self, address: &SuiAddress) -> Result<u128, NetworkError>;
}

/// Moves everything the signer holds to `destination`.
#[async_trait]
pub trait Transfer: Send + Sync {
    async fn sweep_all(&self, destination: &SuiAddress) -> Result<SweepReceipt, TransferError>;
}

/// Transactions of a sweep the chain accepted, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReceipt {
    pub digests: Vec<String>,
    /// What reached the destination after gas, in the smallest unit.
    pub amount: u128,
    /// Set when some coins were left behind, with the reason.
    pub incomplete: Option<String>,
}

#[async_trait]
impl BalanceSource for RpcClient {
    async fn balance(&self, address: &SuiAddress) -> Result<u128, NetworkError> {
        self.get_balance(address).await
    }
}
