use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::TransferError;
use crate::keys::{SuiAddress, SuiSigner};
use crate::rpc::types::Coin;
use crate::rpc::RpcClient;

use super::{SweepReceipt, Transfer};

/// Upper bound on input coins merged into one sweep transaction.
pub const MAX_INPUT_COINS: usize = 255;

/// Sweeps the signer's whole SUI balance with `unsafe_payAllSui`.
///
/// Coins are merged and sent to the destination in batches of at most
/// [`MAX_INPUT_COINS`] until none are left; the gas charged by each batch is
/// deducted from what it transfers.
pub struct SuiSweeper {
    rpc: Arc<RpcClient>,
    signer: SuiSigner,
    gas_budget: u64,
}

/// Outcome of one `payAllSui` transaction.
struct Batch {
    digest: String,
    moved: u128,
}

impl SuiSweeper {
    pub fn new(rpc: Arc<RpcClient>, signer: SuiSigner, gas_budget: u64) -> Self {
        Self {
            rpc,
            signer,
            gas_budget,
        }
    }

    pub fn signer_address(&self) -> &SuiAddress {
        self.signer.address()
    }

    async fn send_batch(
        &self,
        coins: &[Coin],
        destination: &SuiAddress,
    ) -> Result<Batch, TransferError> {
        let owner = self.signer.address();
        let ids: Vec<String> = coins.iter().map(|c| c.coin_object_id.clone()).collect();
        let gross = coins.iter().try_fold(0u128, |sum, coin| {
            coin.balance
                .parse::<u128>()
                .map(|b| sum.saturating_add(b))
                .map_err(|e| {
                    TransferError::Encoding(format!("coin balance '{}': {}", coin.balance, e))
                })
        })?;

        tracing::info!(
            from = %owner,
            to = %destination,
            coins = ids.len(),
            gas_budget = self.gas_budget,
            "Building sweep transaction"
        );

        let unsigned = self
            .rpc
            .pay_all_sui(owner, &ids, destination, self.gas_budget)
            .await?;

        let raw = STANDARD
            .decode(&unsigned.tx_bytes)
            .map_err(|e| TransferError::Encoding(e.to_string()))?;
        let signature = self.signer.sign_transaction(&raw);

        let executed = self
            .rpc
            .execute_transaction(&unsigned.tx_bytes, &signature)
            .await?;

        match executed.effects {
            Some(effects) if effects.status.is_success() => {
                let moved = effects
                    .gas_used
                    .as_ref()
                    .and_then(|gas| gas.deduct_from(gross))
                    .unwrap_or(gross);
                tracing::info!(
                    digest = %executed.digest,
                    moved = %moved,
                    "Sweep transaction succeeded"
                );
                Ok(Batch {
                    digest: executed.digest,
                    moved,
                })
            }
            Some(effects) => Err(TransferError::Rejected {
                digest: executed.digest,
                reason: effects
                    .status
                    .error
                    .unwrap_or_else(|| effects.status.status.clone()),
            }),
            None => Err(TransferError::Rejected {
                digest: executed.digest,
                reason: "node returned no effects".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Transfer for SuiSweeper {
    async fn sweep_all(&self, destination: &SuiAddress) -> Result<SweepReceipt, TransferError> {
        let owner = self.signer.address();
        let mut spent: HashSet<String> = HashSet::new();
        let mut receipt = SweepReceipt::default();

        loop {
            let fetched = match self.rpc.get_coins(owner, MAX_INPUT_COINS).await {
                Ok(coins) => coins,
                Err(e) if receipt.digests.is_empty() => return Err(e.into()),
                Err(e) => {
                    receipt.incomplete = Some(e.to_string());
                    break;
                }
            };
            let full_batch = fetched.len() == MAX_INPUT_COINS;

            // A lagging node may still list coins an earlier batch consumed
            let coins: Vec<Coin> = fetched
                .into_iter()
                .filter(|c| !spent.contains(&c.coin_object_id))
                .collect();
            if coins.is_empty() {
                if full_batch {
                    receipt.incomplete = Some("node still lists already swept coins".to_string());
                }
                break;
            }

            match self.send_batch(&coins, destination).await {
                Ok(batch) => {
                    spent.extend(coins.into_iter().map(|c| c.coin_object_id));
                    receipt.digests.push(batch.digest);
                    receipt.amount = receipt.amount.saturating_add(batch.moved);
                }
                Err(e) if receipt.digests.is_empty() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        batches = receipt.digests.len(),
                        "Sweep stopped part way"
                    );
                    receipt.incomplete = Some(e.to_string());
                    break;
                }
            }

            if !full_batch {
                break;
            }
        }

        if receipt.digests.is_empty() {
            return Err(TransferError::NothingToSweep);
        }
        Ok(receipt)
    }
}
