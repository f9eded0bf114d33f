use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

// ============================================================
// Sui method payloads
// ============================================================

/// `suix_getBalance` result. Amounts are decimal strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin_type: String,
    pub total_balance: String,
}

/// One page of `suix_getCoins`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_object_id: String,
    pub balance: String,
}

/// Unsigned transaction built by an `unsafe_*` method.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBytes {
    pub tx_bytes: String,
}

/// `sui_executeTransactionBlock` result, with `showEffects` enabled.
#[derive(Debug, Deserialize)]
pub struct ExecutionResponse {
    pub digest: String,
    pub effects: Option<TransactionEffects>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    pub gas_used: Option<GasCostSummary>,
}

/// Gas charged to the sender. Amounts are decimal strings in MIST.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    pub computation_cost: String,
    pub storage_cost: String,
    pub storage_rebate: String,
}

impl GasCostSummary {
    /// `amount` after paying this gas out of it, or `None` if a field is not a number.
    pub fn deduct_from(&self, amount: u128) -> Option<u128> {
        let computation: u128 = self.computation_cost.parse().ok()?;
        let storage: u128 = self.storage_cost.parse().ok()?;
        let rebate: u128 = self.storage_rebate.parse().ok()?;
        Some(
            amount
                .saturating_add(rebate)
                .saturating_sub(computation.saturating_add(storage)),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ExecutionStatus {
    pub status: String,
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
