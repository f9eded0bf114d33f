use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::NetworkError;
use crate::keys::SuiAddress;

use super::types::{
    Balance, Coin, CoinPage, ExecutionResponse, JsonRpcRequest, JsonRpcResponse, TransactionBytes,
};

/// Page size requested from `suix_getCoins`.
const COIN_PAGE_LIMIT: u32 = 50;

/// JSON-RPC client over a list of interchangeable fullnode endpoints.
///
/// Calls start at the endpoint that answered last. Any failure (transport,
/// non-2xx, JSON-RPC error object, unparseable body) moves on to the next
/// endpoint; once every endpoint has failed the last error is returned.
pub struct RpcClient {
    http: reqwest::Client,
    endpoints: Vec<String>,
    cursor: AtomicUsize,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(endpoints: Vec<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            endpoints,
            cursor: AtomicUsize::new(0),
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint the next call will try first.
    pub fn current_endpoint(&self) -> Option<&str> {
        if self.endpoints.is_empty() {
            return None;
        }
        let idx = self.cursor.load(Ordering::Relaxed) % self.endpoints.len();
        Some(&self.endpoints[idx])
    }

    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, NetworkError> {
        self.call_with_endpoint(method, params)
            .await
            .map(|(value, _)| value)
    }

    /// Like [`call`](Self::call), also returning the endpoint that answered.
    pub async fn call_with_endpoint<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<(T, &str), NetworkError> {
        let count = self.endpoints.len();
        if count == 0 {
            return Err(NetworkError::NoEndpoints);
        }

        let start = self.cursor.load(Ordering::Relaxed) % count;
        let mut last_error = NetworkError::NoEndpoints;

        for offset in 0..count {
            let idx = (start + offset) % count;
            let endpoint = self.endpoints[idx].as_str();

            match self.call_endpoint(endpoint, method, &params).await {
                Ok(value) => {
                    if idx != start {
                        self.cursor.store(idx, Ordering::Relaxed);
                        tracing::info!(%endpoint, "Switched to alternate RPC endpoint");
                    }
                    return Ok((value, endpoint));
                }
                Err(e) => {
                    tracing::warn!(%endpoint, method, error = %e, "RPC endpoint failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn call_endpoint<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: &str,
        params: &serde_json::Value,
    ) -> Result<T, NetworkError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|source| NetworkError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body: JsonRpcResponse<T> = response.json().await.map_err(|e| NetworkError::Malformed {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(err) = body.error {
            return Err(NetworkError::Rpc {
                endpoint: endpoint.to_string(),
                code: err.code,
                message: err.message,
            });
        }

        body.result.ok_or_else(|| NetworkError::Malformed {
            endpoint: endpoint.to_string(),
            reason: "response has neither result nor error".to_string(),
        })
    }

    // ============================================================
    // Sui methods
    // ============================================================

    /// Total SUI balance of `owner` in MIST.
    pub async fn get_balance(&self, owner: &SuiAddress) -> Result<u128, NetworkError> {
        let (balance, endpoint): (Balance, &str) = self
            .call_with_endpoint("suix_getBalance", json!([owner.as_str()]))
            .await?;

        balance
            .total_balance
            .parse::<u128>()
            .map_err(|e| NetworkError::Malformed {
                endpoint: endpoint.to_string(),
                reason: format!("totalBalance '{}': {}", balance.total_balance, e),
            })
    }

    /// SUI coins owned by `owner`, at most `limit` of them.
    pub async fn get_coins(
        &self,
        owner: &SuiAddress,
        limit: usize,
    ) -> Result<Vec<Coin>, NetworkError> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page: CoinPage = self
                .call(
                    "suix_getCoins",
                    json!([owner.as_str(), "0x2::sui::SUI", cursor, COIN_PAGE_LIMIT]),
                )
                .await?;

            coins.extend(page.data);
            if coins.len() >= limit {
                coins.truncate(limit);
                break;
            }

            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        Ok(coins)
    }

    /// Build an unsigned transaction sending all `coins` (minus gas) to `recipient`.
    pub async fn pay_all_sui(
        &self,
        signer: &SuiAddress,
        coins: &[String],
        recipient: &SuiAddress,
        gas_budget: u64,
    ) -> Result<TransactionBytes, NetworkError> {
        self.call(
            "unsafe_payAllSui",
            json!([
                signer.as_str(),
                coins,
                recipient.as_str(),
                gas_budget.to_string()
            ]),
        )
        .await
    }

    pub async fn execute_transaction(
        &self,
        tx_bytes: &str,
        signature: &str,
    ) -> Result<ExecutionResponse, NetworkError> {
        self.call(
            "sui_executeTransactionBlock",
            json!([
                tx_bytes,
                [signature],
                { "showEffects": true },
                "WaitForLocalExecution"
            ]),
        )
        .await
    }
}
