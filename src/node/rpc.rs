//! JSON-RPC node over HTTP

use std::str::FromStr;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use solana_hash::Hash;
use solana_pubkey::Pubkey;

use super::{Node, RemoteAccount};
use crate::errors::{GeneratorError, GeneratorResult};
use crate::models::{FreshnessAnchor, SimulationOutcome};

/// RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Result wrapper carrying the slot it was read at
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
    last_valid_block_height: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateValue {
    err: Option<Value>,
    logs: Option<Vec<String>>,
    units_consumed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct AccountValue {
    /// `[payload, encoding]`
    data: (String, String),
    owner: String,
}

/// Node reached through a single JSON-RPC endpoint
#[derive(Debug, Clone)]
pub struct RpcNode {
    client: Client,
    rpc_url: String,
    commitment: String,
}

impl RpcNode {
    pub fn new(rpc_url: &str, commitment: &str) -> Self {
        Self {
            client: Client::new(),
            rpc_url: rpc_url.to_string(),
            commitment: commitment.to_string(),
        }
    }

    fn rpc_error(&self, message: impl Into<String>) -> GeneratorError {
        GeneratorError::Rpc {
            endpoint: self.rpc_url.clone(),
            message: message.into(),
        }
    }

    /// Send one request and decode the envelope without interpreting it
    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Value,
    ) -> GeneratorResult<RpcResponse<T>> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("RPC {} -> {}", method, self.rpc_url);
        self.client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.rpc_error(format!("{} request failed: {}", method, e)))?
            .json()
            .await
            .map_err(|e| self.rpc_error(format!("{} returned an unreadable response: {}", method, e)))
    }

    /// Send one request and unwrap the envelope
    async fn call<T: for<'de> Deserialize<'de>>(&self, method: &str, params: Value) -> GeneratorResult<T> {
        let response: RpcResponse<T> = self.send(method, params).await?;
        if let Some(error) = response.error {
            return Err(self.rpc_error(format!("{} failed ({}): {}", method, error.code, error.message)));
        }
        response
            .result
            .ok_or_else(|| self.rpc_error(format!("{} returned no result", method)))
    }

    /// Whether the node reports itself healthy
    pub async fn is_healthy(&self) -> bool {
        match self.call::<String>("getHealth", json!([])).await {
            Ok(status) => status == "ok",
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

/// Best-effort reachability check
pub async fn probe(rpc_url: &str) -> bool {
    let healthy = RpcNode::new(rpc_url, "confirmed").is_healthy().await;
    if healthy {
        info!("Node at {} is healthy", rpc_url);
    } else {
        warn!("Node at {} did not report healthy", rpc_url);
    }
    healthy
}

/// Fail fast when the node does not answer healthy
pub async fn ensure_reachable(rpc_url: &str) -> GeneratorResult<()> {
    if probe(rpc_url).await {
        return Ok(());
    }
    Err(GeneratorError::Rpc {
        endpoint: rpc_url.to_string(),
        message: "node is unreachable or unhealthy (pass --skip-probe to generate anyway)".to_string(),
    })
}

/// Extract `n` from `{"InstructionError": [index, {"Custom": n}]}`
pub fn custom_error_code(err: &Value) -> Option<u32> {
    err.get("InstructionError")?
        .get(1)?
        .get("Custom")?
        .as_u64()
        .and_then(|code| u32::try_from(code).ok())
}

#[async_trait]
impl Node for RpcNode {
    fn endpoint(&self) -> &str {
        &self.rpc_url
    }

    async fn latest_blockhash(&self) -> GeneratorResult<FreshnessAnchor> {
        let response: WithContext<BlockhashValue> = self
            .call("getLatestBlockhash", json!([{ "commitment": self.commitment }]))
            .await?;

        let blockhash = Hash::from_str(&response.value.blockhash).map_err(|e| {
            self.rpc_error(format!("invalid blockhash '{}': {}", response.value.blockhash, e))
        })?;

        info!(
            "Using blockhash {} (valid until block height {})",
            blockhash, response.value.last_valid_block_height
        );
        Ok(FreshnessAnchor {
            blockhash,
            last_valid_block_height: response.value.last_valid_block_height,
        })
    }

    async fn simulate(&self, transaction: &[u8]) -> GeneratorResult<SimulationOutcome> {
        let encoded = base64::encode(transaction);
        let response: RpcResponse<WithContext<SimulateValue>> = self
            .send(
                "simulateTransaction",
                json!([
                    encoded,
                    {
                        "sigVerify": false,
                        "replaceRecentBlockhash": false,
                        "commitment": self.commitment,
                        "encoding": "base64"
                    }
                ]),
            )
            .await?;

        // The node was reached but refused to run the transaction at all
        if let Some(error) = response.error {
            return Ok(SimulationOutcome {
                success: false,
                error: Some(format!("{}: {}", error.code, error.message)),
                ..SimulationOutcome::default()
            });
        }
        let value = response
            .result
            .ok_or_else(|| self.rpc_error("simulateTransaction returned no result"))?
            .value;
        let outcome = match value.err {
            None | Some(Value::Null) => SimulationOutcome {
                success: true,
                error: None,
                custom_error_code: None,
                logs: value.logs,
                units_consumed: value.units_consumed,
            },
            Some(err) => SimulationOutcome {
                success: false,
                custom_error_code: custom_error_code(&err),
                error: Some(err.to_string()),
                logs: value.logs,
                units_consumed: value.units_consumed,
            },
        };
        Ok(outcome)
    }

    async fn get_account(&self, address: &Pubkey) -> GeneratorResult<Option<RemoteAccount>> {
        let response: WithContext<Option<AccountValue>> = self
            .call(
                "getAccountInfo",
                json!([
                    address.to_string(),
                    { "encoding": "base64", "commitment": self.commitment }
                ]),
            )
            .await?;

        let account = match response.value {
            Some(account) => account,
            None => return Ok(None),
        };
        let owner = Pubkey::from_str(&account.owner)
            .map_err(|e| self.rpc_error(format!("invalid owner '{}': {}", account.owner, e)))?;
        let data = base64::decode(&account.data.0)
            .map_err(|e| self.rpc_error(format!("undecodable data for {}: {}", address, e)))?;
        Ok(Some(RemoteAccount { owner, data }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_error_code() {
        let err = json!({ "InstructionError": [0, { "Custom": 6001 }] });
        assert_eq!(custom_error_code(&err), Some(6001));

        let not_custom = json!({ "InstructionError": [0, "MissingRequiredSignature"] });
        assert_eq!(custom_error_code(&not_custom), None);

        assert_eq!(custom_error_code(&json!("BlockhashNotFound")), None);
    }
}
