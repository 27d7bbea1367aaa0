//! Solana JSON-RPC Provider
//!
//! Issues `getBalance` and `getTokenAccountsByOwner` (jsonParsed) against
//! a single cluster endpoint.

use super::AssetProvider;
use crate::balances::tokens::TOKEN_PROGRAM_ID;
use crate::error::{AssetsError, AssetsResult};
use crate::types::{Network, TokenHolding};
use crate::utils::http::{build_client, extract_domain, HttpClientConfig};
use crate::utils::network_config::NetworkConfig;
use crate::{log_debug, log_warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

const MODULE: &str = "api::providers";

/// Errors raised while talking to the RPC node
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Missing result in {0} response")]
    MissingResult(&'static str),
}

impl From<RpcError> for AssetsError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Transport(inner) => inner.into(),
            RpcError::Rpc { code, message } => {
                AssetsError::rpc_error(message).with_details(format!("code {}", code))
            }
            RpcError::Malformed(inner) => AssetsError::parse_error(inner.to_string()),
            RpcError::MissingResult(method) => {
                AssetsError::parse_error(format!("Missing result in {} response", method))
            }
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// `{ "context": {...}, "value": ... }` wrapper used by both queries
#[derive(Debug, Deserialize)]
pub struct ContextValue<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
pub struct KeyedTokenAccount {
    pub pubkey: String,
    pub account: TokenAccount,
}

#[derive(Debug, Deserialize)]
pub struct TokenAccount {
    pub data: TokenAccountData,
}

#[derive(Debug, Deserialize)]
pub struct TokenAccountData {
    pub parsed: ParsedTokenAccount,
}

#[derive(Debug, Deserialize)]
pub struct ParsedTokenAccount {
    pub info: TokenAccountInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub mint: String,
    pub token_amount: UiTokenAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    pub amount: String,
    pub decimals: u8,
    pub ui_amount: Option<f64>,
    pub ui_amount_string: Option<String>,
}

impl UiTokenAmount {
    /// Decimal-adjusted amount; `uiAmount` is null for some zero or
    /// very large balances, so fall back to the string forms.
    pub fn ui_value(&self) -> f64 {
        self.ui_amount
            .or_else(|| self.ui_amount_string.as_deref().and_then(|s| s.parse().ok()))
            .or_else(|| {
                self.amount
                    .parse::<u64>()
                    .ok()
                    .map(|raw| raw as f64 / 10f64.powi(self.decimals as i32))
            })
            .unwrap_or(0.0)
    }
}

/// Flatten parsed token accounts into holdings
pub fn holdings_from_accounts(accounts: Vec<KeyedTokenAccount>) -> Vec<TokenHolding> {
    accounts
        .into_iter()
        .map(|keyed| {
            let info = keyed.account.data.parsed.info;
            TokenHolding::new(info.mint, info.token_amount.ui_value())
        })
        .collect()
}

/// Decode a JSON-RPC envelope into its `result`
pub fn decode_response<T: DeserializeOwned>(
    method: &'static str,
    body: serde_json::Value,
) -> Result<T, RpcError> {
    let envelope: RpcEnvelope<T> = serde_json::from_value(body)?;

    if let Some(error) = envelope.error {
        return Err(RpcError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    envelope.result.ok_or(RpcError::MissingResult(method))
}

// =============================================================================
// Provider
// =============================================================================

/// JSON-RPC client bound to one Solana endpoint
pub struct SolanaRpcProvider {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl SolanaRpcProvider {
    /// Create a provider for `endpoint` with the given request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AssetsResult<Self> {
        let client = build_client(&HttpClientConfig {
            timeout,
            ..HttpClientConfig::default()
        })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Create a provider for the endpoint configured for `network`
    pub fn for_network(config: &NetworkConfig, network: Network) -> AssetsResult<Self> {
        Self::new(config.endpoint(network), config.request_timeout())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: serde_json::Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        log_debug!(MODULE, "RPC request", method = method, host = extract_domain(&self.endpoint));

        let body: serde_json::Value = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        decode_response(method, body).map_err(|e| {
            log_warn!(MODULE, "RPC call failed", method = method, error = e);
            e
        })
    }
}

impl AssetProvider for SolanaRpcProvider {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn native_balance(&self, owner: &Pubkey) -> AssetsResult<u64> {
        let balance: ContextValue<u64> = self
            .call("getBalance", serde_json::json!([owner.to_string()]))
            .await?;
        Ok(balance.value)
    }

    async fn token_holdings(&self, owner: &Pubkey) -> AssetsResult<Vec<TokenHolding>> {
        let accounts: ContextValue<Vec<KeyedTokenAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                serde_json::json!([
                    owner.to_string(),
                    { "programId": TOKEN_PROGRAM_ID },
                    { "encoding": "jsonParsed" }
                ]),
            )
            .await?;
        Ok(holdings_from_accounts(accounts.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn token_account(mint: &str, amount: &str, decimals: u8, ui: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "pubkey": "7o36UsWR1JQLpZ9PE2gn9L4SQ69CNNiWAXd4Jt7rqz9Z",
            "account": {
                "data": {
                    "program": "spl-token",
                    "parsed": {
                        "type": "account",
                        "info": {
                            "isNative": false,
                            "mint": mint,
                            "owner": "4Qkev8aNZcqFNSRhQzwyLMFSsi94jHqE8WNVTJzTP99F",
                            "state": "initialized",
                            "tokenAmount": {
                                "amount": amount,
                                "decimals": decimals,
                                "uiAmount": ui,
                                "uiAmountString": null
                            }
                        }
                    },
                    "space": 165
                },
                "executable": false,
                "lamports": 2039280,
                "owner": TOKEN_PROGRAM_ID,
                "rentEpoch": 361
            }
        })
    }

    #[test]
    fn test_decode_balance_response() {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "result": { "context": { "slot": 1 }, "value": 2_500_000_000u64 },
            "id": 1
        });
        let balance: ContextValue<u64> = decode_response("getBalance", body).unwrap();
        assert_eq!(balance.value, 2_500_000_000);
    }

    #[test]
    fn test_decode_token_accounts() {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "result": {
                "context": { "slot": 1 },
                "value": [
                    token_account("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "10000000", 6, serde_json::json!(10.0)),
                    token_account("4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R", "3200", 3, serde_json::Value::Null),
                ]
            },
            "id": 2
        });
        let accounts: ContextValue<Vec<KeyedTokenAccount>> =
            decode_response("getTokenAccountsByOwner", body).unwrap();
        let holdings = holdings_from_accounts(accounts.value);

        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].amount, 10.0);
        // uiAmount null: derived from the raw amount and decimals
        assert!((holdings[1].amount - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_rpc_error_body() {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "error": { "code": -32602, "message": "Invalid param: WrongSize" },
            "id": 1
        });
        let err = decode_response::<ContextValue<u64>>("getBalance", body).unwrap_err();
        assert!(matches!(err, RpcError::Rpc { code: -32602, .. }));

        let converted: AssetsError = err.into();
        assert_eq!(converted.code, ErrorCode::RpcError);
        assert_eq!(converted.details.as_deref(), Some("code -32602"));
    }

    #[test]
    fn test_missing_result_is_parse_error() {
        let body = serde_json::json!({ "jsonrpc": "2.0", "id": 1 });
        let err = decode_response::<ContextValue<u64>>("getBalance", body).unwrap_err();
        assert!(matches!(err, RpcError::MissingResult("getBalance")));
        assert_eq!(AssetsError::from(err).code, ErrorCode::ParseError);
    }

    #[test]
    fn test_malformed_shape_is_parse_error() {
        // base64-encoded account data instead of jsonParsed
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "result": {
                "context": { "slot": 1 },
                "value": [{ "pubkey": "x", "account": { "data": ["AAAA", "base64"] } }]
            },
            "id": 1
        });
        let err = decode_response::<ContextValue<Vec<KeyedTokenAccount>>>(
            "getTokenAccountsByOwner",
            body,
        )
        .unwrap_err();
        assert!(matches!(err, RpcError::Malformed(_)));
        assert_eq!(AssetsError::from(err).code, ErrorCode::ParseError);
    }

    #[test]
    fn test_ui_value_fallbacks() {
        let from_string = UiTokenAmount {
            amount: "0".to_string(),
            decimals: 6,
            ui_amount: None,
            ui_amount_string: Some("1.25".to_string()),
        };
        assert_eq!(from_string.ui_value(), 1.25);

        let unparseable = UiTokenAmount {
            amount: "abc".to_string(),
            decimals: 6,
            ui_amount: None,
            ui_amount_string: None,
        };
        assert_eq!(unparseable.ui_value(), 0.0);
    }

    #[test]
    fn test_provider_keeps_endpoint() {
        let provider =
            SolanaRpcProvider::new("https://api.devnet.solana.com", Duration::from_secs(5)).unwrap();
        assert_eq!(provider.endpoint(), "https://api.devnet.solana.com");
    }
}
