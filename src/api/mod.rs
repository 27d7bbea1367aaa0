//! API Module
//!
//! RPC capability consumed by the balance aggregator, and its Solana
//! JSON-RPC implementation.

mod providers;

pub use providers::*;

use crate::balances::BalanceAggregator;
use crate::error::AssetsResult;
use crate::types::{AssetListRequest, AssetListResponse, AssetListState, TokenHolding};
use crate::utils::network_config::NetworkConfig;
use solana_sdk::pubkey::Pubkey;
use std::future::Future;
use std::str::FromStr;

/// Read-only balance queries the aggregator needs.
///
/// A provider is bound to a single endpoint; switching networks means
/// building a new provider.
pub trait AssetProvider: Send + Sync {
    /// Endpoint this provider queries, for diagnostics
    fn endpoint(&self) -> &str;

    /// Native balance in lamports
    fn native_balance(&self, owner: &Pubkey) -> impl Future<Output = AssetsResult<u64>> + Send;

    /// Every SPL token account owned by `owner`, one entry per account
    fn token_holdings(
        &self,
        owner: &Pubkey,
    ) -> impl Future<Output = AssetsResult<Vec<TokenHolding>>> + Send;
}

/// Resolve a request into a rendered state (FFI and CLI entry point).
///
/// A missing or blank account yields `Disconnected` without touching the
/// network. Invalid input fails before any query is issued.
pub async fn fetch_assets(
    request: &AssetListRequest,
    config: &NetworkConfig,
) -> AssetsResult<AssetListResponse> {
    let mut config = config.clone();
    if let Some(endpoint) = request.endpoint.as_deref() {
        config.set_endpoint(request.network, endpoint)?;
    }

    let owner = request
        .account
        .as_deref()
        .map(str::trim)
        .filter(|account| !account.is_empty())
        .map(Pubkey::from_str)
        .transpose()?;

    let state = match owner {
        Some(owner) => {
            let provider = SolanaRpcProvider::for_network(&config, request.network)?;
            BalanceAggregator::new()
                .with_timeout(config.request_timeout())
                .load(Some(&owner), &provider)
                .await
        }
        None => AssetListState::Disconnected,
    };

    Ok(AssetListResponse {
        network: request.network,
        endpoint: config.endpoint(request.network).to_string(),
        connected: owner.is_some(),
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::types::Network;

    #[tokio::test]
    async fn test_disconnected_request_skips_network() {
        let request = AssetListRequest {
            account: None,
            network: Network::MainnetBeta,
            endpoint: None,
        };
        let response = fetch_assets(&request, &NetworkConfig::new()).await.unwrap();
        assert!(!response.connected);
        assert_eq!(response.state, AssetListState::Disconnected);
        assert_eq!(response.endpoint, "https://solana-rpc.publicnode.com");
    }

    #[tokio::test]
    async fn test_blank_account_is_disconnected() {
        let request = AssetListRequest {
            account: Some("   ".to_string()),
            ..AssetListRequest::default()
        };
        let response = fetch_assets(&request, &NetworkConfig::new()).await.unwrap();
        assert_eq!(response.state, AssetListState::Disconnected);
    }

    #[tokio::test]
    async fn test_invalid_account_is_rejected() {
        let request = AssetListRequest {
            account: Some("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".to_string()),
            ..AssetListRequest::default()
        };
        let err = fetch_assets(&request, &NetworkConfig::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAddress);
    }

    #[tokio::test]
    async fn test_endpoint_override_is_validated() {
        let request = AssetListRequest {
            account: None,
            network: Network::Devnet,
            endpoint: Some("http://rpc.example.com".to_string()),
        };
        let err = fetch_assets(&request, &NetworkConfig::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEndpoint);

        let request = AssetListRequest {
            endpoint: Some("http://localhost:8899".to_string()),
            ..request
        };
        let response = fetch_assets(&request, &NetworkConfig::new()).await.unwrap();
        assert_eq!(response.endpoint, "http://localhost:8899/");
    }
}
