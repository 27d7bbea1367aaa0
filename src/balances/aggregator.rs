//! Asset Aggregation
//!
//! Fetches the native SOL balance and SPL token holdings for one account
//! and merges them into the display order:
//! native coin, then every known token (zero-filled), then other held
//! tokens by descending amount.

use super::tokens::{default_known_tokens, lookup_symbol, resolve_symbol, KnownToken};
use crate::api::AssetProvider;
use crate::error::AssetsResult;
use crate::types::{Asset, AssetListState, TokenHolding, NATIVE_SYMBOL};
use crate::{log_debug, log_error};
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

const MODULE: &str = "balances::aggregator";

/// Upper bound on the joint native + token fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

// =============================================================================
// Pure Merge
// =============================================================================

/// Convert lamports to SOL
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Negative, NaN and infinite amounts are treated as zero
fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Sum amounts of token accounts that share a mint
fn merge_by_mint(holdings: Vec<TokenHolding>) -> BTreeMap<String, f64> {
    let mut merged = BTreeMap::new();
    for holding in holdings {
        *merged.entry(holding.mint).or_insert(0.0) += sanitize_amount(holding.amount);
    }
    merged
}

/// Build the ordered asset list from raw query results.
///
/// Known tokens are emitted once each in table order; a duplicated mint
/// in `known` keeps its first rank only.
pub fn build_asset_list(
    native_lamports: u64,
    holdings: Vec<TokenHolding>,
    known: &[KnownToken],
) -> Vec<Asset> {
    let known_symbols: HashSet<&str> = known.iter().map(|t| t.symbol.as_str()).collect();

    let mut designated: HashMap<String, f64> = HashMap::new();
    let mut others: Vec<Asset> = Vec::new();

    for (mint, amount) in merge_by_mint(holdings) {
        let symbol = resolve_symbol(known, &mint);
        // The native slot is reserved; a token posing as it is dropped
        if mint == NATIVE_SYMBOL || symbol == NATIVE_SYMBOL {
            continue;
        }
        let is_designated =
            lookup_symbol(known, &mint).is_some() || known_symbols.contains(symbol.as_str());

        if is_designated {
            designated.insert(mint, amount);
        } else if amount > 0.0 {
            others.push(Asset::token(mint, symbol, amount));
        }
    }

    others.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });

    let mut assets = Vec::with_capacity(1 + known.len() + others.len());
    assets.push(Asset::native(lamports_to_sol(native_lamports)));

    let mut emitted = HashSet::new();
    for token in known {
        if !emitted.insert(token.mint.as_str()) {
            continue;
        }
        let amount = designated.get(&token.mint).copied().unwrap_or(0.0);
        assets.push(Asset::token(token.mint.clone(), token.symbol.clone(), amount));
    }

    assets.extend(others);
    assets
}

// =============================================================================
// Balance Aggregator
// =============================================================================

/// Fetches and merges balances for one account
#[derive(Debug, Clone)]
pub struct BalanceAggregator {
    known_tokens: Vec<KnownToken>,
    timeout: Duration,
}

impl BalanceAggregator {
    /// Aggregator with the default USDT/USDC table
    pub fn new() -> Self {
        Self::with_known_tokens(default_known_tokens())
    }

    pub fn with_known_tokens(known_tokens: Vec<KnownToken>) -> Self {
        Self {
            known_tokens,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn known_tokens(&self) -> &[KnownToken] {
        &self.known_tokens
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch both balances concurrently and merge them.
    ///
    /// Either query failing fails the whole fetch; no partial list is
    /// ever returned.
    pub async fn fetch<P: AssetProvider>(
        &self,
        owner: &Pubkey,
        provider: &P,
    ) -> AssetsResult<Vec<Asset>> {
        let queries = async {
            tokio::try_join!(provider.native_balance(owner), provider.token_holdings(owner))
        };
        let (lamports, holdings) = tokio::time::timeout(self.timeout, queries).await??;

        log_debug!(
            MODULE,
            "Fetched balances",
            owner = owner,
            lamports = lamports,
            token_count = holdings.len(),
        );

        Ok(build_asset_list(lamports, holdings, &self.known_tokens))
    }

    /// Fail-safe variant of [`fetch`](Self::fetch): errors become an empty list
    pub async fn compute<P: AssetProvider>(&self, owner: &Pubkey, provider: &P) -> Vec<Asset> {
        match self.fetch(owner, provider).await {
            Ok(assets) => assets,
            Err(e) => {
                log_error!(
                    MODULE,
                    "Fetch assets error",
                    owner = owner,
                    endpoint = provider.endpoint(),
                    error = e,
                );
                Vec::new()
            }
        }
    }

    /// Tagged variant: distinguishes disconnected, loaded and failed.
    /// No query is issued when `owner` is `None`.
    pub async fn load<P: AssetProvider>(
        &self,
        owner: Option<&Pubkey>,
        provider: &P,
    ) -> AssetListState {
        let Some(owner) = owner else {
            return AssetListState::Disconnected;
        };

        match self.fetch(owner, provider).await {
            Ok(assets) => AssetListState::Loaded { assets },
            Err(error) => {
                log_error!(
                    MODULE,
                    "Fetch assets error",
                    owner = owner,
                    endpoint = provider.endpoint(),
                    error = error,
                );
                AssetListState::Failed { error }
            }
        }
    }
}

impl Default for BalanceAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fail-safe asset list for a connected account
pub async fn compute_asset_list<P: AssetProvider>(
    owner: &Pubkey,
    provider: &P,
    known_tokens: &[KnownToken],
) -> Vec<Asset> {
    BalanceAggregator::with_known_tokens(known_tokens.to_vec())
        .compute(owner, provider)
        .await
}

/// Asset list or the error that prevented it
pub async fn fetch_asset_list<P: AssetProvider>(
    owner: &Pubkey,
    provider: &P,
    known_tokens: &[KnownToken],
) -> AssetsResult<Vec<Asset>> {
    BalanceAggregator::with_known_tokens(known_tokens.to_vec())
        .fetch(owner, provider)
        .await
}

/// Disconnected / loaded / failed state for an optional account
pub async fn load_asset_state<P: AssetProvider>(
    owner: Option<&Pubkey>,
    provider: &P,
    known_tokens: &[KnownToken],
) -> AssetListState {
    BalanceAggregator::with_known_tokens(known_tokens.to_vec())
        .load(owner, provider)
        .await
}

// =============================================================================
// Tests
// =============================================================================
