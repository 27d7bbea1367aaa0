//! Wallet Assets Core Library
//!
//! Builds the asset list a Solana wallet UI shows for the connected
//! account: native SOL first, then the known stablecoins, then every
//! other token held.
//!
//! # Architecture
//!
//! This crate provides:
//! - **balances**: Asset list merging, known-token table, refresh tracker
//! - **api**: `AssetProvider` capability and the Solana JSON-RPC client
//! - **display**: Button label, short address, row formatting
//! - **ffi**: C-ABI exports for host UI integration
//! - **utils**: Logging, HTTP client setup, network configuration
//!
//! # FFI Usage
//!
//! All public FFI functions are in the `ffi` module and follow this pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `assets_free_string`)
//!
//! # Example
//!
//! ```rust,ignore
//! use wallet_assets::{default_known_tokens, fetch_asset_list, Network, NetworkConfig, SolanaRpcProvider};
//!
//! let config = NetworkConfig::from_env()?;
//! let provider = SolanaRpcProvider::for_network(&config, Network::Devnet)?;
//! let assets = fetch_asset_list(&owner, &provider, &default_known_tokens()).await?;
//! for asset in &assets {
//!     println!("{} {:.4}", asset.symbol, asset.amount);
//! }
//! ```

pub mod error;
pub mod types;
pub mod api;
pub mod balances;
pub mod display;
pub mod ffi;
pub mod utils;

// Re-export key types for convenience
pub use error::{AssetsError, AssetsResult, ErrorCode};
pub use types::*;

pub use api::{fetch_assets, AssetProvider, SolanaRpcProvider};
pub use balances::{
    build_asset_list, compute_asset_list, default_known_tokens, fetch_asset_list,
    load_asset_state, AssetTracker, BalanceAggregator, KnownToken, RefreshTicket, RefreshTrigger,
    TrackerSnapshot,
};
pub use utils::network_config::NetworkConfig;

// Re-export FFI functions at crate root
pub use ffi::{assets_fetch_list, assets_free_string, assets_short_address};
