//! Shared types for the wallet assets core
//!
//! All data structures that cross module boundaries are defined here
//! for consistent serialization and FFI compatibility.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier and symbol used for the native coin
pub const NATIVE_SYMBOL: &str = "SOL";

// =============================================================================
// Network Types
// =============================================================================

/// Selectable Solana clusters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    #[default]
    Devnet,
    MainnetBeta,
}

impl Network {
    pub fn all() -> [Network; 2] {
        [Network::Devnet, Network::MainnetBeta]
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Network::Devnet => "https://api.devnet.solana.com",
            Network::MainnetBeta => "https://solana-rpc.publicnode.com",
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Devnet)
    }

    /// The other side of the two-way network selector
    pub fn toggle(&self) -> Network {
        match self {
            Network::Devnet => Network::MainnetBeta,
            Network::MainnetBeta => Network::Devnet,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Network::Devnet => "Devnet",
            Network::MainnetBeta => "Mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Devnet => write!(f, "devnet"),
            Network::MainnetBeta => write!(f, "mainnet-beta"),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "devnet" | "dev" => Ok(Network::Devnet),
            "mainnet" | "mainnet-beta" | "main" => Ok(Network::MainnetBeta),
            _ => Err(format!("Unknown network: {}", s)),
        }
    }
}

// =============================================================================
// Asset Types
// =============================================================================

/// Opaque token identity: the native coin or an SPL mint address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum AssetId {
    Native,
    Mint(String),
}

impl AssetId {
    pub fn mint(mint: impl Into<String>) -> Self {
        AssetId::Mint(mint.into())
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AssetId::Native)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssetId::Native => NATIVE_SYMBOL,
            AssetId::Mint(mint) => mint,
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        match id {
            AssetId::Native => NATIVE_SYMBOL.to_string(),
            AssetId::Mint(mint) => mint,
        }
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        if s == NATIVE_SYMBOL {
            AssetId::Native
        } else {
            AssetId::Mint(s)
        }
    }
}

/// Display record for one held (or always-shown) asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub identifier: AssetId,
    pub symbol: String,
    /// UI amount, already adjusted for the token's decimals
    pub amount: f64,
}

impl Asset {
    pub fn native(amount: f64) -> Self {
        Self {
            identifier: AssetId::Native,
            symbol: NATIVE_SYMBOL.to_string(),
            amount,
        }
    }

    pub fn token(mint: impl Into<String>, symbol: impl Into<String>, amount: f64) -> Self {
        Self {
            identifier: AssetId::Mint(mint.into()),
            symbol: symbol.into(),
            amount,
        }
    }
}

/// One fungible-token balance as reported by the RPC provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub mint: String,
    /// Decimal-adjusted amount
    pub amount: f64,
}

impl TokenHolding {
    pub fn new(mint: impl Into<String>, amount: f64) -> Self {
        Self {
            mint: mint.into(),
            amount,
        }
    }
}

/// What the rendering surface should show for the current session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AssetListState {
    /// No account connected; nothing was queried
    #[default]
    Disconnected,
    /// A refresh was triggered and has not resolved yet
    Loading,
    Loaded { assets: Vec<Asset> },
    Failed { error: crate::error::AssetsError },
}

impl AssetListState {
    /// The list to render. Empty for every state except `Loaded`.
    pub fn assets(&self) -> &[Asset] {
        match self {
            AssetListState::Loaded { assets } => assets,
            _ => &[],
        }
    }

    pub fn is_connected(&self) -> bool {
        !matches!(self, AssetListState::Disconnected)
    }

    pub fn into_assets(self) -> Vec<Asset> {
        match self {
            AssetListState::Loaded { assets } => assets,
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Asset list request (FFI and CLI entry points)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetListRequest {
    /// Base58 account; `None` means the wallet is disconnected
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub network: Network,
    /// Overrides the configured endpoint for `network`
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Asset list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetListResponse {
    pub network: Network,
    pub endpoint: String,
    pub connected: bool,
    #[serde(flatten)]
    pub state: AssetListState,
}

// =============================================================================
// API Response Wrapper
// =============================================================================

/// Standard API response wrapper for FFI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<crate::error::AssetsError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: crate::error::AssetsError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"internal","message":"Serialization failed"}}"#.to_string()
        })
    }
}
