//! Rendering helpers
//!
//! Text the UI shows around the asset list: the wallet button label,
//! the short address, icons and the per-row amount format.

use crate::types::{Asset, AssetListState};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

pub const DISCONNECTED_PLACEHOLDER: &str = "No assets (disconnected)";
pub const LOADING_PLACEHOLDER: &str = "Loading assets...";
pub const FAILED_PLACEHOLDER: &str = "Failed to load assets";

const PLACEHOLDER_ICON: &str = "https://via.placeholder.com/20";

/// CoinGecko icon for a symbol, or a generic placeholder
pub fn icon_url(symbol: &str) -> &'static str {
    match symbol {
        "SOL" => "https://assets.coingecko.com/coins/images/4128/large/solana.png",
        "USDT" => "https://assets.coingecko.com/coins/images/325/large/Tether-logo.png",
        "USDC" => "https://assets.coingecko.com/coins/images/6319/large/USD_Coin_icon.png",
        _ => PLACEHOLDER_ICON,
    }
}

/// First four and last four characters of a base58 address
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Label of the wallet connect button
pub fn button_label(connecting: bool, account: Option<&Pubkey>) -> String {
    match (connecting, account) {
        (true, _) => "Connecting...".to_string(),
        (false, Some(account)) => short_address(&account.to_string()),
        (false, None) => "Connect Wallet".to_string(),
    }
}

pub fn format_amount(amount: f64) -> String {
    format!("{:.4}", amount)
}

/// One rendered list row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRow {
    pub key: String,
    pub label: String,
    pub icon: &'static str,
    pub amount: String,
}

impl From<&Asset> for AssetRow {
    fn from(asset: &Asset) -> Self {
        // Unlabelled tokens carry the full mint as symbol; shorten for display only
        let label = if asset.symbol == asset.identifier.as_str() && asset.symbol.len() > 12 {
            short_address(&asset.symbol)
        } else {
            asset.symbol.clone()
        };

        Self {
            key: asset.identifier.to_string(),
            label,
            icon: icon_url(&asset.symbol),
            amount: format_amount(asset.amount),
        }
    }
}

pub fn rows(assets: &[Asset]) -> Vec<AssetRow> {
    assets.iter().map(AssetRow::from).collect()
}

/// Plain-text rendering of the list area
pub fn render_lines(state: &AssetListState) -> Vec<String> {
    match state {
        AssetListState::Disconnected => vec![DISCONNECTED_PLACEHOLDER.to_string()],
        AssetListState::Loading => vec![LOADING_PLACEHOLDER.to_string()],
        AssetListState::Failed { error } => {
            vec![format!("{}: {}", FAILED_PLACEHOLDER, error.message)]
        }
        AssetListState::Loaded { assets } => {
            let rows = rows(assets);
            let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);

            let mut lines = vec!["Assets".to_string()];
            lines.extend(
                rows.iter()
                    .map(|row| format!("{:<width$}  {:>16}", row.label, row.amount, width = width)),
            );
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetsError;
    use std::str::FromStr;

    const OWNER: &str = "4Qkev8aNZcqFNSRhQzwyLMFSsi94jHqE8WNVTJzTP99F";

    #[test]
    fn test_short_address() {
        assert_eq!(short_address(OWNER), "4Qke...P99F");
        assert_eq!(short_address("abcdefgh"), "abcdefgh");
    }

    #[test]
    fn test_button_label() {
        let account = Pubkey::from_str(OWNER).unwrap();
        assert_eq!(button_label(true, Some(&account)), "Connecting...");
        assert_eq!(button_label(false, Some(&account)), "4Qke...P99F");
        assert_eq!(button_label(false, None), "Connect Wallet");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2.5), "2.5000");
        assert_eq!(format_amount(0.0), "0.0000");
        assert_eq!(format_amount(3.14159), "3.1416");
    }

    #[test]
    fn test_icons() {
        assert!(icon_url("SOL").contains("solana"));
        assert_eq!(icon_url("BONK"), PLACEHOLDER_ICON);
    }

    #[test]
    fn test_row_shortens_raw_mint_labels() {
        let mint = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
        let row = AssetRow::from(&Asset::token(mint, mint, 1.0));
        assert_eq!(row.label, "DezX...B263");
        assert_eq!(row.key, mint);
        assert_eq!(row.icon, PLACEHOLDER_ICON);

        let row = AssetRow::from(&Asset::native(2.5));
        assert_eq!(row.label, "SOL");
        assert_eq!(row.amount, "2.5000");
    }

    #[test]
    fn test_render_placeholders() {
        assert_eq!(
            render_lines(&AssetListState::Disconnected),
            vec![DISCONNECTED_PLACEHOLDER]
        );
        let failed = AssetListState::Failed {
            error: AssetsError::timeout("Asset fetch timed out"),
        };
        assert_eq!(
            render_lines(&failed),
            vec!["Failed to load assets: Asset fetch timed out"]
        );
    }

    #[test]
    fn test_render_loaded() {
        let state = AssetListState::Loaded {
            assets: vec![Asset::native(2.5), Asset::token("mint", "USDT", 0.0)],
        };
        let lines = render_lines(&state);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Assets");
        assert!(lines[1].starts_with("SOL "));
        assert!(lines[1].ends_with("2.5000"));
        assert!(lines[2].ends_with("0.0000"));
    }
}
