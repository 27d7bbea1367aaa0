//! Known-Token Table
//!
//! Tokens that are always shown after the native coin, even at zero
//! balance, in the order listed here.

use serde::{Deserialize, Serialize};

/// SPL Token program; holdings are queried with this program filter
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

pub const USDT_MINT: &str = "Es9vMFrzaCERz2XZCbC7fvyz2f1xwChn56k97Y8E9t9k";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// A designated token: `mint` is matched exactly, never fuzzily
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownToken {
    pub mint: String,
    pub symbol: String,
}

impl KnownToken {
    pub fn new(mint: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            mint: mint.into(),
            symbol: symbol.into(),
        }
    }
}

/// USDT then USDC
pub fn default_known_tokens() -> Vec<KnownToken> {
    vec![
        KnownToken::new(USDT_MINT, "USDT"),
        KnownToken::new(USDC_MINT, "USDC"),
    ]
}

/// Exact-match symbol lookup
pub fn lookup_symbol<'a>(known: &'a [KnownToken], mint: &str) -> Option<&'a str> {
    known
        .iter()
        .find(|token| token.mint == mint)
        .map(|token| token.symbol.as_str())
}

/// Symbol for an arbitrary mint. Unrecognized mints are labelled with the
/// raw mint string.
pub fn resolve_symbol(known: &[KnownToken], mint: &str) -> String {
    lookup_symbol(known, mint).unwrap_or(mint).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    #[test]
    fn test_default_table_order() {
        let known = default_known_tokens();
        let symbols: Vec<&str> = known.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["USDT", "USDC"]);
    }

    #[test]
    fn test_table_entries_are_valid_pubkeys() {
        for token in default_known_tokens() {
            assert!(Pubkey::from_str(&token.mint).is_ok(), "{}", token.symbol);
        }
        assert!(Pubkey::from_str(TOKEN_PROGRAM_ID).is_ok());
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let known = default_known_tokens();
        assert_eq!(lookup_symbol(&known, USDC_MINT), Some("USDC"));
        assert_eq!(lookup_symbol(&known, &USDC_MINT.to_lowercase()), None);
        assert_eq!(lookup_symbol(&known, &USDC_MINT[..20]), None);
    }

    #[test]
    fn test_resolve_falls_back_to_raw_mint() {
        let known = default_known_tokens();
        let mint = "So11111111111111111111111111111111111111112";
        assert_eq!(resolve_symbol(&known, mint), mint);
        assert_eq!(resolve_symbol(&known, USDT_MINT), "USDT");
    }
}
