//! Balance Aggregation Module
//!
//! Known-token table, asset list merging, and the per-session tracker
//! that keeps stale fetches out of the displayed list.

pub mod aggregator;
pub mod tokens;
pub mod tracker;

pub use aggregator::*;
pub use tokens::{default_known_tokens, KnownToken};
pub use tracker::*;
