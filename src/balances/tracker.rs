//! Asset List Tracker
//!
//! Owns the single result slot shown by the rendering surface and
//! decides which refresh result is allowed to land in it.
//!
//! Every trigger (connect, account change, network change) bumps a
//! generation counter and hands out a [`RefreshTicket`]. A result is
//! applied only if its ticket is still the latest; anything older is
//! dropped. Disconnect bumps the generation too, so in-flight results
//! for the old session are discarded.

use super::aggregator::BalanceAggregator;
use crate::api::AssetProvider;
use crate::error::{AssetsError, AssetsResult};
use crate::types::{AssetListState, Network};
use crate::{log_debug, log_info};
use solana_sdk::pubkey::Pubkey;
use std::sync::Mutex;

const MODULE: &str = "balances::tracker";

/// Why a refresh was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Connected,
    AccountChanged,
    NetworkChanged,
    Manual,
}

/// Handle for one refresh; only the newest ticket may apply its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
    pub account: Pubkey,
    pub network: Network,
    pub trigger: RefreshTrigger,
}

/// Point-in-time copy of the tracker state
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSnapshot {
    pub generation: u64,
    pub account: Option<Pubkey>,
    pub network: Network,
    pub state: AssetListState,
}

impl TrackerSnapshot {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

#[derive(Debug)]
struct TrackerInner {
    generation: u64,
    account: Option<Pubkey>,
    network: Network,
    state: AssetListState,
}

/// Session-scoped owner of the displayed asset list
#[derive(Debug)]
pub struct AssetTracker {
    inner: Mutex<TrackerInner>,
}

impl AssetTracker {
    pub fn new(network: Network) -> Self {
        Self {
            inner: Mutex::new(TrackerInner {
                generation: 0,
                account: None,
                network,
                state: AssetListState::Disconnected,
            }),
        }
    }

    fn lock(&self) -> AssetsResult<std::sync::MutexGuard<'_, TrackerInner>> {
        self.inner
            .lock()
            .map_err(|_| AssetsError::internal("Tracker lock poisoned"))
    }

    /// Bump the generation and mark the slot as loading
    fn begin(inner: &mut TrackerInner, account: Pubkey, trigger: RefreshTrigger) -> RefreshTicket {
        inner.generation += 1;
        inner.account = Some(account);
        inner.state = AssetListState::Loading;

        log_debug!(
            MODULE,
            "Refresh started",
            generation = inner.generation,
            account = account,
            network = inner.network,
        );

        RefreshTicket {
            generation: inner.generation,
            account,
            network: inner.network,
            trigger,
        }
    }

    /// Wallet connected (or reconnected)
    pub fn connect(&self, account: Pubkey) -> AssetsResult<RefreshTicket> {
        let mut inner = self.lock()?;
        Ok(Self::begin(&mut inner, account, RefreshTrigger::Connected))
    }

    /// Connected wallet switched account. Same account is a no-op.
    pub fn change_account(&self, account: Pubkey) -> AssetsResult<Option<RefreshTicket>> {
        let mut inner = self.lock()?;
        if inner.account == Some(account) {
            return Ok(None);
        }
        Ok(Some(Self::begin(&mut inner, account, RefreshTrigger::AccountChanged)))
    }

    /// Network selector changed. Only refreshes while connected.
    pub fn change_network(&self, network: Network) -> AssetsResult<Option<RefreshTicket>> {
        let mut inner = self.lock()?;
        if inner.network == network {
            return Ok(None);
        }
        inner.network = network;

        let account = inner.account;
        match account {
            Some(account) => Ok(Some(Self::begin(
                &mut inner,
                account,
                RefreshTrigger::NetworkChanged,
            ))),
            None => {
                // Invalidate anything still in flight for the old network
                inner.generation += 1;
                Ok(None)
            }
        }
    }

    /// Re-run the current session's fetch, if connected
    pub fn refresh(&self) -> AssetsResult<Option<RefreshTicket>> {
        let mut inner = self.lock()?;
        let account = inner.account;
        match account {
            Some(account) => Ok(Some(Self::begin(&mut inner, account, RefreshTrigger::Manual))),
            None => Ok(None),
        }
    }

    /// Wallet disconnected: clear the slot and cancel in-flight results
    pub fn disconnect(&self) -> AssetsResult<()> {
        let mut inner = self.lock()?;
        inner.generation += 1;
        inner.account = None;
        inner.state = AssetListState::Disconnected;
        log_info!(MODULE, "Disconnected", generation = inner.generation);
        Ok(())
    }

    /// Store `state` if `ticket` is still current. Returns whether it was applied.
    pub fn apply(&self, ticket: &RefreshTicket, state: AssetListState) -> AssetsResult<bool> {
        let mut inner = self.lock()?;

        if inner.generation != ticket.generation {
            log_debug!(
                MODULE,
                "Discarding stale result",
                ticket = ticket.generation,
                current = inner.generation,
            );
            return Ok(false);
        }

        inner.state = state;
        Ok(true)
    }

    /// Whether `ticket` would still be applied
    pub fn is_current(&self, ticket: &RefreshTicket) -> AssetsResult<bool> {
        Ok(self.lock()?.generation == ticket.generation)
    }

    /// Run the fetch for `ticket` and apply it if still current
    pub async fn run<P: AssetProvider>(
        &self,
        ticket: &RefreshTicket,
        aggregator: &BalanceAggregator,
        provider: &P,
    ) -> AssetsResult<bool> {
        let state = aggregator.load(Some(&ticket.account), provider).await;
        self.apply(ticket, state)
    }

    pub fn snapshot(&self) -> AssetsResult<TrackerSnapshot> {
        let inner = self.lock()?;
        Ok(TrackerSnapshot {
            generation: inner.generation,
            account: inner.account,
            network: inner.network,
            state: inner.state.clone(),
        })
    }

    pub fn network(&self) -> AssetsResult<Network> {
        Ok(self.lock()?.network)
    }
}

impl Default for AssetTracker {
    fn default() -> Self {
        Self::new(Network::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Asset;

    fn loaded(amount: f64) -> AssetListState {
        AssetListState::Loaded {
            assets: vec![Asset::native(amount)],
        }
    }

    #[test]
    fn test_starts_disconnected() {
        let tracker = AssetTracker::default();
        let snapshot = tracker.snapshot().unwrap();
        assert_eq!(snapshot.state, AssetListState::Disconnected);
        assert!(!snapshot.is_connected());
        assert_eq!(snapshot.network, Network::Devnet);
    }

    #[test]
    fn test_connect_then_apply() {
        let tracker = AssetTracker::default();
        let ticket = tracker.connect(Pubkey::new_unique()).unwrap();
        assert_eq!(tracker.snapshot().unwrap().state, AssetListState::Loading);

        assert!(tracker.apply(&ticket, loaded(1.0)).unwrap());
        assert_eq!(tracker.snapshot().unwrap().state, loaded(1.0));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let tracker = AssetTracker::default();
        let first = tracker.connect(Pubkey::new_unique()).unwrap();
        let second = tracker.change_account(Pubkey::new_unique()).unwrap().unwrap();

        assert!(tracker.apply(&second, loaded(2.0)).unwrap());
        assert!(!tracker.apply(&first, loaded(1.0)).unwrap());
        assert_eq!(tracker.snapshot().unwrap().state, loaded(2.0));
        assert!(!tracker.is_current(&first).unwrap());
    }

    #[test]
    fn test_disconnect_cancels_in_flight() {
        let tracker = AssetTracker::default();
        let ticket = tracker.connect(Pubkey::new_unique()).unwrap();
        tracker.disconnect().unwrap();

        assert!(!tracker.apply(&ticket, loaded(1.0)).unwrap());
        assert_eq!(tracker.snapshot().unwrap().state, AssetListState::Disconnected);
    }

    #[test]
    fn test_network_change_refreshes_only_when_connected() {
        let tracker = AssetTracker::default();
        assert!(tracker.change_network(Network::MainnetBeta).unwrap().is_none());
        assert_eq!(tracker.network().unwrap(), Network::MainnetBeta);

        let account = Pubkey::new_unique();
        tracker.connect(account).unwrap();
        let ticket = tracker.change_network(Network::Devnet).unwrap().unwrap();
        assert_eq!(ticket.network, Network::Devnet);
        assert_eq!(ticket.account, account);
        assert_eq!(ticket.trigger, RefreshTrigger::NetworkChanged);

        assert!(tracker.change_network(Network::Devnet).unwrap().is_none());
    }

    #[test]
    fn test_same_account_is_noop() {
        let tracker = AssetTracker::default();
        let account = Pubkey::new_unique();
        let ticket = tracker.connect(account).unwrap();
        assert!(tracker.change_account(account).unwrap().is_none());
        assert!(tracker.is_current(&ticket).unwrap());
    }

    #[test]
    fn test_manual_refresh() {
        let tracker = AssetTracker::default();
        assert!(tracker.refresh().unwrap().is_none());

        tracker.connect(Pubkey::new_unique()).unwrap();
        let ticket = tracker.refresh().unwrap().unwrap();
        assert_eq!(ticket.trigger, RefreshTrigger::Manual);
        assert_eq!(ticket.generation, 2);
    }
}
