//! Subscription supervisor.
//!
//! Binds the adapter for the selected (venue, symbol) pair to one
//! `ResilientSocket`. Exactly one connection is live per supervisor;
//! re-subscribing or closing tears the previous one down first, so a new
//! connection never races a late message from the old one.

use crate::error::{FeedError, FeedResult};
use bookdepth_core::{Frame, Venue};
use bookdepth_venues::adapter_for;
use bookdepth_ws::{ResilientSocket, SocketConfig, SocketHandle};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

struct ActiveSubscription {
    venue: Venue,
    symbol: String,
    handle: SocketHandle,
    task: JoinHandle<()>,
}

/// Owns at most one live venue connection.
pub struct Supervisor {
    base_delay_ms: u64,
    max_delay_ms: u64,
    active: Option<ActiveSubscription>,
}

impl Supervisor {
    pub fn new() -> Self {
        let defaults = SocketConfig::default();
        Self {
            base_delay_ms: defaults.base_delay_ms,
            max_delay_ms: defaults.max_delay_ms,
            active: None,
        }
    }

    /// Subscribe to one (venue, symbol) pair, replacing any prior
    /// subscription.
    ///
    /// Configuration faults (unknown venue id, empty symbol) are reported
    /// synchronously and no connection is attempted. Normalized frames are
    /// forwarded through `frames` in arrival order, unbuffered.
    pub fn subscribe(
        &mut self,
        venue_id: &str,
        symbol: &str,
        frames: UnboundedSender<Frame>,
    ) -> FeedResult<()> {
        // The prior connection goes away regardless of whether the new
        // selection is valid, matching a selection-change teardown.
        self.close();

        let venue: Venue = venue_id
            .parse()
            .map_err(|_| FeedError::UnknownVenue(venue_id.to_string()))?;
        let adapter = adapter_for(venue);

        let url = adapter
            .url(symbol)
            .ok_or_else(|| FeedError::EmptySymbol(venue.to_string()))?;
        let subscribe = adapter.subscribe_message(symbol);

        let socket = ResilientSocket::new(SocketConfig {
            url,
            subscribe,
            base_delay_ms: self.base_delay_ms,
            max_delay_ms: self.max_delay_ms,
        });
        let handle = socket.handle();

        info!(venue = %venue, symbol, "Subscribing");

        let task = tokio::spawn(async move {
            let result = socket
                .run(move |raw| {
                    if let Some(frame) = adapter.parse(&raw) {
                        if frames.send(frame).is_err() {
                            warn!("Frame receiver dropped");
                        }
                    }
                })
                .await;
            if let Err(e) = result {
                error!(error = %e, "Connection task ended with error");
            }
        });

        self.active = Some(ActiveSubscription {
            venue,
            symbol: symbol.to_string(),
            handle,
            task,
        });
        Ok(())
    }

    /// Close the active connection, if any. Idempotent.
    pub fn close(&mut self) {
        if let Some(active) = self.active.take() {
            info!(venue = %active.venue, symbol = %active.symbol, "Closing subscription");
            active.handle.close();
            // The socket task exits on its own once the token fires; it is
            // detached here rather than awaited.
            drop(active.task);
        }
    }

    /// Currently subscribed (venue, symbol), if any.
    pub fn active(&self) -> Option<(Venue, &str)> {
        self.active
            .as_ref()
            .map(|a| (a.venue, a.symbol.as_str()))
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_unknown_venue_fails_synchronously() {
        let mut supervisor = Supervisor::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let err = supervisor.subscribe("kraken", "BTCUSDT", tx).unwrap_err();
        assert!(matches!(err, FeedError::UnknownVenue(v) if v == "kraken"));
        assert!(supervisor.active().is_none());
    }

    #[test]
    fn test_empty_symbol_fails_synchronously() {
        let mut supervisor = Supervisor::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let err = supervisor.subscribe("binance", "", tx).unwrap_err();
        assert!(matches!(err, FeedError::EmptySymbol(_)));
        assert!(supervisor.active().is_none());
    }

    #[test]
    fn test_close_without_subscription_is_noop() {
        let mut supervisor = Supervisor::new();
        supervisor.close();
        supervisor.close();
        assert!(supervisor.active().is_none());
    }

    #[tokio::test]
    async fn test_resubscribe_replaces_active() {
        let mut supervisor = Supervisor::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        supervisor.subscribe("binance", "BTCUSDT", tx.clone()).unwrap();
        let first = supervisor.active().map(|(v, s)| (v, s.to_string()));
        assert_eq!(first, Some((Venue::Binance, "BTCUSDT".to_string())));

        supervisor.subscribe("okx", "BTC-USDT", tx).unwrap();
        let second = supervisor.active().map(|(v, s)| (v, s.to_string()));
        assert_eq!(second, Some((Venue::Okx, "BTC-USDT".to_string())));

        supervisor.close();
        assert!(supervisor.active().is_none());
    }
}
