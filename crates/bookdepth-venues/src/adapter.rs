//! Adapter trait and registry.

use crate::{BinanceAdapter, BybitAdapter, DeribitAdapter, OkxAdapter};
use bookdepth_core::{Bid, Frame, Venue};
use serde_json::Value;
use tracing::debug;

/// Capability interface for one exchange integration.
///
/// Adapters are stateless and side-effect free; the connection layer owns
/// retries and the supervisor owns lifecycle.
pub trait VenueAdapter: Send + Sync {
    /// The venue this adapter serves.
    fn venue(&self) -> Venue;

    /// Connection URL for a symbol. `None` rejects an empty symbol rather
    /// than constructing an invalid request.
    fn url(&self, symbol: &str) -> Option<String>;

    /// Subscribe payload sent after open, for venues with an explicit
    /// handshake. Default: subscribe-by-path venues need none.
    fn subscribe_message(&self, _symbol: &str) -> Option<String> {
        None
    }

    /// Normalize one raw message into a frame.
    ///
    /// `None` means the message carried no usable depth (acks, heartbeats,
    /// unexpected shapes, empty bid lists).
    fn parse(&self, raw: &Value) -> Option<Frame>;
}

/// Resolve the adapter for a venue.
pub fn adapter_for(venue: Venue) -> &'static dyn VenueAdapter {
    match venue {
        Venue::Binance => &BinanceAdapter,
        Venue::Okx => &OkxAdapter,
        Venue::Bybit => &BybitAdapter,
        Venue::Deribit => &DeribitAdapter,
    }
}

/// Parse one string-encoded price/quantity level, skipping bad rows.
pub(crate) fn parse_str_level(px: &str, qty: &str) -> Option<Bid> {
    match (px.parse::<f64>(), qty.parse::<f64>()) {
        (Ok(price), Ok(qty)) => Some(Bid::new(price, qty)),
        _ => {
            debug!(px, qty, "Skipping unparseable depth level");
            None
        }
    }
}
