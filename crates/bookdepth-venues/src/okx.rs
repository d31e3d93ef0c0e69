//! OKX books5 adapter.
//!
//! Shared public endpoint with an explicit JSON subscribe naming the
//! channel and instrument. Depth rows are string arrays with extra
//! liquidation/order-count columns beyond price and quantity.

use crate::adapter::{parse_str_level, VenueAdapter};
use bookdepth_core::{epoch_ms_now, Frame, Venue};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const ENDPOINT: &str = "wss://ws.okx.com:8443/ws/v5/public";
const CHANNEL: &str = "books5";

#[derive(Debug, Deserialize)]
struct OkxMessage {
    #[serde(default)]
    data: Vec<OkxBook>,
}

#[derive(Debug, Deserialize)]
struct OkxBook {
    #[serde(default)]
    bids: Vec<Vec<String>>,
    /// Millisecond timestamp, string-encoded.
    #[serde(default)]
    ts: Option<String>,
}

pub struct OkxAdapter;

impl VenueAdapter for OkxAdapter {
    fn venue(&self) -> Venue {
        Venue::Okx
    }

    fn url(&self, symbol: &str) -> Option<String> {
        if symbol.trim().is_empty() {
            return None;
        }
        Some(ENDPOINT.to_string())
    }

    fn subscribe_message(&self, symbol: &str) -> Option<String> {
        let inst_id = symbol.trim();
        if inst_id.is_empty() {
            return None;
        }
        Some(
            json!({
                "op": "subscribe",
                "args": [{ "channel": CHANNEL, "instId": inst_id }]
            })
            .to_string(),
        )
    }

    fn parse(&self, raw: &Value) -> Option<Frame> {
        let msg: OkxMessage = match serde_json::from_value(raw.clone()) {
            Ok(m) => m,
            Err(e) => {
                debug!(error = %e, "Not an OKX book payload");
                return None;
            }
        };
        // Subscribe acks and events arrive without data.
        let book = msg.data.into_iter().next()?;

        let ts = book
            .ts
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or_else(epoch_ms_now);

        let bids: Vec<_> = book
            .bids
            .iter()
            .filter_map(|row| parse_str_level(row.first()?, row.get(1)?))
            .collect();

        if bids.is_empty() {
            return None;
        }
        Some(Frame::new(ts, Venue::Okx, bids))
    }
}
