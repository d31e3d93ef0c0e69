//! Bybit v5 spot orderbook adapter.
//!
//! Shared public endpoint with a topic-string subscribe. Depth lives in
//! `data.b`; the millisecond timestamp is read from the book data when
//! present, then the envelope, then local receipt time.

use crate::adapter::{parse_str_level, VenueAdapter};
use bookdepth_core::{epoch_ms_now, Frame, Venue};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const ENDPOINT: &str = "wss://stream.bybit.com/v5/public/spot";
const DEPTH_LEVELS: u32 = 50;

#[derive(Debug, Deserialize)]
struct BybitMessage {
    #[serde(default)]
    data: Option<BybitBook>,
    #[serde(default)]
    ts: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct BybitBook {
    #[serde(default)]
    b: Vec<Vec<String>>,
    #[serde(default)]
    ts: Option<i64>,
}

pub struct BybitAdapter;

impl BybitAdapter {
    fn topic(symbol: &str) -> String {
        format!("orderbook.{DEPTH_LEVELS}.{}", symbol.trim().to_uppercase())
    }
}

impl VenueAdapter for BybitAdapter {
    fn venue(&self) -> Venue {
        Venue::Bybit
    }

    fn url(&self, symbol: &str) -> Option<String> {
        if symbol.trim().is_empty() {
            return None;
        }
        Some(ENDPOINT.to_string())
    }

    fn subscribe_message(&self, symbol: &str) -> Option<String> {
        if symbol.trim().is_empty() {
            return None;
        }
        Some(json!({ "op": "subscribe", "args": [Self::topic(symbol)] }).to_string())
    }

    fn parse(&self, raw: &Value) -> Option<Frame> {
        let msg: BybitMessage = match serde_json::from_value(raw.clone()) {
            Ok(m) => m,
            Err(e) => {
                debug!(error = %e, "Not a Bybit book payload");
                return None;
            }
        };
        // Subscribe acks carry no data.
        let book = msg.data?;

        let ts = book.ts.or(msg.ts).unwrap_or_else(epoch_ms_now);

        let bids: Vec<_> = book
            .b
            .iter()
            .filter_map(|row| parse_str_level(row.first()?, row.get(1)?))
            .collect();

        if bids.is_empty() {
            return None;
        }
        Some(Frame::new(ts, Venue::Bybit, bids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_topic_uppercases() {
        let msg = BybitAdapter.subscribe_message("btcusdt").unwrap();
        let value: Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(value["args"][0], "orderbook.50.BTCUSDT");
    }

    #[test]
    fn test_parse_book() {
        let raw = json!({
            "topic": "orderbook.50.BTCUSDT",
            "type": "snapshot",
            "ts": 1_700_000_000_500_i64,
            "data": {
                "s": "BTCUSDT",
                "b": [["101.3", "0.05"], ["101.1", "0.7"]],
                "a": [["101.5", "0.2"]]
            }
        });

        let frame = BybitAdapter.parse(&raw).unwrap();
        assert_eq!(frame.venue, Venue::Bybit);
        // Envelope ts used when the book carries none.
        assert_eq!(frame.ts, 1_700_000_000_500);
        assert_eq!(frame.bids.len(), 2);
    }

    #[test]
    fn test_parse_prefers_book_ts() {
        let raw = json!({
            "ts": 5,
            "data": { "b": [["101.3", "0.05"]], "ts": 9 }
        });
        assert_eq!(BybitAdapter.parse(&raw).unwrap().ts, 9);
    }

    #[test]
    fn test_parse_ack_is_none() {
        let ack = json!({ "success": true, "op": "subscribe", "conn_id": "abc" });
        assert!(BybitAdapter.parse(&ack).is_none());
    }
}
