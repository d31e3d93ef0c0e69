//! Deribit raw-book adapter.
//!
//! JSON-RPC style: subscribe via `public/subscribe` with a channel string,
//! notifications arrive under `params.data`. Depth rows are either numeric
//! `[price, amount]` arrays or objects with named fields, and numbers may
//! arrive as JSON numbers or strings.

use crate::adapter::VenueAdapter;
use bookdepth_core::{epoch_ms_now, Bid, Frame, Venue};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const ENDPOINT: &str = "wss://www.deribit.com/ws/api/v2";

#[derive(Debug, Deserialize)]
struct DeribitMessage {
    #[serde(default)]
    params: Option<DeribitParams>,
}

#[derive(Debug, Deserialize)]
struct DeribitParams {
    #[serde(default)]
    data: Option<DeribitBook>,
}

#[derive(Debug, Deserialize)]
struct DeribitBook {
    #[serde(default)]
    bids: Vec<DeribitLevel>,
    #[serde(default)]
    timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeribitLevel {
    Row(Vec<Value>),
    Named { price: Value, amount: Value },
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

impl DeribitLevel {
    fn to_bid(&self) -> Option<Bid> {
        match self {
            DeribitLevel::Row(row) => {
                Some(Bid::new(as_f64(row.first()?)?, as_f64(row.get(1)?)?))
            }
            DeribitLevel::Named { price, amount } => {
                Some(Bid::new(as_f64(price)?, as_f64(amount)?))
            }
        }
    }
}

pub struct DeribitAdapter;

impl DeribitAdapter {
    fn channel(instrument: &str) -> String {
        format!("book.{}.none.20.100ms", instrument.trim())
    }
}

impl VenueAdapter for DeribitAdapter {
    fn venue(&self) -> Venue {
        Venue::Deribit
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
        Some(
            json!({
                "jsonrpc": "2.0",
                "id": 42,
                "method": "public/subscribe",
                "params": { "channels": [Self::channel(symbol)] }
            })
            .to_string(),
        )
    }

    fn parse(&self, raw: &Value) -> Option<Frame> {
        let msg: DeribitMessage = match serde_json::from_value(raw.clone()) {
            Ok(m) => m,
            Err(e) => {
                debug!(error = %e, "Not a Deribit book payload");
                return None;
            }
        };
        // RPC responses (subscribe acks, heartbeats) carry no params.data.
        let book = msg.params?.data?;

        let ts = book.timestamp.unwrap_or_else(epoch_ms_now);

        let bids: Vec<_> = book.bids.iter().filter_map(DeribitLevel::to_bid).collect();

        if bids.is_empty() {
            return None;
        }
        Some(Frame::new(ts, Venue::Deribit, bids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_is_jsonrpc() {
        let msg = DeribitAdapter.subscribe_message("BTC-PERPETUAL").unwrap();
        let value: Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "public/subscribe");
        assert_eq!(
            value["params"]["channels"][0],
            "book.BTC-PERPETUAL.none.20.100ms"
        );
    }

    #[test]
    fn test_parse_array_rows() {
        let raw = json!({
            "jsonrpc": "2.0",
            "method": "subscription",
            "params": {
                "channel": "book.BTC-PERPETUAL.none.20.100ms",
                "data": {
                    "timestamp": 1_700_000_001_000_i64,
                    "bids": [[101.3, 0.05], [101.2, 0.4]],
                    "asks": [[101.5, 0.1]]
                }
            }
        });

        let frame = DeribitAdapter.parse(&raw).unwrap();
        assert_eq!(frame.venue, Venue::Deribit);
        assert_eq!(frame.ts, 1_700_000_001_000);
        assert_eq!(frame.bids.len(), 2);
        assert_eq!(frame.bids[0].price, 101.3);
    }

    #[test]
    fn test_parse_named_rows() {
        let raw = json!({
            "params": {
                "data": {
                    "timestamp": 7,
                    "bids": [{ "price": "101.3", "amount": "0.05" }]
                }
            }
        });

        let frame = DeribitAdapter.parse(&raw).unwrap();
        assert_eq!(frame.bids[0].price, 101.3);
        assert_eq!(frame.bids[0].qty, 0.05);
    }

    #[test]
    fn test_parse_rpc_response_is_none() {
        let ack = json!({ "jsonrpc": "2.0", "id": 42, "result": ["book.BTC-PERPETUAL.none.20.100ms"] });
        assert!(DeribitAdapter.parse(&ack).is_none());
    }
}
