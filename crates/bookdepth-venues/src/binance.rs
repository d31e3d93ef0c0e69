//! Binance partial-depth adapter.
//!
//! Subscribe-by-path: the symbol and depth live in the URL, no handshake.
//! Payload shape: `{"bids": [["px","qty"], ...], ...}` with string numbers.
//! Binance sends no book timestamp on this stream, so the frame carries the
//! local receipt time.

use crate::adapter::{parse_str_level, VenueAdapter};
use bookdepth_core::{epoch_ms_now, Frame, Venue};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const DEPTH_LEVELS: u32 = 10;

#[derive(Debug, Deserialize)]
struct BinanceDepth {
    #[serde(default)]
    bids: Vec<Vec<String>>,
}

pub struct BinanceAdapter;

impl BinanceAdapter {
    /// Lowercase and strip separators so "ETH-USDT" / "eth_usdt" both
    /// become "ethusdt".
    fn clean_symbol(symbol: &str) -> String {
        symbol
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase()
    }
}

impl VenueAdapter for BinanceAdapter {
    fn venue(&self) -> Venue {
        Venue::Binance
    }

    fn url(&self, symbol: &str) -> Option<String> {
        let symbol = Self::clean_symbol(symbol);
        if symbol.is_empty() {
            return None;
        }
        Some(format!(
            "wss://stream.binance.com:9443/ws/{symbol}@depth{DEPTH_LEVELS}@100ms"
        ))
    }

    fn parse(&self, raw: &Value) -> Option<Frame> {
        let depth: BinanceDepth = match serde_json::from_value(raw.clone()) {
            Ok(d) => d,
            Err(e) => {
                debug!(error = %e, "Not a Binance depth payload");
                return None;
            }
        };

        let bids: Vec<_> = depth
            .bids
            .iter()
            .filter_map(|row| parse_str_level(row.first()?, row.get(1)?))
            .collect();

        if bids.is_empty() {
            return None;
        }
        Some(Frame::new(epoch_ms_now(), Venue::Binance, bids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_cleans_symbol() {
        let url = BinanceAdapter.url("ETH-USDT").unwrap();
        assert_eq!(
            url,
            "wss://stream.binance.com:9443/ws/ethusdt@depth10@100ms"
        );
    }

    #[test]
    fn test_no_subscribe_handshake() {
        assert!(BinanceAdapter.subscribe_message("BTCUSDT").is_none());
    }

    #[test]
    fn test_parse_depth() {
        let raw = json!({
            "lastUpdateId": 160,
            "bids": [["101.30", "0.05"], ["101.20", "1.50"]],
            "asks": [["101.40", "0.30"]]
        });

        let frame = BinanceAdapter.parse(&raw).unwrap();
        assert_eq!(frame.venue, Venue::Binance);
        assert_eq!(frame.bids.len(), 2);
        assert_eq!(frame.bids[0].price, 101.30);
        assert_eq!(frame.bids[1].qty, 1.50);
        assert!(frame.ts > 0);
    }

    #[test]
    fn test_parse_skips_bad_levels() {
        let raw = json!({ "bids": [["101.30", "0.05"], ["bogus", "1.0"], ["101.10"]] });
        let frame = BinanceAdapter.parse(&raw).unwrap();
        assert_eq!(frame.bids.len(), 1);
    }

    #[test]
    fn test_parse_empty_book_is_none() {
        assert!(BinanceAdapter.parse(&json!({ "bids": [] })).is_none());
        assert!(BinanceAdapter.parse(&json!({ "result": null, "id": 1 })).is_none());
    }
}
