//! Normalized market data types.
//!
//! A `Frame` is one full order-book snapshot as reported by a venue.
//! Frames are immutable once constructed; adapters build a new frame per
//! message and never touch one they already emitted.

use crate::error::CoreError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Current wall-clock time in epoch milliseconds.
///
/// Used as the receipt timestamp for venues that do not supply one.
pub fn epoch_ms_now() -> i64 {
    Utc::now().timestamp_millis()
}

/// Supported exchange venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Binance,
    Okx,
    Bybit,
    Deribit,
}

impl Venue {
    /// All venues, in catalog order.
    pub const ALL: [Venue; 4] = [Venue::Binance, Venue::Okx, Venue::Bybit, Venue::Deribit];

    /// Stable lowercase identifier, used in config files and search terms.
    pub fn id(&self) -> &'static str {
        match self {
            Venue::Binance => "binance",
            Venue::Okx => "okx",
            Venue::Bybit => "bybit",
            Venue::Deribit => "deribit",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Venue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binance" => Ok(Venue::Binance),
            "okx" => Ok(Venue::Okx),
            "bybit" => Ok(Venue::Bybit),
            "deribit" => Ok(Venue::Deribit),
            other => Err(CoreError::UnknownVenue(other.to_string())),
        }
    }
}

/// One bid depth level: price and resting quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub price: f64,
    pub qty: f64,
}

impl Bid {
    pub fn new(price: f64, qty: f64) -> Self {
        Self { price, qty }
    }

    /// Bit-exact identity key for hashing and deduplication.
    ///
    /// Post-bucketing equality is defined on the exact f64 values, so the
    /// raw bit patterns are the right hash key.
    pub fn key(&self) -> (u64, u64) {
        (self.price.to_bits(), self.qty.to_bits())
    }
}

/// One normalized order-book snapshot from a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Exchange-supplied timestamp in epoch milliseconds, or local receipt
    /// time when the venue does not report one.
    pub ts: i64,
    /// Originating exchange.
    pub venue: Venue,
    /// Reported bid levels. Duplicate prices are not collapsed at ingestion.
    pub bids: Vec<Bid>,
}

impl Frame {
    pub fn new(ts: i64, venue: Venue, bids: Vec<Bid>) -> Self {
        Self { ts, venue, bids }
    }

    /// Seconds elapsed since `start_ts`.
    pub fn elapsed_secs(&self, start_ts: i64) -> f64 {
        (self.ts - start_ts) as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_roundtrip() {
        for venue in Venue::ALL {
            assert_eq!(venue.id().parse::<Venue>().unwrap(), venue);
        }
        assert_eq!("  BYBIT ".parse::<Venue>().unwrap(), Venue::Bybit);
    }

    #[test]
    fn test_unknown_venue_rejected() {
        let err = "kraken".parse::<Venue>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownVenue(v) if v == "kraken"));
    }

    #[test]
    fn test_venue_serde_lowercase() {
        let json = serde_json::to_string(&Venue::Okx).unwrap();
        assert_eq!(json, "\"okx\"");
        let back: Venue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Venue::Okx);
    }

    #[test]
    fn test_bid_key_is_bit_exact() {
        let a = Bid::new(101.5, 0.1);
        let b = Bid::new(101.5, 0.1);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), Bid::new(101.5, 0.2).key());
    }

    #[test]
    fn test_frame_elapsed() {
        let frame = Frame::new(1_500, Venue::Binance, vec![]);
        assert_eq!(frame.elapsed_secs(1_000), 0.5);
    }
}
