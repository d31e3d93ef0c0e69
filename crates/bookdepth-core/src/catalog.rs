//! Static venue catalog.
//!
//! Maps each venue to its display label and the symbol it uses for the
//! common coins. Deribit lists no SOL instrument.

use crate::types::Venue;

struct VenueEntry {
    venue: Venue,
    label: &'static str,
    symbols: &'static [(&'static str, &'static str)],
}

const CATALOG: &[VenueEntry] = &[
    VenueEntry {
        venue: Venue::Binance,
        label: "Binance",
        symbols: &[("BTC", "BTCUSDT"), ("ETH", "ETHUSDT"), ("SOL", "SOLUSDT")],
    },
    VenueEntry {
        venue: Venue::Okx,
        label: "OKX",
        symbols: &[("BTC", "BTC-USDT"), ("ETH", "ETH-USDT"), ("SOL", "SOL-USDT")],
    },
    VenueEntry {
        venue: Venue::Bybit,
        label: "Bybit",
        symbols: &[("BTC", "BTCUSDT"), ("ETH", "ETHUSDT"), ("SOL", "SOLUSDT")],
    },
    VenueEntry {
        venue: Venue::Deribit,
        label: "Deribit",
        symbols: &[("BTC", "BTC-PERPETUAL"), ("ETH", "ETH-PERPETUAL")],
    },
];

fn entry(venue: Venue) -> &'static VenueEntry {
    // CATALOG covers every Venue variant.
    CATALOG
        .iter()
        .find(|e| e.venue == venue)
        .expect("venue missing from catalog")
}

/// Human-readable venue label.
pub fn label(venue: Venue) -> &'static str {
    entry(venue).label
}

/// Default instrument symbol for a venue and coin.
///
/// Falls back to the venue's first listed symbol when the coin is not
/// offered there, and `None` only for a venue with an empty symbol table.
pub fn default_symbol(venue: Venue, coin: &str) -> Option<&'static str> {
    let e = entry(venue);
    let coin = coin.trim().to_uppercase();
    e.symbols
        .iter()
        .find(|(c, _)| *c == coin)
        .or_else(|| e.symbols.first())
        .map(|(_, s)| *s)
}

/// Coins listed for a venue.
pub fn available_coins(venue: Venue) -> Vec<&'static str> {
    entry(venue).symbols.iter().map(|(c, _)| *c).collect()
}

/// Distinct coins across all venues, in first-seen order.
pub fn all_coins() -> Vec<&'static str> {
    let mut coins = Vec::new();
    for e in CATALOG {
        for (coin, _) in e.symbols {
            if !coins.contains(coin) {
                coins.push(*coin);
            }
        }
    }
    coins
}
