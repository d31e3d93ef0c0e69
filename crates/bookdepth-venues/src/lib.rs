//! Venue adapters.
//!
//! One adapter per exchange. An adapter knows how to build the connection
//! URL and subscribe handshake for its venue and how to normalize that
//! venue's depth payloads into `Frame`s. Adapters hold no cross-call state:
//! every message is a self-contained full snapshot.

pub mod adapter;
mod binance;
mod bybit;
mod deribit;
mod okx;

pub use adapter::{adapter_for, VenueAdapter};
pub use binance::BinanceAdapter;
pub use bybit::BybitAdapter;
pub use deribit::DeribitAdapter;
pub use okx::OkxAdapter;
