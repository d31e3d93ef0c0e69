//! Core domain types for the bookdepth pipeline.
//!
//! Defines the normalized order-book snapshot (`Frame`), the venue
//! identifier and catalog, and the shared error type.

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{all_coins, available_coins, default_symbol};
pub use error::{CoreError, CoreResult};
pub use types::{epoch_ms_now, Bid, Frame, Venue};
