//! Resilient WebSocket transport.
//!
//! Provides a venue-agnostic reconnecting socket:
//! - Automatic reconnection with capped exponential backoff
//! - Optional post-connect subscribe payload
//! - JSON payload decoding with malformed-message drop
//! - Idempotent cancellation that also aborts pending reconnect timers
//!
//! Retry policy lives here and only here; venue adapters never reconnect.

pub mod error;
pub mod socket;

pub use error::{WsError, WsResult};
pub use socket::{backoff_delay, ResilientSocket, SocketConfig, SocketHandle, SocketState};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
