//! Reconnecting WebSocket wrapper.
//!
//! Owns one physical connection at a time and retries with exponential
//! backoff on unexpected closure. Decoded JSON payloads are forwarded to a
//! caller-supplied callback; everything venue-specific stays outside.

use crate::error::{WsError, WsResult};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Socket configuration.
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// WebSocket URL.
    pub url: String,
    /// Payload sent once per successful open, for venues that subscribe
    /// via an explicit handshake message.
    pub subscribe: Option<String>,
    /// Base delay for exponential backoff.
    pub base_delay_ms: u64,
    /// Maximum delay for exponential backoff.
    pub max_delay_ms: u64,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            subscribe: None,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
        }
    }
}

/// Socket lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    Connecting,
    Open,
    Reconnecting,
    Closed,
}

/// Backoff delay for the given reconnect attempt (1-based).
///
/// attempt=1 -> base, attempt=2 -> 2*base, ... capped at `max_ms`.
pub fn backoff_delay(base_ms: u64, max_ms: u64, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    let delay = base_ms.saturating_mul(1u64 << exponent);
    Duration::from_millis(delay.min(max_ms))
}

/// Handle for requesting socket shutdown.
///
/// `close` is idempotent; it also cancels a pending reconnect timer, and
/// any message still in flight after the request is discarded.
#[derive(Debug, Clone)]
pub struct SocketHandle {
    token: CancellationToken,
}

impl SocketHandle {
    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Reconnecting WebSocket connection.
pub struct ResilientSocket {
    config: SocketConfig,
    state: Arc<RwLock<SocketState>>,
    shutdown: CancellationToken,
}

impl ResilientSocket {
    pub fn new(config: SocketConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(SocketState::Connecting)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Get a close handle. Can be cloned and held across tasks.
    pub fn handle(&self) -> SocketHandle {
        SocketHandle {
            token: self.shutdown.clone(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SocketState {
        *self.state.read()
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Connect and run until the handle is closed.
    ///
    /// Every decoded text payload is passed to `on_message`. Transport
    /// faults are recovered here via backoff and never surfaced; the only
    /// early error is an empty URL.
    pub async fn run<F>(&self, mut on_message: F) -> WsResult<()>
    where
        F: FnMut(serde_json::Value) + Send,
    {
        if self.config.url.is_empty() {
            *self.state.write() = SocketState::Closed;
            return Err(WsError::EmptyUrl);
        }

        let mut attempt = 0u32;

        loop {
            if self.is_shutdown() {
                *self.state.write() = SocketState::Closed;
                return Ok(());
            }

            *self.state.write() = SocketState::Connecting;

            match self.try_connect(&mut attempt, &mut on_message).await {
                Ok(()) => info!(url = %self.config.url, "WebSocket session ended"),
                Err(e) => error!(error = %e, url = %self.config.url, "WebSocket session failed"),
            }

            if self.is_shutdown() {
                *self.state.write() = SocketState::Closed;
                return Ok(());
            }

            attempt += 1;
            *self.state.write() = SocketState::Reconnecting;

            let delay = backoff_delay(self.config.base_delay_ms, self.config.max_delay_ms, attempt);
            warn!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting");

            // Cancellation-aware backoff sleep: close() must not leave a
            // dangling reconnect timer.
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.shutdown.cancelled() => {
                    *self.state.write() = SocketState::Closed;
                    return Ok(());
                }
            }
        }
    }

    async fn try_connect<F>(&self, attempt: &mut u32, on_message: &mut F) -> WsResult<()>
    where
        F: FnMut(serde_json::Value) + Send,
    {
        info!(url = %self.config.url, "Connecting to WebSocket");

        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();

        *self.state.write() = SocketState::Open;
        *attempt = 0;
        info!(url = %self.config.url, "WebSocket connected");

        // Subscribe handshake failures are logged, not fatal: the server
        // may still close the connection itself, which reconnects normally.
        if let Some(subscribe) = &self.config.subscribe {
            debug!(payload = %subscribe, "Sending subscribe payload");
            if let Err(e) = write.send(Message::Text(subscribe.clone())).await {
                warn!(error = %e, "Failed to send subscribe payload");
            }
        }

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!(error = %e, "Failed to send Close frame during shutdown");
                    }
                    *self.state.write() = SocketState::Closed;
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            // Late messages racing a close request are discarded.
                            if self.is_shutdown() {
                                continue;
                            }
                            match serde_json::from_str::<serde_json::Value>(&text) {
                                Ok(value) => on_message(value),
                                Err(e) => {
                                    warn!(error = %e, "Discarding malformed payload");
                                }
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            debug!("Received ping, sending pong");
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1000, "Normal close".to_string()));
                            warn!(code, %reason, "WebSocket closed by server");
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket read error");
                            return Err(e.into());
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SocketConfig::default();
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.max_delay_ms, 30000);
        assert!(config.subscribe.is_none());
    }

    #[test]
    fn test_backoff_sequence() {
        let delays: Vec<u64> = (1..=8)
            .map(|a| backoff_delay(1000, 30000, a).as_millis() as u64)
            .collect();
        assert_eq!(
            delays,
            vec![1000, 2000, 4000, 8000, 16000, 30000, 30000, 30000]
        );
    }

    #[test]
    fn test_backoff_large_attempt_stays_capped() {
        assert_eq!(backoff_delay(1000, 30000, 40).as_millis(), 30000);
    }

    #[test]
    fn test_handle_close_is_idempotent() {
        let socket = ResilientSocket::new(SocketConfig::default());
        let handle = socket.handle();
        assert!(!handle.is_closed());
        handle.close();
        handle.close();
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let socket = ResilientSocket::new(SocketConfig::default());
        let result = socket.run(|_| {}).await;
        assert!(matches!(result, Err(WsError::EmptyUrl)));
        assert_eq!(socket.state(), SocketState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_pending_reconnect() {
        let socket = Arc::new(ResilientSocket::new(SocketConfig {
            // Connection-refused locally, so the run loop lands in backoff.
            url: "wss://127.0.0.1:9/ws".to_string(),
            ..Default::default()
        }));
        let handle = socket.handle();

        let runner = Arc::clone(&socket);
        let run_task = tokio::spawn(async move { runner.run(|_| {}).await });

        // Wait for the failed connect to reach the backoff sleep.
        tokio::time::timeout(Duration::from_secs(30), async {
            while socket.state() != SocketState::Reconnecting {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("first connect attempt should fail into backoff");

        handle.close();

        let result = tokio::time::timeout(Duration::from_secs(60), run_task)
            .await
            .expect("close must cancel the pending reconnect timer")
            .expect("socket task must not panic");
        assert!(result.is_ok());
        assert_eq!(socket.state(), SocketState::Closed);
    }

    #[tokio::test]
    async fn test_closed_before_run_exits_immediately() {
        let mut config = SocketConfig::default();
        config.url = "wss://example.invalid/ws".to_string();
        let socket = ResilientSocket::new(config);
        socket.handle().close();

        let result = socket.run(|_| panic!("no messages expected")).await;
        assert!(result.is_ok());
        assert_eq!(socket.state(), SocketState::Closed);
    }
}
