//! Application loop.
//!
//! Wires the subscription supervisor, the rolling frame buffer, and the
//! aggregation pipeline together. Frames arriving from the live connection
//! land in the buffer and mark the recompute gate dirty; each eligible
//! recomputation runs the filter and aggregation stages and emits the
//! resulting dataset as one JSON line on stdout.

use crate::config::AppConfig;
use crate::error::AppResult;
use bookdepth_feed::{FrameBuffer, Supervisor};
use bookdepth_pipeline::{
    build_pressure, build_search_highlight, build_surface, filter_and_bucket, filter_by_venue,
    Mode, PressureDataset, RecomputeGate, SearchTerm, SurfaceDataset,
};
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One emitted recomputation result.
#[derive(Debug, Serialize)]
struct DatasetLine {
    mode: Mode,
    frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    surface: Option<SurfaceDataset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pressure: Option<PressureDataset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlight: Option<PressureDataset>,
}

pub struct Application {
    config: AppConfig,
    buffer: Arc<FrameBuffer>,
    gate: Arc<RecomputeGate>,
    supervisor: Supervisor,
    emitted: AtomicU64,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        let buffer = Arc::new(FrameBuffer::new(config.max_frames));
        let gate = Arc::new(RecomputeGate::new(Duration::from_millis(
            config.recompute_interval_ms,
        )));
        Self {
            config,
            buffer,
            gate,
            supervisor: Supervisor::new(),
            emitted: AtomicU64::new(0),
        }
    }

    /// Run until Ctrl-C.
    ///
    /// Historical mode opens no live connection and recomputes only over
    /// whatever the buffer already holds.
    pub async fn run(&mut self) -> AppResult<()> {
        self.run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Ctrl-C received, shutting down");
        })
        .await
    }

    async fn run_until<F>(&mut self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();

        if self.config.mode == Mode::Historical {
            info!("Historical mode, no live connection");
        } else {
            let symbol = self.config.resolved_symbol()?;
            self.supervisor
                .subscribe(&self.config.venue, &symbol, frame_tx)?;
        }

        let buffer = Arc::clone(&self.buffer);
        let gate = Arc::clone(&self.gate);
        let ingest = tokio::spawn(async move {
            while let Some(frame) = frame_rx.recv().await {
                buffer.append(frame);
                gate.mark_dirty();
            }
            debug!("Frame channel closed");
        });

        // An empty window is itself a reportable state: prime one
        // recompute so historical mode and a quiet startup emit it
        // without waiting for a first frame.
        self.gate.mark_dirty();

        info!(mode = ?self.config.mode, "Entering main loop");
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = self.gate.ready() => {
                    self.recompute();
                }
            }
        }

        self.supervisor.close();
        ingest.abort();
        info!(datasets = self.emitted.load(Ordering::Relaxed), "Main loop ended");
        Ok(())
    }

    /// Run the filter and aggregation stages over the current window and
    /// emit the dataset.
    fn recompute(&self) {
        let frames = self.buffer.snapshot();
        let params = self.config.filter_params();
        let now_ms = bookdepth_core::epoch_ms_now();

        let mut filtered = filter_and_bucket(&frames, &params, now_ms);
        let mut highlight = None;
        match SearchTerm::parse(&self.config.search) {
            SearchTerm::None => {}
            SearchTerm::Price(price) => {
                highlight = build_search_highlight(&filtered, price);
            }
            SearchTerm::VenueSubstring(needle) => {
                filtered = filter_by_venue(&filtered, &needle);
            }
        }

        if filtered.is_empty() {
            warn!("No data in the current window");
        }

        let line = match self.config.mode {
            Mode::Realtime | Mode::Historical => {
                let surface = build_surface(&filtered);
                debug!(
                    prices = surface.x.len(),
                    qtys = surface.y.len(),
                    frames = filtered.len(),
                    "Surface recomputed"
                );
                DatasetLine {
                    mode: self.config.mode,
                    frames: filtered.len(),
                    surface: Some(surface),
                    pressure: None,
                    highlight,
                }
            }
            Mode::Pressure => {
                let pressure = build_pressure(&filtered);
                debug!(points = pressure.len(), "Pressure cloud recomputed");
                DatasetLine {
                    mode: self.config.mode,
                    frames: filtered.len(),
                    surface: None,
                    pressure: Some(pressure),
                    highlight,
                }
            }
        };

        match serde_json::to_string(&line) {
            Ok(json) => {
                println!("{json}");
                self.emitted.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => warn!(error = %e, "Failed to serialize dataset"),
        }
    }
}
