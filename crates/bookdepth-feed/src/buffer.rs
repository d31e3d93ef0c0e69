//! Rolling frame buffer.
//!
//! Append-only FIFO window over the most recent frames. Written by the
//! supervisor's output path, read concurrently by the aggregation pipeline;
//! frames are never edited once appended.

use bookdepth_core::Frame;
use parking_lot::RwLock;
use std::collections::VecDeque;

/// Bounded sequence of frames, insertion order = arrival order.
#[derive(Debug)]
pub struct FrameBuffer {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    frames: VecDeque<Frame>,
    max_frames: usize,
}

impl Inner {
    fn evict(&mut self) {
        while self.frames.len() > self.max_frames {
            self.frames.pop_front();
        }
    }
}

impl FrameBuffer {
    /// Create a buffer capped at `max_frames` (minimum 1).
    pub fn new(max_frames: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                frames: VecDeque::with_capacity(max_frames.max(1)),
                max_frames: max_frames.max(1),
            }),
        }
    }

    /// Append one frame, evicting the oldest when over capacity.
    pub fn append(&self, frame: Frame) {
        let mut inner = self.inner.write();
        inner.frames.push_back(frame);
        inner.evict();
    }

    /// Point-in-time copy of the window, oldest first.
    pub fn snapshot(&self) -> Vec<Frame> {
        self.inner.read().frames.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().frames.is_empty()
    }

    /// Drop all buffered frames (used on subscription change).
    pub fn clear(&self) {
        self.inner.write().frames.clear();
    }

    /// Adjust the cap, evicting oldest frames immediately when shrinking.
    pub fn set_capacity(&self, max_frames: usize) {
        let mut inner = self.inner.write();
        inner.max_frames = max_frames.max(1);
        inner.evict();
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().max_frames
    }
}
