//! Frame filtering and quantization.

use crate::params::FilterParams;
use bookdepth_core::{Bid, Frame};
use std::collections::HashSet;

/// Round `value` to the nearest multiple of `tick`.
///
/// A non-positive (or non-finite) tick disables bucketing and returns the
/// value unchanged. Idempotent for any fixed tick.
pub fn bucket(value: f64, tick: f64) -> f64 {
    if !tick.is_finite() || tick <= 0.0 {
        return value;
    }
    (value / tick).round() * tick
}

/// Reduce the frame window to bucketed, range-filtered frames.
///
/// Frames older than the time cutoff are dropped; within each retained
/// frame every bid is bucketed, bounds-checked, and deduplicated by exact
/// (price, qty) bucket with the first occurrence winning. Frames left with
/// no bids are dropped entirely. Order is preserved; pure and
/// deterministic for fixed inputs.
pub fn filter_and_bucket(frames: &[Frame], params: &FilterParams, now_ms: i64) -> Vec<Frame> {
    let Some(first) = frames.first() else {
        return Vec::new();
    };
    let start_ts = match params.time_window_ms {
        Some(window) => now_ms - window,
        None => first.ts,
    };

    frames
        .iter()
        .filter(|f| f.ts >= start_ts)
        .filter_map(|f| {
            let mut seen = HashSet::new();
            let bids: Vec<Bid> = f
                .bids
                .iter()
                .filter_map(|b| {
                    let bid = Bid::new(
                        bucket(b.price, params.price_tick),
                        bucket(b.qty, params.qty_tick),
                    );
                    if bid.price < params.price_min
                        || bid.price > params.price_max
                        || bid.qty < params.qty_min
                    {
                        return None;
                    }
                    seen.insert(bid.key()).then_some(bid)
                })
                .collect();

            if bids.is_empty() {
                None
            } else {
                Some(Frame::new(f.ts, f.venue, bids))
            }
        })
        .collect()
}

/// Retain frames whose venue id contains `needle`, case-insensitively.
///
/// Applied upstream of aggregation when the search term is not numeric.
pub fn filter_by_venue(frames: &[Frame], needle: &str) -> Vec<Frame> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return frames.to_vec();
    }
    frames
        .iter()
        .filter(|f| f.venue.id().contains(&needle))
        .cloned()
        .collect()
}
