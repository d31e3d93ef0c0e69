//! Derived datasets for the 3D renderer.
//!
//! Surface mode reconstructs a price x quantity x time occupancy grid;
//! pressure mode flattens every bid occurrence into a point cloud. Both
//! express time as seconds elapsed since the earliest retained frame.

use bookdepth_core::Frame;
use serde::Serialize;
use std::collections::HashMap;

/// Price x quantity grid of last-seen elapsed seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurfaceDataset {
    /// Sorted distinct bucketed prices.
    pub x: Vec<f64>,
    /// Sorted distinct bucketed quantities.
    pub y: Vec<f64>,
    /// `z[i][j]` = elapsed seconds of the most recent frame containing the
    /// pair `(x[j], y[i])`, or 0 when no frame ever did.
    pub z: Vec<Vec<f64>>,
    /// Timestamp of the earliest retained frame.
    pub start_ts: Option<i64>,
}

/// Point cloud of every (frame, bid) occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PressureDataset {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub zs: Vec<f64>,
    pub start_ts: Option<i64>,
}

impl PressureDataset {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

fn sorted_distinct(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.into_iter().collect();
    out.sort_unstable_by(f64::total_cmp);
    out.dedup_by(|a, b| a.to_bits() == b.to_bits());
    out
}

/// Build the occupancy surface.
///
/// One pass oldest to newest with a last-write-wins map gives each grid
/// cell the timestamp of the most recent frame containing that exact
/// (price, qty) pair.
pub fn build_surface(frames: &[Frame]) -> SurfaceDataset {
    let Some(first) = frames.first() else {
        return SurfaceDataset::default();
    };
    let start_ts = first.ts;

    let mut latest: HashMap<(u64, u64), i64> = HashMap::new();
    for frame in frames {
        for bid in &frame.bids {
            latest.insert(bid.key(), frame.ts);
        }
    }

    let x = sorted_distinct(frames.iter().flat_map(|f| f.bids.iter().map(|b| b.price)));
    let y = sorted_distinct(frames.iter().flat_map(|f| f.bids.iter().map(|b| b.qty)));

    let z = y
        .iter()
        .map(|qty| {
            x.iter()
                .map(|price| {
                    latest
                        .get(&(price.to_bits(), qty.to_bits()))
                        .map(|ts| (ts - start_ts) as f64 / 1000.0)
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    SurfaceDataset {
        x,
        y,
        z,
        start_ts: Some(start_ts),
    }
}

/// Flatten every bid occurrence into parallel arrays, no deduplication.
pub fn build_pressure(frames: &[Frame]) -> PressureDataset {
    let Some(first) = frames.first() else {
        return PressureDataset::default();
    };
    let start_ts = first.ts;

    let mut out = PressureDataset {
        start_ts: Some(start_ts),
        ..Default::default()
    };
    for frame in frames {
        let t = frame.elapsed_secs(start_ts);
        for bid in &frame.bids {
            out.xs.push(bid.price);
            out.ys.push(bid.qty);
            out.zs.push(t);
        }
    }
    out
}

/// Collect every occurrence whose price exactly equals `price`
/// (post-bucketing equality). `None` when nothing matches.
pub fn build_search_highlight(frames: &[Frame], price: f64) -> Option<PressureDataset> {
    let first = frames.first()?;
    let start_ts = first.ts;

    let mut out = PressureDataset {
        start_ts: Some(start_ts),
        ..Default::default()
    };
    for frame in frames {
        let t = frame.elapsed_secs(start_ts);
        for bid in &frame.bids {
            if bid.price == price {
                out.xs.push(bid.price);
                out.ys.push(bid.qty);
                out.zs.push(t);
            }
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
