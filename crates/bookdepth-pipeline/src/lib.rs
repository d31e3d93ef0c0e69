//! Aggregation pipeline.
//!
//! Turns the rolling frame window into renderer-ready datasets:
//! filter + bucket, then either a price-quantity-time surface grid or a
//! pressure point cloud, with an optional exact-price search highlight.
//! All stages are pure; the only async piece is the coalescing recompute
//! gate.

pub mod aggregate;
pub mod filter;
pub mod gate;
pub mod params;
pub mod search;

pub use aggregate::{build_pressure, build_search_highlight, build_surface, PressureDataset, SurfaceDataset};
pub use filter::{bucket, filter_and_bucket, filter_by_venue};
pub use gate::RecomputeGate;
pub use params::{time_range_ms, FilterParams, Mode, TIME_RANGES};
pub use search::SearchTerm;
