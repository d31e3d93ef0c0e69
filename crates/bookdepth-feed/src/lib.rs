//! Feed layer: binds venue adapters to resilient sockets and keeps the
//! rolling window of normalized frames.
//!
//! The `Supervisor` owns at most one live connection; the `FrameBuffer` is
//! the single piece of state shared between the ingestion path (writer)
//! and the aggregation path (readers).

pub mod buffer;
pub mod error;
pub mod supervisor;

pub use buffer::FrameBuffer;
pub use error::{FeedError, FeedResult};
pub use supervisor::Supervisor;
