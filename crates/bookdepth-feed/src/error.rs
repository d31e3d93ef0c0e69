//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Unknown venue: {0}")]
    UnknownVenue(String),

    #[error("Empty symbol for venue {0}")]
    EmptySymbol(String),
}

pub type FeedResult<T> = Result<T, FeedError>;
