//! Core error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown venue: {0}")]
    UnknownVenue(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
