//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] bookdepth_feed::FeedError),

    #[error("Core error: {0}")]
    Core(#[from] bookdepth_core::CoreError),
}

pub type AppResult<T> = Result<T, AppError>;
