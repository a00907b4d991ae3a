use holo_wish::WishError;
use thiserror::Error;

/// Failures that prevent the application from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not open window: {0}")]
    Window(#[from] minifb::Error),

    #[error("could not set up wish generation: {0}")]
    Wish(#[from] WishError),
}
