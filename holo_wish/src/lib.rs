//! # holo_wish
//!
//! One short generated line of text for a theme, or a canned fallback
//! string. Generation never fails from the caller's point of view:
//!
//! * no API key configured → [`NO_CREDENTIAL_WISH`], without touching the network;
//! * request or decode failure → logged, then [`FAILED_REQUEST_WISH`].
//!
//! No retries, no caching, no rate limiting.
//!
//! ```rust,no_run
//! use holo_wish::{WishConfig, WishGenerator};
//!
//! let wishes = WishGenerator::from_config(&WishConfig::from_env()).unwrap();
//! println!("{}", wishes.generate_wish("Winter Wonder"));
//! ```

pub mod config;
pub mod gemini;
pub mod generator;

use thiserror::Error;

pub use config::{WishConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use gemini::GeminiClient;
pub use generator::{
    wish_prompt, TextGenerator, WishGenerator, FAILED_REQUEST_WISH, NO_CREDENTIAL_WISH,
};

#[derive(Debug, Error)]
pub enum WishError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("text generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text generation returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed text generation response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("text generation response contained no text")]
    EmptyResponse,
}
