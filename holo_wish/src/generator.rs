//! Wish generation with fallbacks.

use tracing::{debug, error, info};

use crate::config::WishConfig;
use crate::gemini::GeminiClient;
use crate::WishError;

/// Returned when no API key is configured.
pub const NO_CREDENTIAL_WISH: &str = "Happy Holidays! (Add API Key for AI wishes)";
/// Returned when the request fails for any reason.
pub const FAILED_REQUEST_WISH: &str = "May your days be merry and bright!";

// ════════════════════════════════════════════════════════════════════════════
// TextGenerator
// ════════════════════════════════════════════════════════════════════════════

/// Anything that turns `(model, prompt)` into text.
pub trait TextGenerator: Send {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, WishError>;
}

pub fn wish_prompt(theme: &str) -> String {
    format!(
        "Write a very short, magical, and poetic holiday wish (max 10 words) \
         based on the theme: {}. Do not use quotes.",
        theme
    )
}

// ════════════════════════════════════════════════════════════════════════════
// WishGenerator
// ════════════════════════════════════════════════════════════════════════════

pub struct WishGenerator {
    /// `None` when no credential is configured.
    backend: Option<Box<dyn TextGenerator>>,
    model:   String,
}

impl WishGenerator {
    pub fn new(backend: Option<Box<dyn TextGenerator>>, model: impl Into<String>) -> Self {
        WishGenerator { backend, model: model.into() }
    }

    /// Gemini-backed generator, or a fallback-only one when `cfg` has no key.
    pub fn from_config(cfg: &WishConfig) -> Result<Self, WishError> {
        let backend: Option<Box<dyn TextGenerator>> = match &cfg.api_key {
            Some(key) => Some(Box::new(GeminiClient::new(&cfg.endpoint, key)?)),
            None => {
                info!("no text-generation API key configured; wishes use the fallback text");
                None
            }
        };
        Ok(Self::new(backend, cfg.model.clone()))
    }

    pub fn has_credential(&self) -> bool { self.backend.is_some() }

    pub fn model(&self) -> &str { &self.model }

    /// Always yields a displayable string.
    pub fn generate_wish(&self, theme: &str) -> String {
        let Some(backend) = &self.backend else {
            return NO_CREDENTIAL_WISH.to_string();
        };

        debug!(theme, model = %self.model, "requesting wish");
        match backend.generate(&self.model, &wish_prompt(theme)) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                error!("text generation error: {}", WishError::EmptyResponse);
                FAILED_REQUEST_WISH.to_string()
            }
            Err(e) => {
                error!("text generation error: {}", e);
                FAILED_REQUEST_WISH.to_string()
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
