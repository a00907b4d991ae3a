//! Gemini `generateContent` over blocking HTTP.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generator::TextGenerator;
use crate::WishError;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// GeminiClient
// ════════════════════════════════════════════════════════════════════════════

pub struct GeminiClient {
    http:     Client,
    endpoint: String,
    api_key:  String,
}

impl GeminiClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, WishError> {
        if api_key.trim().is_empty() {
            return Err(WishError::MissingCredential);
        }
        Ok(GeminiClient {
            http:     Client::builder().build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key:  api_key.trim().to_string(),
        })
    }

    pub fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, WishError> {
        let body = GenerateRequest {
            contents: [RequestContent { parts: [RequestPart { text: prompt }] }],
        };

        let resp = self.http
            .post(self.url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        let text   = resp.text()?;
        debug!(%status, bytes = text.len(), "text generation response");

        if !status.is_success() {
            return Err(WishError::Status { status: status.as_u16(), body: text });
        }
        extract_text(&text)
    }
}

/// Pull the first candidate's text out of a `generateContent` response body.
pub fn extract_text(body: &str) -> Result<String, WishError> {
    let resp: GenerateResponse = serde_json::from_str(body)?;

    let text: String = resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(WishError::EmptyResponse);
    }
    Ok(text.to_string())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected() {
        assert!(matches!(
            GeminiClient::new("https://example.invalid", "  "),
            Err(WishError::MissingCredential)
        ));
    }

    #[test]
    fn url_includes_model() {
        let c = GeminiClient::new("https://example.invalid/v1beta/", "k").unwrap();
        assert_eq!(
            c.url("gemini-2.5-flash"),
            "https://example.invalid/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: [RequestContent { parts: [RequestPart { text: "hi" }] }],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"contents":[{"parts":[{"text":"hi"}]}]}"#
        );
    }

    #[test]
    fn extracts_and_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":" Stars "},{"text":"glow "}],"role":"model"}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Stars glow");
    }

    #[test]
    fn no_candidates_is_empty() {
        assert!(matches!(extract_text(r#"{"candidates":[]}"#), Err(WishError::EmptyResponse)));
        assert!(matches!(extract_text("{}"), Err(WishError::EmptyResponse)));
    }

    #[test]
    fn candidate_without_content_is_empty() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert!(matches!(extract_text(body), Err(WishError::EmptyResponse)));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(extract_text("<html>"), Err(WishError::Decode(_))));
    }
}
