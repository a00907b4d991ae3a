//! Text-generation settings.

pub const DEFAULT_MODEL:    &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked for the credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];
pub const ENDPOINT_VAR: &str = "HOLO_WISH_ENDPOINT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WishConfig {
    pub model:    String,
    pub endpoint: String,
    /// `None` means wishes fall back without a network call.
    pub api_key:  Option<String>,
}

impl Default for WishConfig {
    fn default() -> Self {
        WishConfig {
            model:    DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key:  None,
        }
    }
}

impl WishConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        WishConfig {
            api_key:  API_KEY_VARS.iter().find_map(|v| present(v)),
            endpoint: present(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            ..WishConfig::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_environment_has_no_key() {
        let cfg = WishConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, WishConfig::default());
    }

    #[test]
    fn api_key_wins_over_gemini_key() {
        let cfg = WishConfig::from_lookup(lookup(&[("API_KEY", "a"), ("GEMINI_API_KEY", "b")]));
        assert_eq!(cfg.api_key.as_deref(), Some("a"));
    }

    #[test]
    fn blank_key_falls_through() {
        let cfg = WishConfig::from_lookup(lookup(&[("API_KEY", "   "), ("GEMINI_API_KEY", "b")]));
        assert_eq!(cfg.api_key.as_deref(), Some("b"));

        let cfg = WishConfig::from_lookup(lookup(&[("API_KEY", "")]));
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn endpoint_override() {
        let cfg = WishConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "http://localhost:9999")]));
        assert_eq!(cfg.endpoint, "http://localhost:9999");
        assert_eq!(cfg.model, DEFAULT_MODEL);
    }
}
