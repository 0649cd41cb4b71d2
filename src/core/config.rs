//! Credential and endpoint resolution.
//!
//! Everything comes from the environment: the catalog API wants a service
//! access token, the annotator wants an OpenAI key. A missing catalog token
//! is fatal at startup — we never send an unauthenticated request.

use crate::error::{Error, Result};

pub const TOKEN_ENV: &str = "RUDDERSTACK_API_KEY";
pub const BASE_URL_ENV: &str = "TRACKLINT_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.rudderstack.com/v2";

pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_URL_ENV: &str = "TRACKLINT_OPENAI_URL";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Connection settings for the catalog API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let token = token.into();

        if token.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "token",
                None,
                "API token is empty",
            ));
        }
        if base_url.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "base_url",
                None,
                "Base URL is empty",
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Resolve from the environment. Missing token is a fatal startup error.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::config_missing_credential(TOKEN_ENV).with_hint(format!(
                    "Create a service access token in your workspace settings and run: export {}=<token>",
                    TOKEN_ENV
                ))
            })?;

        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self::new(base_url, token)
    }
}

/// Connection settings for the LLM annotator.
#[derive(Debug, Clone)]
pub struct AnnotateConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

impl AnnotateConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(OPENAI_KEY_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::config_missing_credential(OPENAI_KEY_ENV)
                    .with_hint(format!("export {}=<key> to enable annotation", OPENAI_KEY_ENV))
            })?;

        let endpoint =
            std::env::var(OPENAI_URL_ENV).unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string());

        Ok(Self {
            endpoint,
            api_key,
            model: DEFAULT_OPENAI_MODEL.to_string(),
        })
    }
}
