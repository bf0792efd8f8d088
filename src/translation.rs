use crate::errors::{FeedError, FeedResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

/// Single-string translation.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target`. No retries; callers own the
    /// fallback policy.
    async fn translate(&self, text: &str, source: &str, target: &str) -> FeedResult<String>;
}

/// Translation service response
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
    #[serde(default)]
    alternatives: Vec<String>,
    #[serde(rename = "detectedLanguage", default)]
    detected_language: Option<DetectedLanguage>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct DetectedLanguage {
    confidence: f64,
    language: String,
}

/// HTTP client for a LibreTranslate-compatible endpoint.
pub struct TranslationClient {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: String,
}

impl TranslationClient {
    /// `base_url` is the service root; requests go to `{base_url}/translate`.
    /// A missing URL is reported on every call instead of at construction.
    pub fn new(
        client: reqwest::Client,
        base_url: Option<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Translator for TranslationClient {
    async fn translate(&self, text: &str, source: &str, target: &str) -> FeedResult<String> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| FeedError::Translation("TRANSLATE_API_URL is not set".to_string()))?;

        debug!("Translating {} chars {} -> {}", text.len(), source, target);

        let form = [
            ("q", text),
            ("source", source),
            ("target", target),
            ("format", "text"),
            ("api_key", self.api_key.as_str()),
        ];

        let response = self
            .client
            .post(format!("{}/translate", base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| FeedError::Translation(format!("Failed to translate. Details: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeedError::Translation(format!(
                "Failed to translate. Details: {}",
                status
            )));
        }

        let body: TranslateResponse = response.json().await.map_err(|e| {
            FeedError::Translation(format!(
                "Failed to parse translate response. Details: {}",
                e
            ))
        })?;

        Ok(body.translated_text)
    }
}
