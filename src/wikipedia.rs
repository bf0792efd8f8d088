//! Upstream featured-content client and the raw payload model.
//!
//! Reference: <https://api.wikimedia.org/wiki/Feed_API/Reference/Featured_content>

use crate::errors::{FeedError, FeedResult};
use crate::feed_date::FeedDate;
use crate::i18n::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Upstream response for one (language, date).
///
/// Every slot is optional and kept as raw JSON so that a malformed slot can be
/// rejected by the normalizer without discarding its siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeedPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfa: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mostread: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onthisday: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<Value>,
}

// ==================== Slot shapes ====================

/// Page summary, shared by the featured article, most-read entries and the
/// pages linked from events and news stories.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    pub title: String,
    #[serde(default)]
    pub pageid: Option<u64>,
    #[serde(default)]
    pub normalizedtitle: Option<String>,
    #[serde(default)]
    pub titles: Option<RawTitles>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<RawThumbnail>,
    pub content_urls: RawContentUrls,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTitles {
    pub normalized: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawThumbnail {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContentUrls {
    pub desktop: RawPageUrl,
    pub mobile: RawPageUrl,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPageUrl {
    pub page: String,
}

/// Picture of the day.
#[derive(Debug, Clone, Deserialize)]
pub struct RawImage {
    pub title: String,
    pub file_page: String,
    #[serde(default)]
    pub thumbnail: Option<RawThumbnail>,
    #[serde(default)]
    pub description: Option<RawImageDescription>,
    #[serde(default)]
    pub wb_entity_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawImageDescription {
    pub text: String,
}

/// Most-read container. Entries stay raw so each can fail on its own.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMostRead {
    pub articles: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOnThisDayEvent {
    pub text: String,
    pub year: i32,
    pub pages: Vec<RawPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNewsStory {
    #[serde(default)]
    pub story: Option<String>,
    pub links: Vec<RawPage>,
}

// ==================== Client ====================

/// Source of raw featured-content payloads.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the raw payload for `language` on `date`. No retries.
    async fn fetch_feed(&self, language: Language, date: FeedDate) -> FeedResult<RawFeedPayload>;
}

/// HTTP client for the Wikimedia feed API.
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
    debug_dump_dir: Option<PathBuf>,
}

impl WikipediaClient {
    /// `base_url` is the `.../feed/v1/wikipedia` prefix, without trailing slash.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            debug_dump_dir: None,
        }
    }

    /// Write every raw response into `dir` for inspection.
    pub fn with_debug_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dump_dir = Some(dir.into());
        self
    }

    pub fn feed_url(&self, language: Language, date: FeedDate) -> String {
        format!(
            "{}/{}/featured/{}",
            self.base_url,
            language.code(),
            date.path()
        )
    }

    async fn dump_payload(&self, language: Language, date: FeedDate, url: &str, body: &Value) {
        let Some(dir) = &self.debug_dump_dir else {
            return;
        };

        let path = dir.join(format!("feed-{}-{}.json", language.code(), date.iso()));
        let contents = serde_json::json!({ "url": url, "response": body });
        let written = match serde_json::to_vec_pretty(&contents) {
            Ok(bytes) => tokio::fs::write(&path, bytes).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match written {
            Ok(()) => debug!("Dumped raw feed to {}", path.display()),
            Err(e) => warn!("Failed to dump raw feed to {}: {}", path.display(), e),
        }
    }
}

#[async_trait]
impl FeedSource for WikipediaClient {
    async fn fetch_feed(&self, language: Language, date: FeedDate) -> FeedResult<RawFeedPayload> {
        let url = self.feed_url(language, date);
        info!("Fetching featured feed: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            FeedError::Upstream(format!("Failed to fetch Wikipedia feed. Details: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Upstream(format!(
                "Failed to fetch Wikipedia feed. Details: {} for {}",
                status, url
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            FeedError::Upstream(format!("Failed to parse Wikipedia feed. Details: {}", e))
        })?;

        self.dump_payload(language, date, &url, &body).await;

        serde_json::from_value(body).map_err(|e| {
            FeedError::Upstream(format!("Failed to parse Wikipedia feed. Details: {}", e))
        })
    }
}
