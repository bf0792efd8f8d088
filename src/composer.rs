//! Feed composer: the single entry point that turns a (language, date) request
//! into a cached, translated, labeled response.

use crate::cache::{cache_key, get_json, set_json, CacheStore, DEFAULT_CACHE_TTL_SECS};
use crate::errors::FeedResult;
use crate::fallback::FallbackEngine;
use crate::feed_date::FeedDate;
use crate::i18n::{badge_label, Badge, Language, LanguageRegistry, SECTION_LABEL};
use crate::normalize::{normalize_feed, ContentSlot, FeedContent};
use crate::translation::Translator;
use crate::wikipedia::FeedSource;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The outward-facing artifact returned to callers and stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedResponse {
    pub lang: String,
    pub date: String,
    pub section_label: String,
    pub badges: Vec<Badge>,
    pub content: FeedContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedLanguage {
    pub code: String,
    pub name: String,
}

/// Codes of every language a feed can be requested in, in registry order.
pub fn list_supported_languages() -> Vec<&'static str> {
    LanguageRegistry::get()
        .list_all()
        .into_iter()
        .map(|config| config.code)
        .collect()
}

/// Supported languages with their English names.
pub fn supported_language_details() -> Vec<SupportedLanguage> {
    LanguageRegistry::get()
        .list_all()
        .into_iter()
        .map(|config| SupportedLanguage {
            code: config.code.to_string(),
            name: config.name.to_string(),
        })
        .collect()
}

pub struct FeedComposer {
    feeds: Arc<dyn FeedSource>,
    translator: Arc<dyn Translator>,
    cache: Arc<dyn CacheStore>,
    fallback: FallbackEngine,
    cache_ttl_secs: u64,
}

impl FeedComposer {
    pub fn new(
        feeds: Arc<dyn FeedSource>,
        translator: Arc<dyn Translator>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            feeds,
            fallback: FallbackEngine::new(translator.clone()),
            translator,
            cache,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }

    pub fn with_cache_ttl(mut self, ttl_secs: u64) -> Self {
        self.cache_ttl_secs = ttl_secs;
        self
    }

    /// Compose the featured feed for `lang` on `year-month-day`.
    ///
    /// Fails only on an invalid request or when the target-language feed
    /// cannot be fetched. Everything else degrades: a missing English feed
    /// disables fallback, failed translations keep the original text, and
    /// cache errors are treated as misses.
    pub async fn compose_feed(
        &self,
        lang: &str,
        year: &str,
        month: &str,
        day: &str,
    ) -> FeedResult<ComposedResponse> {
        let date = FeedDate::parse(year, month, day)?;
        let language = Language::from_code(lang)?;
        let key = cache_key(language, date);

        if let Some(cached) = self.cached(&key).await {
            info!("Serving {} from cache", key);
            return Ok(cached);
        }

        info!(
            "Composing {} ({}) feed for {}",
            language.name(),
            language.code(),
            date
        );

        let baseline = Language::canonical();
        let (target, english) = if language == baseline {
            (self.feeds.fetch_feed(language, date).await, None)
        } else {
            let (target, english) = tokio::join!(
                self.feeds.fetch_feed(language, date),
                self.feeds.fetch_feed(baseline, date)
            );
            (target, Some(english))
        };

        let target = target.map_err(|e| {
            error!("Feed fetch for {} on {} failed: {}", language.code(), date, e);
            e
        })?;

        let content = normalize_feed(&target, language, date);
        let content = match english {
            None => content,
            Some(Ok(english)) => {
                let english = normalize_feed(&english, baseline, date);
                let outcome = self.fallback.merge(content, &english, language).await;
                if outcome.report.all_attempts_failed() {
                    warn!(
                        "Every fallback translation to {} failed, serving untranslated content",
                        language.code()
                    );
                }
                outcome.content
            }
            Some(Err(e)) => {
                warn!(
                    "English feed unavailable for {}, skipping fallback: {}",
                    date, e
                );
                content
            }
        };

        let (section_label, badges) = self.localize_labels(language).await;

        let response = ComposedResponse {
            lang: language.code().to_string(),
            date: date.iso(),
            section_label,
            badges,
            content,
        };

        self.store(&key, &response).await;
        Ok(response)
    }

    async fn cached(&self, key: &str) -> Option<ComposedResponse> {
        match get_json(self.cache.as_ref(), key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Cache read for {} failed, treating as miss: {:#}", key, e);
                None
            }
        }
    }

    async fn store(&self, key: &str, response: &ComposedResponse) {
        match set_json(self.cache.as_ref(), key, response, self.cache_ttl_secs).await {
            Ok(()) => debug!("Cached {} for {}s", key, self.cache_ttl_secs),
            Err(e) => warn!("Cache write for {} failed: {:#}", key, e),
        }
    }

    /// Section label and the five badges in slot order. Each distinct English
    /// text is translated once; a failed translation keeps the English text.
    async fn localize_labels(&self, language: Language) -> (String, Vec<Badge>) {
        if language.is_canonical() || !language.is_translatable() {
            let badges = ContentSlot::ALL.iter().map(|slot| Badge::english(*slot)).collect();
            return (SECTION_LABEL.to_string(), badges);
        }

        let mut texts = vec![SECTION_LABEL];
        for slot in ContentSlot::ALL {
            let label = badge_label(slot);
            if !texts.contains(&label) {
                texts.push(label);
            }
        }

        let translated: HashMap<&str, String> = join_all(
            texts
                .into_iter()
                .map(|text| async move { (text, self.translate_label(text, language).await) }),
        )
        .await
        .into_iter()
        .collect();

        let localized = |text: &str| {
            translated
                .get(text)
                .cloned()
                .unwrap_or_else(|| text.to_string())
        };

        let badges = ContentSlot::ALL
            .iter()
            .map(|slot| Badge {
                slot: *slot,
                label: localized(badge_label(*slot)),
            })
            .collect();

        (localized(SECTION_LABEL), badges)
    }

    async fn translate_label(&self, text: &str, language: Language) -> String {
        match self
            .translator
            .translate(text, Language::canonical().code(), language.code())
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                warn!(
                    "Label '{}' stays English for {}: {}",
                    text,
                    language.code(),
                    e
                );
                text.to_string()
            }
        }
    }
}
