//! Translation fallback: fills slots the target language lacks with
//! machine-translated English content.
//!
//! For every slot:
//! 1. a populated target-language slot is kept as is;
//! 2. otherwise, if English has the slot and the target language is on the
//!    translation allow-list, the slot's text fields are translated from
//!    English and substituted into a copy of the English slot;
//! 3. otherwise the slot stays empty.
//!
//! All slots, all list entries and all fields are translated concurrently.
//! A failed field fails its slot, which then keeps its pre-fallback value;
//! sibling slots are unaffected.

use crate::errors::FeedResult;
use crate::i18n::Language;
use crate::normalize::{ContentSlot, FeedContent, NormalizedArticle};
use crate::translation::Translator;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a slot was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// The target language had its own content.
    Localized,
    /// Content was translated from English.
    Translated,
    /// No fallback was possible (no English content or language not translatable).
    Unavailable,
    /// Translation was attempted and failed; the slot kept its original value.
    Failed,
}

/// Per-slot resolution of one merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackReport {
    slots: Vec<(ContentSlot, SlotStatus)>,
}

impl FallbackReport {
    pub fn status(&self, slot: ContentSlot) -> Option<SlotStatus> {
        self.slots
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, status)| *status)
    }

    pub fn failed_slots(&self) -> Vec<ContentSlot> {
        self.with_status(SlotStatus::Failed)
    }

    pub fn translated_slots(&self) -> Vec<ContentSlot> {
        self.with_status(SlotStatus::Translated)
    }

    /// True when at least one slot needed translation and none succeeded.
    pub fn all_attempts_failed(&self) -> bool {
        !self.failed_slots().is_empty() && self.translated_slots().is_empty()
    }

    fn with_status(&self, status: SlotStatus) -> Vec<ContentSlot> {
        self.slots
            .iter()
            .filter(|(_, s)| *s == status)
            .map(|(slot, _)| *slot)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    pub content: FeedContent,
    pub report: FallbackReport,
}

/// Text-bearing fields of a normalized article.
#[derive(Debug, Clone, Copy)]
enum ArticleField {
    Title,
    Description,
}

impl ArticleField {
    fn read(self, article: &NormalizedArticle) -> &str {
        match self {
            ArticleField::Title => &article.title,
            ArticleField::Description => &article.description,
        }
    }

    fn write(self, article: &mut NormalizedArticle, text: String) {
        match self {
            ArticleField::Title => article.title = text,
            ArticleField::Description => article.description = text,
        }
    }
}

/// Fields translated for each slot. Image titles are file names and stay as is.
fn translated_fields(slot: ContentSlot) -> &'static [ArticleField] {
    match slot {
        ContentSlot::Image => &[ArticleField::Description],
        ContentSlot::Featured
        | ContentSlot::MostRead
        | ContentSlot::OnThisDay
        | ContentSlot::News => &[ArticleField::Title, ArticleField::Description],
    }
}

pub struct FallbackEngine {
    translator: Arc<dyn Translator>,
}

impl FallbackEngine {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Merge `english` into the gaps of `target`.
    pub async fn merge(
        &self,
        target: FeedContent,
        english: &FeedContent,
        language: Language,
    ) -> FallbackOutcome {
        let FeedContent {
            date,
            lang,
            featured_article,
            image,
            most_read,
            on_this_day,
            news,
        } = target;

        let (featured_article, image, most_read, on_this_day, news) = tokio::join!(
            self.resolve_article(
                ContentSlot::Featured,
                featured_article,
                english.featured_article.as_ref(),
                language
            ),
            self.resolve_article(ContentSlot::Image, image, english.image.as_ref(), language),
            self.resolve_list(ContentSlot::MostRead, most_read, &english.most_read, language),
            self.resolve_list(
                ContentSlot::OnThisDay,
                on_this_day,
                &english.on_this_day,
                language
            ),
            self.resolve_list(ContentSlot::News, news, &english.news, language),
        );

        let report = FallbackReport {
            slots: vec![
                (ContentSlot::Featured, featured_article.1),
                (ContentSlot::Image, image.1),
                (ContentSlot::MostRead, most_read.1),
                (ContentSlot::OnThisDay, on_this_day.1),
                (ContentSlot::News, news.1),
            ],
        };

        FallbackOutcome {
            content: FeedContent {
                date,
                lang,
                featured_article: featured_article.0,
                image: image.0,
                most_read: most_read.0,
                on_this_day: on_this_day.0,
                news: news.0,
            },
            report,
        }
    }

    async fn resolve_article(
        &self,
        slot: ContentSlot,
        target: Option<NormalizedArticle>,
        english: Option<&NormalizedArticle>,
        language: Language,
    ) -> (Option<NormalizedArticle>, SlotStatus) {
        if target.is_some() {
            return (target, SlotStatus::Localized);
        }
        let Some(english) = english.filter(|_| can_translate(language)) else {
            return (target, SlotStatus::Unavailable);
        };

        match self.translate_article(slot, english, language).await {
            Ok(article) => {
                debug!("Filled '{}' for {} from English", slot.upstream_key(), language.code());
                (Some(article), SlotStatus::Translated)
            }
            Err(e) => {
                warn!(
                    "Fallback translation of '{}' to {} failed: {}",
                    slot.upstream_key(),
                    language.code(),
                    e
                );
                (target, SlotStatus::Failed)
            }
        }
    }

    async fn resolve_list(
        &self,
        slot: ContentSlot,
        target: Vec<NormalizedArticle>,
        english: &[NormalizedArticle],
        language: Language,
    ) -> (Vec<NormalizedArticle>, SlotStatus) {
        if !target.is_empty() {
            return (target, SlotStatus::Localized);
        }
        if english.is_empty() || !can_translate(language) {
            return (target, SlotStatus::Unavailable);
        }

        // try_join_all keeps input order
        let translated = try_join_all(
            english
                .iter()
                .map(|article| self.translate_article(slot, article, language)),
        )
        .await;

        match translated {
            Ok(articles) => {
                debug!(
                    "Filled '{}' for {} with {} translated entries",
                    slot.upstream_key(),
                    language.code(),
                    articles.len()
                );
                (articles, SlotStatus::Translated)
            }
            Err(e) => {
                warn!(
                    "Fallback translation of '{}' to {} failed: {}",
                    slot.upstream_key(),
                    language.code(),
                    e
                );
                (target, SlotStatus::Failed)
            }
        }
    }

    async fn translate_article(
        &self,
        slot: ContentSlot,
        article: &NormalizedArticle,
        language: Language,
    ) -> FeedResult<NormalizedArticle> {
        let fields = translated_fields(slot);
        let texts = try_join_all(
            fields
                .iter()
                .map(|field| self.translate_text(field.read(article), language)),
        )
        .await?;

        let mut translated = article.clone();
        for (field, text) in fields.iter().zip(texts) {
            field.write(&mut translated, text);
        }
        Ok(translated)
    }

    async fn translate_text(&self, text: &str, language: Language) -> FeedResult<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        self.translator
            .translate(text, Language::canonical().code(), language.code())
            .await
    }
}

fn can_translate(language: Language) -> bool {
    !language.is_canonical() && language.is_translatable()
}
