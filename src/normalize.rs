//! Content normalizer: reshapes the five raw slots into `NormalizedArticle`s.
//!
//! Every slot is extracted independently. An absent slot is an expected state
//! (`SlotError::Missing`); a present slot with the wrong structure is
//! `SlotError::Malformed`. List slots drop bad entries one by one.

use crate::feed_date::FeedDate;
use crate::i18n::Language;
use crate::wikipedia::{
    RawFeedPayload, RawImage, RawMostRead, RawNewsStory, RawOnThisDayEvent, RawPage, RawThumbnail,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// The five content categories of a daily feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSlot {
    Featured,
    Image,
    MostRead,
    OnThisDay,
    News,
}

impl ContentSlot {
    /// All slots, in response order.
    pub const ALL: [ContentSlot; 5] = [
        ContentSlot::Featured,
        ContentSlot::Image,
        ContentSlot::MostRead,
        ContentSlot::OnThisDay,
        ContentSlot::News,
    ];

    /// Key of the slot in the upstream payload.
    pub fn upstream_key(self) -> &'static str {
        match self {
            ContentSlot::Featured => "tfa",
            ContentSlot::Image => "image",
            ContentSlot::MostRead => "mostread",
            ContentSlot::OnThisDay => "onthisday",
            ContentSlot::News => "news",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUrls {
    pub desktop: String,
    pub mobile: String,
}

/// Canonical per-item shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    pub urls: ArticleUrls,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

/// Normalized feed for one (language, date). Lists are never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedContent {
    pub date: String,
    pub lang: String,
    pub featured_article: Option<NormalizedArticle>,
    pub image: Option<NormalizedArticle>,
    pub most_read: Vec<NormalizedArticle>,
    pub on_this_day: Vec<NormalizedArticle>,
    pub news: Vec<NormalizedArticle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot is absent")]
    Missing,

    #[error("slot is malformed: {0}")]
    Malformed(String),
}

// ==================== Slot extraction ====================

pub fn extract_featured_article(payload: &RawFeedPayload) -> Result<NormalizedArticle, SlotError> {
    let page: RawPage = decode_slot(payload.tfa.as_ref())?;
    Ok(page_to_article(page))
}

pub fn extract_image(payload: &RawFeedPayload) -> Result<NormalizedArticle, SlotError> {
    let image: RawImage = decode_slot(payload.image.as_ref())?;
    Ok(NormalizedArticle {
        id: image.wb_entity_id.unwrap_or_else(|| image.title.clone()),
        description: image.description.map(|d| d.text).unwrap_or_default(),
        timestamp: None,
        thumbnail: image.thumbnail.map(thumbnail),
        urls: ArticleUrls {
            desktop: image.file_page.clone(),
            mobile: image.file_page,
        },
        title: image.title,
        views: None,
        rank: None,
    })
}

pub fn extract_most_read(payload: &RawFeedPayload) -> Result<Vec<NormalizedArticle>, SlotError> {
    let most_read: RawMostRead = decode_slot(payload.mostread.as_ref())?;
    Ok(map_entries(ContentSlot::MostRead, most_read.articles, |entry| {
        let page: RawPage = decode_entry(entry)?;
        Ok(page_to_article(page))
    }))
}

/// On-this-day events. The displayed timestamp combines the historical year
/// with the requested month and day.
pub fn extract_on_this_day(
    payload: &RawFeedPayload,
    date: FeedDate,
) -> Result<Vec<NormalizedArticle>, SlotError> {
    let events: Vec<Value> = decode_slot(payload.onthisday.as_ref())?;
    Ok(map_entries(ContentSlot::OnThisDay, events, |entry| {
        let event: RawOnThisDayEvent = decode_entry(entry)?;
        let page = event
            .pages
            .into_iter()
            .next()
            .ok_or_else(|| SlotError::Malformed("event has no pages".to_string()))?;

        let mut article = page_to_article(page);
        article.id = format!("{}-{}", event.year, article.id);
        article.description = event.text;
        article.timestamp = historical_timestamp(event.year, date);
        Ok(article)
    }))
}

pub fn extract_news(payload: &RawFeedPayload) -> Result<Vec<NormalizedArticle>, SlotError> {
    let stories: Vec<Value> = decode_slot(payload.news.as_ref())?;
    Ok(map_entries(ContentSlot::News, stories, |entry| {
        let story: RawNewsStory = decode_entry(entry)?;
        let link = story
            .links
            .into_iter()
            .next()
            .ok_or_else(|| SlotError::Malformed("story has no links".to_string()))?;

        // The linked article's extract reads better than the HTML story blurb
        let summary = link.extract.clone().or_else(|| link.description.clone());
        let mut article = page_to_article(link);
        article.description = summary.or(story.story).unwrap_or_default();
        Ok(article)
    }))
}

/// Normalize a whole payload. Slot failures are absorbed here and become
/// `None` or an empty list.
pub fn normalize_feed(payload: &RawFeedPayload, language: Language, date: FeedDate) -> FeedContent {
    FeedContent {
        date: date.iso(),
        lang: language.code().to_string(),
        featured_article: absorb(
            ContentSlot::Featured,
            language,
            extract_featured_article(payload),
        ),
        image: absorb(ContentSlot::Image, language, extract_image(payload)),
        most_read: absorb(ContentSlot::MostRead, language, extract_most_read(payload))
            .unwrap_or_default(),
        on_this_day: absorb(
            ContentSlot::OnThisDay,
            language,
            extract_on_this_day(payload, date),
        )
        .unwrap_or_default(),
        news: absorb(ContentSlot::News, language, extract_news(payload)).unwrap_or_default(),
    }
}

// ==================== Helpers ====================

fn absorb<T>(slot: ContentSlot, language: Language, result: Result<T, SlotError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(SlotError::Missing) => {
            debug!("{} has no '{}' slot", language.code(), slot.upstream_key());
            None
        }
        Err(SlotError::Malformed(reason)) => {
            warn!(
                "Discarding malformed '{}' slot for {}: {}",
                slot.upstream_key(),
                language.code(),
                reason
            );
            None
        }
    }
}

fn decode_slot<T: DeserializeOwned>(slot: Option<&Value>) -> Result<T, SlotError> {
    let value = slot.ok_or(SlotError::Missing)?;
    T::deserialize(value).map_err(|e| SlotError::Malformed(e.to_string()))
}

fn decode_entry<T: DeserializeOwned>(entry: Value) -> Result<T, SlotError> {
    serde_json::from_value(entry).map_err(|e| SlotError::Malformed(e.to_string()))
}

fn map_entries<F>(slot: ContentSlot, entries: Vec<Value>, map: F) -> Vec<NormalizedArticle>
where
    F: Fn(Value) -> Result<NormalizedArticle, SlotError>,
{
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match map(entry) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(
                    "Dropping '{}' entry #{}: {}",
                    slot.upstream_key(),
                    index,
                    e
                );
                None
            }
        })
        .collect()
}

fn page_to_article(page: RawPage) -> NormalizedArticle {
    let title = page
        .titles
        .map(|titles| titles.normalized)
        .or(page.normalizedtitle)
        .unwrap_or_else(|| page.title.replace('_', " "));

    NormalizedArticle {
        id: page
            .pageid
            .map(|id| id.to_string())
            .unwrap_or_else(|| page.title.clone()),
        title,
        description: page.description.or(page.extract).unwrap_or_default(),
        timestamp: page.timestamp,
        thumbnail: page.thumbnail.map(thumbnail),
        urls: ArticleUrls {
            desktop: page.content_urls.desktop.page,
            mobile: page.content_urls.mobile.page,
        },
        views: page.views,
        rank: page.rank,
    }
}

fn thumbnail(raw: RawThumbnail) -> Thumbnail {
    Thumbnail {
        source: raw.source,
        width: raw.width,
        height: raw.height,
    }
}

/// `{year}-{mm}-{dd}T00:00:00Z`, or `None` when the day does not exist in
/// that year (Feb 29 events in non-leap years).
fn historical_timestamp(year: i32, date: FeedDate) -> Option<String> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .map(|day| day.format("%Y-%m-%dT00:00:00Z").to_string())
}
