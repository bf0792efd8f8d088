//! Builders for upstream payload fixtures and collaborator stubs used by unit tests.

use crate::errors::{FeedError, FeedResult};
use crate::feed_date::FeedDate;
use crate::i18n::Language;
use crate::translation::Translator;
use crate::wikipedia::{FeedSource, RawFeedPayload};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Barrier;

/// Page summary with generated description and extract.
pub fn page(title: &str, pageid: u64) -> Value {
    let normalized = title.replace('_', " ");
    page_with(
        title,
        pageid,
        &format!("{} description", normalized),
        &format!("{} extract.", normalized),
    )
}

pub fn page_with(title: &str, pageid: u64, description: &str, extract: &str) -> Value {
    let normalized = title.replace('_', " ");
    json!({
        "type": "standard",
        "title": title,
        "normalizedtitle": normalized,
        "titles": {
            "canonical": title,
            "normalized": normalized,
            "display": normalized
        },
        "pageid": pageid,
        "thumbnail": {
            "source": format!("https://upload.wikimedia.org/{}.jpg", title),
            "width": 640,
            "height": 480
        },
        "lang": "en",
        "timestamp": "2024-07-06T13:34:26Z",
        "description": description,
        "content_urls": {
            "desktop": { "page": format!("https://en.wikipedia.org/wiki/{}", title) },
            "mobile": { "page": format!("https://en.m.wikipedia.org/wiki/{}", title) }
        },
        "extract": extract
    })
}

pub fn with_views(mut page: Value, views: u64, rank: u32) -> Value {
    if let Some(obj) = page.as_object_mut() {
        obj.insert("views".to_string(), json!(views));
        obj.insert("rank".to_string(), json!(rank));
    }
    page
}

pub fn image_slot(title: &str, description: &str) -> Value {
    json!({
        "title": title,
        "thumbnail": {
            "source": "https://upload.wikimedia.org/thumb.jpg",
            "width": 640,
            "height": 427
        },
        "file_page": format!("https://commons.wikimedia.org/wiki/{}", title),
        "wb_entity_id": "M111",
        "description": { "html": description, "text": description, "lang": "en" }
    })
}

pub fn most_read_slot(articles: Vec<Value>) -> Value {
    json!({ "date": "2024-07-03Z", "articles": articles })
}

pub fn on_this_day_event(text: &str, year: i32, page: Value) -> Value {
    json!({ "text": text, "year": year, "pages": [page] })
}

pub fn news_story(story: &str, link: Value) -> Value {
    json!({ "story": story, "links": [link] })
}

/// Complete English payload with every slot populated.
pub fn feed_payload() -> RawFeedPayload {
    RawFeedPayload {
        tfa: Some(page_with(
            "Statue_of_Liberty",
            29997,
            "Colossal sculpture in New York Harbor",
            "The Statue of Liberty is a colossal.",
        )),
        image: Some(image_slot(
            "File:Seven Lakes.jpg",
            "The Seven Lakes' valley of Yedigöller National Park",
        )),
        mostread: Some(most_read_slot(vec![
            with_views(
                page_with(
                    "Project_2025",
                    73458813,
                    "Proposed plan to consolidate executive power in a Republican president",
                    "Project 2025 is a collection of conservative and right-wing.",
                ),
                442626,
                4,
            ),
            with_views(page("Joe_Biden", 145422), 301337, 5),
        ])),
        onthisday: Some(json!([on_this_day_event(
            "The impactor of the NASA spacecraft Deep Impact.",
            2005,
            page("NASA", 18426501),
        )])),
        news: Some(json!([news_story(
            "<b>Keir Starmer</b> becomes Prime Minister",
            page("Keir_Starmer", 3),
        )])),
    }
}

// ==================== Stubs ====================

/// Serves a fixed payload per language and records every fetch.
/// Languages without a payload fail with an upstream error.
#[derive(Default)]
pub struct StubFeeds {
    payloads: HashMap<&'static str, RawFeedPayload>,
    calls: Mutex<Vec<&'static str>>,
}

impl StubFeeds {
    pub fn with(mut self, code: &'static str, payload: RawFeedPayload) -> Self {
        self.payloads.insert(code, payload);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for StubFeeds {
    async fn fetch_feed(&self, language: Language, _date: FeedDate) -> FeedResult<RawFeedPayload> {
        self.calls.lock().unwrap().push(language.code());
        self.payloads.get(language.code()).cloned().ok_or_else(|| {
            FeedError::Upstream(format!(
                "Failed to fetch Wikipedia feed. Details: no feed for {}",
                language.code()
            ))
        })
    }
}

/// Appends `-{target}` to the text and counts calls.
#[derive(Default)]
pub struct SuffixTranslator {
    calls: AtomicUsize,
}

impl SuffixTranslator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for SuffixTranslator {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> FeedResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}-{}", text, target))
    }
}

/// Like `SuffixTranslator`, but every call waits until `parties` calls are
/// outstanding at once. Sequential callers never get past the first call.
pub struct LatchTranslator {
    barrier: Barrier,
}

impl LatchTranslator {
    pub fn new(parties: usize) -> Self {
        Self {
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl Translator for LatchTranslator {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> FeedResult<String> {
        self.barrier.wait().await;
        Ok(format!("{}-{}", text, target))
    }
}
