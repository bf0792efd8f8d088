//! Daily Wikipedia featured-content feed, localized.
//!
//! `FeedComposer::compose_feed` fetches the requested edition's feed, fills
//! gaps with machine-translated English content, attaches localized labels and
//! caches the result.

pub mod cache;
pub mod composer;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod feed_date;
pub mod i18n;
pub mod normalize;
pub mod server;
pub mod translation;
pub mod wikipedia;

#[cfg(test)]
pub(crate) mod test_fixtures;
