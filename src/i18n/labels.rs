//! Badges and the English label text attached to composed responses.

use crate::normalize::ContentSlot;
use serde::{Deserialize, Serialize};

/// English text of the label heading the whole feed.
pub const SECTION_LABEL: &str = "Featured Content";

/// English badge text for a slot.
pub fn badge_label(slot: ContentSlot) -> &'static str {
    match slot {
        ContentSlot::Featured => "Featured",
        ContentSlot::Image => "Image",
        ContentSlot::MostRead => "Most read",
        ContentSlot::OnThisDay => "On this day",
        ContentSlot::News => "News",
    }
}

/// A localized label for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    #[serde(rename = "type")]
    pub slot: ContentSlot,
    pub label: String,
}

impl Badge {
    /// Badge carrying the English label.
    pub fn english(slot: ContentSlot) -> Self {
        Self {
            slot,
            label: badge_label(slot).to_string(),
        }
    }
}
