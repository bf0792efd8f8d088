//! Calendar date of a feed request.

use crate::errors::{FeedError, FeedResult};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A validated calendar date. Construction rejects impossible dates such as
/// month 13 or February 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedDate(NaiveDate);

impl FeedDate {
    /// Validate the raw `year`, `month` and `day` path components.
    ///
    /// Components must be plain decimal digits and must name a real day.
    pub fn parse(year: &str, month: &str, day: &str) -> FeedResult<FeedDate> {
        let invalid = || FeedError::BadRequest(format!("Invalid date: {}-{}-{}", year, month, day));

        let y = parse_component(year, 4).ok_or_else(invalid)?;
        let m = parse_component(month, 2).ok_or_else(invalid)?;
        let d = parse_component(day, 2).ok_or_else(invalid)?;

        let date = i32::try_from(y)
            .ok()
            .filter(|y| *y >= 1)
            .and_then(|y| NaiveDate::from_ymd_opt(y, m, d))
            .ok_or_else(invalid)?;

        // The constructed date must read back as the requested components
        if date.year() as u32 != y || date.month() != m || date.day() != d {
            return Err(invalid());
        }

        Ok(FeedDate(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// `yyyy/mm/dd`, as used in upstream feed URLs.
    pub fn path(&self) -> String {
        self.0.format("%Y/%m/%d").to_string()
    }

    /// `yyyy-mm-dd`
    pub fn iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for FeedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso())
    }
}

fn parse_component(raw: &str, max_len: usize) -> Option<u32> {
    if raw.is_empty() || raw.len() > max_len || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
