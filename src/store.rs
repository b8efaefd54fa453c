//! Accumulated datasets for uploaded exports.
//!
//! The analytics engine itself is stateless; this store owns the three
//! growing record sets and serializes updates through `&mut self`. Callers
//! that share a store across tasks must keep a single writer, since
//! keep-last dedup under interleaved merges would lose records.

use chrono::NaiveDate;
use tracing::debug;

use crate::parser::{self, ParseError};
use crate::records::{PostRecord, Record, StoryRecord, dedup_keep_last};
use crate::report::{Report, end_of_day, generate_report, start_of_day};

/// Union of `existing` and `incoming` with keep-last dedup by `post_id`.
///
/// `incoming` follows `existing`, so a re-uploaded post replaces its
/// earlier row.
pub fn merge_and_dedup<T: Record>(existing: Vec<T>, incoming: Vec<T>) -> Vec<T> {
    let mut merged = existing;
    merged.extend(incoming);
    dedup_keep_last(merged)
}

/// The three accumulated record sets, one per export shape.
#[derive(Debug, Default)]
pub struct DatasetStore {
    facebook: Vec<PostRecord>,
    instagram: Vec<PostRecord>,
    stories: Vec<StoryRecord>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes and merges a Facebook posts export, returning the
    /// accumulated record count.
    pub fn ingest_facebook(&mut self, bytes: &[u8]) -> Result<usize, ParseError> {
        let incoming = parser::normalize_facebook_posts(bytes)?;
        debug!(incoming = incoming.len(), "Merging Facebook posts");
        self.facebook = merge_and_dedup(std::mem::take(&mut self.facebook), incoming);
        Ok(self.facebook.len())
    }

    /// Normalizes and merges an Instagram posts export, returning the
    /// accumulated record count.
    pub fn ingest_instagram(&mut self, bytes: &[u8]) -> Result<usize, ParseError> {
        let incoming = parser::normalize_instagram_posts(bytes)?;
        debug!(incoming = incoming.len(), "Merging Instagram posts");
        self.instagram = merge_and_dedup(std::mem::take(&mut self.instagram), incoming);
        Ok(self.instagram.len())
    }

    /// Normalizes and merges an Instagram stories export, returning the
    /// accumulated record count.
    pub fn ingest_stories(&mut self, bytes: &[u8]) -> Result<usize, ParseError> {
        let incoming = parser::normalize_stories(bytes)?;
        debug!(incoming = incoming.len(), "Merging Instagram stories");
        self.stories = merge_and_dedup(std::mem::take(&mut self.stories), incoming);
        Ok(self.stories.len())
    }

    /// Drops all accumulated records.
    pub fn clear(&mut self) {
        self.facebook.clear();
        self.instagram.clear();
        self.stories.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.facebook.is_empty() && self.instagram.is_empty() && self.stories.is_empty()
    }

    pub fn facebook(&self) -> &[PostRecord] {
        &self.facebook
    }

    pub fn instagram(&self) -> &[PostRecord] {
        &self.instagram
    }

    pub fn stories(&self) -> &[StoryRecord] {
        &self.stories
    }

    /// Generates the report for a calendar-date window; `end` is inclusive
    /// through its last instant (23:59:59).
    pub fn report(&self, start: NaiveDate, end: NaiveDate) -> Report {
        generate_report(
            &self.facebook,
            &self.instagram,
            &self.stories,
            start_of_day(start),
            end_of_day(end),
        )
    }
}
