//! CSV normalizer for platform export files.
//!
//! Each export kind has its own header vocabulary mapping source columns
//! to canonical fields. Columns outside the vocabulary are dropped;
//! vocabulary columns missing from the input, empty cells, and junk
//! numeric or date text all resolve to documented defaults here rather
//! than erroring. Only structural problems (bad row/column layout,
//! encoding errors, no header row) surface as [`ParseError`].

use chrono::NaiveDateTime;
use csv::StringRecord;
use std::collections::HashMap;
use thiserror::Error;

use crate::records::{Platform, PostRecord, StoryRecord, dedup_keep_last, derive_metrics};

/// Raw input bytes could not be read as a delimited table.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse CSV: {0}")]
    Malformed(#[from] csv::Error),
    #[error("input has no header row")]
    MissingHeader,
}

/// The three known export shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    FacebookPosts,
    InstagramPosts,
    InstagramStories,
}

/// A normalized record set, tagged by shape.
#[derive(Debug)]
pub enum RecordSet {
    Posts(Vec<PostRecord>),
    Stories(Vec<StoryRecord>),
}

/// Exact timestamp pattern used by the exports.
const PUBLISH_TIME_FORMAT: &str = "%m/%d/%Y %H:%M";

// Source header -> canonical field, per export kind. The Facebook export
// labels likes "Reactions" and has no Saves or Follows columns.
const FB_POST_COLS: &[(&str, &str)] = &[
    ("Post ID", "post_id"),
    ("Publish time", "publish_time"),
    ("Description", "description"),
    ("Permalink", "permalink"),
    ("Post type", "post_type"),
    ("Reach", "reach"),
    ("Views", "views"),
    ("Reactions", "likes"),
    ("Comments", "comments"),
    ("Shares", "shares"),
];

const IG_POST_COLS: &[(&str, &str)] = &[
    ("Post ID", "post_id"),
    ("Publish time", "publish_time"),
    ("Description", "description"),
    ("Permalink", "permalink"),
    ("Post type", "post_type"),
    ("Reach", "reach"),
    ("Views", "views"),
    ("Likes", "likes"),
    ("Comments", "comments"),
    ("Shares", "shares"),
    ("Saves", "saves"),
    ("Follows", "follows"),
];

const IG_STORY_COLS: &[(&str, &str)] = &[
    ("Post ID", "post_id"),
    ("Publish time", "publish_time"),
    ("Permalink", "permalink"),
    ("Reach", "reach"),
    ("Views", "views"),
    ("Likes", "likes"),
    ("Shares", "shares"),
    ("Replies", "replies"),
    ("Link clicks", "link_clicks"),
    ("Navigation", "navigation"),
    ("Profile visits", "profile_visits"),
    ("Sticker taps", "sticker_taps"),
    ("Follows", "follows"),
];

/// Normalizes raw export bytes for the given kind.
pub fn normalize(kind: SourceKind, bytes: &[u8]) -> Result<RecordSet, ParseError> {
    match kind {
        SourceKind::FacebookPosts => normalize_facebook_posts(bytes).map(RecordSet::Posts),
        SourceKind::InstagramPosts => normalize_instagram_posts(bytes).map(RecordSet::Posts),
        SourceKind::InstagramStories => normalize_stories(bytes).map(RecordSet::Stories),
    }
}

/// Normalizes a Facebook posts export.
pub fn normalize_facebook_posts(bytes: &[u8]) -> Result<Vec<PostRecord>, ParseError> {
    read_posts(bytes, FB_POST_COLS, Platform::Facebook)
}

/// Normalizes an Instagram posts export.
pub fn normalize_instagram_posts(bytes: &[u8]) -> Result<Vec<PostRecord>, ParseError> {
    read_posts(bytes, IG_POST_COLS, Platform::Instagram)
}

/// Normalizes an Instagram stories export.
///
/// Stories get no derived engagement fields: the export has no comments
/// or saves, and story rate semantics differ from posts.
pub fn normalize_stories(bytes: &[u8]) -> Result<Vec<StoryRecord>, ParseError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let columns = column_index(reader.headers()?, IG_STORY_COLS)?;
    let has_identity = columns.contains_key("post_id");

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cells = RowView {
            row: &row,
            columns: &columns,
        };

        records.push(StoryRecord {
            post_id: cells.string("post_id").unwrap_or_default(),
            publish_time: cells.timestamp("publish_time"),
            platform: Platform::InstagramStory,
            permalink: cells.string("permalink"),
            reach: cells.count("reach"),
            views: cells.count("views"),
            likes: cells.count("likes"),
            shares: cells.count("shares"),
            replies: cells.count("replies"),
            link_clicks: cells.count("link_clicks"),
            navigation: cells.count("navigation"),
            profile_visits: cells.count("profile_visits"),
            sticker_taps: cells.count("sticker_taps"),
            follows: cells.count("follows"),
        });
    }

    if has_identity {
        records = dedup_keep_last(records);
    }
    Ok(records)
}

fn read_posts(
    bytes: &[u8],
    vocabulary: &[(&str, &'static str)],
    platform: Platform,
) -> Result<Vec<PostRecord>, ParseError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let columns = column_index(reader.headers()?, vocabulary)?;
    let has_identity = columns.contains_key("post_id");

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cells = RowView {
            row: &row,
            columns: &columns,
        };

        let reach = cells.count("reach");
        let views = cells.count("views");
        let likes = cells.count("likes");
        let comments = cells.count("comments");
        let shares = cells.count("shares");
        let saves = cells.count("saves");
        let metrics = derive_metrics(likes, comments, shares, saves, reach, views);

        records.push(PostRecord {
            post_id: cells.string("post_id").unwrap_or_default(),
            publish_time: cells.timestamp("publish_time"),
            platform,
            post_type: cells.string("post_type"),
            description: cells.string("description"),
            permalink: cells.string("permalink"),
            reach,
            views,
            likes,
            comments,
            shares,
            saves,
            follows: cells.count("follows"),
            total_engagement: metrics.total_engagement,
            engagement_rate_reach: metrics.engagement_rate_reach,
            engagement_rate_views: metrics.engagement_rate_views,
        });
    }

    if has_identity {
        records = dedup_keep_last(records);
    }
    Ok(records)
}

/// Resolves the header row against a vocabulary, keeping only known columns.
fn column_index(
    headers: &StringRecord,
    vocabulary: &[(&str, &'static str)],
) -> Result<HashMap<&'static str, usize>, ParseError> {
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(ParseError::MissingHeader);
    }

    let mut index = HashMap::new();
    for (position, header) in headers.iter().enumerate() {
        let header = header.trim();
        if let Some((_, canonical)) = vocabulary.iter().find(|(source, _)| *source == header) {
            index.insert(*canonical, position);
        }
    }
    Ok(index)
}

/// One parsed row with vocabulary-resolved field access.
///
/// Every cell read funnels through here, so the tolerated-data-error
/// policy lives in one place.
struct RowView<'a> {
    row: &'a StringRecord,
    columns: &'a HashMap<&'static str, usize>,
}

impl RowView<'_> {
    fn text(&self, field: &str) -> Option<&str> {
        let position = *self.columns.get(field)?;
        let value = self.row.get(position)?.trim();
        if value.is_empty() { None } else { Some(value) }
    }

    fn string(&self, field: &str) -> Option<String> {
        self.text(field).map(str::to_owned)
    }

    fn count(&self, field: &str) -> u64 {
        self.text(field).map_or(0, clean_numeric)
    }

    fn timestamp(&self, field: &str) -> Option<NaiveDateTime> {
        self.text(field)
            .and_then(|value| NaiveDateTime::parse_from_str(value, PUBLISH_TIME_FORMAT).ok())
    }
}

/// Strips thousands separators and parses a counter value.
///
/// Exports render counters inconsistently ("1,234", "12.0", ""); anything
/// that still fails to parse resolves to 0, as do negative values.
fn clean_numeric(raw: &str) -> u64 {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();

    if let Ok(value) = cleaned.parse::<u64>() {
        return value;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value as u64,
        _ => 0,
    }
}
