//! Report wire structures.
//!
//! Field names and nesting are consumed by downstream renderers (dashboard,
//! spreadsheet sync) and must stay stable.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::records::{Platform, PostRecord, StoryRecord};

/// Character budget for descriptions in ranking projections.
pub(crate) const RANKING_DESCRIPTION_CHARS: usize = 80;
/// Character budget for descriptions in full listings.
pub(crate) const LISTING_DESCRIPTION_CHARS: usize = 50;

const PUBLISH_TIME_DISPLAY: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Serialize)]
pub struct Report {
    pub period: Period,
    pub aggregated: Aggregated,
    pub facebook: PlatformSection,
    pub instagram: PlatformSection,
    pub stories: StorySection,
}

/// Echo of the requested reporting window.
#[derive(Debug, Serialize)]
pub struct Period {
    pub start: String,
    pub end: String,
}

/// The cross-platform particulars comparison: combined Instagram activity
/// (posts + stories) against Facebook posts.
#[derive(Debug, Serialize)]
pub struct Aggregated {
    pub instagram: Particulars,
    pub facebook: Particulars,
}

/// Per-platform particulars block. Rates are percentages.
#[derive(Debug, Default, Serialize)]
pub struct Particulars {
    pub total_reach: u64,
    pub total_engagement: u64,
    pub total_views: u64,
    pub interactions_wo_views: u64,
    pub eng_rate_with_views: f64,
    pub eng_rate_wo_views: f64,
    pub video_view_rate: f64,
    pub average_interaction: f64,
}

/// Platform totals and ratio-of-sums average rates.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct PlatformStats {
    pub total_posts: u64,
    pub total_reach: u64,
    pub total_views: u64,
    pub total_engagement: u64,
    pub avg_engagement_rate_reach: f64,
    pub avg_engagement_rate_views: f64,
    pub total_follows: u64,
}

#[derive(Debug, Serialize)]
pub struct PlatformSection {
    pub stats: PlatformStats,
    pub rankings: Rankings,
    pub posts: Vec<PostRow>,
}

/// Best and least performers; all `None` for an empty window.
#[derive(Debug, Default, Serialize)]
pub struct Rankings {
    pub best_reach: Option<RankedPost>,
    pub least_reach: Option<RankedPost>,
    pub best_engagement: Option<RankedPost>,
    pub least_engagement: Option<RankedPost>,
}

/// Compact projection of one post for the rankings block.
#[derive(Debug, Serialize)]
pub struct RankedPost {
    pub post_id: String,
    pub platform: Platform,
    pub reach: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
    pub total_engagement: u64,
    pub permalink: String,
    pub description: String,
    pub publish_time: String,
}

impl RankedPost {
    pub(crate) fn project(record: &PostRecord) -> Self {
        Self {
            post_id: record.post_id.clone(),
            platform: record.platform,
            reach: record.reach,
            views: record.views,
            likes: record.likes,
            comments: record.comments,
            shares: record.shares,
            saves: record.saves,
            total_engagement: record.total_engagement,
            permalink: record.permalink.clone().unwrap_or_default(),
            description: truncate_chars(
                record.description.as_deref().unwrap_or(""),
                RANKING_DESCRIPTION_CHARS,
            ),
            publish_time: format_publish_time(record.publish_time),
        }
    }
}

/// One post in a platform section's full listing.
#[derive(Debug, Serialize)]
pub struct PostRow {
    pub post_id: String,
    pub publish_time: String,
    pub post_type: String,
    pub reach: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
    pub follows: u64,
    pub total_engagement: u64,
    pub engagement_rate: f64,
    pub permalink: String,
    pub description: String,
}

impl PostRow {
    pub(crate) fn project(record: &PostRecord) -> Self {
        Self {
            post_id: record.post_id.clone(),
            publish_time: format_publish_time(record.publish_time),
            post_type: record.post_type.clone().unwrap_or_default(),
            reach: record.reach,
            views: record.views,
            likes: record.likes,
            comments: record.comments,
            shares: record.shares,
            saves: record.saves,
            follows: record.follows,
            total_engagement: record.total_engagement,
            engagement_rate: record.engagement_rate_reach,
            permalink: record.permalink.clone().unwrap_or_default(),
            description: truncate_chars(
                record.description.as_deref().unwrap_or(""),
                LISTING_DESCRIPTION_CHARS,
            ),
        }
    }
}

/// Dedicated stats block for stories.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct StoryStats {
    pub total_stories: u64,
    pub total_reach: u64,
    pub total_views: u64,
    pub avg_views_per_story: f64,
    pub total_link_clicks: u64,
    pub total_replies: u64,
    pub total_profile_visits: u64,
    pub total_follows: u64,
}

#[derive(Debug, Serialize)]
pub struct StorySection {
    pub stats: StoryStats,
    pub data: Vec<StoryRow>,
}

/// One story in the stories listing. Stories carry no engagement-rate
/// fields.
#[derive(Debug, Serialize)]
pub struct StoryRow {
    pub post_id: String,
    pub publish_time: String,
    pub reach: u64,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub replies: u64,
    pub link_clicks: u64,
    pub profile_visits: u64,
    pub follows: u64,
    pub sticker_taps: u64,
    pub permalink: String,
}

impl StoryRow {
    pub(crate) fn project(record: &StoryRecord) -> Self {
        Self {
            post_id: record.post_id.clone(),
            publish_time: format_publish_time(record.publish_time),
            reach: record.reach,
            views: record.views,
            likes: record.likes,
            shares: record.shares,
            replies: record.replies,
            link_clicks: record.link_clicks,
            profile_visits: record.profile_visits,
            follows: record.follows,
            sticker_taps: record.sticker_taps,
            permalink: record.permalink.clone().unwrap_or_default(),
        }
    }
}

/// Truncates to a character budget without splitting multi-byte text.
fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// `YYYY-MM-DD HH:MM`, or empty when the timestamp is absent.
fn format_publish_time(value: Option<NaiveDateTime>) -> String {
    value
        .map(|t| t.format(PUBLISH_TIME_DISPLAY).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_truncate_chars_respects_budget() {
        let long = "x".repeat(120);

        assert_eq!(truncate_chars(&long, 80).chars().count(), 80);
        assert_eq!(truncate_chars("short", 80), "short");
    }

    #[test]
    fn test_truncate_chars_handles_multibyte() {
        let text = "äöü".repeat(30);

        assert_eq!(truncate_chars(&text, 50).chars().count(), 50);
    }

    #[test]
    fn test_format_publish_time() {
        let timestamp = NaiveDate::from_ymd_opt(2025, 1, 5)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        assert_eq!(format_publish_time(Some(timestamp)), "2025-01-05 10:30");
        assert_eq!(format_publish_time(None), "");
    }

    #[test]
    fn test_ranked_post_truncates_to_eighty_chars() {
        let record = PostRecord {
            post_id: "p1".to_string(),
            description: Some("d".repeat(200)),
            ..Default::default()
        };

        let projected = RankedPost::project(&record);

        assert_eq!(projected.description.chars().count(), 80);
    }

    #[test]
    fn test_post_row_truncates_to_fifty_chars() {
        let record = PostRecord {
            post_id: "p1".to_string(),
            description: Some("d".repeat(200)),
            ..Default::default()
        };

        let projected = PostRow::project(&record);

        assert_eq!(projected.description.chars().count(), 50);
    }

    #[test]
    fn test_story_row_has_no_navigation_field() {
        let record = StoryRecord {
            post_id: "s1".to_string(),
            navigation: 42,
            ..Default::default()
        };

        let value = serde_json::to_value(StoryRow::project(&record)).unwrap();

        assert!(value.get("navigation").is_none());
        assert_eq!(value["post_id"], "s1");
    }
}
