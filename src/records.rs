//! Normalized record model shared across the pipeline.
//!
//! Posts and stories keep separate shapes: stories have no comments or
//! saves, and carry no derived engagement fields.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// Platform tag carried by every normalized record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Platform {
    #[default]
    Facebook,
    Instagram,
    #[serde(rename = "Instagram Story")]
    InstagramStory,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::InstagramStory => "Instagram Story",
        }
    }
}

/// A normalized post from either platform.
///
/// Numeric fields default to 0 when the export lacked the column or the
/// cell did not parse; `publish_time` is `None` for unparsable timestamps.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostRecord {
    pub post_id: String,
    pub publish_time: Option<NaiveDateTime>,
    pub platform: Platform,
    pub post_type: Option<String>,
    pub description: Option<String>,
    pub permalink: Option<String>,
    pub reach: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
    pub follows: u64,
    pub total_engagement: u64,
    pub engagement_rate_reach: f64,
    pub engagement_rate_views: f64,
}

/// A normalized Instagram story.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoryRecord {
    pub post_id: String,
    pub publish_time: Option<NaiveDateTime>,
    pub platform: Platform,
    pub permalink: Option<String>,
    pub reach: u64,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub replies: u64,
    pub link_clicks: u64,
    pub navigation: u64,
    pub profile_visits: u64,
    pub sticker_taps: u64,
    pub follows: u64,
}

/// Behavior shared by post and story records.
pub trait Record {
    /// Stable identity used for keep-last deduplication.
    fn post_id(&self) -> &str;
    /// Parsed publish timestamp, if the source carried one.
    fn published_at(&self) -> Option<NaiveDateTime>;
}

impl Record for PostRecord {
    fn post_id(&self) -> &str {
        &self.post_id
    }

    fn published_at(&self) -> Option<NaiveDateTime> {
        self.publish_time
    }
}

impl Record for StoryRecord {
    fn post_id(&self) -> &str {
        &self.post_id
    }

    fn published_at(&self) -> Option<NaiveDateTime> {
        self.publish_time
    }
}

/// Derived engagement figures for a single post.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngagementMetrics {
    pub total_engagement: u64,
    pub engagement_rate_reach: f64,
    pub engagement_rate_views: f64,
}

/// Computes per-post engagement totals and rates.
///
/// A zero denominator yields a rate of 0.0, never infinity or NaN.
pub fn derive_metrics(
    likes: u64,
    comments: u64,
    shares: u64,
    saves: u64,
    reach: u64,
    views: u64,
) -> EngagementMetrics {
    let total = likes + comments + shares + saves;
    EngagementMetrics {
        total_engagement: total,
        engagement_rate_reach: ratio(total, reach),
        engagement_rate_views: ratio(total, views),
    }
}

/// Numerator over denominator, 0.0 when the denominator is zero.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Keeps the last occurrence of each `post_id`, preserving the surviving
/// rows' relative order.
pub fn dedup_keep_last<T: Record>(records: Vec<T>) -> Vec<T> {
    let mut last_position: HashMap<String, usize> = HashMap::new();
    for (position, record) in records.iter().enumerate() {
        last_position.insert(record.post_id().to_owned(), position);
    }

    records
        .into_iter()
        .enumerate()
        .filter(|(position, record)| last_position[record.post_id()] == *position)
        .map(|(_, record)| record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_metrics_sums_interactions() {
        let metrics = derive_metrics(10, 5, 3, 2, 100, 50);

        assert_eq!(metrics.total_engagement, 20);
        assert_eq!(metrics.engagement_rate_reach, 0.2);
        assert_eq!(metrics.engagement_rate_views, 0.4);
    }

    #[test]
    fn test_derive_metrics_zero_denominators() {
        let metrics = derive_metrics(10, 0, 0, 0, 0, 0);

        assert_eq!(metrics.total_engagement, 10);
        assert_eq!(metrics.engagement_rate_reach, 0.0);
        assert_eq!(metrics.engagement_rate_views, 0.0);
    }

    #[test]
    fn test_ratio_with_zero_denominator() {
        assert_eq!(ratio(10, 0), 0.0);
    }

    #[test]
    fn test_dedup_keeps_last_occurrence_in_place() {
        let records = vec![
            PostRecord {
                post_id: "a".to_string(),
                reach: 10,
                ..Default::default()
            },
            PostRecord {
                post_id: "b".to_string(),
                reach: 5,
                ..Default::default()
            },
            PostRecord {
                post_id: "a".to_string(),
                reach: 20,
                ..Default::default()
            },
        ];

        let deduped = dedup_keep_last(records);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].post_id, "b");
        assert_eq!(deduped[1].post_id, "a");
        assert_eq!(deduped[1].reach, 20);
    }

    #[test]
    fn test_dedup_is_stable_under_repetition() {
        let records = vec![
            PostRecord {
                post_id: "a".to_string(),
                ..Default::default()
            },
            PostRecord {
                post_id: "b".to_string(),
                ..Default::default()
            },
        ];

        let once = dedup_keep_last(records.clone());
        let twice = dedup_keep_last(once.clone());

        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn test_platform_labels() {
        assert_eq!(Platform::Facebook.as_str(), "Facebook");
        assert_eq!(Platform::InstagramStory.as_str(), "Instagram Story");
    }
}
