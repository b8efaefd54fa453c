//! Date windowing and aggregate statistics over normalized record sets.

use chrono::{NaiveDate, NaiveDateTime};

use super::types::{Aggregated, Particulars, PlatformStats, StoryStats};
use crate::records::{PostRecord, Record, StoryRecord, ratio};

/// First instant of the given calendar date.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap()
}

/// Last instant (second resolution) of the given calendar date, so a
/// date-only end boundary is inclusive through the whole day.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap()
}

/// Records whose `publish_time` falls inside the closed window.
///
/// Records without a timestamp never match, regardless of window.
pub fn filter_window<T: Record + Clone>(
    records: &[T],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<T> {
    records
        .iter()
        .filter(|record| {
            record
                .published_at()
                .is_some_and(|published| published >= start && published <= end)
        })
        .cloned()
        .collect()
}

/// Platform totals with ratio-of-sums average rates.
///
/// The average rates divide summed engagement by summed reach (or views),
/// not the mean of per-post rates. Empty input yields all zeros.
pub fn platform_stats(posts: &[PostRecord]) -> PlatformStats {
    let total_reach: u64 = posts.iter().map(|p| p.reach).sum();
    let total_views: u64 = posts.iter().map(|p| p.views).sum();
    let total_engagement: u64 = posts.iter().map(|p| p.total_engagement).sum();
    let total_follows: u64 = posts.iter().map(|p| p.follows).sum();

    PlatformStats {
        total_posts: posts.len() as u64,
        total_reach,
        total_views,
        total_engagement,
        avg_engagement_rate_reach: ratio(total_engagement, total_reach),
        avg_engagement_rate_views: ratio(total_engagement, total_views),
        total_follows,
    }
}

/// Particulars for Instagram (posts + stories) and Facebook (posts only),
/// computed over already date-filtered sets.
pub fn split_particulars(
    facebook: &[PostRecord],
    instagram: &[PostRecord],
    stories: &[StoryRecord],
) -> Aggregated {
    Aggregated {
        instagram: particulars(instagram, stories),
        facebook: particulars(facebook, &[]),
    }
}

/// Shared particulars formulas; Facebook passes an empty stories slice.
///
/// Stories add to reach and interactions but not to the views figure.
/// Story navigation and follows stay out of the interaction sum, as do
/// post follows; `average_interaction` divides by the post count only.
fn particulars(posts: &[PostRecord], stories: &[StoryRecord]) -> Particulars {
    let post_reach: u64 = posts.iter().map(|p| p.reach).sum();
    let story_reach: u64 = stories.iter().map(|s| s.reach).sum();
    let total_reach = post_reach + story_reach;

    let total_views: u64 = posts.iter().map(|p| p.views).sum();

    let post_interactions: u64 = posts
        .iter()
        .map(|p| p.likes + p.comments + p.shares + p.saves)
        .sum();
    let story_interactions: u64 = stories
        .iter()
        .map(|s| s.likes + s.shares + s.replies + s.link_clicks + s.profile_visits + s.sticker_taps)
        .sum();
    let interactions_wo_views = post_interactions + story_interactions;

    let total_engagement = interactions_wo_views + total_views;

    let post_count = posts.len() as u64;
    let average_interaction = if post_count > 0 {
        interactions_wo_views as f64 / post_count as f64
    } else {
        0.0
    };

    Particulars {
        total_reach,
        total_engagement,
        total_views,
        interactions_wo_views,
        eng_rate_with_views: percent(total_engagement, total_reach),
        eng_rate_wo_views: percent(interactions_wo_views, total_reach),
        video_view_rate: percent(total_views, total_reach),
        average_interaction,
    }
}

/// Totals for the stories section.
pub fn story_stats(stories: &[StoryRecord]) -> StoryStats {
    let total_views: u64 = stories.iter().map(|s| s.views).sum();
    let count = stories.len() as u64;

    StoryStats {
        total_stories: count,
        total_reach: stories.iter().map(|s| s.reach).sum(),
        total_views,
        avg_views_per_story: if count > 0 {
            total_views as f64 / count as f64
        } else {
            0.0
        },
        total_link_clicks: stories.iter().map(|s| s.link_clicks).sum(),
        total_replies: stories.iter().map(|s| s.replies).sum(),
        total_profile_visits: stories.iter().map(|s| s.profile_visits).sum(),
        total_follows: stories.iter().map(|s| s.follows).sum(),
    }
}

/// Part over total as a percentage, 0.0 when the total is zero.
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
