//! Assembles the final report from the three accumulated record sets.

use chrono::NaiveDateTime;

use super::aggregate::{filter_window, platform_stats, split_particulars, story_stats};
use super::rankings::rankings;
use super::types::{Period, PlatformSection, PostRow, Report, StoryRow, StorySection};
use crate::records::{PostRecord, StoryRecord};

const PERIOD_DISPLAY: &str = "%Y-%m-%d";

/// Builds the full report for a closed datetime window.
///
/// Each set is filtered to the window independently; the particulars block
/// compares combined Instagram activity (posts + stories) against Facebook
/// posts.
pub fn generate_report(
    facebook: &[PostRecord],
    instagram: &[PostRecord],
    stories: &[StoryRecord],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Report {
    let facebook = filter_window(facebook, start, end);
    let instagram = filter_window(instagram, start, end);
    let stories = filter_window(stories, start, end);

    Report {
        period: Period {
            start: start.format(PERIOD_DISPLAY).to_string(),
            end: end.format(PERIOD_DISPLAY).to_string(),
        },
        aggregated: split_particulars(&facebook, &instagram, &stories),
        facebook: platform_section(&facebook),
        instagram: platform_section(&instagram),
        stories: StorySection {
            stats: story_stats(&stories),
            data: stories.iter().map(StoryRow::project).collect(),
        },
    }
}

fn platform_section(posts: &[PostRecord]) -> PlatformSection {
    PlatformSection {
        stats: platform_stats(posts),
        rankings: rankings(posts),
        posts: posts.iter().map(PostRow::project).collect(),
    }
}
