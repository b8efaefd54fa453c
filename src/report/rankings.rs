//! Best/least performer selection.

use super::types::{RankedPost, Rankings};
use crate::records::PostRecord;

/// Picks best and least performers by reach and by total engagement.
///
/// Ties keep the earliest record in the set's current order. Zero-reach
/// records are excluded from the least-reach pick (zero reach usually
/// means the post was never measured) unless nothing in the set has
/// positive reach; zero engagement is always a valid least-engagement
/// pick.
pub fn rankings(posts: &[PostRecord]) -> Rankings {
    let least_reach = min_by_metric(posts.iter().filter(|p| p.reach > 0), |p| p.reach)
        .or_else(|| min_by_metric(posts.iter(), |p| p.reach));

    Rankings {
        best_reach: max_by_metric(posts.iter(), |p| p.reach).map(RankedPost::project),
        least_reach: least_reach.map(RankedPost::project),
        best_engagement: max_by_metric(posts.iter(), |p| p.total_engagement)
            .map(RankedPost::project),
        least_engagement: min_by_metric(posts.iter(), |p| p.total_engagement)
            .map(RankedPost::project),
    }
}

fn max_by_metric<'a>(
    posts: impl Iterator<Item = &'a PostRecord>,
    metric: impl Fn(&PostRecord) -> u64,
) -> Option<&'a PostRecord> {
    let mut best: Option<&PostRecord> = None;
    for post in posts {
        best = match best {
            Some(current) if metric(post) > metric(current) => Some(post),
            None => Some(post),
            keep => keep,
        };
    }
    best
}

fn min_by_metric<'a>(
    posts: impl Iterator<Item = &'a PostRecord>,
    metric: impl Fn(&PostRecord) -> u64,
) -> Option<&'a PostRecord> {
    let mut least: Option<&PostRecord> = None;
    for post in posts {
        least = match least {
            Some(current) if metric(post) < metric(current) => Some(post),
            None => Some(post),
            keep => keep,
        };
    }
    least
}
