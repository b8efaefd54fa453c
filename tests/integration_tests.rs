use chrono::NaiveDate;
use meta_insights::store::DatasetStore;

fn loaded_store() -> DatasetStore {
    let mut store = DatasetStore::new();
    store
        .ingest_facebook(include_bytes!("fixtures/facebook_posts.csv"))
        .expect("Failed to ingest Facebook fixture");
    store
        .ingest_instagram(include_bytes!("fixtures/instagram_posts.csv"))
        .expect("Failed to ingest Instagram fixture");
    store
        .ingest_stories(include_bytes!("fixtures/instagram_stories.csv"))
        .expect("Failed to ingest stories fixture");
    store
}

fn january() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
    )
}

#[test]
fn test_full_pipeline() {
    let store = loaded_store();

    // The Facebook fixture has five rows, one a re-export of fb1
    assert_eq!(store.facebook().len(), 4);
    let fb1 = store
        .facebook()
        .iter()
        .find(|r| r.post_id == "fb1")
        .unwrap();
    assert_eq!(fb1.reach, 1500); // thousands separator stripped, last row wins
    assert_eq!(fb1.total_engagement, 150);

    let (start, end) = january();
    let report = store.report(start, end);

    // fb3 has no parsable timestamp and fb4 is published in February
    let fb = &report.facebook;
    assert_eq!(fb.stats.total_posts, 2);
    assert_eq!(fb.stats.total_reach, 1500);
    assert_eq!(fb.stats.total_views, 5450);
    assert_eq!(fb.stats.total_engagement, 155);
    assert!((fb.stats.avg_engagement_rate_reach - 155.0 / 1500.0).abs() < 1e-9);

    // fb2 has zero reach, so fb1 is both best and least by reach
    let rankings = &fb.rankings;
    assert_eq!(rankings.best_reach.as_ref().unwrap().post_id, "fb1");
    assert_eq!(rankings.least_reach.as_ref().unwrap().post_id, "fb1");
    assert_eq!(rankings.best_engagement.as_ref().unwrap().post_id, "fb1");
    assert_eq!(rankings.least_engagement.as_ref().unwrap().post_id, "fb2");
    assert_eq!(
        rankings.best_reach.as_ref().unwrap().publish_time,
        "2025-01-05 10:00"
    );

    let ig = &report.instagram;
    assert_eq!(ig.stats.total_posts, 2);
    assert_eq!(ig.stats.total_reach, 750);
    assert_eq!(ig.stats.total_follows, 4);

    let stories = &report.stories.stats;
    assert_eq!(stories.total_stories, 2);
    assert_eq!(stories.total_reach, 550);
    assert_eq!(stories.total_views, 590);
    assert_eq!(stories.avg_views_per_story, 295.0);
    assert_eq!(stories.total_link_clicks, 6);
    assert_eq!(stories.total_profile_visits, 9);

    // Instagram particulars combine posts and stories; views stay posts-only
    let particulars = &report.aggregated.instagram;
    assert_eq!(particulars.total_reach, 1300);
    assert_eq!(particulars.total_views, 1000);
    assert_eq!(particulars.interactions_wo_views, 97);
    assert_eq!(particulars.total_engagement, 1097);
    assert_eq!(particulars.average_interaction, 48.5);

    let facebook = &report.aggregated.facebook;
    assert_eq!(facebook.total_reach, 1500);
    assert_eq!(facebook.interactions_wo_views, 155);
    assert_eq!(facebook.total_engagement, 5605);
}

#[test]
fn test_reingesting_fixture_is_idempotent() {
    let mut store = loaded_store();

    store
        .ingest_facebook(include_bytes!("fixtures/facebook_posts.csv"))
        .unwrap();

    assert_eq!(store.facebook().len(), 4);
}

#[test]
fn test_report_serializes_with_stable_field_names() {
    let store = loaded_store();
    let (start, end) = january();

    let value = serde_json::to_value(store.report(start, end)).unwrap();

    assert_eq!(value["period"]["start"], "2025-01-01");
    assert_eq!(value["period"]["end"], "2025-01-31");
    assert!(value["aggregated"]["instagram"].get("eng_rate_with_views").is_some());
    assert!(value["facebook"]["stats"].get("avg_engagement_rate_reach").is_some());
    assert!(value["facebook"]["rankings"].get("least_reach").is_some());
    assert!(value["stories"].get("data").is_some());

    let first_story = &value["stories"]["data"][0];
    assert_eq!(first_story["post_id"], "st1");
    assert!(first_story.get("sticker_taps").is_some());
}

#[test]
fn test_empty_window_yields_zeroed_report() {
    let store = loaded_store();

    let report = store.report(
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2030, 12, 31).unwrap(),
    );

    assert_eq!(report.facebook.stats.total_posts, 0);
    assert!(report.facebook.rankings.best_reach.is_none());
    assert_eq!(report.aggregated.instagram.total_reach, 0);
    assert_eq!(report.aggregated.instagram.eng_rate_with_views, 0.0);
    assert!(report.stories.data.is_empty());
}
