//! Property tests for the metrics pipeline.

use std::sync::Arc;

use proptest::prelude::*;

use marquee::data::{categorize, derive, roi_percent};
use marquee::{
    CategoryScope, FilterCriteria, MetricsPipeline, Movie, MovieRecord, RawTable,
    SuccessCategory, TierScheme,
};

fn movie(name: String, revenue: f64, score: Option<f64>, year: Option<i32>) -> Arc<Movie> {
    let release_date = year.and_then(|y| chrono::NaiveDate::from_ymd_opt(y, 6, 1));
    Arc::new(derive(MovieRecord {
        revenue,
        score,
        release_date,
        genres: vec!["Drama".into()],
        ..MovieRecord::named(name)
    }))
}

fn movies() -> impl Strategy<Value = Vec<Arc<Movie>>> {
    proptest::collection::vec(
        (
            "[a-z]{1,8}",
            0.0..1e10f64,
            proptest::option::of(0.0..=10.0f64),
            proptest::option::of(1950..2025i32),
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(name, revenue, score, year)| movie(name, revenue, score, year))
            .collect()
    })
}

proptest! {
    #[test]
    fn roi_is_always_finite(revenue in any::<f64>(), budget in any::<f64>()) {
        let roi = roi_percent(revenue, budget);
        prop_assert!(roi.is_finite());
        if budget <= 0.0 || budget.is_nan() {
            prop_assert_eq!(roi, 0.0);
        }
    }

    #[test]
    fn tiers_are_monotonic_in_revenue(set in movies(), five in any::<bool>()) {
        let scheme = if five { TierScheme::Five } else { TierScheme::Four };
        let enriched = categorize(&set, scheme);
        prop_assert_eq!(enriched.len(), set.len());

        for a in &enriched {
            for b in &enriched {
                if a.record().revenue < b.record().revenue {
                    prop_assert!(a.category <= b.category);
                }
            }
        }
    }

    #[test]
    fn filtering_is_idempotent(
        set in movies(),
        lo in 1950..2025i32,
        span in 0..30i32,
        min_score in 0.0..=10.0f64,
    ) {
        let criteria = FilterCriteria::new()
            .with_year_range(lo, lo + span)
            .with_score_range(min_score, 10.0);

        let once = criteria.apply(&set);
        let twice = criteria.apply(&once);
        prop_assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            prop_assert!(Arc::ptr_eq(a, b));
        }
    }

    #[test]
    fn unconstrained_filter_keeps_everything(set in movies()) {
        let kept = FilterCriteria::new().apply(&set);
        prop_assert_eq!(kept.len(), set.len());
    }
}

#[test]
fn degenerate_working_sets_are_all_low() {
    let single = vec![movie("only".into(), 5e8, None, Some(2000))];
    let flat: Vec<_> = (0..4).map(|i| movie(format!("m{i}"), 1e6, None, Some(2000))).collect();

    for set in [single, flat] {
        assert!(categorize(&set, TierScheme::Four)
            .iter()
            .all(|e| e.category == SuccessCategory::Low));
    }
}

#[test]
fn dirty_csv_end_to_end() {
    let table = RawTable::parse_csv(
        "names,date_x,score,genre,crew,orig_lang,budget_x,revenue,country\n\
         Creed III,03/02/2023,73,\"Drama,\u{a0}Action\",x,English,75000000,271616668,AU\n\
         Broken,,,,x,English,,,ZZZZ\n\
         Free,not a date,abc,Comedy,x,French,0,$1,234,FR\n",
    );
    // The unquoted thousands separator makes the last row one cell too wide.
    assert!(table.is_err());

    let table = RawTable::parse_csv(
        "names,date_x,score,genre,crew,orig_lang,budget_x,revenue,country\n\
         Creed III,03/02/2023,73,\"Drama,\u{a0}Action\",x,English,75000000,271616668,AU\n\
         Broken,,,,x,English,,,ZZZZ\n\
         Free,not a date,abc,Comedy,x,French,0,\"$1,234\",FR\n",
    )
    .unwrap();

    let settings = marquee::Settings { score_scale: 100.0, ..Default::default() };
    let dataset = MetricsPipeline::new(settings.pipeline_options()).run(&table);
    assert_eq!(dataset.len(), 3);

    let creed = &dataset.movies[0];
    assert_eq!(creed.record.genres, vec!["Drama", "Action"]);
    assert_eq!(creed.record.score, Some(7.3));
    assert_eq!(creed.metrics.year, 2023);
    assert_eq!(creed.metrics.month, 3);

    let broken = &dataset.movies[1];
    assert_eq!(broken.record.revenue, 0.0);
    assert_eq!(broken.record.score, None);
    assert!(broken.record.genres.is_empty());
    assert!(!broken.metrics.has_date());

    let free = &dataset.movies[2];
    assert_eq!(free.record.revenue, 1234.0);
    assert_eq!(free.metrics.roi_percent, 0.0);

    let drama = FilterCriteria::new().with_genres(["Drama"]);
    let view = dataset.view(&drama, CategoryScope::FullDataset);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].category, SuccessCategory::Blockbuster);
}
