//! End-to-end pipeline tests.

use offer_insight_core::{
    catalog::{Offer, OfferCatalog, OfferType},
    config::{AnalysisConfig, TimelineBackend},
    event::Event,
    ingest::Dataset,
    pipeline::InfluenceAnalysis,
    profile::{Gender, Profile},
    ranking::{RankingOutcome, UnavailableReason},
    synth::{self, SyntheticConfig},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn profile(id: &str, gender: Option<Gender>, age: u32, income: Option<f64>) -> Profile {
    Profile {
        id: id.into(),
        gender,
        age,
        income,
        became_member_on: 20170101,
    }
}

fn scenario_dataset() -> Dataset {
    let catalog = OfferCatalog::new(vec![
        Offer::new("A", OfferType::Discount),
        Offer::new("B", OfferType::Bogo),
        Offer::new("C", OfferType::Informational),
    ])
    .unwrap();

    let events = vec![
        Event::viewed("u1", "A", 1),
        Event::completed("u1", "A", 5),
        Event::viewed("u1", "B", 2),
        Event::completed("u1", "B", 1),
        Event::transaction("u1", 20.0, 5),
        // Influenced, but outside the segment.
        Event::viewed("m1", "B", 0),
        Event::completed("m1", "B", 2),
        Event::transaction("m1", 8.0, 2),
        // In the segment, never transacts.
        Event::viewed("u2", "C", 0),
        Event::completed("u2", "C", 1),
        // In the segment, transacts, only a late view.
        Event::completed("u3", "A", 1),
        Event::viewed("u3", "A", 2),
        Event::transaction("u3", 4.0, 3),
    ];

    let profiles = vec![
        profile("u1", Some(Gender::Female), 50, Some(80_000.0)),
        profile("u2", Some(Gender::Female), 61, Some(95_000.0)),
        profile("u3", Some(Gender::Female), 45, Some(64_000.0)),
        profile("m1", Some(Gender::Male), 50, Some(80_000.0)),
        profile("x1", None, 118, None),
    ];

    Dataset { catalog, events, profiles }
}

#[test]
fn scenario_ranks_single_influencing_offer() {
    init_logging();
    let analysis = InfluenceAnalysis::new(AnalysisConfig::default_test());
    let report = analysis.run(&scenario_dataset()).unwrap();

    assert_eq!(report.stats.profiles_loaded, 5);
    assert_eq!(report.stats.profiles_cleaned, 4);
    assert_eq!(report.stats.in_segment, 3);
    assert_eq!(report.stats.transacted, 2);
    assert_eq!(report.stats.not_transacted, 1);
    assert_eq!(report.stats.analyzed, 1);
    assert_eq!(report.stats.excluded, 1);

    assert_eq!(report.influence.len(), 1);
    assert_eq!(report.influence[0].customer_id, "u1");
    assert_eq!(report.influence[0].offers, vec!["A"]);

    assert_eq!(report.counts.get("A"), Some(1));
    assert_eq!(report.counts.get("B"), Some(0));
    assert_eq!(report.counts.get("C"), Some(0));

    let ranking = report.ranking.ranking().expect("ranking");
    assert_eq!(ranking.top.offer_id, "A");
    assert_eq!(ranking.top.customers, 1);
    assert!(ranking.runner_up.is_none());

    let text = report.to_string();
    assert!(text.contains("No second influencing offer"));
}

#[test]
fn empty_catalog_reports_no_ranking() {
    let mut dataset = scenario_dataset();
    dataset.catalog = OfferCatalog::default();

    let report = InfluenceAnalysis::new(AnalysisConfig::default_test())
        .run(&dataset)
        .unwrap();

    assert!(report.counts.is_empty());
    assert_eq!(
        report.ranking,
        RankingOutcome::Unavailable { reason: UnavailableReason::EmptyCatalog }
    );
    assert!(report.to_string().contains("No ranking available"));
}

/// Same inputs, two runs: identical influence, counts and ranking.
#[test]
fn pipeline_is_idempotent() {
    let config = SyntheticConfig { customers: 400, ..SyntheticConfig::default() };
    let dataset = synth::generate(0x0FFE_5EED, &config).unwrap();
    let analysis = InfluenceAnalysis::new(AnalysisConfig::default_test());

    let a = analysis.run(&dataset).unwrap();
    let b = analysis.run(&dataset).unwrap();

    assert_eq!(a.stats, b.stats);
    assert_eq!(a.influence, b.influence);
    assert_eq!(a.counts, b.counts);
    assert_eq!(a.ranking, b.ranking);
}

/// The SQLite staging backend must agree with the in-memory one.
#[test]
fn sqlite_backend_matches_memory_backend() {
    init_logging();
    let config = SyntheticConfig { customers: 250, ..SyntheticConfig::default() };
    let dataset = synth::generate(99, &config).unwrap();

    let memory = InfluenceAnalysis::new(AnalysisConfig::default_test())
        .run(&dataset)
        .unwrap();
    let sqlite = InfluenceAnalysis::new(
        AnalysisConfig::default_test().with_backend(TimelineBackend::Sqlite),
    )
    .run(&dataset)
    .unwrap();

    assert_eq!(memory.stats, sqlite.stats);
    assert_eq!(memory.influence, sqlite.influence);
    assert_eq!(memory.counts, sqlite.counts);
    assert_eq!(memory.ranking, sqlite.ranking);
}

#[test]
fn synthetic_generation_is_deterministic() {
    let config = SyntheticConfig { customers: 120, ..SyntheticConfig::default() };
    let a = synth::generate(7, &config).unwrap();
    let b = synth::generate(7, &config).unwrap();
    let c = synth::generate(8, &config).unwrap();

    assert_eq!(a.catalog, b.catalog);
    assert_eq!(a.profiles, b.profiles);
    assert_eq!(a.events, b.events);
    assert_ne!(a.events, c.events, "different seeds produced identical transcripts");
}

#[test]
fn report_serializes_to_json() {
    let report = InfluenceAnalysis::new(AnalysisConfig::default_test())
        .run(&scenario_dataset())
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["ranking"]["status"], "ranked");
    assert_eq!(json["ranking"]["top"]["offer_id"], "A");
    assert!(json["ranking"]["runner_up"].is_null());
    assert_eq!(json["counts"]["entries"].as_array().map(Vec::len), Some(3));
}

/// Sentinel removal belongs to cleaning, so a configured sentinel other
/// than 118 lets a real 118-year-old through to the segment.
#[test]
fn configured_age_sentinel_governs_cleaning_and_segment() {
    let catalog = OfferCatalog::new(vec![Offer::new("A", OfferType::Discount)]).unwrap();
    let events = vec![
        Event::viewed("old", "A", 0),
        Event::completed("old", "A", 2),
        Event::transaction("old", 10.0, 2),
    ];
    let dataset = Dataset {
        catalog,
        events,
        profiles: vec![
            profile("old", Some(Gender::Female), 118, Some(90_000.0)),
            profile("unknown", Some(Gender::Female), 999, Some(90_000.0)),
        ],
    };

    let mut config = AnalysisConfig::default_test();
    config.age_sentinel = 999;
    let report = InfluenceAnalysis::new(config).run(&dataset).unwrap();

    assert_eq!(report.stats.profiles_cleaned, 1);
    assert_eq!(report.stats.in_segment, 1);
    assert_eq!(report.stats.analyzed, 1);
    assert_eq!(report.counts.get("A"), Some(1));
}
