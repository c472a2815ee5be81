//! Influence matching tests.

use offer_insight_core::{
    event::{Event, EventType},
    matcher::{influencing_offers, influencing_offers_in},
    synth::{self, SyntheticConfig},
    timeline::{timeline_in, EventLog, TimelineSource},
};

fn scenario_events() -> Vec<Event> {
    vec![
        Event::viewed("u1", "A", 1),
        Event::completed("u1", "A", 5),
        Event::viewed("u1", "B", 2),
        Event::completed("u1", "B", 1),
        Event::viewed("u2", "C", 0),
        Event::completed("u2", "C", 3),
    ]
}

/// A view after the completion must not count; a view before it must.
#[test]
fn view_before_completion_is_influence() {
    let events = scenario_events();
    let offers = influencing_offers("u1", &EventLog::new(&events)).unwrap();
    assert_eq!(offers, vec!["A"]);
}

#[test]
fn equal_timestamps_count_as_influence() {
    let events = vec![Event::completed("u", "A", 7), Event::viewed("u", "A", 7)];
    assert_eq!(influencing_offers_in(&events), vec!["A"]);
}

#[test]
fn completion_without_view_yields_nothing() {
    let events = vec![
        Event::received("u", "A", 0),
        Event::completed("u", "A", 10),
        Event::transaction("u", 12.5, 11),
    ];
    assert!(influencing_offers_in(&events).is_empty());
}

/// A view of a different offer does not influence the completed one.
#[test]
fn views_only_match_the_same_offer() {
    let events = vec![Event::viewed("u", "B", 0), Event::completed("u", "A", 10)];
    assert!(influencing_offers_in(&events).is_empty());
}

/// Every qualifying pair is emitted, so repeated views produce duplicates.
#[test]
fn repeated_views_are_kept_as_duplicates() {
    let events = vec![
        Event::viewed("u", "A", 1),
        Event::viewed("u", "A", 2),
        Event::viewed("u", "A", 9),
        Event::completed("u", "A", 5),
    ];
    assert_eq!(influencing_offers_in(&events), vec!["A", "A"]);
}

#[test]
fn unknown_customer_has_empty_timeline_and_no_influence() {
    let events = scenario_events();
    let log = EventLog::new(&events);
    assert!(log.timeline("nobody").unwrap().is_empty());
    assert!(influencing_offers("nobody", &log).unwrap().is_empty());
}

/// The matcher does not validate offer ids against any catalog.
#[test]
fn offers_outside_any_catalog_still_match() {
    let events = vec![Event::viewed("u", "ghost", 0), Event::completed("u", "ghost", 1)];
    assert_eq!(influencing_offers_in(&events), vec!["ghost"]);
}

#[test]
fn timeline_only_contains_the_requested_customer() {
    let events = vec![
        Event::viewed("u1", "A", 1),
        Event::viewed("u2", "A", 1),
        Event::completed("u1", "A", 2),
    ];
    let t = timeline_in("u1", &events);
    assert_eq!(t.len(), 2);
    assert!(t.iter().all(|e| e.customer_id == "u1"));

    let log = EventLog::new(&events);
    let indexed = log.timeline("u1").unwrap();
    assert_eq!(indexed.len(), 2);
    assert!(indexed.iter().all(|e| e.customer_id == "u1"));
}

/// Over a synthetic population, every matched offer is backed by a
/// completion with a view of the same offer at or before it, and every
/// such completion is represented.
#[test]
fn synthetic_population_respects_influence_definition() {
    let config = SyntheticConfig { customers: 300, ..SyntheticConfig::default() };
    let dataset = synth::generate(11, &config).unwrap();
    let log = EventLog::new(&dataset.events);

    for profile in &dataset.profiles {
        let timeline = log.timeline(&profile.id).unwrap();
        let offers = influencing_offers(&profile.id, &log).unwrap();

        let views = |offer: &str, at: u64| {
            timeline
                .iter()
                .filter(|e| e.is(EventType::OfferViewed) && e.offer_id() == Some(offer) && e.timestamp <= at)
                .count()
        };

        let mut expected = 0;
        for completion in timeline.iter().filter(|e| e.is(EventType::OfferCompleted)) {
            let offer = completion.offer_id().unwrap();
            let n = views(offer, completion.timestamp);
            expected += n;
            if n > 0 {
                assert!(offers.iter().any(|o| o == offer), "{} missing {offer}", profile.id);
            }
        }
        assert_eq!(offers.len(), expected, "pair count mismatch for {}", profile.id);

        for offer in &offers {
            let backed = timeline.iter().any(|c| {
                c.is(EventType::OfferCompleted)
                    && c.offer_id() == Some(offer.as_str())
                    && views(offer.as_str(), c.timestamp) > 0
            });
            assert!(backed, "{offer} for {} has no qualifying view", profile.id);
        }
    }
}
