//! Synthetic datasets — deterministic stand-ins for the real exports.
//!
//! Produces a portfolio, profiles and a transcript with the same shape as
//! the production files: offers are received, sometimes viewed, sometimes
//! completed (possibly before the view), and customers transact at random.
//! A fraction of profiles carry the null/sentinel values cleaning removes.

use crate::{
    catalog::{Offer, OfferCatalog, OfferType},
    error::AnalysisResult,
    event::Event,
    ingest::Dataset,
    profile::{Gender, Profile, AGE_SENTINEL},
    rng::{StreamSlot, SynthRng},
    types::Timestamp,
};

const OFFER_TYPES: [OfferType; 3] = [OfferType::Bogo, OfferType::Discount, OfferType::Informational];
const GENDERS: [Gender; 3] = [Gender::Female, Gender::Male, Gender::Other];
const CHANNELS: [&str; 4] = ["email", "mobile", "social", "web"];

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub customers:                      usize,
    pub offers:                         usize,
    /// Length of the observation window in hours.
    pub horizon:                        Timestamp,
    pub max_offers_per_customer:        u64,
    pub max_transactions:               u64,
    pub view_probability:               f64,
    pub completion_probability:         f64,
    pub incomplete_profile_probability: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            customers:                      500,
            offers:                         10,
            horizon:                        714,
            max_offers_per_customer:        6,
            max_transactions:               8,
            view_probability:               0.75,
            completion_probability:         0.5,
            incomplete_profile_probability: 0.12,
        }
    }
}

pub fn generate(seed: u64, config: &SyntheticConfig) -> AnalysisResult<Dataset> {
    let catalog = generate_catalog(seed, config)?;
    let profiles = generate_profiles(seed, config);
    let events = generate_transcript(seed, config, &catalog, &profiles);

    log::info!(
        "synth: seed={seed} -> {} offers, {} profiles, {} events",
        catalog.len(),
        profiles.len(),
        events.len()
    );
    Ok(Dataset { catalog, events, profiles })
}

fn generate_catalog(seed: u64, config: &SyntheticConfig) -> AnalysisResult<OfferCatalog> {
    let mut rng = SynthRng::new(seed, StreamSlot::Catalog);
    let offers = (0..config.offers)
        .map(|i| {
            let offer_type = *rng.pick(&OFFER_TYPES);
            let channels = CHANNELS
                .iter()
                .filter(|_| rng.chance(0.7))
                .map(|c| c.to_string())
                .collect();
            let (reward, difficulty) = match offer_type {
                OfferType::Informational => (0.0, 0.0),
                _ => {
                    let difficulty = rng.range_inclusive(5, 20) as f64;
                    (rng.range_inclusive(2, difficulty as u64) as f64, difficulty)
                }
            };
            Offer {
                id: format!("offer-{i:02}"),
                offer_type,
                reward,
                difficulty,
                duration: rng.range_inclusive(3, 10) as f64,
                channels,
            }
        })
        .collect();
    OfferCatalog::new(offers)
}

fn generate_profiles(seed: u64, config: &SyntheticConfig) -> Vec<Profile> {
    let mut rng = SynthRng::new(seed, StreamSlot::Profiles);
    (0..config.customers)
        .map(|i| {
            let id = format!("cust-{i:05}");
            let became_member_on = 2013_00_00
                + rng.range_inclusive(0, 5) as u32 * 1_00_00
                + rng.range_inclusive(1, 12) as u32 * 1_00
                + rng.range_inclusive(1, 28) as u32;
            if rng.chance(config.incomplete_profile_probability) {
                return Profile {
                    id,
                    gender: None,
                    age: AGE_SENTINEL,
                    income: None,
                    became_member_on,
                };
            }
            Profile {
                id,
                gender: Some(*rng.pick(&GENDERS)),
                age: rng.range_inclusive(18, 101) as u32,
                income: Some(rng.range_inclusive(30, 120) as f64 * 1_000.0),
                became_member_on,
            }
        })
        .collect()
}

fn generate_transcript(
    seed: u64,
    config: &SyntheticConfig,
    catalog: &OfferCatalog,
    profiles: &[Profile],
) -> Vec<Event> {
    let mut rng = SynthRng::new(seed, StreamSlot::Transcript);
    let mut events = Vec::new();

    for profile in profiles {
        let customer = profile.id.as_str();

        if !catalog.is_empty() {
            for _ in 0..rng.range_inclusive(0, config.max_offers_per_customer) {
                let offer = rng.pick(catalog.offers());
                let received_at = rng.range_inclusive(0, config.horizon);
                events.push(Event::received(customer, &offer.id, received_at));

                if rng.chance(config.view_probability) {
                    let viewed_at = (received_at + rng.range_inclusive(0, 72)).min(config.horizon);
                    events.push(Event::viewed(customer, &offer.id, viewed_at));
                }
                // Completion time is independent of the view, so some
                // completions land before the customer ever saw the offer.
                if offer.offer_type != OfferType::Informational
                    && rng.chance(config.completion_probability)
                {
                    let completed_at = (received_at + rng.range_inclusive(0, 168)).min(config.horizon);
                    events.push(Event::completed(customer, &offer.id, completed_at));
                }
            }
        }

        for _ in 0..rng.range_inclusive(0, config.max_transactions) {
            let amount = rng.range_inclusive(50, 5_000) as f64 / 100.0;
            events.push(Event::transaction(customer, amount, rng.range_inclusive(0, config.horizon)));
        }
    }

    // Exports are ordered by time, not by customer.
    events.sort_by_key(|e| e.timestamp);
    events
}
