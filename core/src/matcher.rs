//! Influence matcher — which offers preceded a customer's completions.
//!
//! An offer influenced a customer when a completion of that offer has at
//! least one view of the same offer at or before it (`<=`, ties count).
//! Any qualifying view is enough; it does not have to be the latest one.
//!
//! Output contract: one entry per qualifying (completion, view) pair,
//! ordered by completion in timeline order, then by view in timeline
//! order. Duplicates are kept. Downstream code only tests membership.
//!
//! This is the hot path of a run. Comparing every completion with every
//! view is O(completed × viewed) per customer, so views are first grouped
//! by offer id; each completion then only walks the views of its own
//! offer. The emitted sequence is identical to the exhaustive pairing.

use crate::{
    error::AnalysisResult,
    event::{Event, EventType},
    timeline::TimelineSource,
    types::{OfferId, Timestamp},
};
use std::collections::HashMap;

/// Influencing offers for one customer, looked up through `source`.
pub fn influencing_offers<S>(customer_id: &str, source: &S) -> AnalysisResult<Vec<OfferId>>
where
    S: TimelineSource + ?Sized,
{
    let timeline = source.timeline(customer_id)?;
    Ok(influencing_offers_in(timeline.iter().map(|e| &**e)))
}

/// Influencing offers for one customer's events (in any order).
pub fn influencing_offers_in<'a, I>(events: I) -> Vec<OfferId>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut views: HashMap<&'a str, Vec<Timestamp>> = HashMap::new();
    let mut completions: Vec<(&'a str, Timestamp)> = Vec::new();

    for event in events {
        let Some(offer_id) = event.offer_id() else { continue };
        match event.event_type {
            EventType::OfferViewed    => views.entry(offer_id).or_default().push(event.timestamp),
            EventType::OfferCompleted => completions.push((offer_id, event.timestamp)),
            _ => {}
        }
    }

    let mut offers = Vec::new();
    for (offer_id, completed_at) in completions {
        let Some(viewed_at) = views.get(offer_id) else { continue };
        let qualifying = viewed_at.iter().filter(|&&t| t <= completed_at).count();
        offers.extend(std::iter::repeat(offer_id.to_string()).take(qualifying));
    }
    offers
}
