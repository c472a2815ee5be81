//! Influence aggregator — per-offer customer counts.

use crate::{
    catalog::{OfferCatalog, OfferType},
    population::InfluencedCustomer,
    types::OfferId,
};
use serde::Serialize;

/// Count for one catalog offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferCount {
    pub offer_id:   OfferId,
    pub offer_type: OfferType,
    /// Distinct customers influenced by this offer.
    pub customers:  u64,
}

/// Per-offer counts in catalog order. Every catalog offer has an entry,
/// zero counts included, and no other offer does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InfluenceCounts {
    entries: Vec<OfferCount>,
}

impl InfluenceCounts {
    /// Wrap precomputed counts. `entries` must already be in catalog order.
    pub fn from_entries(entries: Vec<OfferCount>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[OfferCount] {
        &self.entries
    }

    pub fn get(&self, offer_id: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.offer_id == offer_id)
            .map(|e| e.customers)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.customers).sum()
    }
}

/// Count, for each catalog offer in catalog order, the customers whose
/// influence list contains it. A customer counts at most once per offer.
pub fn count_influence(catalog: &OfferCatalog, population: &[InfluencedCustomer]) -> InfluenceCounts {
    let entries = catalog
        .offers()
        .iter()
        .map(|offer| {
            let customers = population
                .iter()
                .filter(|c| c.was_influenced_by(&offer.id))
                .count() as u64;
            log::debug!("aggregate: {} ({}) - {customers}", offer.id, offer.offer_type);
            OfferCount {
                offer_id: offer.id.clone(),
                offer_type: offer.offer_type,
                customers,
            }
        })
        .collect();

    InfluenceCounts { entries }
}
