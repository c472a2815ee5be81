//! Population filter — keep the customers some offer actually influenced.
//!
//! Each customer's influence is computed from that customer's timeline
//! alone, so the result for one customer never depends on another.

use crate::{
    error::AnalysisResult,
    matcher::influencing_offers,
    profile::Customer,
    timeline::TimelineSource,
    types::{CustomerId, OfferId},
};
use serde::Serialize;

/// A transacting customer together with the offers that influenced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencedCustomer {
    pub customer:           Customer,
    /// Never empty for customers in `AnalyzedPopulation::analyzed`.
    pub influencing_offers: Vec<OfferId>,
}

impl InfluencedCustomer {
    pub fn was_influenced_by(&self, offer_id: &str) -> bool {
        self.influencing_offers.iter().any(|o| o == offer_id)
    }
}

/// The segment split into analyzed and excluded customers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyzedPopulation {
    /// Transacted and influenced by at least one offer, in input order.
    pub analyzed:       Vec<InfluencedCustomer>,
    /// Transacted, but no completion was preceded by a view.
    pub excluded:       Vec<CustomerId>,
    /// Never transacted; not matched at all.
    pub not_transacted: Vec<CustomerId>,
}

impl AnalyzedPopulation {
    pub fn analyzed_count(&self) -> usize {
        self.analyzed.len()
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn transacted_count(&self) -> usize {
        self.analyzed.len() + self.excluded.len()
    }
}

/// Match every transacting customer and drop the ones with no influence.
pub fn analyze_population<S>(customers: &[Customer], source: &S) -> AnalysisResult<AnalyzedPopulation>
where
    S: TimelineSource + ?Sized,
{
    let mut population = AnalyzedPopulation::default();

    for customer in customers {
        if !customer.has_transacted {
            population.not_transacted.push(customer.id.clone());
            continue;
        }

        let offers = influencing_offers(&customer.id, source)?;
        if offers.is_empty() {
            population.excluded.push(customer.id.clone());
        } else {
            population.analyzed.push(InfluencedCustomer {
                customer:           customer.clone(),
                influencing_offers: offers,
            });
        }
    }

    log::info!(
        "population: {} analyzed, {} excluded (no influencing offer), {} not transacted",
        population.analyzed_count(),
        population.excluded_count(),
        population.not_transacted.len()
    );
    Ok(population)
}
