//! Analysis report — everything a run hands to the presentation layer.

use crate::{
    aggregate::InfluenceCounts,
    population::AnalyzedPopulation,
    ranking::{RankedOffer, RankingOutcome, UnavailableReason},
    types::{CustomerId, OfferId, RunId},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Head counts at each stage of the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PopulationStats {
    pub profiles_loaded:  usize,
    pub profiles_cleaned: usize,
    pub in_segment:       usize,
    pub transacted:       usize,
    pub not_transacted:   usize,
    pub analyzed:         usize,
    pub excluded:         usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerInfluence {
    pub customer_id: CustomerId,
    pub offers:      Vec<OfferId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id:       RunId,
    pub generated_at: DateTime<Utc>,
    pub segment:      String,
    pub stats:        PopulationStats,
    pub influence:    Vec<CustomerInfluence>,
    pub counts:       InfluenceCounts,
    pub ranking:      RankingOutcome,
}

impl AnalysisReport {
    pub fn influence_from(population: &AnalyzedPopulation) -> Vec<CustomerInfluence> {
        population
            .analyzed
            .iter()
            .map(|c| CustomerInfluence {
                customer_id: c.customer.id.clone(),
                offers:      c.influencing_offers.clone(),
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn write_ranked(&self, f: &mut fmt::Formatter<'_>, label: &str, offer: &RankedOffer) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "The {label} influencing offer for {},", self.segment)?;
        writeln!(f, "  {} - {}", offer.offer_id, offer.offer_type)?;
        writeln!(f, "  with count - {}", offer.customers)?;
        writeln!(f, "  out of {} influenced customers.", self.stats.analyzed)
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "=== INFLUENCE ANALYSIS ===")?;
        writeln!(f, "  run_id:           {}", self.run_id)?;
        writeln!(f, "  generated_at:     {}", self.generated_at.to_rfc3339())?;
        writeln!(f, "  segment:          {}", self.segment)?;
        writeln!(f, "  profiles loaded:  {}", s.profiles_loaded)?;
        writeln!(f, "  profiles cleaned: {}", s.profiles_cleaned)?;
        writeln!(f, "  in segment:       {}", s.in_segment)?;
        writeln!(f, "  transacted:       {}", s.transacted)?;
        writeln!(f, "  not transacted:   {}", s.not_transacted)?;
        writeln!(f, "  analyzed:         {}", s.analyzed)?;
        writeln!(f, "  excluded:         {} (no influencing offer)", s.excluded)?;

        writeln!(f)?;
        writeln!(f, "=== OFFER COUNTS (catalog order) ===")?;
        for entry in self.counts.entries() {
            writeln!(f, "  {} - {} - {}", entry.offer_id, entry.offer_type, entry.customers)?;
        }

        match &self.ranking {
            RankingOutcome::Ranked(ranking) => {
                self.write_ranked(f, "maximum", &ranking.top)?;
                match &ranking.runner_up {
                    Some(second) => self.write_ranked(f, "second maximum", second)?,
                    None => {
                        writeln!(f)?;
                        writeln!(f, "No second influencing offer: no other offer influenced this segment.")?;
                    }
                }
            }
            RankingOutcome::Unavailable { reason } => {
                writeln!(f)?;
                let why = match reason {
                    UnavailableReason::EmptyCatalog => "the offer catalog is empty",
                    UnavailableReason::NoInfluence  => "no offer influenced any customer in the segment",
                };
                writeln!(f, "No ranking available: {why}.")?;
            }
        }
        Ok(())
    }
}
