//! Offer catalog — the portfolio of promotional offers.
//!
//! RULE: Catalog order is part of the ranking contract.
//! The catalog is an ordered sequence, never a map. Aggregation iterates
//! it front to back and ranking ties resolve to the earlier entry.

use crate::{
    error::{AnalysisError, AnalysisResult},
    types::OfferId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    Bogo,
    Discount,
    Informational,
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bogo          => "bogo",
            Self::Discount      => "discount",
            Self::Informational => "informational",
        };
        f.write_str(s)
    }
}

/// One portfolio row. Only `id` and `offer_type` matter to attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id:         OfferId,
    pub offer_type: OfferType,
    #[serde(default)]
    pub reward:     f64,
    #[serde(default)]
    pub difficulty: f64,
    /// Days the offer stays open after it is received.
    #[serde(default)]
    pub duration:   f64,
    #[serde(default)]
    pub channels:   Vec<String>,
}

impl Offer {
    pub fn new(id: &str, offer_type: OfferType) -> Self {
        Self {
            id: id.to_string(),
            offer_type,
            reward: 0.0,
            difficulty: 0.0,
            duration: 0.0,
            channels: Vec::new(),
        }
    }
}

/// The ordered offer catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OfferCatalog {
    offers: Vec<Offer>,
}

impl OfferCatalog {
    /// Build a catalog, rejecting duplicate ids so every position is unique.
    pub fn new(offers: Vec<Offer>) -> AnalysisResult<Self> {
        let mut seen = HashSet::with_capacity(offers.len());
        for offer in &offers {
            if !seen.insert(offer.id.as_str()) {
                return Err(AnalysisError::DuplicateOffer { offer_id: offer.id.clone() });
            }
        }
        Ok(Self { offers })
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.offers.iter().map(|o| o.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}
