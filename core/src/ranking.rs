//! Ranking resolver — top offer and runner-up.
//!
//! Top: highest count, first in catalog order on ties.
//!
//! Runner-up: one pass in catalog order that skips the top's position,
//! keeping a running best that starts at 0 and is replaced only by a
//! strictly greater count. The first offer to beat the running best
//! holds its place against later equal counts. An offer tied with the
//! top can therefore be runner-up; an offer with count 0 never is.

use crate::{
    aggregate::{InfluenceCounts, OfferCount},
    catalog::OfferType,
    types::OfferId,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedOffer {
    pub offer_id:   OfferId,
    pub offer_type: OfferType,
    pub customers:  u64,
}

impl From<&OfferCount> for RankedOffer {
    fn from(count: &OfferCount) -> Self {
        Self {
            offer_id:   count.offer_id.clone(),
            offer_type: count.offer_type,
            customers:  count.customers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub top:       RankedOffer,
    /// `None` when no other offer influenced anyone.
    pub runner_up: Option<RankedOffer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The catalog has no offers.
    EmptyCatalog,
    /// Every offer has a count of zero.
    NoInfluence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankingOutcome {
    Ranked(Ranking),
    Unavailable { reason: UnavailableReason },
}

impl RankingOutcome {
    pub fn ranking(&self) -> Option<&Ranking> {
        match self {
            Self::Ranked(r)         => Some(r),
            Self::Unavailable { .. } => None,
        }
    }
}

pub fn rank(counts: &InfluenceCounts) -> RankingOutcome {
    let entries = counts.entries();

    let Some(top_idx) = stable_argmax(entries) else {
        return RankingOutcome::Unavailable { reason: UnavailableReason::EmptyCatalog };
    };
    if entries[top_idx].customers == 0 {
        return RankingOutcome::Unavailable { reason: UnavailableReason::NoInfluence };
    }

    let mut best = 0u64;
    let mut runner_up_idx = None;
    for (i, entry) in entries.iter().enumerate() {
        if entry.customers > best && i != top_idx {
            best = entry.customers;
            runner_up_idx = Some(i);
        }
    }

    RankingOutcome::Ranked(Ranking {
        top:       RankedOffer::from(&entries[top_idx]),
        runner_up: runner_up_idx.map(|i| RankedOffer::from(&entries[i])),
    })
}

/// Index of the first maximum, or `None` for an empty slice.
fn stable_argmax(entries: &[OfferCount]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, entry) in entries.iter().enumerate() {
        match best {
            Some(b) if entries[b].customers >= entry.customers => {}
            _ => best = Some(i),
        }
    }
    best
}
