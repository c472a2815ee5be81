//! Demographic segment selection and the transaction flag.
//!
//! Plain filters, no attribution logic. Every function returns a new
//! collection; the input profiles are never modified.

use crate::{
    profile::{Customer, Gender, Profile},
    types::CustomerId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Drop profiles with no gender, the sentinel age, or no income.
pub fn clean_profiles(profiles: &[Profile], age_sentinel: u32) -> Vec<Profile> {
    profiles
        .iter()
        .filter(|p| p.gender.is_some() && p.income.is_some() && p.age != age_sentinel)
        .cloned()
        .collect()
}

/// Thresholds describing the targeted demographic segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicSegment {
    pub gender:     Gender,
    pub min_age:    u32,
    pub min_income: f64,
}

impl Default for DemographicSegment {
    /// Female customers aged 45+ (the age IQR1) earning at least the
    /// median income of 64K.
    fn default() -> Self {
        Self {
            gender:     Gender::Female,
            min_age:    45,
            min_income: 64_000.0,
        }
    }
}

impl DemographicSegment {
    /// Threshold check only; sentinel ages are removed by `clean_profiles`.
    pub fn contains(&self, profile: &Profile) -> bool {
        profile.gender == Some(self.gender)
            && profile.age >= self.min_age
            && profile.income.is_some_and(|i| i >= self.min_income)
    }

    pub fn select(&self, profiles: &[Profile]) -> Vec<Profile> {
        profiles.iter().filter(|p| self.contains(p)).cloned().collect()
    }
}

impl fmt::Display for DemographicSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} customers with age >= {} years and annual income >= {:.0}",
            self.gender, self.min_age, self.min_income
        )
    }
}

/// Annotate each segment profile with `has_transacted`.
/// Profiles missing gender or income are skipped; callers clean first.
pub fn mark_transacted(profiles: &[Profile], transacted: &HashSet<CustomerId>) -> Vec<Customer> {
    profiles
        .iter()
        .filter_map(|p| {
            Some(Customer {
                id:             p.id.clone(),
                gender:         p.gender?,
                age:            p.age,
                income:         p.income?,
                has_transacted: transacted.contains(&p.id),
            })
        })
        .collect()
}
