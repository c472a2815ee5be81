//! Customer profiles and the customer record the core analyzes.

use crate::types::CustomerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Age recorded when the customer declined to give one.
pub const AGE_SENTINEL: u32 = 118;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "O")]
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Female => "female",
            Self::Male   => "male",
            Self::Other  => "other",
        };
        f.write_str(s)
    }
}

/// A profile row as it appears on disk. Gender and income may be null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id:               CustomerId,
    pub gender:           Option<Gender>,
    pub age:              u32,
    pub income:           Option<f64>,
    /// Membership start as a YYYYMMDD integer.
    #[serde(default)]
    pub became_member_on: u32,
}

/// A cleaned profile that passed the demographic filter, annotated with
/// whether the customer made at least one transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id:             CustomerId,
    pub gender:         Gender,
    pub age:            u32,
    pub income:         f64,
    pub has_transacted: bool,
}
