//! Shared primitive types used across the whole analysis.

/// Elapsed time since the start of the observation window, in hours.
pub type Timestamp = u64;

/// Opaque customer identifier (the `person` column of the transcript).
pub type CustomerId = String;

/// Opaque offer identifier, a key into the offer catalog.
pub type OfferId = String;

/// Identifier of a single analysis run.
pub type RunId = String;
