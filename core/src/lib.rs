//! Offer influence analysis.
//!
//! Finds which promotional offers were viewed before a customer completed
//! them, counts influenced customers per offer within a demographic
//! segment, and ranks the offers.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod ingest;
pub mod matcher;
pub mod pipeline;
pub mod population;
pub mod profile;
pub mod ranking;
pub mod report;
pub mod rng;
pub mod segment;
pub mod store;
pub mod synth;
pub mod timeline;
pub mod types;
