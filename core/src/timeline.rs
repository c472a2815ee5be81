//! Event timeline access — per-customer slices of the transcript.
//!
//! RULE: Timelines are unordered. Callers must never assume the events
//! of a timeline are sorted by time; the matcher compares timestamps
//! explicitly.

use crate::{
    error::AnalysisResult,
    event::{Event, EventType},
    types::CustomerId,
};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// One customer's events. Borrowed from an in-memory log, owned when
/// read back from the staging store.
pub type Timeline<'a> = Vec<Cow<'a, Event>>;

/// Anything that can hand out one customer's events.
///
/// An unknown customer is not an error: it yields an empty timeline.
pub trait TimelineSource {
    fn timeline(&self, customer_id: &str) -> AnalysisResult<Timeline<'_>>;

    /// Distinct customers with at least one `transaction` event.
    fn transacted_customers(&self) -> AnalysisResult<HashSet<CustomerId>>;
}

/// Select one customer's events from a flat event slice.
pub fn timeline_in<'a>(customer_id: &str, events: &'a [Event]) -> Vec<&'a Event> {
    events.iter().filter(|e| e.customer_id == customer_id).collect()
}

/// In-memory index over a borrowed transcript, grouped by customer at
/// construction. The events themselves are never copied.
#[derive(Debug, Clone, Default)]
pub struct EventLog<'a> {
    by_customer: HashMap<&'a str, Vec<&'a Event>>,
}

impl<'a> EventLog<'a> {
    pub fn new(events: &'a [Event]) -> Self {
        let mut by_customer: HashMap<&'a str, Vec<&'a Event>> = HashMap::new();
        for event in events {
            by_customer.entry(event.customer_id.as_str()).or_default().push(event);
        }
        Self { by_customer }
    }

    pub fn customer_count(&self) -> usize {
        self.by_customer.len()
    }
}

impl TimelineSource for EventLog<'_> {
    fn timeline(&self, customer_id: &str) -> AnalysisResult<Timeline<'_>> {
        let events = self
            .by_customer
            .get(customer_id)
            .map(|events| events.iter().map(|&e| Cow::Borrowed(e)).collect())
            .unwrap_or_default();
        Ok(events)
    }

    fn transacted_customers(&self) -> AnalysisResult<HashSet<CustomerId>> {
        Ok(self
            .by_customer
            .iter()
            .filter(|(_, events)| events.iter().any(|e| e.is(EventType::Transaction)))
            .map(|(id, _)| id.to_string())
            .collect())
    }
}
