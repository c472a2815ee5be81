//! SQLite staging store for the transcript.
//!
//! RULE: Only store.rs talks to the database.
//! The store is an input-side cache: events go in once, timelines come
//! out per customer. Analysis results are never written here.

use crate::{
    error::AnalysisResult,
    event::{Event, EventPayload, EventType},
    timeline::{Timeline, TimelineSource},
    types::CustomerId,
};
use rusqlite::{params, Connection};
use std::borrow::Cow;
use std::collections::HashSet;

pub struct EventStore {
    conn: Connection,
}

/// An event row before its type and payload are re-validated.
struct StoredEventRow {
    id:          i64,
    customer_id: String,
    event_type:  String,
    timestamp:   i64,
    offer_id:    Option<String>,
    reward:      Option<f64>,
    amount:      Option<f64>,
}

impl StoredEventRow {
    fn into_event(self) -> AnalysisResult<Event> {
        Event::from_columns(
            self.customer_id,
            &self.event_type,
            self.timestamp as u64,
            self.offer_id,
            self.reward,
            self.amount,
            self.id as usize,
        )
    }
}

impl EventStore {
    /// Open (or create) a staging database at `path`.
    pub fn open(path: &str) -> AnalysisResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database.
    pub fn in_memory() -> AnalysisResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> AnalysisResult<()> {
        self.conn.execute_batch(include_str!("../migrations/001_event_store.sql"))?;
        Ok(())
    }

    /// Replace the staged transcript with `events`, in a single transaction.
    /// Returns the number of rows written.
    pub fn stage_events(&mut self, events: &[Event]) -> AnalysisResult<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM event", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO event (customer_id, event_type, timestamp, offer_id, reward, amount)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for event in events {
                let (offer_id, reward, amount) = match &event.payload {
                    EventPayload::Offer { offer_id, reward } => (Some(offer_id.as_str()), *reward, None),
                    EventPayload::Transaction { amount }     => (None, None, Some(*amount)),
                };
                stmt.execute(params![
                    event.customer_id,
                    event.event_type.as_str(),
                    event.timestamp as i64,
                    offer_id,
                    reward,
                    amount,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("store: staged {} events", events.len());
        Ok(events.len())
    }

    pub fn event_count(&self) -> AnalysisResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM event", [], |row| row.get(0))?;
        Ok(count)
    }

    fn events_for_customer(&self, customer_id: &str) -> AnalysisResult<Vec<Event>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, customer_id, event_type, timestamp, offer_id, reward, amount
             FROM event WHERE customer_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![customer_id], |row| {
                Ok(StoredEventRow {
                    id:          row.get(0)?,
                    customer_id: row.get(1)?,
                    event_type:  row.get(2)?,
                    timestamp:   row.get(3)?,
                    offer_id:    row.get(4)?,
                    reward:      row.get(5)?,
                    amount:      row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(StoredEventRow::into_event).collect()
    }
}

impl TimelineSource for EventStore {
    fn timeline(&self, customer_id: &str) -> AnalysisResult<Timeline<'_>> {
        Ok(self
            .events_for_customer(customer_id)?
            .into_iter()
            .map(Cow::Owned)
            .collect())
    }

    fn transacted_customers(&self) -> AnalysisResult<HashSet<CustomerId>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT customer_id FROM event WHERE event_type = ?1",
        )?;
        let ids = stmt
            .query_map(params![EventType::Transaction.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<CustomerId>, _>>()?;
        Ok(ids)
    }
}
