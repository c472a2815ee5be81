//! Behavioral events — the transcript of what each customer did.
//!
//! RULE: The offer key is normalized here, once.
//! Source rows spell it `offer id` on received/viewed events and
//! `offer_id` on completed events. Nothing downstream of this module
//! ever sees either spelling; it only sees `EventPayload::Offer`.

use crate::{
    error::{AnalysisError, AnalysisResult},
    types::{CustomerId, OfferId, Timestamp},
};
use serde::{Deserialize, Serialize};

/// Closed set of event names found in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "transaction")]
    Transaction,
    #[serde(rename = "offer received")]
    OfferReceived,
    #[serde(rename = "offer viewed")]
    OfferViewed,
    #[serde(rename = "offer completed")]
    OfferCompleted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transaction    => "transaction",
            Self::OfferReceived  => "offer received",
            Self::OfferViewed    => "offer viewed",
            Self::OfferCompleted => "offer completed",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "transaction"     => Some(Self::Transaction),
            "offer received"  => Some(Self::OfferReceived),
            "offer viewed"    => Some(Self::OfferViewed),
            "offer completed" => Some(Self::OfferCompleted),
            _ => None,
        }
    }

    pub fn carries_offer(&self) -> bool {
        !matches!(self, Self::Transaction)
    }
}

/// Variant data attached to an event, already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    Transaction {
        amount: f64,
    },
    Offer {
        offer_id: OfferId,
        /// Reward granted; only completions carry one in source data.
        reward: Option<f64>,
    },
}

/// One immutable behavioral record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub customer_id: CustomerId,
    pub event_type:  EventType,
    pub timestamp:   Timestamp,
    pub payload:     EventPayload,
}

impl Event {
    pub fn transaction(customer_id: &str, amount: f64, timestamp: Timestamp) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            event_type:  EventType::Transaction,
            timestamp,
            payload:     EventPayload::Transaction { amount },
        }
    }

    pub fn received(customer_id: &str, offer_id: &str, timestamp: Timestamp) -> Self {
        Self::offer_event(customer_id, EventType::OfferReceived, offer_id, None, timestamp)
    }

    pub fn viewed(customer_id: &str, offer_id: &str, timestamp: Timestamp) -> Self {
        Self::offer_event(customer_id, EventType::OfferViewed, offer_id, None, timestamp)
    }

    pub fn completed(customer_id: &str, offer_id: &str, timestamp: Timestamp) -> Self {
        Self::offer_event(customer_id, EventType::OfferCompleted, offer_id, None, timestamp)
    }

    fn offer_event(
        customer_id: &str,
        event_type: EventType,
        offer_id: &str,
        reward: Option<f64>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            event_type,
            timestamp,
            payload: EventPayload::Offer {
                offer_id: offer_id.to_string(),
                reward,
            },
        }
    }

    /// The normalized offer id, for offer lifecycle events.
    pub fn offer_id(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Offer { offer_id, .. } => Some(offer_id),
            EventPayload::Transaction { .. }     => None,
        }
    }

    pub fn is(&self, event_type: EventType) -> bool {
        self.event_type == event_type
    }
}

/// A transcript row exactly as it is stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTranscriptRecord {
    pub person: String,
    pub event:  String,
    pub time:   Timestamp,
    #[serde(default)]
    pub value:  RawEventValue,
}

/// The `value` column. Both offer key spellings land in `offer_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEventValue {
    #[serde(alias = "offer id")]
    pub offer_id: Option<String>,
    pub reward:   Option<f64>,
    pub amount:   Option<f64>,
}

impl RawTranscriptRecord {
    /// Validate the row against its declared type and produce an Event.
    /// `line` is 1-based and only used for error reporting.
    pub fn into_event(self, line: usize) -> AnalysisResult<Event> {
        Event::from_columns(
            self.person,
            &self.event,
            self.time,
            self.value.offer_id,
            self.value.reward,
            self.value.amount,
            line,
        )
    }
}

impl EventPayload {
    /// Payload for an event of `event_type` built from its optional columns.
    /// `Err` carries the reason when a column the type requires is missing.
    pub fn for_type(
        event_type: EventType,
        offer_id: Option<String>,
        reward: Option<f64>,
        amount: Option<f64>,
    ) -> Result<Self, String> {
        if event_type.carries_offer() {
            let offer_id = offer_id
                .ok_or_else(|| format!("'{}' event without an offer id", event_type.as_str()))?;
            let reward = match event_type {
                EventType::OfferCompleted => reward,
                _ => None,
            };
            Ok(Self::Offer { offer_id, reward })
        } else {
            let amount = amount.ok_or_else(|| "transaction event without an amount".to_string())?;
            Ok(Self::Transaction { amount })
        }
    }
}

impl Event {
    /// The one validation path for flat event rows, whether they come from
    /// the transcript file or the staging store. `line` identifies the row
    /// in errors.
    pub fn from_columns(
        customer_id: String,
        event_name: &str,
        timestamp: Timestamp,
        offer_id: Option<String>,
        reward: Option<f64>,
        amount: Option<f64>,
        line: usize,
    ) -> AnalysisResult<Self> {
        let event_type = EventType::parse(event_name).ok_or_else(|| {
            AnalysisError::malformed(line, format!("unknown event type '{event_name}'"))
        })?;
        let payload = EventPayload::for_type(event_type, offer_id, reward, amount)
            .map_err(|reason| AnalysisError::malformed(line, reason))?;

        Ok(Self {
            customer_id,
            event_type,
            timestamp,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawTranscriptRecord {
        serde_json::from_str(json).expect("valid raw record")
    }

    #[test]
    fn both_offer_key_spellings_normalize_to_one_field() {
        let viewed = raw(r#"{"person":"u1","event":"offer viewed","time":6,"value":{"offer id":"A"}}"#)
            .into_event(1)
            .unwrap();
        let completed = raw(
            r#"{"person":"u1","event":"offer completed","time":9,"value":{"offer_id":"A","reward":5}}"#,
        )
        .into_event(2)
        .unwrap();

        assert_eq!(viewed.offer_id(), Some("A"));
        assert_eq!(completed.offer_id(), Some("A"));
        assert_eq!(
            completed.payload,
            EventPayload::Offer { offer_id: "A".into(), reward: Some(5.0) }
        );
    }

    #[test]
    fn offer_event_without_offer_id_is_malformed() {
        let err = raw(r#"{"person":"u1","event":"offer viewed","time":0,"value":{}}"#)
            .into_event(7)
            .unwrap_err();
        match err {
            AnalysisError::MalformedEvent { line, .. } => assert_eq!(line, 7),
            other => panic!("expected MalformedEvent, got {other:?}"),
        }
    }

    #[test]
    fn unknown_event_name_is_malformed() {
        let err = raw(r#"{"person":"u1","event":"offer clicked","time":0,"value":{}}"#)
            .into_event(1)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedEvent { .. }));
    }

    #[test]
    fn transaction_keeps_amount_and_has_no_offer() {
        let event = raw(r#"{"person":"u2","event":"transaction","time":12,"value":{"amount":3.5}}"#)
            .into_event(1)
            .unwrap();
        assert!(event.is(EventType::Transaction));
        assert_eq!(event.offer_id(), None);
        assert_eq!(event.payload, EventPayload::Transaction { amount: 3.5 });
    }

    #[test]
    fn columns_validate_the_same_way_for_every_source() {
        let missing = Event::from_columns("u1".into(), "offer completed", 4, None, Some(5.0), None, 12)
            .unwrap_err();
        assert!(matches!(missing, AnalysisError::MalformedEvent { line: 12, .. }));

        let viewed = Event::from_columns("u1".into(), "offer viewed", 4, Some("A".into()), Some(5.0), None, 1)
            .unwrap();
        assert_eq!(viewed.payload, EventPayload::Offer { offer_id: "A".into(), reward: None });
    }
}
