//! Calendar event types.
//!
//! Events arrive from the admin API (or an .ics export) and are only ever read
//! by the layout engine. Field names follow the API's camelCase JSON.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::timestamp_format;
use crate::error::{CalError, CalResult};

/// A calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(rename = "startDate", with = "timestamp_format")]
    pub start: NaiveDateTime,
    #[serde(rename = "endDate", with = "timestamp_format")]
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Member references, display only
    #[serde(default)]
    pub attendee_ids: Vec<String>,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        event_type: EventType,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Event {
            id: id.into(),
            title: title.into(),
            event_type,
            start,
            end,
            location: None,
            description: None,
            attendee_ids: Vec::new(),
        }
    }

    /// Calendar date of the start timestamp.
    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Calendar date of the end timestamp.
    pub fn end_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// An event is single-day when it starts and ends on the same calendar date,
    /// whatever the times.
    pub fn is_single_day(&self) -> bool {
        self.start_day() == self.end_day()
    }

    /// True if the event covers any part of `date`.
    pub fn occupies(&self, date: NaiveDate) -> bool {
        self.start_day() <= date && date <= self.end_day()
    }

    /// Check the `end >= start` invariant.
    pub fn validate(&self) -> CalResult<()> {
        if self.end < self.start {
            return Err(CalError::InvertedRange {
                id: self.id.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "(No title)")
        } else {
            write!(f, "{}", self.title)
        }
    }
}

/// Event category, used for filtering and display only.
///
/// The known categories are the ones the admin configuration serves; anything
/// else is kept verbatim in `Other` so new categories don't break loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Meeting,
    Workshop,
    Training,
    Planting,
    Market,
    Other(String),
}

impl EventType {
    /// All known (non-`Other`) categories, in display order.
    pub const KNOWN: [EventType; 5] = [
        EventType::Meeting,
        EventType::Workshop,
        EventType::Training,
        EventType::Planting,
        EventType::Market,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Meeting => "meeting",
            EventType::Workshop => "workshop",
            EventType::Training => "training",
            EventType::Planting => "planting",
            EventType::Market => "market",
            EventType::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EventType::Other(_))
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "meeting" => EventType::Meeting,
            "workshop" => EventType::Workshop,
            "training" => EventType::Training,
            "planting" => EventType::Planting,
            "market" => EventType::Market,
            _ => EventType::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        EventType::from(s.as_str())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ids are opaque, but some API endpoints serve them as numbers.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
