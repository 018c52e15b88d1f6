//! Calendar event types produced by the feed parser.
//!
//! These are deliberately looser than a general-purpose calendar model:
//! every field a source feed can omit is an `Option`, and validity is
//! decided later by the expander, not the parser.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One VEVENT from a calendar feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: Option<String>,
    pub start: Option<EventTime>,
    /// Raw RRULE value (e.g. `FREQ=WEEKLY;COUNT=4`), parsed at expansion time.
    pub rrule: Option<String>,
    /// EXDATE entries, compared at date-key granularity during expansion.
    pub exdates: Vec<EventTime>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<EventStatus>,
}

/// Start or exclusion time of an event.
///
/// `Date` carries date-only (VALUE=DATE) semantics; `DateTime` is a real
/// instant. Floating and zoned date-times are projected to UTC at parse
/// time; resolving timezone databases is out of scope for the importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl EventTime {
    /// Calendar date key (`YYYY-MM-DD`) for this time.
    ///
    /// Date-only values use the literal calendar date so they never shift
    /// across a timezone boundary; instants use UTC calendar fields.
    pub fn date_key(&self) -> String {
        match self {
            EventTime::Date(d) => d.format("%Y-%m-%d").to_string(),
            EventTime::DateTime(dt) => dt.date_naive().format("%Y-%m-%d").to_string(),
        }
    }

    /// Whether this value carries date-only semantics.
    pub fn is_date_only(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// The value as a UTC instant (date-only values become midnight UTC).
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::Date(d) => d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
            EventTime::DateTime(dt) => *dt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl EventStatus {
    /// Parse a STATUS property value, case-insensitively.
    pub fn from_ics_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CONFIRMED" => Some(EventStatus::Confirmed),
            "TENTATIVE" => Some(EventStatus::Tentative),
            "CANCELLED" => Some(EventStatus::Cancelled),
            _ => None,
        }
    }
}
