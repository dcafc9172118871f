//! Event details and countdown.
//!
//! # Invariants
//! - A countdown never goes negative; once the event starts it stays at zero.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_EVENT_START: &str = "2025-12-31T20:00:00+05:30";
const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// The event visitors register for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub title: String,
    pub venue: String,
    /// Start instant, kept in the organizer's local offset.
    pub starts_at: DateTime<FixedOffset>,
}

impl Default for EventDetails {
    fn default() -> Self {
        Self {
            title: "New Year Celebration".to_string(),
            venue: "#404 Nilamber Primero, Vasna - Bhayli Road, Vadodara, Gujarat".to_string(),
            starts_at: default_event_start(),
        }
    }
}

/// Whole days plus leftover whole hours until the event starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
}

impl EventDetails {
    /// Computes the remaining time relative to `now`.
    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        let remaining = (self.starts_at.with_timezone(&Utc) - now)
            .num_seconds()
            .max(0);
        Countdown {
            days: remaining / SECONDS_PER_DAY,
            hours: (remaining % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
        }
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.starts_at.with_timezone(&Utc) <= now
    }
}

fn default_event_start() -> DateTime<FixedOffset> {
    // Constant input; a parse failure here is a typo in the literal above.
    DateTime::parse_from_rfc3339(DEFAULT_EVENT_START).expect("valid default event start")
}
