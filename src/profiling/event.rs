//! Profiling event records.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One line of the profile log.
#[derive(Serialize)]
pub struct ProfileEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event_type: EventType,
    /// Microseconds, for timed scopes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<u64>,
}

impl ProfileEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            duration_us: None,
        }
    }

    pub fn with_duration(event_type: EventType, duration: std::time::Duration) -> Self {
        Self {
            duration_us: Some(duration.as_micros() as u64),
            ..Self::new(event_type)
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventType {
    // === Profiling session ===
    SessionStart {
        session_id: String,
    },
    SessionEnd {
        total_events: u64,
    },

    // === HTTP ===
    HandlerStart {
        /// Route pattern, e.g. "/api/review/{session}/rate"
        route: String,
        method: String,
    },

    // === Storage ===
    StoreOp {
        /// load, save or remove
        operation: String,
        key: String,
    },

    // === Practice and scheduling ===
    AttemptScored {
        /// strict or lenient
        mode: String,
        correct: usize,
        total: usize,
    },
    SrsCalculation {
        algorithm: String,
        rating: u8,
        interval_days: u32,
    },
    SessionBuilt {
        mode: String,
        /// Collection size the session was drawn from
        entries: usize,
    },

    TimedScope {
        name: String,
    },
}
