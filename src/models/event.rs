use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminates the payload shape carried in [`EventRecord::data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Booking,
    Donation,
    Enrollment,
    Order,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Booking => "booking",
            EventKind::Donation => "donation",
            EventKind::Enrollment => "enrollment",
            EventKind::Order => "order",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One journal entry. Created exactly once by a submit handler; the only
/// mutable field is `read`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventRecord {
    /// Millisecond-epoch id. Uniqueness is best-effort: two records created
    /// in the same tick collide.
    pub id: i64,
    pub kind: EventKind,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    pub fn new(
        kind: EventKind,
        title: impl Into<String>,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            kind,
            title: title.into(),
            message: message.into(),
            data,
            read: false,
            created_at: now,
        }
    }
}
