use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nested metadata attached to an event or merged into a session.
pub type Meta = Map<String, Value>;

/// A single timestamped user event.
///
/// Missing `user_id` and `type` read as the empty string, missing `meta` as the
/// empty map. See [`crate::parse_event`] for the JSON boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub user_id: String,
    pub ts: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub meta: Meta,
}

impl Event {
    pub fn new(user_id: impl Into<String>, ts: i64, event_type: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ts,
            event_type: event_type.into(),
            meta: Meta::new(),
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }
}

/// A maximal run of one user's events, reduced to a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub types: Vec<String>,
    pub meta: Meta,
}

impl Session {
    pub fn duration(&self) -> i64 {
        self.end_ts.saturating_sub(self.start_ts)
    }
}

/// All events sharing one `user_id`, in input order.
#[derive(Debug)]
pub struct UserEvents<'a> {
    pub user_id: &'a str,
    pub events: Vec<&'a Event>,
}
