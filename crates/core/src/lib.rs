//! Sessionize Core Library
//!
//! Splits timestamped user events into sessions: per-user runs whose adjacent
//! events are at most a fixed gap apart, each reduced to boundary timestamps,
//! first-occurrence event types and earliest-wins merged metadata.

pub mod bench;
pub mod config;
pub mod error;
pub mod generate;
pub mod group;
pub mod io;
pub mod merge;
pub mod parse;
pub mod pipeline;
pub mod split;
pub mod types;

// Re-export commonly used items at crate root
pub use bench::{BenchStats, benchmark};
pub use config::{GAP_THRESHOLD_ENV, SESSION_GAP_THRESHOLD, SessionConfig};
pub use error::{Result, SessionError};
pub use generate::{GenerateConfig, generate_events};
pub use group::group_events_by_user;
pub use io::{load_events, load_sessions, save_events, save_sessions};
pub use merge::{collect_unique_types, create_session, deep_merge_meta};
pub use parse::{parse_event, parse_events, parse_events_str};
pub use pipeline::{Sessionizer, assemble, merge_user_events, merge_user_events_with};
pub use split::split_into_runs;
pub use types::{Event, Meta, Session, UserEvents};
