use std::{fs, path::Path};

use crate::{
    error::Result,
    parse::parse_events_str,
    types::{Event, Session},
};

/// Load and validate events from a JSON file
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    let json_content = fs::read_to_string(path)?;
    parse_events_str(&json_content)
}

/// Save events as compact JSON
pub fn save_events(events: &[Event], path: &Path) -> Result<()> {
    let json = serde_json::to_string(events)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load sessions previously written by [`save_sessions`]
pub fn load_sessions(path: &Path) -> Result<Vec<Session>> {
    let json_content = fs::read_to_string(path)?;
    let sessions: Vec<Session> = serde_json::from_str(&json_content)?;
    Ok(sessions)
}

/// Save sessions as pretty-printed JSON
pub fn save_sessions(sessions: &[Session], path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(sessions)?;
    fs::write(path, &pretty_json)?;
    Ok(())
}
