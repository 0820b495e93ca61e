use std::collections::HashSet;

use serde_json::Value;

use crate::{
    error::{Result, SessionError},
    types::{Event, Meta, Session},
};

/// Merge `new` into a copy of `base`; `base` wins every non-object conflict.
///
/// Keys missing from `base` are copied over, objects present on both sides are
/// merged recursively, anything else keeps the `base` value. An explicit
/// `null` in `base` counts as a value.
pub fn deep_merge_meta(base: &Meta, new: &Meta) -> Meta {
    let mut merged = base.clone();
    merge_into(&mut merged, new);
    merged
}

fn merge_into(acc: &mut Meta, new: &Meta) {
    for (key, new_value) in new {
        match acc.get_mut(key) {
            None => {
                acc.insert(key.clone(), new_value.clone());
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(incoming) = new_value {
                    merge_into(existing, incoming);
                }
            }
            Some(_) => {}
        }
    }
}

/// Unique event types in order of first occurrence.
pub fn collect_unique_types(events: &[&Event]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut types = Vec::new();

    for event in events {
        if seen.insert(event.event_type.as_str()) {
            types.push(event.event_type.clone());
        }
    }

    types
}

/// Reduce one chronologically sorted run into a session.
pub fn create_session(run: &[&Event], user_id: &str) -> Result<Session> {
    let (Some(first), Some(last)) = (run.first(), run.last()) else {
        return Err(SessionError::EmptyRun {
            user_id: user_id.to_string(),
        });
    };

    let mut meta = Meta::new();
    for event in run {
        merge_into(&mut meta, &event.meta);
    }

    Ok(Session {
        user_id: user_id.to_string(),
        start_ts: first.ts,
        end_ts: last.ts,
        types: collect_unique_types(run),
        meta,
    })
}
