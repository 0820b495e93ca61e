use std::collections::HashMap;

use crate::types::{Event, UserEvents};

/// Partition events by `user_id`.
///
/// Groups come back in order of each user's first appearance; events inside a
/// group keep their input order. Nothing is dropped or deduplicated.
pub fn group_events_by_user(events: &[Event]) -> Vec<UserEvents<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<UserEvents<'_>> = Vec::new();

    for event in events {
        let slot = *index.entry(event.user_id.as_str()).or_insert_with(|| {
            groups.push(UserEvents {
                user_id: event.user_id.as_str(),
                events: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].events.push(event);
    }

    groups
}
