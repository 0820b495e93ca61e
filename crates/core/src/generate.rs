//! Synthetic event datasets for benchmarking.
//!
//! Each user gets a random walk of timestamps where roughly 70% of gaps stay
//! inside a session and the rest open a new one. The whole batch is shuffled
//! so callers exercise the sort.

use std::ops::RangeInclusive;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::types::{Event, Meta};

const EVENT_TYPES: [&str; 7] = [
    "view", "click", "scroll", "hover", "submit", "login", "logout",
];
const PAGES: [&str; 7] = [
    "/", "/home", "/about", "/products", "/cart", "/checkout", "/profile",
];
const REFS: [Option<&str>; 6] = [
    Some("google"),
    Some("facebook"),
    Some("twitter"),
    Some("email"),
    Some("direct"),
    None,
];

/// Nov 2023
const BASE_TS: i64 = 1_700_000_000;
const DAY_SECS: i64 = 86_400;
const SAME_SESSION_PROBABILITY: f64 = 0.7;
const REF_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    pub num_users: usize,

    /// Average; each user draws from `[n/2, n + n/2]`.
    pub events_per_user: usize,

    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            num_users: 50,
            events_per_user: 200,
            seed: 42,
        }
    }
}

/// Per-user event counts are drawn from `[n/2, n + n/2]`, saturating at `usize::MAX`.
fn events_per_user_range(events_per_user: usize) -> RangeInclusive<usize> {
    let half = events_per_user / 2;
    half..=events_per_user.saturating_add(half)
}

pub fn generate_events(config: &GenerateConfig) -> Vec<Event> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut events = Vec::new();

    for user_num in 0..config.num_users {
        let user_id = format!("user_{:04}", user_num);
        let num_events = rng.gen_range(events_per_user_range(config.events_per_user));
        let mut current_ts = BASE_TS + rng.gen_range(0..=DAY_SECS);

        for _ in 0..num_events {
            let gap = if rng.gen_bool(SAME_SESSION_PROBABILITY) {
                rng.gen_range(10..=500)
            } else {
                rng.gen_range(700..=7200)
            };
            current_ts += gap;

            let event_type = EVENT_TYPES[rng.gen_range(0..EVENT_TYPES.len())];
            events.push(
                Event::new(user_id.clone(), current_ts, event_type).with_meta(random_meta(&mut rng)),
            );
        }
    }

    events.shuffle(&mut rng);
    events
}

fn random_meta(rng: &mut ChaCha8Rng) -> Meta {
    let mut meta = Meta::new();
    meta.insert("page".into(), json!(PAGES[rng.gen_range(0..PAGES.len())]));
    meta.insert(
        "data".into(),
        json!({
            "scroll_depth": rng.gen_range(0..=100),
            "viewport": {"width": 1920, "height": 1080},
        }),
    );
    if rng.gen_bool(REF_PROBABILITY) {
        let referrer = REFS[rng.gen_range(0..REFS.len())];
        meta.insert("ref".into(), referrer.map_or(Value::Null, Value::from));
    }
    meta
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn small() -> GenerateConfig {
        GenerateConfig {
            num_users: 5,
            events_per_user: 20,
            seed: 7,
        }
    }

    #[test]
    fn same_seed_same_dataset() {
        assert_eq!(generate_events(&small()), generate_events(&small()));
    }

    #[test]
    fn different_seed_different_dataset() {
        let other = GenerateConfig { seed: 8, ..small() };
        assert_ne!(generate_events(&small()), generate_events(&other));
    }

    #[test]
    fn per_user_counts_stay_in_range() {
        let events = generate_events(&small());
        let users: HashSet<&str> = events.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(users.len(), 5);

        for user in users {
            let count = events.iter().filter(|e| e.user_id == user).count();
            assert!((10..=30).contains(&count), "{user} has {count} events");
        }
    }

    #[test]
    fn every_event_has_page_and_viewport() {
        for event in generate_events(&small()) {
            assert!(EVENT_TYPES.contains(&event.event_type.as_str()));
            assert!(event.meta.contains_key("page"));
            assert_eq!(event.meta["data"]["viewport"]["width"], 1920);
            assert!(event.ts > BASE_TS);
        }
    }

    #[test]
    fn zero_users_is_empty() {
        let config = GenerateConfig {
            num_users: 0,
            ..GenerateConfig::default()
        };
        assert!(generate_events(&config).is_empty());
    }

    #[test]
    fn huge_sizes_do_not_overflow() {
        assert_eq!(events_per_user_range(200), 100..=300);
        assert_eq!(events_per_user_range(usize::MAX), usize::MAX / 2..=usize::MAX);

        let config = GenerateConfig {
            num_users: 0,
            events_per_user: usize::MAX,
            seed: 1,
        };
        assert!(generate_events(&config).is_empty());
    }
}
