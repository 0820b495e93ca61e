use tracing::debug;

use crate::{
    config::SessionConfig,
    error::Result,
    group::group_events_by_user,
    merge::create_session,
    split::split_into_runs,
    types::{Event, Session},
};

/// Splits event batches into sessions with a fixed configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sessionizer {
    config: SessionConfig,
}

impl Sessionizer {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn merge(&self, events: &[Event]) -> Result<Vec<Session>> {
        merge_user_events_with(events, &self.config)
    }
}

/// Group events into sessions using the default 600 second gap.
pub fn merge_user_events(events: &[Event]) -> Result<Vec<Session>> {
    merge_user_events_with(events, &SessionConfig::default())
}

/// Group events into sessions, sorted by `start_ts`.
///
/// The input is only borrowed; every returned session owns freshly built
/// `types` and `meta`. A config with a negative threshold is rejected even
/// when it was built without [`SessionConfig::new`].
pub fn merge_user_events_with(events: &[Event], config: &SessionConfig) -> Result<Vec<Session>> {
    config.validate()?;
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let groups = group_events_by_user(events);
    debug!(events = events.len(), users = groups.len(), "grouped events");

    let mut sessions = Vec::new();
    for group in &groups {
        for run in split_into_runs(&group.events, config.gap_threshold) {
            sessions.push(create_session(&run, group.user_id)?);
        }
    }

    let sessions = assemble(sessions);
    debug!(sessions = sessions.len(), "assembled sessions");
    Ok(sessions)
}

/// Order sessions by `start_ts`; ties keep production order.
pub fn assemble(mut sessions: Vec<Session>) -> Vec<Session> {
    sessions.sort_by_key(|session| session.start_ts);
    sessions
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::SessionError;

    fn session(user_id: &str, start_ts: i64) -> Session {
        Session {
            user_id: user_id.into(),
            start_ts,
            end_ts: start_ts,
            types: Vec::new(),
            meta: Default::default(),
        }
    }

    #[test]
    fn assemble_sorts_by_start_and_keeps_ties_stable() {
        let sessions = vec![session("b", 2000), session("a", 1000), session("c", 1000)];

        let users: Vec<String> = assemble(sessions).into_iter().map(|s| s.user_id).collect();

        assert_eq!(users, vec!["a", "c", "b"]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(merge_user_events(&[]).unwrap(), Vec::<Session>::new());
    }

    #[test]
    fn custom_threshold_changes_boundaries() {
        let events = vec![Event::new("u1", 0, "a"), Event::new("u1", 100, "b")];

        let tight = Sessionizer::new(SessionConfig::new(50).unwrap());
        let loose = Sessionizer::default();

        assert_eq!(tight.merge(&events).unwrap().len(), 2);
        assert_eq!(loose.merge(&events).unwrap().len(), 1);
    }

    #[test]
    fn hand_built_negative_threshold_is_rejected() {
        let config = SessionConfig { gap_threshold: -5 };
        let events = vec![Event::new("u1", 0, "a")];

        let err = merge_user_events_with(&events, &config).unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig { .. }));
        assert!(merge_user_events_with(&[], &config).is_err());
        assert!(Sessionizer::new(config).merge(&events).is_err());
    }
}
