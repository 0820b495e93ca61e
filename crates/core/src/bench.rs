use std::time::{Duration, Instant};

use serde::Serialize;

use crate::{config::SessionConfig, error::Result, pipeline::merge_user_events_with, types::Event};

/// Timing summary of repeated `merge_user_events` runs.
#[derive(Debug, Clone, Serialize)]
pub struct BenchStats {
    pub events: usize,
    pub sessions: usize,
    pub runs: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub avg_ms: f64,
}

impl BenchStats {
    /// Events processed per second at the average run time.
    pub fn throughput(&self) -> f64 {
        if self.avg_ms <= 0.0 {
            return 0.0;
        }
        self.events as f64 / (self.avg_ms / 1000.0)
    }
}

/// Run `warmup` untimed passes, then time `runs` passes (at least one).
pub fn benchmark(
    events: &[Event],
    config: &SessionConfig,
    warmup: usize,
    runs: usize,
) -> Result<BenchStats> {
    for _ in 0..warmup {
        merge_user_events_with(events, config)?;
    }

    let runs = runs.max(1);
    let mut times: Vec<Duration> = Vec::with_capacity(runs);
    let mut sessions = 0;
    for _ in 0..runs {
        let start = Instant::now();
        let result = merge_user_events_with(events, config)?;
        times.push(start.elapsed());
        sessions = result.len();
    }

    let to_ms = |d: &Duration| d.as_secs_f64() * 1000.0;
    let min_ms = times.iter().map(to_ms).fold(f64::INFINITY, f64::min);
    let max_ms = times.iter().map(to_ms).fold(0.0, f64::max);
    let avg_ms = times.iter().map(to_ms).sum::<f64>() / runs as f64;

    Ok(BenchStats {
        events: events.len(),
        sessions,
        runs,
        min_ms,
        max_ms,
        avg_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{GenerateConfig, generate_events};

    #[test]
    fn reports_counts_and_ordered_timings() {
        let events = generate_events(&GenerateConfig {
            num_users: 3,
            events_per_user: 10,
            seed: 1,
        });

        let stats = benchmark(&events, &SessionConfig::default(), 1, 3).unwrap();

        assert_eq!(stats.events, events.len());
        assert_eq!(stats.runs, 3);
        assert!(stats.sessions > 0);
        assert!(stats.min_ms <= stats.max_ms);
        assert!(stats.avg_ms >= 0.0);
    }

    #[test]
    fn zero_runs_still_times_once() {
        let events = vec![Event::new("u1", 1, "a")];
        let stats = benchmark(&events, &SessionConfig::default(), 0, 0).unwrap();
        assert_eq!(stats.runs, 1);
        assert_eq!(stats.sessions, 1);
    }
}
