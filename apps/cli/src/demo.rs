use console::style;
use serde_json::json;
use sessionize_core::{Event, Meta, Result, Session, merge_user_events};

use crate::format::format_session_line;

pub struct Scenario {
    pub title: &'static str,
    pub expectation: &'static str,
    pub events: Vec<Event>,
    check: fn(&[Session]) -> bool,
}

impl Scenario {
    pub fn run(&self) -> Result<(Vec<Session>, bool)> {
        let sessions = merge_user_events(&self.events)?;
        let passed = (self.check)(&sessions);
        Ok((sessions, passed))
    }
}

fn meta(value: serde_json::Value) -> Meta {
    value.as_object().cloned().unwrap_or_default()
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            title: "Basic session merging",
            expectation: "2 sessions: 1000→1500 (gap 500s ≤ 600s), 2200→2200 (gap 700s)",
            events: vec![
                Event::new("u1", 1500, "click").with_meta(meta(json!({"page": "/"}))),
                Event::new("u1", 1000, "view").with_meta(meta(json!({"page": "/home"}))),
                Event::new("u1", 2200, "scroll").with_meta(meta(json!({"ref": "google"}))),
            ],
            check: |s| {
                s.len() == 2
                    && (s[0].start_ts, s[0].end_ts) == (1000, 1500)
                    && s[1].start_ts == 2200
            },
        },
        Scenario {
            title: "Multiple users",
            expectation: "2 sessions sorted by start_ts: bob at 1000, alice at 2000→2100",
            events: vec![
                Event::new("alice", 2000, "login"),
                Event::new("bob", 1000, "view"),
                Event::new("alice", 2100, "click"),
            ],
            check: |s| s.len() == 2 && s[0].user_id == "bob" && s[1].user_id == "alice",
        },
        Scenario {
            title: "Deep meta merge (earliest wins)",
            expectation: "page='/first', data={x:1, y:2}",
            events: vec![
                Event::new("u1", 1000, "a")
                    .with_meta(meta(json!({"page": "/first", "data": {"x": 1}}))),
                Event::new("u1", 1100, "b")
                    .with_meta(meta(json!({"page": "/second", "data": {"y": 2}}))),
            ],
            check: |s| {
                s.len() == 1
                    && s[0].meta.get("page") == Some(&json!("/first"))
                    && s[0].meta.get("data") == Some(&json!({"x": 1, "y": 2}))
            },
        },
        Scenario {
            title: "Session boundary (600s threshold)",
            expectation: "gap 600s stays together, gap 601s splits",
            events: vec![
                Event::new("at", 1000, "a"),
                Event::new("at", 1600, "b"),
                Event::new("past", 1000, "a"),
                Event::new("past", 1601, "b"),
            ],
            check: |s| {
                let count = |user: &str| s.iter().filter(|x| x.user_id == user).count();
                count("at") == 1 && count("past") == 2
            },
        },
    ]
}

/// Print every scenario; returns whether all of them passed
pub fn run_demo() -> Result<bool> {
    println!(
        "\n{}  {}\n",
        style("sessionize").cyan().bold(),
        style("Manual verification").dim()
    );

    let mut all_passed = true;
    for (i, scenario) in scenarios().iter().enumerate() {
        println!(
            "{} {}",
            style(format!("{}.", i + 1)).dim(),
            style(scenario.title).bold()
        );
        for event in &scenario.events {
            println!(
                "  {} user={}, ts={}, type={}",
                style("·").dim(),
                event.user_id,
                event.ts,
                event.event_type
            );
        }
        println!("  {} {}", style("Expected:").dim(), scenario.expectation);

        let (sessions, passed) = scenario.run()?;
        for session in &sessions {
            println!("  {} {}", style("→").cyan(), format_session_line(session));
        }
        println!(
            "{}\n",
            serde_json::to_string_pretty(&sessions)?
                .lines()
                .map(|line| format!("    {}", line))
                .collect::<Vec<_>>()
                .join("\n")
        );

        if passed {
            println!("  {} Passed\n", style("✓").green().bold());
        } else {
            println!("  {} Failed\n", style("✗").red().bold());
            all_passed = false;
        }
    }

    println!("{}", style("─".repeat(60)).dim());
    Ok(all_passed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_passes() {
        for scenario in scenarios() {
            let (_, passed) = scenario.run().unwrap();
            assert!(passed, "scenario '{}' failed", scenario.title);
        }
    }
}
