use std::time::Duration;

use sessionize_core::Session;

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// Format an integer with `,` thousands separators
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// One line per session: user, time span, duration and types
pub fn format_session_line(session: &Session) -> String {
    let types = if session.types.is_empty() {
        "-".to_string()
    } else {
        session.types.join(", ")
    };
    format!(
        "{} [{}→{}] {}s: {}",
        session.user_id,
        session.start_ts,
        session.end_ts,
        session.duration(),
        types
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn durations_pick_a_readable_unit() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn session_line_lists_types() {
        let session = Session {
            user_id: "u1".into(),
            start_ts: 1000,
            end_ts: 1500,
            types: vec!["view".into(), "click".into()],
            meta: Default::default(),
        };
        assert_eq!(format_session_line(&session), "u1 [1000→1500] 500s: view, click");
    }
}
