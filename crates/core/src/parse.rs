//! Validation of raw JSON entries into [`Event`]s.
//!
//! `ts` is required and must be a whole number within the `i64` range; whole
//! floats such as `1000.0` or `1.7e9` are accepted. `user_id` and `type` must be
//! strings when present; `meta` must be an object when present. `null` reads
//! the same as an absent field everywhere except `ts`.

use serde_json::{Map, Value};

use crate::{
    error::{Result, SessionError},
    types::{Event, Meta},
};

pub fn parse_event(index: usize, raw: &Value) -> Result<Event> {
    let Value::Object(fields) = raw else {
        return Err(SessionError::malformed(
            index,
            format!("expected an object, got {}", kind(raw)),
        ));
    };

    let ts = match fields.get("ts") {
        None | Some(Value::Null) => {
            return Err(SessionError::malformed(index, "missing required field 'ts'"));
        }
        Some(value) => parse_ts(index, value)?,
    };

    let meta = match fields.get("meta") {
        None | Some(Value::Null) => Meta::new(),
        Some(Value::Object(meta)) => meta.clone(),
        Some(other) => {
            return Err(SessionError::malformed(
                index,
                format!("'meta' must be an object, got {}", kind(other)),
            ));
        }
    };

    Ok(Event {
        user_id: optional_string(index, fields, "user_id")?,
        ts,
        event_type: optional_string(index, fields, "type")?,
        meta,
    })
}

// i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
const TS_MIN_F64: f64 = i64::MIN as f64;
const TS_MAX_F64: f64 = i64::MAX as f64;

fn parse_ts(index: usize, value: &Value) -> Result<i64> {
    if let Some(ts) = value.as_i64() {
        return Ok(ts);
    }
    let Some(ts) = value.as_f64() else {
        return Err(SessionError::malformed(
            index,
            format!("'ts' must be a number, got {}", kind(value)),
        ));
    };
    if ts.fract() == 0.0 && (TS_MIN_F64..TS_MAX_F64).contains(&ts) {
        Ok(ts as i64)
    } else {
        Err(SessionError::malformed(
            index,
            format!("'ts' must be a whole number within the i64 range, got {value}"),
        ))
    }
}

/// Parse a JSON array of raw events, failing on the first malformed entry.
pub fn parse_events(raw: &Value) -> Result<Vec<Event>> {
    let Value::Array(entries) = raw else {
        return Err(SessionError::MalformedInput {
            reason: format!("expected an array of events, got {}", kind(raw)),
        });
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_event(index, entry))
        .collect()
}

pub fn parse_events_str(json: &str) -> Result<Vec<Event>> {
    let raw: Value = serde_json::from_str(json)?;
    parse_events(&raw)
}

fn optional_string(index: usize, fields: &Map<String, Value>, key: &str) -> Result<String> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(SessionError::malformed(
            index,
            format!("'{}' must be a string, got {}", key, kind(other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn reason(err: SessionError) -> (usize, String) {
        match err {
            SessionError::MalformedEvent { index, reason } => (index, reason),
            other => panic!("expected MalformedEvent, got {other:?}"),
        }
    }

    #[test]
    fn parses_full_event() {
        let event = parse_event(
            0,
            &json!({"user_id": "u1", "ts": 1000, "type": "view", "meta": {"page": "/home"}}),
        )
        .unwrap();

        assert_eq!(event.user_id, "u1");
        assert_eq!(event.ts, 1000);
        assert_eq!(event.event_type, "view");
        assert_eq!(event.meta.get("page"), Some(&json!("/home")));
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let event = parse_event(0, &json!({"ts": 5, "meta": null})).unwrap();

        assert_eq!(event, Event::new("", 5, ""));
    }

    #[test]
    fn missing_ts_names_the_entry() {
        let err = parse_events(&json!([
            {"user_id": "u1", "ts": 1000},
            {"user_id": "u1", "type": "click"},
        ]))
        .unwrap_err();

        let (index, reason) = reason(err);
        assert_eq!(index, 1);
        assert!(reason.contains("'ts'"));
    }

    #[test]
    fn whole_float_ts_is_accepted() {
        assert_eq!(parse_event(0, &json!({"ts": 1000.0})).unwrap().ts, 1000);
        assert_eq!(parse_events_str(r#"[{"ts": 1.7e9}]"#).unwrap()[0].ts, 1_700_000_000);
        assert_eq!(parse_event(0, &json!({"ts": -60.0})).unwrap().ts, -60);
    }

    #[test]
    fn fractional_ts_is_rejected() {
        let (index, reason) = reason(parse_event(2, &json!({"ts": 1000.5})).unwrap_err());
        assert_eq!(index, 2);
        assert_eq!(reason, "'ts' must be a whole number within the i64 range, got 1000.5");
    }

    #[test]
    fn out_of_range_ts_is_rejected() {
        let (_, reason) = reason(parse_event(0, &json!({"ts": u64::MAX})).unwrap_err());
        assert!(reason.contains("i64 range"));
        let (_, reason) = self::reason(parse_events_str(r#"[{"ts": 1e19}]"#).unwrap_err());
        assert!(reason.contains("i64 range"));
    }

    #[test]
    fn string_ts_is_rejected() {
        let (_, reason) = reason(parse_event(0, &json!({"ts": "1000"})).unwrap_err());
        assert_eq!(reason, "'ts' must be a number, got a string");
    }

    #[test]
    fn non_object_meta_is_rejected() {
        let (_, reason) = reason(parse_event(3, &json!({"ts": 1, "meta": [1, 2]})).unwrap_err());
        assert_eq!(reason, "'meta' must be an object, got an array");
    }

    #[test]
    fn non_string_user_id_is_rejected() {
        let (_, reason) = reason(parse_event(0, &json!({"ts": 1, "user_id": 7})).unwrap_err());
        assert_eq!(reason, "'user_id' must be a string, got a number");
    }

    #[test]
    fn top_level_must_be_an_array() {
        let err = parse_events(&json!({"ts": 1})).unwrap_err();
        match &err {
            SessionError::MalformedInput { reason } => {
                assert_eq!(reason, "expected an array of events, got an object");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
        assert!(!err.to_string().contains("index"));
        assert!(parse_events_str("[]").unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_a_json_error() {
        let err = parse_events_str("[{").unwrap_err();
        assert!(matches!(err, SessionError::JsonError(_)));
    }
}
