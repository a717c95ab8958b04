//! Payload transforms applied before serialization.
//!
//! Push and registration payloads are free-form JSON objects owned by
//! the caller; the service only cares about two fields. `schedule_for`
//! entries must reach the wire as UTC ISO-8601 strings, and a register
//! `alias` must be a string even when the caller passed a number. Both
//! rewrites happen in place here, immediately before the body is
//! serialized.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::{Error, Result};

/// Wire format for every timestamp: UTC, second precision, literal `Z`.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Conversion into the wire timestamp format.
///
/// Implemented for `chrono` datetimes and for strings the parser
/// understands, so operations like [`feedback`](crate::Client::feedback)
/// accept either.
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Result<String>;
}

impl IntoTimestamp for DateTime<Utc> {
    fn into_timestamp(self) -> Result<String> {
        Ok(self.format(TIME_FORMAT).to_string())
    }
}

impl IntoTimestamp for DateTime<chrono::FixedOffset> {
    fn into_timestamp(self) -> Result<String> {
        self.with_timezone(&Utc).into_timestamp()
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Result<String> {
        parse_time(self)
            .ok_or_else(|| Error::invalid_timestamp(self))?
            .into_timestamp()
    }
}

impl IntoTimestamp for String {
    fn into_timestamp(self) -> Result<String> {
        self.as_str().into_timestamp()
    }
}

/// Rewrites `schedule_for` entries to wire-format timestamps.
///
/// Bare entries (strings or unix-second numbers) are replaced outright.
/// Object entries keep every other key and have only their
/// `scheduled_time` field reformatted; an object without that field
/// passes through untouched.
pub(crate) fn normalize_push_payload(payload: &mut Value) -> Result<()> {
    let Some(schedule) = payload.get_mut("schedule_for") else {
        return Ok(());
    };
    let Some(entries) = schedule.as_array_mut() else {
        return Ok(());
    };

    for entry in entries {
        match entry {
            Value::Object(map) => {
                if let Some(time) = map.get("scheduled_time") {
                    let formatted = format_time_value(time)?;
                    map.insert("scheduled_time".to_string(), Value::String(formatted));
                }
            }
            other => {
                *other = Value::String(format_time_value(other)?);
            }
        }
    }

    Ok(())
}

/// Coerces an `alias` field to its string representation.
pub(crate) fn normalize_register_payload(payload: &mut Value) {
    let Some(map) = payload.as_object_mut() else {
        return;
    };
    if let Some(alias) = map.get_mut("alias") {
        if !alias.is_null() && !alias.is_string() {
            let coerced = match alias {
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                ref other => other.to_string(),
            };
            *alias = Value::String(coerced);
        }
    }
}

fn format_time_value(value: &Value) -> Result<String> {
    match value {
        Value::String(text) => text.as_str().into_timestamp(),
        Value::Number(n) => {
            let secs = n
                .as_i64()
                .ok_or_else(|| Error::invalid_timestamp(n.to_string()))?;
            Utc.timestamp_opt(secs, 0)
                .single()
                .ok_or_else(|| Error::invalid_timestamp(n.to_string()))?
                .into_timestamp()
        }
        other => Err(Error::invalid_timestamp(other.to_string())),
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` with a `UTC`/`GMT` suffix or
/// numeric offset, and bare naive datetimes (assumed UTC).
fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S %z") {
        return Some(parsed.with_timezone(&Utc));
    }

    let trimmed = text
        .strip_suffix(" UTC")
        .or_else(|| text.strip_suffix(" GMT"))
        .unwrap_or(text);
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_utc_suffixed_strings() {
        assert_eq!(
            "2010-10-10 09:09:09 UTC".into_timestamp().unwrap(),
            "2010-10-10T09:09:09Z"
        );
    }

    #[test]
    fn formats_rfc3339_strings() {
        assert_eq!(
            "2010-10-17T20:00:00Z".into_timestamp().unwrap(),
            "2010-10-17T20:00:00Z"
        );
        // Offsets are folded into UTC.
        assert_eq!(
            "2010-10-17T22:00:00+02:00".into_timestamp().unwrap(),
            "2010-10-17T20:00:00Z"
        );
    }

    #[test]
    fn formats_naive_strings_as_utc() {
        assert_eq!(
            "2010-10-10 09:09:09".into_timestamp().unwrap(),
            "2010-10-10T09:09:09Z"
        );
    }

    #[test]
    fn formats_chrono_datetimes() {
        let time = Utc.with_ymd_and_hms(2010, 10, 17, 20, 0, 0).unwrap();
        assert_eq!(time.into_timestamp().unwrap(), "2010-10-17T20:00:00Z");
    }

    #[test]
    fn rejects_unparseable_strings() {
        let err = "not a time".into_timestamp().unwrap_err();
        assert_eq!(err.to_string(), "unrecognized timestamp value: not a time");
    }

    #[test]
    fn normalizes_bare_schedule_entries() {
        let mut payload = json!({
            "device_tokens": ["tok"],
            "schedule_for": ["2010-10-10 09:09:09 UTC", 1287345600]
        });
        normalize_push_payload(&mut payload).unwrap();

        assert_eq!(
            payload["schedule_for"],
            json!(["2010-10-10T09:09:09Z", "2010-10-17T20:00:00Z"])
        );
        assert_eq!(payload["device_tokens"], json!(["tok"]));
    }

    #[test]
    fn normalizes_only_the_timestamp_field_of_object_entries() {
        let mut payload = json!({
            "schedule_for": [{"scheduled_time": "2010-10-17 20:00:00 UTC", "cancel": true}]
        });
        normalize_push_payload(&mut payload).unwrap();

        assert_eq!(
            payload["schedule_for"][0],
            json!({"scheduled_time": "2010-10-17T20:00:00Z", "cancel": true})
        );
    }

    #[test]
    fn payload_without_schedule_passes_through() {
        let mut payload = json!({"aps": {"alert": "hi"}});
        let before = payload.clone();
        normalize_push_payload(&mut payload).unwrap();
        assert_eq!(payload, before);
    }

    #[test]
    fn schedule_with_bad_entry_errors() {
        let mut payload = json!({"schedule_for": ["garbage"]});
        assert!(normalize_push_payload(&mut payload).is_err());
    }

    #[test]
    fn alias_numbers_become_strings() {
        let mut payload = json!({"alias": 11});
        normalize_register_payload(&mut payload);
        assert_eq!(payload["alias"], json!("11"));
    }

    #[test]
    fn alias_strings_and_nulls_are_untouched() {
        let mut payload = json!({"alias": "one"});
        normalize_register_payload(&mut payload);
        assert_eq!(payload["alias"], json!("one"));

        let mut payload = json!({"alias": null});
        normalize_register_payload(&mut payload);
        assert_eq!(payload["alias"], json!(null));
    }
}
