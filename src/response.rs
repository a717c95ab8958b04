//! Uniform wrapper over the service's heterogeneous replies.
//!
//! The API answers with a JSON array (feedback), a JSON object (push
//! acks, errors), or nothing at all (unregister). [`Response`] folds all
//! three into one shape with a single success predicate, so callers
//! never branch on which endpoint they talked to.

use serde_json::{Map, Value};

/// Decoded response body.
///
/// A body that is absent, empty, or fails to decode as a JSON array or
/// object is `Empty`; that is a benign outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Array(Vec<Value>),
    Object(Map<String, Value>),
    Empty,
}

/// Normalized outcome of one executed request.
#[derive(Debug, Clone)]
pub struct Response {
    code: u16,
    raw_body: Option<String>,
    body: Body,
}

impl Response {
    pub(crate) fn new(code: u16, raw_body: Option<String>) -> Self {
        let body = match raw_body.as_deref() {
            Some(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Array(items)) => Body::Array(items),
                Ok(Value::Object(map)) => Body::Object(map),
                _ => Body::Empty,
            },
            None => Body::Empty,
        };

        Self {
            code,
            raw_body,
            body,
        }
    }

    /// Substitute returned when the request timeout elapses. Never
    /// server-originated.
    pub(crate) fn timeout() -> Self {
        Self::new(503, Some(r#"{"error": "Request timeout"}"#.to_string()))
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// True for any 2xx status.
    pub fn success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// The response text exactly as received, if any.
    pub fn raw_body(&self) -> Option<&str> {
        self.raw_body.as_deref()
    }

    /// Ordinal access into an array body. `None` for out-of-range
    /// indexes and for object or empty bodies.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match &self.body {
            Body::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Keyed access into an object body. `None` for absent keys and for
    /// array or empty bodies.
    pub fn get_field(&self, key: &str) -> Option<&Value> {
        match &self.body {
            Body::Object(map) => map.get(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_covers_2xx_only() {
        assert!(Response::new(200, None).success());
        assert!(Response::new(201, None).success());
        assert!(Response::new(204, None).success());
        assert!(!Response::new(400, None).success());
        assert!(!Response::new(401, None).success());
        assert!(!Response::new(500, None).success());
    }

    #[test]
    fn array_body_supports_ordinal_access() {
        let text = json!([
            {"device_token": "token", "marked_inactive_on": "2010-10-14T19:15:13Z"},
            {"device_token": "token2", "marked_inactive_on": "2010-10-14T19:15:13Z"}
        ])
        .to_string();
        let response = Response::new(200, Some(text));

        assert_eq!(response.get(0).unwrap()["device_token"], "token");
        assert_eq!(response.get(1).unwrap()["device_token"], "token2");
        assert!(response.get(2).is_none());
        assert!(response.get_field("device_token").is_none());
    }

    #[test]
    fn object_body_supports_keyed_access() {
        let text = json!({"device_token": "token", "alias": "my_alias"}).to_string();
        let response = Response::new(200, Some(text));

        assert_eq!(response.get_field("device_token").unwrap(), "token");
        assert!(response.get_field("missing").is_none());
        assert!(response.get(0).is_none());
    }

    #[test]
    fn absent_and_undecodable_bodies_are_empty() {
        assert_eq!(*Response::new(204, None).body(), Body::Empty);
        assert_eq!(*Response::new(200, Some(String::new())).body(), Body::Empty);
        assert_eq!(
            *Response::new(200, Some("not json".to_string())).body(),
            Body::Empty
        );
        // Scalar JSON has neither ordinal nor keyed access.
        assert_eq!(
            *Response::new(200, Some("42".to_string())).body(),
            Body::Empty
        );
    }

    #[test]
    fn raw_body_is_preserved_verbatim() {
        let response = Response::new(200, Some("not json".to_string()));
        assert_eq!(response.raw_body(), Some("not json"));
    }

    #[test]
    fn timeout_response_is_synthetic_503() {
        let response = Response::timeout();
        assert_eq!(response.code(), 503);
        assert!(!response.success());
        assert_eq!(response.get_field("error").unwrap(), "Request timeout");
    }
}
