//! Error types for the skypush client.
//!
//! Only local failures surface as errors: missing configuration, URL or
//! body construction problems, and transport-level faults. Remote
//! rejections and request timeouts are reported through
//! [`Response`](crate::Response) instead, so callers have a single place
//! to inspect the outcome of a delivered request.

use thiserror::Error;

/// Convenience alias for Results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// One or more required configuration fields were unset when an
    /// operation needed them. `fields` preserves the order in which the
    /// operation declared its requirements.
    #[error("must configure {} before making this request", .fields.join(", "))]
    MissingConfiguration { fields: Vec<&'static str> },

    #[error("invalid request URL: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unrecognized timestamp value: {value}")]
    InvalidTimestamp { value: String },

    #[error("failed to serialize request body")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed: {method} {path}")]
    Request {
        method: String,
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl Error {
    pub(crate) fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    pub(crate) fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }

    pub(crate) fn request(
        method: &reqwest::Method,
        path: impl Into<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::Request {
            method: method.to_string(),
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configuration_lists_fields_in_order() {
        let err = Error::MissingConfiguration {
            fields: vec!["application_key", "application_secret"],
        };
        assert_eq!(
            err.to_string(),
            "must configure application_key, application_secret before making this request"
        );
    }

    #[test]
    fn missing_configuration_single_field() {
        let err = Error::MissingConfiguration {
            fields: vec!["master_secret"],
        };
        assert_eq!(
            err.to_string(),
            "must configure master_secret before making this request"
        );
    }
}
