//! Client configuration and credential validation.
//!
//! A [`Config`] is built once per client via [`ConfigBuilder`] and is
//! immutable afterwards, with one deliberate exception: the request
//! timeout, which [`Client`](crate::Client) exposes as a
//! configuration-time setter. Credential checks happen per operation
//! through [`Config::validate_required`], before any network activity.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Production API endpoint. Overridable through
/// [`ConfigBuilder::base_url`], mainly so tests can target a local server.
pub const DEFAULT_BASE_URL: &str = "https://go.skypush.com";

/// Wall-clock bound applied to each request by the executor.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Device platform a client serves.
///
/// The two platforms differ only in the path prefix of their device
/// registration endpoints; every other operation is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub(crate) fn device_base_path(self) -> &'static str {
        match self {
            Platform::Ios => "/api/device_tokens",
            Platform::Android => "/api/apids",
        }
    }
}

/// Credential fields an operation can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ApplicationKey,
    ApplicationSecret,
    MasterSecret,
}

impl Field {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Field::ApplicationKey => "application_key",
            Field::ApplicationSecret => "application_secret",
            Field::MasterSecret => "master_secret",
        }
    }
}

/// Immutable per-client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    application_key: Option<String>,
    application_secret: Option<String>,
    master_secret: Option<String>,
    platform: Platform,
    base_url: String,
    request_timeout: Duration,
}

impl Config {
    /// Start building a configuration for the given platform.
    ///
    /// The platform is the one field every client needs, so it is taken
    /// up front rather than validated at `build()` time.
    pub fn builder(platform: Platform) -> ConfigBuilder {
        ConfigBuilder::new(platform)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub(crate) fn set_request_timeout(&mut self, timeout: Duration) {
        self.request_timeout = timeout;
    }

    fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::ApplicationKey => self.application_key.as_deref(),
            Field::ApplicationSecret => self.application_secret.as_deref(),
            Field::MasterSecret => self.master_secret.as_deref(),
        }
    }

    /// Returns the configured value for `field` or a single-field
    /// [`Error::MissingConfiguration`].
    pub(crate) fn require(&self, field: Field) -> Result<&str> {
        self.get(field).ok_or_else(|| Error::MissingConfiguration {
            fields: vec![field.name()],
        })
    }

    /// Fails fast when any of `fields` is unset. The error names every
    /// missing field, comma-joined, in the order given here.
    pub fn validate_required(&self, fields: &[Field]) -> Result<()> {
        let missing: Vec<&'static str> = fields
            .iter()
            .copied()
            .filter(|field| self.get(*field).is_none())
            .map(Field::name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingConfiguration { fields: missing })
        }
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    platform: Platform,
    application_key: Option<String>,
    application_secret: Option<String>,
    master_secret: Option<String>,
    base_url: String,
    request_timeout: Duration,
}

impl ConfigBuilder {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            application_key: None,
            application_secret: None,
            master_secret: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Public account identifier, sent as the Basic auth username on
    /// every call.
    pub fn application_key(mut self, key: impl Into<String>) -> Self {
        self.application_key = Some(key.into());
        self
    }

    /// Credential authorizing device registration and unregistration.
    pub fn application_secret(mut self, secret: impl Into<String>) -> Self {
        self.application_secret = Some(secret.into());
        self
    }

    /// Credential authorizing push, broadcast, schedule deletion, and
    /// feedback operations.
    pub fn master_secret(mut self, secret: impl Into<String>) -> Self {
        self.master_secret = Some(secret.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Config {
        Config {
            application_key: self.application_key,
            application_secret: self.application_secret,
            master_secret: self.master_secret,
            platform: self.platform,
            base_url: self.base_url,
            request_timeout: self.request_timeout,
        }
    }
}
