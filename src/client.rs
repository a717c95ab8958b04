//! Asynchronous API client and the request execution pipeline.
//!
//! One [`Client`] serves one application on one platform. All operations
//! funnel through a single private executor, which validates
//! credentials, signs the request, enforces the wall-clock timeout, logs
//! the exchange, and normalizes whatever came back into a [`Response`].

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::Value;
use tracing::{error, info};
use url::Url;

use crate::config::{Config, Field};
use crate::error::{Error, Result};
use crate::payload::{self, IntoTimestamp};
use crate::response::Response;

/// Selector for [`Client::delete_scheduled`].
///
/// A bare value (id or its string form) addresses one scheduled push;
/// [`ScheduledTarget::alias`] addresses everything scheduled under a
/// device alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledTarget {
    Id(String),
    Alias(String),
}

impl ScheduledTarget {
    pub fn alias(alias: impl Into<String>) -> Self {
        Self::Alias(alias.into())
    }

    fn path(&self) -> String {
        match self {
            Self::Id(id) => format!("/api/push/scheduled/{id}"),
            Self::Alias(alias) => format!("/api/push/scheduled/alias/{alias}"),
        }
    }
}

impl From<u64> for ScheduledTarget {
    fn from(id: u64) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<&str> for ScheduledTarget {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for ScheduledTarget {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

/// Async client for the push API.
#[derive(Debug, Clone)]
pub struct Client {
    config: Config,
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client from a finished configuration.
    ///
    /// The underlying HTTP client carries no timeout of its own; the
    /// executor enforces the configured bound at the call site, so the
    /// limit applies to the whole exchange rather than per socket
    /// operation.
    pub fn new(config: Config) -> Result<Self> {
        let base_url = Url::parse(config.base_url())
            .map_err(|source| Error::invalid_url(config.base_url(), source))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("skypush/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::ClientBuild { source })?;

        Ok(Self {
            config,
            base_url,
            http,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Override the request timeout. This is configuration-time
    /// mutation: set it before issuing requests, not concurrently with
    /// them.
    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.config.set_request_timeout(timeout);
    }

    /// Register a device token, optionally with a free-form payload.
    /// An `alias` field in the payload is coerced to a string.
    pub async fn register_device(&self, token: &str, options: Option<Value>) -> Result<Response> {
        let mut body = options.unwrap_or_else(|| Value::Object(Default::default()));
        payload::normalize_register_payload(&mut body);

        let path = format!("{}/{token}", self.config.platform().device_base_path());
        self.execute(
            Method::PUT,
            &path,
            Some(serde_json::to_string(&body)?),
            Field::ApplicationSecret,
        )
        .await
    }

    /// Remove a device token registration.
    pub async fn unregister_device(&self, token: &str) -> Result<Response> {
        let path = format!("{}/{token}", self.config.platform().device_base_path());
        self.execute(Method::DELETE, &path, None, Field::ApplicationSecret)
            .await
    }

    /// Send one push payload. `schedule_for` entries are normalized to
    /// UTC ISO-8601 before serialization.
    pub async fn push(&self, mut payload: Value) -> Result<Response> {
        payload::normalize_push_payload(&mut payload)?;
        self.execute(
            Method::POST,
            "/api/push/",
            Some(serde_json::to_string(&payload)?),
            Field::MasterSecret,
        )
        .await
    }

    /// Send several independent push payloads as one JSON array body.
    /// Each payload gets the same normalization as [`Client::push`].
    pub async fn batch_push(&self, payloads: Vec<Value>) -> Result<Response> {
        let mut batch = payloads;
        for payload in &mut batch {
            payload::normalize_push_payload(payload)?;
        }
        self.execute(
            Method::POST,
            "/api/push/batch/",
            Some(serde_json::to_string(&batch)?),
            Field::MasterSecret,
        )
        .await
    }

    /// Send a push payload to every registered device.
    pub async fn broadcast_push(&self, mut payload: Value) -> Result<Response> {
        payload::normalize_push_payload(&mut payload)?;
        self.execute(
            Method::POST,
            "/api/push/broadcast/",
            Some(serde_json::to_string(&payload)?),
            Field::MasterSecret,
        )
        .await
    }

    /// Cancel a scheduled push by id or by alias.
    pub async fn delete_scheduled(&self, target: impl Into<ScheduledTarget>) -> Result<Response> {
        self.execute(Method::DELETE, &target.into().path(), None, Field::MasterSecret)
            .await
    }

    /// List devices that became inactive since the given moment. The
    /// service answers with a JSON array; see [`Response::get`].
    pub async fn feedback(&self, since: impl IntoTimestamp) -> Result<Response> {
        let path = format!(
            "/api/device_tokens/feedback/?since={}",
            since.into_timestamp()?
        );
        self.execute(Method::GET, &path, None, Field::MasterSecret)
            .await
    }

    /// Build, sign, time, send, log, normalize. Exactly one network
    /// attempt: a timeout yields the synthetic 503 response, never a
    /// retry.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        credential: Field,
    ) -> Result<Response> {
        self.config
            .validate_required(&[Field::ApplicationKey, credential])?;
        let key = self.config.require(Field::ApplicationKey)?;
        let secret = self.config.require(credential)?;

        let url = self
            .base_url
            .join(path)
            .map_err(|source| Error::invalid_url(path, source))?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .basic_auth(key, Some(secret));
        if let Some(text) = &body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(text.clone());
        }

        let started = Instant::now();
        match tokio::time::timeout(self.config.request_timeout(), dispatch(request)).await {
            Ok(Ok((status, response_body))) => {
                info!(
                    "skypush ({}ms): [{} {}, {}], [{}, {}]",
                    started.elapsed().as_millis(),
                    method,
                    path,
                    body.as_deref().unwrap_or(""),
                    status,
                    response_body.as_deref().unwrap_or("")
                );
                Ok(Response::new(status, response_body))
            }
            Ok(Err(source)) => Err(Error::request(&method, path, source)),
            Err(_elapsed) => {
                error!(
                    "skypush request timed out after {}s: [{} {} {}]",
                    self.config.request_timeout().as_secs_f64(),
                    method,
                    path,
                    body.as_deref().unwrap_or("")
                );
                Ok(Response::timeout())
            }
        }
    }
}

/// Send the request and drain the body. Runs under the executor's
/// timeout so the bound covers the whole exchange.
async fn dispatch(
    request: reqwest::RequestBuilder,
) -> std::result::Result<(u16, Option<String>), reqwest::Error> {
    let response = request.send().await?;
    let status = response.status().as_u16();
    let text = response.text().await?;

    Ok((status, (!text.is_empty()).then_some(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_target_paths() {
        let id: ScheduledTarget = 123456789u64.into();
        assert_eq!(id.path(), "/api/push/scheduled/123456789");

        let alias = ScheduledTarget::alias("x");
        assert_eq!(alias.path(), "/api/push/scheduled/alias/x");
    }

    #[test]
    fn bare_strings_are_ids_not_aliases() {
        let target: ScheduledTarget = "123456789".into();
        assert_eq!(target, ScheduledTarget::Id("123456789".to_string()));
    }
}
