//! Blocking facade over the async client.
//!
//! Wraps [`crate::Client`] and drives it to completion on the caller's
//! thread: inside a tokio runtime via `block_in_place`, otherwise on a
//! runtime created for the call. Behavior is otherwise identical to the
//! async client, including the timeout-as-response semantics.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use crate::client::ScheduledTarget;
use crate::config::Config;
use crate::error::Result;
use crate::payload::IntoTimestamp;
use crate::response::Response;

/// Synchronous client for the push API.
pub struct Client {
    inner: crate::Client,
}

impl Client {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            inner: crate::Client::new(config)?,
        })
    }

    pub fn config(&self) -> &Config {
        self.inner.config()
    }

    /// See [`crate::Client::set_request_timeout`].
    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.inner.set_request_timeout(timeout);
    }

    pub fn register_device(&self, token: &str, options: Option<Value>) -> Result<Response> {
        self.block_on(self.inner.register_device(token, options))
    }

    pub fn unregister_device(&self, token: &str) -> Result<Response> {
        self.block_on(self.inner.unregister_device(token))
    }

    pub fn push(&self, payload: Value) -> Result<Response> {
        self.block_on(self.inner.push(payload))
    }

    pub fn batch_push(&self, payloads: Vec<Value>) -> Result<Response> {
        self.block_on(self.inner.batch_push(payloads))
    }

    pub fn broadcast_push(&self, payload: Value) -> Result<Response> {
        self.block_on(self.inner.broadcast_push(payload))
    }

    pub fn delete_scheduled(&self, target: impl Into<ScheduledTarget>) -> Result<Response> {
        self.block_on(self.inner.delete_scheduled(target))
    }

    pub fn feedback(&self, since: impl IntoTimestamp) -> Result<Response> {
        self.block_on(self.inner.feedback(since))
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => tokio::task::block_in_place(|| handle.block_on(future)),
            Err(_) => {
                // Not in a tokio runtime, create one for this call
                let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
                rt.block_on(future)
            }
        }
    }
}
