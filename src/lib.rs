//! Client library for the Skypush push notification HTTP API.
//!
//! Supports device registration for iOS and Android applications plus
//! the shared push, broadcast, scheduling, and feedback operations. All
//! network operations return a uniform [`Response`]: 2xx, remote
//! rejections, and request timeouts are all inspected the same way,
//! while missing configuration fails fast with an [`Error`] before any
//! network attempt.
//!
//! ```rust,no_run
//! use serde_json::json;
//! use skypush::{Client, Config, Platform};
//!
//! # async fn run() -> skypush::Result<()> {
//! let config = Config::builder(Platform::Ios)
//!     .application_key("app_key")
//!     .master_secret("master_secret")
//!     .build();
//! let client = Client::new(config)?;
//!
//! let response = client
//!     .push(json!({
//!         "device_tokens": ["token"],
//!         "aps": {"alert": "Hello"},
//!         "schedule_for": ["2010-10-17 20:00:00 UTC"],
//!     }))
//!     .await?;
//! assert!(response.success());
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod response;

// Re-export the types most callers need
pub use client::{Client, ScheduledTarget};
pub use config::{Config, ConfigBuilder, Field, Platform};
pub use error::{Error, Result};
pub use payload::IntoTimestamp;
pub use response::{Body, Response};
