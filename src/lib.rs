//! Typed Rust client for the Airship push notification HTTP API.
//!
//! The crate has a domain layer of strong types (audience selectors, push
//! payloads, validated credentials), a transport layer for the JSON wire
//! format, and a small client layer orchestrating requests.
//!
//! ```rust,no_run
//! use airship::audience::{and, ios_channel, not, tag};
//! use airship::{AirshipClient, Auth, DeviceTypes, Notification, Push};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), airship::AirshipError> {
//!     let client = AirshipClient::new(Auth::basic("app-key", "master-secret")?);
//!     let audience = and([
//!         ios_channel("074e84a2-9ed9-4eee-9ca4-cc597bfdbef3")?,
//!         not(tag("muted")),
//!     ]);
//!     let push = Push::new(audience, Notification::alert("hello")?, DeviceTypes::All)?;
//!     let _resp = client.send_push(&push).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{AirshipClient, AirshipClientBuilder, AirshipError, Auth, Location};
pub use domain::{
    AndroidOverride, ApiFailure, AppKey, AttributeSelector, AttributeValue, BearerToken,
    DeviceType, DeviceTypes, IosOverride, LeafKey, MasterSecret, Notification, Operator, Push,
    PushResponse, Selector, ValidationError, attribute, audience,
};
