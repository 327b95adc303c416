//! NetBox REST API access.
//!
//! The provider talks to NetBox through the [`NetboxApi`] trait so tests can
//! substitute an in-memory implementation. [`NetboxClient`] is the real
//! HTTP client.

mod api;
mod client;
pub mod mock;

pub use api::NetboxApi;
pub use client::{NetboxClient, NetboxClientConfig};
