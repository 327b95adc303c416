//! Hemmer provider for NetBox.
//!
//! Exposes NetBox DCIM, IPAM, tenancy, virtualization, circuit, VPN, and
//! extras objects as Hemmer resources and data sources over the provider
//! gRPC protocol.
//!
//! # Architecture
//!
//! Every object type is described by a declarative [`catalog::EntitySpec`]
//! table entry. The generic [`engine`] derives schemas from those tables and
//! implements plan, create, read, update, delete, import, and data source
//! lookup once for all of them. [`provider::NetboxProvider`] wires the
//! catalog and engine to the [`server::ProviderService`] trait, and
//! [`netbox::NetboxClient`] talks to the NetBox REST API behind the
//! [`netbox::NetboxApi`] trait so tests can substitute an in-memory mock.
//!
//! # Running
//!
//! The provider binary is spawned by the Hemmer core. On startup it prints
//! a handshake line to stdout:
//!
//! ```text
//! HEMMER_PROVIDER|1|127.0.0.1:50051
//! ```
//!
//! and then serves the provider protocol on that address. Connection
//! settings come from the provider configuration block or from the
//! `NETBOX_SERVER_URL`, `NETBOX_API_TOKEN`, and `NETBOX_INSECURE`
//! environment variables.
//!
//! # Example
//!
//! ```ignore
//! use hemmer_provider_netbox::{provider::NetboxProvider, serve, init_logging};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!     serve(NetboxProvider::new()).await
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod engine;
pub mod error;
pub mod logging;
pub mod netbox;
pub mod provider;
pub mod schema;
pub mod server;
pub mod testing;
pub mod types;
pub mod validation;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated;

// Re-export main types at crate root
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::NetboxProvider;
pub use schema::ProviderSchema;
pub use server::{
    serve, serve_on, serve_on_with_options, serve_with_options, ProviderService, ServeOptions,
};
pub use types::{
    AttributeChange, ImportedResource, PlanResult, ProviderMetadata, ServerCapabilities,
    HANDSHAKE_PREFIX, PROTOCOL_VERSION,
};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tonic;
pub use tracing;
