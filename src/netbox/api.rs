//! Trait abstraction over the NetBox REST API.

use crate::error::ProviderError;
use serde_json::Value;

/// Endpoint-generic access to NetBox objects.
///
/// Endpoints are app-scoped paths such as `dcim/sites` or `ipam/prefixes`.
/// All object payloads are raw JSON; the CRUD engine maps them to and from
/// resource state using the entity catalog.
#[async_trait::async_trait]
pub trait NetboxApi: Send + Sync {
    /// Fetch a single object by primary key.
    ///
    /// Returns `Ok(None)` when the object does not exist (HTTP 404), so
    /// callers can prune deleted objects from state.
    async fn get(&self, endpoint: &str, id: i64) -> Result<Option<Value>, ProviderError>;

    /// List objects matching the given query filters, following pagination.
    async fn list(
        &self,
        endpoint: &str,
        filters: &[(String, String)],
    ) -> Result<Vec<Value>, ProviderError>;

    /// Create an object. Returns the created object as the API echoes it.
    async fn create(&self, endpoint: &str, payload: &Value) -> Result<Value, ProviderError>;

    /// Partially update an object (HTTP PATCH). Only the fields present in
    /// `payload` are modified.
    async fn update(
        &self,
        endpoint: &str,
        id: i64,
        payload: &Value,
    ) -> Result<Value, ProviderError>;

    /// Delete an object. Returns `false` when the object was already gone.
    async fn delete(&self, endpoint: &str, id: i64) -> Result<bool, ProviderError>;

    /// Probe the `/api/status/` endpoint, verifying connectivity and the
    /// API token.
    async fn status(&self) -> Result<Value, ProviderError>;
}
