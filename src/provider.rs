//! The NetBox provider.
//!
//! [`NetboxProvider`] implements [`ProviderService`] by dispatching every
//! resource and data source operation to the CRUD engine with the matching
//! catalog entry. The NetBox client is built during `Configure` and injected
//! as an [`NetboxApi`] trait object, so tests swap in an in-memory mock
//! without touching the dispatch path.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::catalog::{registry, EntitySpec};
use crate::engine;
use crate::error::ProviderError;
use crate::netbox::{NetboxApi, NetboxClient, NetboxClientConfig};
use crate::schema::{Attribute, Diagnostic, ProviderSchema, Schema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult};

/// Environment variable holding the NetBox base URL.
pub const ENV_SERVER_URL: &str = "NETBOX_SERVER_URL";
/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "NETBOX_API_TOKEN";
/// Environment variable to skip TLS certificate verification.
pub const ENV_INSECURE: &str = "NETBOX_INSECURE";

/// Resolved provider configuration after merging config and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedConfig {
    server_url: String,
    api_token: String,
    insecure: bool,
}

/// Merge explicit configuration with environment fallbacks. Configuration
/// wins over environment for every setting.
fn resolve_config(
    config: &Value,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, Vec<Diagnostic>> {
    let get_str = |key: &str| {
        config
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let server_url = get_str("server_url").or_else(|| env(ENV_SERVER_URL));
    let api_token = get_str("api_token").or_else(|| env(ENV_API_TOKEN));
    let insecure = config
        .get("insecure")
        .and_then(Value::as_bool)
        .or_else(|| env(ENV_INSECURE).map(|v| v == "true" || v == "1"))
        .unwrap_or(false);

    let mut diagnostics = Vec::new();
    if server_url.is_none() {
        diagnostics.push(
            Diagnostic::error("Missing NetBox server URL")
                .with_detail(format!(
                    "Set server_url in the provider configuration or the {} environment variable",
                    ENV_SERVER_URL
                ))
                .with_attribute("server_url"),
        );
    }
    if api_token.is_none() {
        diagnostics.push(
            Diagnostic::error("Missing NetBox API token")
                .with_detail(format!(
                    "Set api_token in the provider configuration or the {} environment variable",
                    ENV_API_TOKEN
                ))
                .with_attribute("api_token"),
        );
    }
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    Ok(ResolvedConfig {
        server_url: server_url.expect("checked above"),
        api_token: api_token.expect("checked above"),
        insecure,
    })
}

fn mask_token(token: &str) -> String {
    if token.chars().count() > 4 {
        let prefix: String = token.chars().take(4).collect();
        format!("{}***", prefix)
    } else {
        "***".to_string()
    }
}

/// Provider exposing NetBox objects as resources and data sources.
pub struct NetboxProvider {
    entities: BTreeMap<&'static str, &'static EntitySpec>,
    api: RwLock<Option<Arc<dyn NetboxApi>>>,
}

impl NetboxProvider {
    /// Create an unconfigured provider. The NetBox client is built when the
    /// core calls `Configure`.
    pub fn new() -> Self {
        Self {
            entities: registry(),
            api: RwLock::new(None),
        }
    }

    /// Create a provider backed by an existing API client, skipping
    /// `Configure`. Used by tests with the in-memory mock.
    pub fn with_client(api: Arc<dyn NetboxApi>) -> Self {
        Self {
            entities: registry(),
            api: RwLock::new(Some(api)),
        }
    }

    fn entity(&self, type_name: &str) -> Result<&'static EntitySpec, ProviderError> {
        self.entities.get(type_name).copied().ok_or_else(|| {
            ProviderError::UnknownResource(format!("Unknown resource type: {}", type_name))
        })
    }

    fn data_source_entity(&self, type_name: &str) -> Result<&'static EntitySpec, ProviderError> {
        let entity = self.entities.get(type_name).copied().filter(|e| e.has_data_source);
        entity.ok_or_else(|| {
            ProviderError::UnknownResource(format!("Unknown data source type: {}", type_name))
        })
    }

    async fn api(&self) -> Result<Arc<dyn NetboxApi>, ProviderError> {
        self.api.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration("provider is not configured".to_string())
        })
    }

    fn provider_config_schema() -> Schema {
        Schema::v0()
            .with_description("NetBox DCIM/IPAM provider")
            .with_attribute(
                "server_url",
                Attribute::optional_string().with_description(format!(
                    "Base URL of the NetBox instance. Falls back to {}.",
                    ENV_SERVER_URL
                )),
            )
            .with_attribute(
                "api_token",
                Attribute::optional_string()
                    .sensitive()
                    .with_description(format!(
                        "NetBox API token. Falls back to {}.",
                        ENV_API_TOKEN
                    )),
            )
            .with_attribute(
                "insecure",
                Attribute::optional_bool().with_description(format!(
                    "Skip TLS certificate verification. Falls back to {}.",
                    ENV_INSECURE
                )),
            )
    }
}

impl Default for NetboxProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProviderService for NetboxProvider {
    fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(Self::provider_config_schema());
        for (name, entity) in &self.entities {
            schema = schema.with_resource(*name, engine::schema_for(entity));
            if entity.has_data_source {
                schema = schema.with_data_source(*name, engine::data_source_schema_for(entity));
            }
        }
        schema
    }

    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let mut diagnostics = Vec::new();
        if let Some(url) = config.get("server_url").and_then(Value::as_str) {
            if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
                diagnostics.push(
                    Diagnostic::error("Invalid server URL")
                        .with_detail("server_url must start with http:// or https://")
                        .with_attribute("server_url"),
                );
            }
        }
        Ok(diagnostics)
    }

    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let resolved = match resolve_config(&config, |key| std::env::var(key).ok()) {
            Ok(resolved) => resolved,
            Err(diagnostics) => return Ok(diagnostics),
        };

        info!(
            server_url = %resolved.server_url,
            api_token = %mask_token(&resolved.api_token),
            insecure = resolved.insecure,
            "configuring NetBox client"
        );

        let client = NetboxClient::new(NetboxClientConfig {
            server_url: resolved.server_url.clone(),
            api_token: resolved.api_token,
            insecure: resolved.insecure,
        })?;

        // Probe the API so credential problems surface here rather than on
        // the first resource operation
        match client.status().await {
            Ok(status) => {
                let version = status
                    .get("netbox-version")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                info!(netbox_version = %version, "connected to NetBox");
            }
            Err(e) => {
                return Ok(vec![Diagnostic::error("Cannot reach NetBox")
                    .with_detail(format!(
                        "Status check against {} failed: {}",
                        resolved.server_url, e
                    ))]);
            }
        }

        *self.api.write().await = Some(Arc::new(client));
        Ok(Vec::new())
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let entity = self.entity(resource_type)?;
        Ok(engine::validate_config(entity, &config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let entity = self.entity(resource_type)?;
        engine::plan(entity, prior_state, proposed_state)
    }

    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let entity = self.entity(resource_type)?;
        let api = self.api().await?;
        engine::create(entity, api.as_ref(), planned_state).await
    }

    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        let entity = self.entity(resource_type)?;
        let api = self.api().await?;
        engine::read(entity, api.as_ref(), current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let entity = self.entity(resource_type)?;
        let api = self.api().await?;
        engine::update(entity, api.as_ref(), prior_state, planned_state).await
    }

    async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        let entity = self.entity(resource_type)?;
        let api = self.api().await?;
        engine::delete(entity, api.as_ref(), current_state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let entity = self.entity(resource_type)?;
        let api = self.api().await?;
        let state = engine::import(entity, api.as_ref(), id).await?;
        debug!(resource_type = %resource_type, id = %id, "imported object");
        Ok(vec![ImportedResource::new(resource_type, state)])
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let entity = self.data_source_entity(data_source_type)?;
        Ok(crate::validation::validate(
            &engine::data_source_schema_for(entity),
            &config,
        ))
    }

    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let entity = self.data_source_entity(data_source_type)?;
        let api = self.api().await?;
        engine::read_data_source(entity, api.as_ref(), config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbox::mock::MockNetbox;
    use serde_json::json;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_config_prefers_explicit_values() {
        let config = json!({
            "server_url": "https://netbox.example.com",
            "api_token": "abcd1234",
            "insecure": true
        });
        let resolved = resolve_config(&config, |key| Some(format!("env-{}", key))).unwrap();
        assert_eq!(resolved.server_url, "https://netbox.example.com");
        assert_eq!(resolved.api_token, "abcd1234");
        assert!(resolved.insecure);
    }

    #[test]
    fn test_resolve_config_env_fallback() {
        let resolved = resolve_config(&json!({}), |key| match key {
            ENV_SERVER_URL => Some("https://netbox.internal".to_string()),
            ENV_API_TOKEN => Some("token".to_string()),
            ENV_INSECURE => Some("1".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(resolved.server_url, "https://netbox.internal");
        assert!(resolved.insecure);
    }

    #[test]
    fn test_resolve_config_missing_values_are_field_scoped() {
        let diags = resolve_config(&json!({}), no_env).unwrap_err();
        assert_eq!(diags.len(), 2);
        let attributes: Vec<_> = diags.iter().filter_map(|d| d.attribute.as_deref()).collect();
        assert!(attributes.contains(&"server_url"));
        assert!(attributes.contains(&"api_token"));
    }

    #[test]
    fn test_resolve_config_empty_string_counts_as_missing() {
        let config = json!({"server_url": "", "api_token": "t"});
        let diags = resolve_config(&config, no_env).unwrap_err();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].attribute.as_deref(), Some("server_url"));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("0123456789abcdef"), "0123***");
        assert_eq!(mask_token("ab"), "***");
        // Multi-byte characters must not split at a byte boundary
        assert_eq!(mask_token("ütoken"), "ütok***");
    }

    #[test]
    fn test_schema_covers_registry() {
        let provider = NetboxProvider::new();
        let schema = provider.schema();

        assert!(schema.provider.attributes.contains_key("server_url"));
        assert!(schema.provider.attributes["api_token"].flags.sensitive);

        assert_eq!(schema.resources.len(), registry().len());
        assert!(schema.resources.contains_key("netbox_site"));
        assert!(schema.data_sources.contains_key("netbox_site"));
        // Interfaces have no data source
        assert!(!schema.data_sources.contains_key("netbox_interface"));
    }

    #[tokio::test]
    async fn test_validate_provider_config_rejects_bad_url() {
        let provider = NetboxProvider::new();
        let diags = provider
            .validate_provider_config(json!({"server_url": "netbox.example.com"}))
            .await
            .unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].attribute.as_deref(), Some("server_url"));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_rejects_operations() {
        let provider = NetboxProvider::new();
        let err = provider
            .read("netbox_site", json!({"id": "1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let provider = NetboxProvider::with_client(Arc::new(MockNetbox::new()));
        let err = provider
            .read("netbox_flux_capacitor", json!({"id": "1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_resource_only_entity_has_no_data_source() {
        let provider = NetboxProvider::with_client(Arc::new(MockNetbox::new()));
        let err = provider
            .read_data_source("netbox_interface", json!({"name": "eth0"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_crud_dispatch_through_mock() {
        let mock = Arc::new(MockNetbox::new());
        let provider = NetboxProvider::with_client(mock.clone());

        let planned = json!({"name": "DC West", "slug": "dc-west"});
        let state = provider.create("netbox_site", planned).await.unwrap();
        let id = state["id"].as_str().unwrap().to_string();

        let read_back = provider.read("netbox_site", state.clone()).await.unwrap();
        assert_eq!(read_back["name"], "DC West");

        let planned = json!({"id": id, "name": "DC East", "slug": "dc-west"});
        let updated = provider
            .update("netbox_site", state.clone(), planned)
            .await
            .unwrap();
        assert_eq!(updated["name"], "DC East");

        provider.delete("netbox_site", updated).await.unwrap();
        assert_eq!(mock.count("dcim/sites"), 0);
    }
}
