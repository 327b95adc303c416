//! Generic CRUD engine.
//!
//! All resources and data sources share this one implementation, driven by
//! the [`EntitySpec`] tables in the catalog. The engine derives schemas,
//! computes plans, builds API payloads, and maps API responses back to
//! resource state.
//!
//! # State mapping rules
//!
//! - `id` is always a computed string holding the NetBox primary key.
//! - Optional fields the operator never set stay null even when the API
//!   echoes an empty string; once set, the server's value is taken verbatim
//!   so drift is visible.
//! - Reference fields keep the operator's original token (id, slug, or name)
//!   when it still matches the server object; the resolved primary key is
//!   recorded in a companion `<name>_id` computed attribute.
//! - Status fields surface the server default when not configured.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::catalog::{EntitySpec, FieldKind, FieldRole, FieldSpec};
use crate::error::ProviderError;
use crate::netbox::NetboxApi;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Diagnostic, Schema};
use crate::types::{AttributeChange, PlanResult};
use crate::validation;

// =========================================================================
// Schema derivation
// =========================================================================

fn field_type(kind: &FieldKind) -> AttributeType {
    match kind {
        FieldKind::String | FieldKind::Status { .. } | FieldKind::Reference { .. } => {
            AttributeType::String
        }
        FieldKind::Int64 => AttributeType::Int64,
        FieldKind::Float64 => AttributeType::Float64,
        FieldKind::Bool => AttributeType::Bool,
        FieldKind::StringList => AttributeType::list(AttributeType::String),
        FieldKind::Tags => {
            let mut attrs = BTreeMap::new();
            attrs.insert("name".to_string(), AttributeType::String);
            attrs.insert("slug".to_string(), AttributeType::String);
            AttributeType::set(AttributeType::Object(attrs))
        }
        FieldKind::CustomFields => {
            let mut attrs = BTreeMap::new();
            attrs.insert("name".to_string(), AttributeType::String);
            attrs.insert("type".to_string(), AttributeType::String);
            attrs.insert("value".to_string(), AttributeType::String);
            AttributeType::set(AttributeType::Object(attrs))
        }
        FieldKind::Terminations => {
            let mut attrs = BTreeMap::new();
            attrs.insert("object_type".to_string(), AttributeType::String);
            attrs.insert("object_id".to_string(), AttributeType::Int64);
            AttributeType::list(AttributeType::Object(attrs))
        }
    }
}

fn field_flags(role: FieldRole) -> AttributeFlags {
    match role {
        FieldRole::Required => AttributeFlags::required(),
        FieldRole::Optional => AttributeFlags::optional(),
        FieldRole::Computed => AttributeFlags::computed(),
        FieldRole::OptionalComputed => AttributeFlags::optional_computed(),
    }
}

/// Build the resource schema for an entity.
pub fn schema_for(entity: &EntitySpec) -> Schema {
    let mut schema = Schema::v0()
        .with_description(entity.description)
        .with_attribute(
            "id",
            Attribute::computed_string().with_description("NetBox object id"),
        );

    for field in entity.fields {
        let mut attr = Attribute::new(field_type(&field.kind), field_flags(field.role));
        if field.force_new {
            attr = attr.with_force_new();
        }
        if let FieldKind::Status { default, .. } = field.kind {
            attr = attr.with_default(json!(default));
        }
        if let FieldKind::Reference { .. } = field.kind {
            schema = schema.with_attribute(
                format!("{}_id", field.name),
                Attribute::computed_string()
                    .with_description("Resolved id of the referenced object"),
            );
        }
        schema = schema.with_attribute(field.name, attr);
    }

    schema
}

/// Build the data source schema for an entity: everything computed except
/// the lookup keys, which are optional+computed so exactly one can be set.
pub fn data_source_schema_for(entity: &EntitySpec) -> Schema {
    let mut schema = Schema::v0()
        .with_description(entity.description)
        .with_attribute("id", Attribute::optional_computed_string());

    for field in entity.fields {
        let flags = if entity.lookup_keys.contains(&field.name) {
            AttributeFlags::optional_computed()
        } else {
            AttributeFlags::computed()
        };
        schema = schema.with_attribute(field.name, Attribute::new(field_type(&field.kind), flags));
        if let FieldKind::Reference { .. } = field.kind {
            schema = schema
                .with_attribute(format!("{}_id", field.name), Attribute::computed_string());
        }
    }

    schema
}

// =========================================================================
// Config validation
// =========================================================================

/// Validate a resource configuration beyond plain schema types: status
/// choices and slug format.
pub fn validate_config(entity: &EntitySpec, config: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = validation::validate(&schema_for(entity), config);

    let Some(obj) = config.as_object() else {
        return diagnostics;
    };

    for field in entity.fields {
        let Some(value) = obj.get(field.name).and_then(Value::as_str) else {
            continue;
        };
        match field.kind {
            FieldKind::Status { choices, .. } => {
                if !choices.contains(&value) {
                    diagnostics.push(
                        Diagnostic::error(format!("Invalid status '{}'", value))
                            .with_detail(format!("Valid choices are: {}", choices.join(", ")))
                            .with_attribute(field.name),
                    );
                }
            }
            FieldKind::String if field.name == "slug" => {
                if let Some(diag) = validation::validate_slug(field.name, value) {
                    diagnostics.push(diag);
                }
            }
            _ => {}
        }
    }

    diagnostics
}

// =========================================================================
// Planning
// =========================================================================

/// Compute the plan for a create or update.
pub fn plan(
    entity: &EntitySpec,
    prior_state: Option<Value>,
    proposed_state: Value,
) -> Result<PlanResult, ProviderError> {
    match prior_state {
        None => plan_create(entity, proposed_state),
        Some(prior) => plan_update(entity, prior, proposed_state),
    }
}

fn plan_create(entity: &EntitySpec, proposed: Value) -> Result<PlanResult, ProviderError> {
    let mut planned = proposed.as_object().cloned().unwrap_or_default();

    // Declared defaults fill in at plan time so the create payload carries
    // them and the stored state matches what the server will hold
    for field in entity.fields {
        if let FieldKind::Status { default, .. } = field.kind {
            if planned.get(field.name).map_or(true, Value::is_null) {
                planned.insert(field.name.to_string(), json!(default));
            }
        }
    }

    let mut changes = Vec::new();
    for field in entity.fields {
        if field.role == FieldRole::Computed {
            continue;
        }
        if let Some(value) = planned.get(field.name) {
            if !value.is_null() {
                changes.push(AttributeChange::added(field.name, value.clone()));
            }
        }
    }
    Ok(PlanResult::with_changes(Value::Object(planned), changes, false))
}

/// Compare two values for a field, ignoring element order for set-typed
/// kinds. NetBox echoes tags sorted by name and custom fields in its own
/// order, so a positional comparison would flag identical sets as changed.
fn values_equal(field: &FieldSpec, before: &Value, after: &Value) -> bool {
    let unordered = matches!(
        field.kind,
        FieldKind::Tags | FieldKind::CustomFields | FieldKind::StringList
    );
    if unordered {
        if let (Some(a), Some(b)) = (before.as_array(), after.as_array()) {
            if a.len() != b.len() {
                return false;
            }
            let mut a: Vec<String> = a.iter().map(Value::to_string).collect();
            let mut b: Vec<String> = b.iter().map(Value::to_string).collect();
            a.sort_unstable();
            b.sort_unstable();
            return a == b;
        }
    }
    before == after
}

fn plan_update(
    entity: &EntitySpec,
    prior: Value,
    proposed: Value,
) -> Result<PlanResult, ProviderError> {
    let prior_obj = prior.as_object().cloned().unwrap_or_default();
    let mut planned = proposed.as_object().cloned().unwrap_or_default();

    // Computed values survive from prior state
    if let Some(id) = prior_obj.get("id") {
        planned.insert("id".to_string(), id.clone());
    }
    for field in entity.fields {
        if let FieldKind::Reference { .. } = field.kind {
            let companion = format!("{}_id", field.name);
            if !planned.contains_key(&companion) {
                if let Some(v) = prior_obj.get(&companion) {
                    planned.insert(companion, v.clone());
                }
            }
        }
        // Unset optional+computed fields keep their server-assigned value
        if field.role == FieldRole::OptionalComputed
            && planned.get(field.name).map_or(true, Value::is_null)
        {
            if let Some(v) = prior_obj.get(field.name) {
                planned.insert(field.name.to_string(), v.clone());
            }
        }
    }

    let mut changes = Vec::new();
    let mut requires_replace = false;
    for field in entity.fields {
        if field.role == FieldRole::Computed {
            continue;
        }
        let before = prior_obj.get(field.name).cloned().unwrap_or(Value::Null);
        let after = planned.get(field.name).cloned().unwrap_or(Value::Null);
        if !values_equal(field, &before, &after) {
            if field.force_new {
                requires_replace = true;
            }
            changes.push(AttributeChange::new(
                field.name,
                (!before.is_null()).then(|| before),
                (!after.is_null()).then(|| after),
            ));
        }
    }

    if changes.is_empty() {
        Ok(PlanResult::no_change(prior))
    } else {
        Ok(PlanResult::with_changes(
            Value::Object(planned),
            changes,
            requires_replace,
        ))
    }
}

// =========================================================================
// CRUD operations
// =========================================================================

/// Create an object from its planned state.
pub async fn create(
    entity: &EntitySpec,
    api: &dyn NetboxApi,
    planned_state: Value,
) -> Result<Value, ProviderError> {
    let obj = planned_state
        .as_object()
        .ok_or_else(|| ProviderError::InvalidRequest("planned state is not an object".into()))?;

    let mut payload = Map::new();
    for field in entity.fields {
        if field.role == FieldRole::Computed {
            continue;
        }
        let Some(value) = obj.get(field.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        payload.insert(
            field.api.to_string(),
            payload_value(api, field, value).await?,
        );
    }

    debug!(endpoint = %entity.endpoint, "creating object");
    let response = api.create(entity.endpoint, &Value::Object(payload)).await?;
    map_to_state(entity, &planned_state, &response, false)
}

/// Read an object. Returns `Value::Null` when it no longer exists so the
/// caller prunes it from state.
pub async fn read(
    entity: &EntitySpec,
    api: &dyn NetboxApi,
    current_state: Value,
) -> Result<Value, ProviderError> {
    let id = id_from_state(&current_state)?;
    match api.get(entity.endpoint, id).await? {
        Some(response) => map_to_state(entity, &current_state, &response, false),
        None => {
            debug!(endpoint = %entity.endpoint, id = id, "object gone, pruning state");
            Ok(Value::Null)
        }
    }
}

/// Update an object, sending only the fields that changed.
pub async fn update(
    entity: &EntitySpec,
    api: &dyn NetboxApi,
    prior_state: Value,
    planned_state: Value,
) -> Result<Value, ProviderError> {
    let id = id_from_state(&prior_state)?;
    let prior_obj = prior_state.as_object().cloned().unwrap_or_default();
    let planned_obj = planned_state
        .as_object()
        .ok_or_else(|| ProviderError::InvalidRequest("planned state is not an object".into()))?;

    let mut payload = Map::new();
    for field in entity.fields {
        if field.role == FieldRole::Computed {
            continue;
        }
        let before = prior_obj.get(field.name).cloned().unwrap_or(Value::Null);
        let after = planned_obj.get(field.name).cloned().unwrap_or(Value::Null);
        if values_equal(field, &before, &after) {
            continue;
        }
        if after.is_null() {
            // Explicit null clears the field server-side
            payload.insert(field.api.to_string(), Value::Null);
        } else {
            payload.insert(
                field.api.to_string(),
                payload_value(api, field, &after).await?,
            );
        }
    }

    if payload.is_empty() {
        return Ok(prior_state);
    }

    debug!(endpoint = %entity.endpoint, id = id, fields = payload.len(), "patching object");
    let response = api
        .update(entity.endpoint, id, &Value::Object(payload))
        .await?;
    map_to_state(entity, &planned_state, &response, false)
}

/// Delete an object. A 404 means it is already gone and is not an error.
pub async fn delete(
    entity: &EntitySpec,
    api: &dyn NetboxApi,
    current_state: Value,
) -> Result<(), ProviderError> {
    let id = id_from_state(&current_state)?;
    let existed = api.delete(entity.endpoint, id).await?;
    if !existed {
        warn!(endpoint = %entity.endpoint, id = id, "object already deleted");
    }
    Ok(())
}

/// Populate state for an object imported by id.
pub async fn import(
    entity: &EntitySpec,
    api: &dyn NetboxApi,
    id: &str,
) -> Result<Value, ProviderError> {
    let id: i64 = id.parse().map_err(|_| {
        ProviderError::InvalidRequest(format!("import id '{}' is not a numeric NetBox id", id))
    })?;
    let response = api
        .get(entity.endpoint, id)
        .await?
        .ok_or_else(|| ProviderError::NotFound(format!("{}/{}", entity.endpoint, id)))?;
    map_to_state(entity, &Value::Null, &response, true)
}

// =========================================================================
// Data sources
// =========================================================================

/// Read a data source: exactly one lookup key must be set, and exactly one
/// object must match.
pub async fn read_data_source(
    entity: &EntitySpec,
    api: &dyn NetboxApi,
    config: Value,
) -> Result<Value, ProviderError> {
    let obj = config.as_object().cloned().unwrap_or_default();

    let mut set_keys: Vec<(&str, &Value)> = Vec::new();
    if let Some(v) = obj.get("id").filter(|v| !v.is_null()) {
        set_keys.push(("id", v));
    }
    for key in entity.lookup_keys {
        if let Some(v) = obj.get(*key).filter(|v| !v.is_null()) {
            set_keys.push((*key, v));
        }
    }

    let mut all_keys = vec!["id"];
    all_keys.extend(entity.lookup_keys);
    let (key, value) = match set_keys.as_slice() {
        [one] => *one,
        [] => {
            return Err(ProviderError::Validation(format!(
                "exactly one of {} must be set",
                all_keys.join(", ")
            )))
        }
        _ => {
            return Err(ProviderError::Validation(format!(
                "only one of {} may be set, got {}",
                all_keys.join(", "),
                set_keys.iter().map(|(k, _)| *k).collect::<Vec<_>>().join(", ")
            )))
        }
    };

    let response = if key == "id" {
        let id: i64 = filter_string(value).parse().map_err(|_| {
            ProviderError::Validation(format!("id '{}' is not numeric", filter_string(value)))
        })?;
        api.get(entity.endpoint, id)
            .await?
            .ok_or_else(|| ProviderError::NotFound(format!("{}/{}", entity.endpoint, id)))?
    } else {
        let api_key = entity.field(key).map_or(key, |f| f.api);
        let matches = api
            .list(
                entity.endpoint,
                &[(api_key.to_string(), filter_string(value))],
            )
            .await?;
        match matches.len() {
            1 => matches.into_iter().next().expect("len checked"),
            0 => {
                return Err(ProviderError::NotFound(format!(
                    "no {} found with {} = {}",
                    entity.type_name,
                    key,
                    filter_string(value)
                )))
            }
            n => {
                return Err(ProviderError::Validation(format!(
                    "{} objects match {} = {}; the lookup must identify exactly one",
                    n,
                    key,
                    filter_string(value)
                )))
            }
        }
    };

    map_to_state(entity, &config, &response, true)
}

// =========================================================================
// Payload construction
// =========================================================================

async fn payload_value(
    api: &dyn NetboxApi,
    field: &FieldSpec,
    value: &Value,
) -> Result<Value, ProviderError> {
    match field.kind {
        FieldKind::Reference { endpoint } => {
            let id = resolve_reference(api, endpoint, value).await?;
            Ok(json!(id))
        }
        FieldKind::CustomFields => custom_fields_payload(field.name, value),
        _ => Ok(value.clone()),
    }
}

/// Resolve a reference token to a NetBox primary key. Numeric tokens are
/// used as-is; everything else is looked up by slug, then by name.
async fn resolve_reference(
    api: &dyn NetboxApi,
    endpoint: &str,
    token: &Value,
) -> Result<i64, ProviderError> {
    if let Some(n) = token.as_i64() {
        return Ok(n);
    }
    let Some(s) = token.as_str() else {
        return Err(ProviderError::Validation(format!(
            "reference to {} must be a string",
            endpoint
        )));
    };
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }

    for filter_key in ["slug", "name"] {
        let matches = api
            .list(endpoint, &[(filter_key.to_string(), s.to_string())])
            .await?;
        match matches.len() {
            0 => continue,
            1 => {
                let id = matches[0].get("id").and_then(Value::as_i64).ok_or_else(|| {
                    ProviderError::Internal(format!("object in {} has no id", endpoint))
                })?;
                return Ok(id);
            }
            n => {
                return Err(ProviderError::Validation(format!(
                    "{} objects in {} match {} '{}'",
                    n, endpoint, filter_key, s
                )))
            }
        }
    }

    Err(ProviderError::NotFound(format!(
        "no object in {} matches '{}'",
        endpoint, s
    )))
}

/// Convert the `{name, type, value}` set into the API's map form.
fn custom_fields_payload(attr: &str, value: &Value) -> Result<Value, ProviderError> {
    let Some(entries) = value.as_array() else {
        return Err(ProviderError::Validation(format!(
            "{} must be a set of objects",
            attr
        )));
    };

    let mut map = Map::new();
    for entry in entries {
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::Validation(format!("{} entry missing name", attr)))?;
        let type_name = entry.get("type").and_then(Value::as_str).unwrap_or("text");
        let raw = entry.get("value").and_then(Value::as_str).unwrap_or("");

        let converted = match type_name {
            "integer" => json!(raw.parse::<i64>().map_err(|_| {
                ProviderError::Validation(format!(
                    "custom field '{}' value '{}' is not an integer",
                    name, raw
                ))
            })?),
            "decimal" => json!(raw.parse::<f64>().map_err(|_| {
                ProviderError::Validation(format!(
                    "custom field '{}' value '{}' is not a decimal",
                    name, raw
                ))
            })?),
            "boolean" => json!(raw.parse::<bool>().map_err(|_| {
                ProviderError::Validation(format!(
                    "custom field '{}' value '{}' is not a boolean",
                    name, raw
                ))
            })?),
            _ => json!(raw),
        };
        map.insert(name.to_string(), converted);
    }

    Ok(Value::Object(map))
}

fn filter_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_from_state(state: &Value) -> Result<i64, ProviderError> {
    let id = state
        .get("id")
        .ok_or_else(|| ProviderError::InvalidRequest("state has no id".into()))?;
    match id {
        Value::String(s) => s
            .parse()
            .map_err(|_| ProviderError::InvalidRequest(format!("state id '{}' is not numeric", s))),
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ProviderError::InvalidRequest("state id is not an integer".into())),
        _ => Err(ProviderError::InvalidRequest("state id has wrong type".into())),
    }
}

// =========================================================================
// Response-to-state mapping
// =========================================================================

/// Map an API object to resource state.
///
/// `prior` carries the operator's configured values (planned state on
/// create/update, current state on read). With `take_all` the mapping
/// ignores prior null-ness and surfaces every populated server field, which
/// import and data sources use.
fn map_to_state(
    entity: &EntitySpec,
    prior: &Value,
    response: &Value,
    take_all: bool,
) -> Result<Value, ProviderError> {
    let prior_obj = prior.as_object().cloned().unwrap_or_default();
    let mut state = Map::new();

    let id = response
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| ProviderError::Internal("API response has no id".into()))?;
    state.insert("id".to_string(), json!(id.to_string()));

    for field in entity.fields {
        let prior_value = prior_obj.get(field.name).cloned().unwrap_or(Value::Null);
        let server = response.get(field.api).cloned().unwrap_or(Value::Null);

        match field.kind {
            FieldKind::Status { .. } => {
                // API returns {"value": ..., "label": ...}
                let status = server
                    .get("value")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| server.as_str().map(str::to_string));
                if let Some(s) = status {
                    state.insert(field.name.to_string(), json!(s));
                } else if !prior_value.is_null() {
                    state.insert(field.name.to_string(), prior_value);
                }
            }
            FieldKind::Reference { .. } => {
                let (token, ref_id) = map_reference(&prior_value, &server);
                if let Some(token) = token {
                    state.insert(field.name.to_string(), json!(token));
                }
                if let Some(ref_id) = ref_id {
                    state.insert(format!("{}_id", field.name), json!(ref_id.to_string()));
                }
            }
            FieldKind::Tags => {
                let tags: Vec<Value> = server
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .map(|t| {
                                json!({
                                    "name": t.get("name").cloned().unwrap_or(Value::Null),
                                    "slug": t.get("slug").cloned().unwrap_or(Value::Null),
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                if !tags.is_empty() || !prior_value.is_null() {
                    state.insert(field.name.to_string(), json!(tags));
                }
            }
            FieldKind::CustomFields => {
                let mapped = map_custom_fields(&prior_value, &server);
                if !mapped.is_empty() || !prior_value.is_null() {
                    state.insert(field.name.to_string(), json!(mapped));
                }
            }
            FieldKind::String => {
                let text = server.as_str().unwrap_or("");
                // Empty strings stay null unless the operator set the field
                if !text.is_empty() || !prior_value.is_null() {
                    state.insert(field.name.to_string(), json!(text));
                }
            }
            FieldKind::Int64 | FieldKind::Float64 | FieldKind::Bool => {
                if !server.is_null() {
                    let configured = !prior_value.is_null();
                    let keep = match field.role {
                        FieldRole::Required | FieldRole::Computed | FieldRole::OptionalComputed => {
                            true
                        }
                        // Unconfigured optionals are kept only when nonzero,
                        // so out-of-band drift to 0/false on an unset field
                        // is not surfaced. Known limitation: NetBox reports
                        // zero for unset numerics, making the two cases
                        // indistinguishable without tracking raw config.
                        FieldRole::Optional => take_all || configured || !is_zero_value(&server),
                    };
                    if keep {
                        state.insert(field.name.to_string(), server);
                    }
                } else if !prior_value.is_null() && !take_all {
                    state.insert(field.name.to_string(), Value::Null);
                }
            }
            FieldKind::StringList => {
                let items = server.as_array().cloned().unwrap_or_default();
                if !items.is_empty() || !prior_value.is_null() {
                    state.insert(field.name.to_string(), json!(items));
                }
            }
            FieldKind::Terminations => {
                // API echoes terminations with a nested object; keep only the
                // type and id the operator configures
                let terms: Vec<Value> = server
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .map(|t| {
                                json!({
                                    "object_type": t.get("object_type").cloned().unwrap_or(Value::Null),
                                    "object_id": t.get("object_id").cloned().unwrap_or(Value::Null),
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                if !terms.is_empty() || !prior_value.is_null() {
                    state.insert(field.name.to_string(), json!(terms));
                }
            }
        }
    }

    Ok(Value::Object(state))
}

/// Compute the state token and resolved id for a reference field.
///
/// The operator's token survives as long as it still identifies the server
/// object; otherwise the object's name (falling back to slug, then id) is
/// stored so drift shows the real target.
fn map_reference(prior: &Value, server: &Value) -> (Option<String>, Option<i64>) {
    if server.is_null() {
        return (None, None);
    }

    // A bare integer can appear in brief representations
    if let Some(id) = server.as_i64() {
        let token = match prior.as_str() {
            Some(p) if p == id.to_string() => p.to_string(),
            Some(p) if !p.is_empty() => p.to_string(),
            _ => id.to_string(),
        };
        return (Some(token), Some(id));
    }

    let id = server.get("id").and_then(Value::as_i64);
    let name = server.get("name").and_then(Value::as_str);
    let slug = server.get("slug").and_then(Value::as_str);
    let display = server.get("display").and_then(Value::as_str);

    let token = if let Some(prior_token) = prior.as_str().filter(|s| !s.is_empty()) {
        let matches = Some(prior_token) == name
            || Some(prior_token) == slug
            || Some(prior_token) == display
            || id.map(|i| i.to_string()).as_deref() == Some(prior_token);
        if matches {
            Some(prior_token.to_string())
        } else {
            name.or(slug)
                .map(str::to_string)
                .or_else(|| id.map(|i| i.to_string()))
        }
    } else {
        name.or(slug)
            .map(str::to_string)
            .or_else(|| id.map(|i| i.to_string()))
    };

    (token, id)
}

/// Map the API's custom field map back into the `{name, type, value}` set,
/// preferring the operator's declared type labels where available.
fn map_custom_fields(prior: &Value, server: &Value) -> Vec<Value> {
    let prior_types: BTreeMap<&str, &str> = prior
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|e| {
                    Some((
                        e.get("name")?.as_str()?,
                        e.get("type").and_then(Value::as_str).unwrap_or("text"),
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    let Some(map) = server.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(name, value)| {
            let inferred = match value {
                Value::Bool(_) => "boolean",
                Value::Number(n) if n.is_i64() => "integer",
                Value::Number(_) => "decimal",
                _ => "text",
            };
            let type_name = prior_types.get(name.as_str()).copied().unwrap_or(inferred);
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            json!({"name": name, "type": type_name, "value": text})
        })
        .collect()
}

fn is_zero_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::registry;
    use crate::netbox::mock::MockNetbox;

    fn site() -> &'static EntitySpec {
        registry()["netbox_site"]
    }

    #[test]
    fn test_schema_partitioning() {
        let schema = schema_for(site());

        let id = &schema.attributes["id"];
        assert!(id.flags.computed && !id.flags.required && !id.flags.optional);

        let name = &schema.attributes["name"];
        assert!(name.flags.required && !name.flags.computed);

        let status = &schema.attributes["status"];
        assert!(status.flags.optional && status.flags.computed);
        assert_eq!(status.default, Some(json!("active")));

        let region = &schema.attributes["region"];
        assert!(region.flags.optional);
        let region_id = &schema.attributes["region_id"];
        assert!(region_id.flags.computed && !region_id.flags.optional);
    }

    #[test]
    fn test_data_source_schema_lookup_keys() {
        let schema = data_source_schema_for(site());

        for key in ["id", "name", "slug"] {
            let attr = &schema.attributes[key];
            assert!(
                attr.flags.optional && attr.flags.computed,
                "{} should be a lookup key",
                key
            );
        }
        let desc = &schema.attributes["description"];
        assert!(desc.flags.computed && !desc.flags.optional);
    }

    #[test]
    fn test_validate_config_status_choices() {
        let diags = validate_config(
            site(),
            &json!({"name": "A", "slug": "a", "status": "melted"}),
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].attribute, Some("status".to_string()));

        let diags = validate_config(
            site(),
            &json!({"name": "A", "slug": "a", "status": "planned"}),
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_validate_config_slug_format() {
        let diags = validate_config(site(), &json!({"name": "A", "slug": "Not A Slug"}));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].attribute, Some("slug".to_string()));
    }

    #[test]
    fn test_plan_create_lists_configured_attributes() {
        let result = plan(
            site(),
            None,
            json!({"name": "DC West", "slug": "dc-west", "description": null}),
        )
        .unwrap();

        let paths: Vec<&str> = result.changes.iter().map(|c| c.path.as_str()).collect();
        assert!(paths.contains(&"name"));
        assert!(paths.contains(&"slug"));
        assert!(!paths.contains(&"description"));
        assert!(!paths.contains(&"id"));
        assert!(!result.requires_replace);
    }

    #[test]
    fn test_status_default_comes_from_entity() {
        let cable = registry()["netbox_cable"];
        let schema = schema_for(cable);
        assert_eq!(schema.attributes["status"].default, Some(json!("connected")));

        let result = plan(
            cable,
            None,
            json!({
                "a_terminations": [{"object_type": "dcim.interface", "object_id": 1}],
                "b_terminations": [{"object_type": "dcim.interface", "object_id": 2}]
            }),
        )
        .unwrap();
        assert_eq!(result.planned_state["status"], "connected");
    }

    #[test]
    fn test_plan_update_no_changes() {
        let prior = json!({"id": "1", "name": "DC West", "slug": "dc-west", "status": "active"});
        let proposed = json!({"name": "DC West", "slug": "dc-west"});

        let result = plan(site(), Some(prior.clone()), proposed).unwrap();
        assert!(result.changes.is_empty());
        assert_eq!(result.planned_state, prior);
    }

    #[test]
    fn test_plan_update_ignores_set_member_order() {
        let prior = json!({
            "id": "1", "name": "DC West", "slug": "dc-west", "status": "active",
            "tags": [
                {"name": "Zone A", "slug": "zone-a"},
                {"name": "Zone B", "slug": "zone-b"}
            ]
        });
        let proposed = json!({
            "name": "DC West", "slug": "dc-west",
            "tags": [
                {"name": "Zone B", "slug": "zone-b"},
                {"name": "Zone A", "slug": "zone-a"}
            ]
        });

        let result = plan(site(), Some(prior.clone()), proposed).unwrap();
        assert!(result.changes.is_empty(), "reordered set is not a change");
        assert_eq!(result.planned_state, prior);

        // A genuine membership change still shows up
        let proposed = json!({
            "name": "DC West", "slug": "dc-west",
            "tags": [{"name": "Zone B", "slug": "zone-b"}]
        });
        let result = plan(site(), Some(prior), proposed).unwrap();
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "tags");
    }

    #[test]
    fn test_plan_update_diffs_and_carries_computed() {
        let prior = json!({
            "id": "1", "name": "DC West", "slug": "dc-west",
            "status": "active", "region": "emea", "region_id": "7"
        });
        let proposed = json!({"name": "DC West Hall", "slug": "dc-west", "region": "emea"});

        let result = plan(site(), Some(prior), proposed).unwrap();
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "name");
        assert_eq!(result.planned_state["id"], "1");
        assert_eq!(result.planned_state["status"], "active");
        assert_eq!(result.planned_state["region_id"], "7");
        assert!(!result.requires_replace);
    }

    #[test]
    fn test_plan_update_force_new() {
        let journal = registry()["netbox_journal_entry"];
        let prior = json!({
            "id": "5",
            "assigned_object_type": "dcim.site",
            "assigned_object_id": 1,
            "comments": "note"
        });
        let proposed = json!({
            "assigned_object_type": "dcim.device",
            "assigned_object_id": 1,
            "comments": "note"
        });

        let result = plan(journal, Some(prior), proposed).unwrap();
        assert!(result.requires_replace);
    }

    #[tokio::test]
    async fn test_create_resolves_references() {
        let mock = MockNetbox::new();
        mock.seed("dcim/regions", json!({"name": "EMEA", "slug": "emea"}));

        let state = create(
            site(),
            &mock,
            json!({"name": "DC West", "slug": "dc-west", "region": "emea"}),
        )
        .await
        .unwrap();

        assert!(!state["id"].as_str().unwrap().is_empty());
        assert_eq!(state["region"], "emea");
        assert_eq!(state["region_id"], "1");

        // The payload carried the resolved primary key
        let stored = mock.stored("dcim/sites", 2).unwrap();
        assert_eq!(stored["region"], 1);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_reference() {
        let mock = MockNetbox::new();
        let err = create(
            site(),
            &mock,
            json!({"name": "DC West", "slug": "dc-west", "region": "nowhere"}),
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_read_prunes_deleted_object() {
        let mock = MockNetbox::new();
        let state = read(site(), &mock, json!({"id": "42", "name": "Gone"}))
            .await
            .unwrap();
        assert!(state.is_null());
    }

    #[tokio::test]
    async fn test_read_preserves_null_optional_fields() {
        let mock = MockNetbox::new();
        let id = mock.seed(
            "dcim/sites",
            json!({"name": "DC West", "slug": "dc-west", "description": "",
                   "status": {"value": "active", "label": "Active"}}),
        );

        let state = read(
            site(),
            &mock,
            json!({"id": id.to_string(), "name": "DC West", "slug": "dc-west"}),
        )
        .await
        .unwrap();

        // Never configured and empty server-side: stays null
        assert!(state.get("description").is_none());
        // Optional+computed surfaces the server default
        assert_eq!(state["status"], "active");
    }

    #[tokio::test]
    async fn test_read_surfaces_drift() {
        let mock = MockNetbox::new();
        let id = mock.seed(
            "dcim/sites",
            json!({"name": "Renamed", "slug": "dc-west", "description": "added elsewhere"}),
        );

        let state = read(
            site(),
            &mock,
            json!({"id": id.to_string(), "name": "DC West", "slug": "dc-west"}),
        )
        .await
        .unwrap();

        assert_eq!(state["name"], "Renamed");
        assert_eq!(state["description"], "added elsewhere");
    }

    #[tokio::test]
    async fn test_update_sends_only_changed_fields() {
        let mock = MockNetbox::new();
        let id = mock.seed("dcim/sites", json!({"name": "DC West", "slug": "dc-west"}));

        let prior = json!({"id": id.to_string(), "name": "DC West", "slug": "dc-west"});
        let planned = json!({"id": id.to_string(), "name": "DC West Hall", "slug": "dc-west"});

        let state = update(site(), &mock, prior, planned).await.unwrap();
        assert_eq!(state["name"], "DC West Hall");
        assert_eq!(state["slug"], "dc-west");
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_object() {
        let mock = MockNetbox::new();
        delete(site(), &mock, json!({"id": "42"})).await.unwrap();
    }

    #[tokio::test]
    async fn test_import_populates_all_fields() {
        let mock = MockNetbox::new();
        let id = mock.seed(
            "dcim/sites",
            json!({"name": "DC West", "slug": "dc-west", "description": "imported",
                   "status": {"value": "active", "label": "Active"}}),
        );

        let state = import(site(), &mock, &id.to_string()).await.unwrap();
        assert_eq!(state["id"], id.to_string());
        assert_eq!(state["name"], "DC West");
        assert_eq!(state["description"], "imported");
        assert_eq!(state["status"], "active");
    }

    #[tokio::test]
    async fn test_import_rejects_non_numeric_id() {
        let mock = MockNetbox::new();
        let err = import(site(), &mock, "dc-west").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_data_source_requires_exactly_one_key() {
        let mock = MockNetbox::new();

        let err = read_data_source(site(), &mock, json!({})).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));

        let err = read_data_source(site(), &mock, json!({"name": "A", "slug": "a"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_data_source_lookup_by_slug() {
        let mock = MockNetbox::new();
        mock.seed("dcim/sites", json!({"name": "One", "slug": "one"}));
        mock.seed("dcim/sites", json!({"name": "Two", "slug": "two"}));

        let state = read_data_source(site(), &mock, json!({"slug": "two"}))
            .await
            .unwrap();
        assert_eq!(state["name"], "Two");

        let err = read_data_source(site(), &mock, json!({"slug": "three"}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_reference_echo_keeps_operator_token() {
        let server = json!({"id": 7, "name": "EMEA", "slug": "emea", "display": "EMEA"});

        // slug token kept
        let (token, id) = map_reference(&json!("emea"), &server);
        assert_eq!(token.as_deref(), Some("emea"));
        assert_eq!(id, Some(7));

        // id token kept
        let (token, _) = map_reference(&json!("7"), &server);
        assert_eq!(token.as_deref(), Some("7"));

        // stale token replaced by the server name
        let (token, _) = map_reference(&json!("apac"), &server);
        assert_eq!(token.as_deref(), Some("EMEA"));

        // no prior token: name used
        let (token, _) = map_reference(&Value::Null, &server);
        assert_eq!(token.as_deref(), Some("EMEA"));

        // null reference clears both
        let (token, id) = map_reference(&json!("emea"), &Value::Null);
        assert!(token.is_none());
        assert!(id.is_none());
    }

    #[test]
    fn test_custom_fields_round_trip() {
        let state = json!([
            {"name": "rack_units", "type": "integer", "value": "42"},
            {"name": "managed", "type": "boolean", "value": "true"},
            {"name": "note", "type": "text", "value": "hi"}
        ]);
        let payload = custom_fields_payload("custom_fields", &state).unwrap();
        assert_eq!(payload["rack_units"], 42);
        assert_eq!(payload["managed"], true);
        assert_eq!(payload["note"], "hi");

        let mapped = map_custom_fields(&state, &payload);
        assert_eq!(mapped.len(), 3);
        let units = mapped
            .iter()
            .find(|e| e["name"] == "rack_units")
            .unwrap();
        assert_eq!(units["type"], "integer");
        assert_eq!(units["value"], "42");
    }

    #[test]
    fn test_custom_fields_payload_rejects_bad_integer() {
        let state = json!([{"name": "rack_units", "type": "integer", "value": "lots"}]);
        let err = custom_fields_payload("custom_fields", &state).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }
}
