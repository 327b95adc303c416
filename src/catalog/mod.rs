//! Declarative entity catalog.
//!
//! Every NetBox object type the provider manages is described by an
//! [`EntitySpec`] table entry. The CRUD engine derives schemas, plans,
//! API payloads, and state mapping from these tables, so adding an entity
//! is a table entry rather than a new module.

mod circuits;
mod dcim;
mod extras;
mod ipam;
mod tenancy;
mod virtualization;
mod vpn;
mod wireless;

use std::collections::BTreeMap;

/// How a field is stored in state and sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain string.
    String,
    /// 64-bit integer.
    Int64,
    /// 64-bit float.
    Float64,
    /// Boolean.
    Bool,
    /// List of strings.
    StringList,
    /// Status choice with a fixed set of values. Optional+computed, filled
    /// with the entity's server default when not configured.
    Status {
        /// Valid choice values for this entity.
        choices: &'static [&'static str],
        /// Server default applied when the operator leaves the field unset.
        default: &'static str,
    },
    /// Reference to another NetBox object. The state value accepts a
    /// primary-key id, slug, or name; a companion `<name>_id` computed
    /// attribute carries the resolved id.
    Reference {
        /// Endpoint of the referenced object type.
        endpoint: &'static str,
    },
    /// Set of `{name, slug}` tag objects.
    Tags,
    /// Set of `{name, type, value}` custom field objects.
    CustomFields,
    /// List of `{object_type, object_id}` cable termination points, sent to
    /// the API verbatim.
    Terminations,
}

/// How a field participates in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Must be set by the operator.
    Required,
    /// May be set by the operator; absent stays null.
    Optional,
    /// Set by the server only.
    Computed,
    /// May be set; the server supplies a default otherwise.
    OptionalComputed,
}

/// One field of an entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Attribute name in resource state.
    pub name: &'static str,
    /// Field name in the NetBox API payload, when it differs from `name`.
    pub api: &'static str,
    /// Value kind.
    pub kind: FieldKind,
    /// Configuration role.
    pub role: FieldRole,
    /// Changing this field forces replacement instead of an in-place update.
    pub force_new: bool,
}

impl FieldSpec {
    /// Required string field.
    pub const fn required_string(name: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::String,
            role: FieldRole::Required,
            force_new: false,
        }
    }

    /// Optional string field.
    pub const fn optional_string(name: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::String,
            role: FieldRole::Optional,
            force_new: false,
        }
    }

    /// Optional int64 field.
    pub const fn optional_int64(name: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::Int64,
            role: FieldRole::Optional,
            force_new: false,
        }
    }

    /// Required int64 field.
    pub const fn required_int64(name: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::Int64,
            role: FieldRole::Required,
            force_new: false,
        }
    }

    /// Optional float64 field.
    pub const fn optional_float64(name: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::Float64,
            role: FieldRole::Optional,
            force_new: false,
        }
    }

    /// Optional bool field.
    pub const fn optional_bool(name: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::Bool,
            role: FieldRole::Optional,
            force_new: false,
        }
    }

    /// Optional reference field pointing at another entity's endpoint.
    pub const fn reference(name: &'static str, endpoint: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::Reference { endpoint },
            role: FieldRole::Optional,
            force_new: false,
        }
    }

    /// Required reference field.
    pub const fn required_reference(name: &'static str, endpoint: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::Reference { endpoint },
            role: FieldRole::Required,
            force_new: false,
        }
    }

    /// Status field with the given choices, optional+computed, defaulting
    /// to `active`.
    pub const fn status(choices: &'static [&'static str]) -> Self {
        Self::status_default(choices, "active")
    }

    /// Status field with a non-`active` server default.
    pub const fn status_default(
        choices: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name: "status",
            api: "status",
            kind: FieldKind::Status { choices, default },
            role: FieldRole::OptionalComputed,
            force_new: false,
        }
    }

    /// Required cable termination list.
    pub const fn terminations(name: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::Terminations,
            role: FieldRole::Required,
            force_new: false,
        }
    }

    /// Tag set field.
    pub const fn tags() -> Self {
        Self {
            name: "tags",
            api: "tags",
            kind: FieldKind::Tags,
            role: FieldRole::Optional,
            force_new: false,
        }
    }

    /// Custom field set.
    pub const fn custom_fields() -> Self {
        Self {
            name: "custom_fields",
            api: "custom_fields",
            kind: FieldKind::CustomFields,
            role: FieldRole::Optional,
            force_new: false,
        }
    }

    /// Optional list-of-strings field.
    pub const fn string_list(name: &'static str) -> Self {
        Self {
            name,
            api: name,
            kind: FieldKind::StringList,
            role: FieldRole::Optional,
            force_new: false,
        }
    }

    /// Rename the API payload field.
    pub const fn api(mut self, api: &'static str) -> Self {
        self.api = api;
        self
    }

    /// Mark this field as forcing replacement when changed.
    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Override the role.
    pub const fn role(mut self, role: FieldRole) -> Self {
        self.role = role;
        self
    }
}

/// One managed NetBox object type.
#[derive(Debug, Clone, Copy)]
pub struct EntitySpec {
    /// Resource type name exposed to configurations, e.g. `netbox_site`.
    pub type_name: &'static str,
    /// NetBox REST endpoint, e.g. `dcim/sites`.
    pub endpoint: &'static str,
    /// One-line description used in the schema.
    pub description: &'static str,
    /// Fields beyond the always-present computed `id`.
    pub fields: &'static [FieldSpec],
    /// Fields usable as data source lookup keys (besides `id`).
    pub lookup_keys: &'static [&'static str],
    /// Whether a read-only data source is exposed for this entity.
    pub has_data_source: bool,
}

impl EntitySpec {
    /// Find a field by state attribute name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// All entities the provider manages, keyed by resource type name.
pub fn registry() -> BTreeMap<&'static str, &'static EntitySpec> {
    let mut map = BTreeMap::new();
    for entity in dcim::ENTITIES
        .iter()
        .chain(ipam::ENTITIES)
        .chain(tenancy::ENTITIES)
        .chain(virtualization::ENTITIES)
        .chain(circuits::ENTITIES)
        .chain(vpn::ENTITIES)
        .chain(wireless::ENTITIES)
        .chain(extras::ENTITIES)
    {
        map.insert(entity.type_name, entity);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_type_names_unique_and_prefixed() {
        let reg = registry();
        let mut total = 0usize;
        for modules in [
            dcim::ENTITIES,
            ipam::ENTITIES,
            tenancy::ENTITIES,
            virtualization::ENTITIES,
            circuits::ENTITIES,
            vpn::ENTITIES,
            wireless::ENTITIES,
            extras::ENTITIES,
        ] {
            total += modules.len();
        }
        // Uniqueness: the map is exactly as large as the concatenation
        assert_eq!(reg.len(), total);

        for (name, entity) in &reg {
            assert!(name.starts_with("netbox_"), "bad type name {}", name);
            assert_eq!(*name, entity.type_name);
            assert!(
                name.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "type name {} is not snake_case",
                name
            );
            assert!(entity.endpoint.contains('/'), "bad endpoint for {}", name);
        }
    }

    #[test]
    fn test_lookup_keys_reference_real_fields() {
        for (name, entity) in registry() {
            for key in entity.lookup_keys {
                assert!(
                    entity.field(key).is_some(),
                    "{} lookup key {} has no field",
                    name,
                    key
                );
            }
        }
    }

    #[test]
    fn test_no_entity_redefines_id() {
        for (name, entity) in registry() {
            assert!(
                entity.field("id").is_none(),
                "{} must not list id explicitly",
                name
            );
        }
    }

    #[test]
    fn test_reference_endpoints_are_managed() {
        let endpoints: std::collections::BTreeSet<&str> =
            registry().values().map(|e| e.endpoint).collect();
        for (name, entity) in registry() {
            for field in entity.fields {
                if let FieldKind::Reference { endpoint } = field.kind {
                    assert!(
                        endpoints.contains(endpoint),
                        "{}.{} references unmanaged endpoint {}",
                        name,
                        field.name,
                        endpoint
                    );
                }
            }
        }
    }

    #[test]
    fn test_site_entity_shape() {
        let reg = registry();
        let site = reg["netbox_site"];
        assert_eq!(site.endpoint, "dcim/sites");
        assert_eq!(site.field("name").unwrap().role, FieldRole::Required);
        assert_eq!(site.field("slug").unwrap().role, FieldRole::Required);
        let status = site.field("status").unwrap();
        assert_eq!(status.role, FieldRole::OptionalComputed);
        match status.kind {
            FieldKind::Status { choices, default } => {
                assert!(choices.contains(&"active"));
                assert_eq!(default, "active");
            }
            _ => panic!("status field has wrong kind"),
        }
        assert!(site.lookup_keys.contains(&"slug"));
        assert!(site.has_data_source);
    }
}
