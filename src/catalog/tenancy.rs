//! Tenancy entities: tenants, contacts, and their groupings.

use super::{EntitySpec, FieldSpec};

pub(super) static ENTITIES: &[EntitySpec] = &[
    EntitySpec {
        type_name: "netbox_tenant_group",
        endpoint: "tenancy/tenant-groups",
        description: "Hierarchical grouping of tenants",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::reference("parent", "tenancy/tenant-groups"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_tenant",
        endpoint: "tenancy/tenants",
        description: "Customer or internal organization owning resources",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::reference("group", "tenancy/tenant-groups"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_contact_group",
        endpoint: "tenancy/contact-groups",
        description: "Hierarchical grouping of contacts",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::reference("parent", "tenancy/contact-groups"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_contact_role",
        endpoint: "tenancy/contact-roles",
        description: "Functional role of a contact assignment",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_contact",
        endpoint: "tenancy/contacts",
        description: "Individual or team that can be attached to objects",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::reference("group", "tenancy/contact-groups"),
            FieldSpec::optional_string("title"),
            FieldSpec::optional_string("phone"),
            FieldSpec::optional_string("email"),
            FieldSpec::optional_string("address"),
            FieldSpec::optional_string("link"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "email"],
        has_data_source: true,
    },
];
