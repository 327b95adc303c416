//! Circuit entities: carriers, circuit types, and circuits.

use super::{EntitySpec, FieldSpec};

const CIRCUIT_STATUS: &[&str] = &[
    "planned",
    "provisioning",
    "active",
    "offline",
    "deprovisioning",
    "decommissioned",
];

pub(super) static ENTITIES: &[EntitySpec] = &[
    EntitySpec {
        // "circuit_provider" in state to avoid the reserved "provider" name
        type_name: "netbox_circuit_provider",
        endpoint: "circuits/providers",
        description: "Carrier providing circuits",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_circuit_type",
        endpoint: "circuits/circuit-types",
        description: "Classification of circuits",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::optional_string("color"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_circuit",
        endpoint: "circuits/circuits",
        description: "Physical data or voice circuit from a carrier",
        fields: &[
            FieldSpec::required_string("cid"),
            FieldSpec::required_reference("circuit_provider", "circuits/providers").api("provider"),
            FieldSpec::required_reference("type", "circuits/circuit-types"),
            FieldSpec::status(CIRCUIT_STATUS),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("install_date"),
            FieldSpec::optional_string("termination_date"),
            FieldSpec::optional_int64("commit_rate"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["cid"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_provider_network",
        endpoint: "circuits/provider-networks",
        description: "Carrier network a circuit can terminate to",
        fields: &[
            FieldSpec::required_reference("circuit_provider", "circuits/providers")
                .api("provider"),
            FieldSpec::required_string("name"),
            FieldSpec::optional_string("service_id"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_circuit_termination",
        endpoint: "circuits/circuit-terminations",
        description: "A or Z side termination of a circuit",
        fields: &[
            FieldSpec::required_reference("circuit", "circuits/circuits"),
            FieldSpec::required_string("term_side"),
            FieldSpec::reference("site", "dcim/sites"),
            FieldSpec::reference("provider_network", "circuits/provider-networks"),
            FieldSpec::optional_int64("port_speed"),
            FieldSpec::optional_int64("upstream_speed"),
            FieldSpec::optional_string("xconnect_id"),
            FieldSpec::optional_string("pp_info"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_bool("mark_connected"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["xconnect_id"],
        has_data_source: true,
    },
];
