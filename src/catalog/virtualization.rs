//! Virtualization entities: clusters and virtual machines.

use super::{EntitySpec, FieldSpec};

const CLUSTER_STATUS: &[&str] = &["planned", "staging", "active", "decommissioning", "offline"];
const VM_STATUS: &[&str] = &[
    "offline",
    "active",
    "planned",
    "staged",
    "failed",
    "decommissioning",
];

pub(super) static ENTITIES: &[EntitySpec] = &[
    EntitySpec {
        type_name: "netbox_cluster_type",
        endpoint: "virtualization/cluster-types",
        description: "Technology backing a cluster, such as a hypervisor",
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
        type_name: "netbox_cluster_group",
        endpoint: "virtualization/cluster-groups",
        description: "Grouping of virtualization clusters",
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
        type_name: "netbox_cluster",
        endpoint: "virtualization/clusters",
        description: "Cluster of physical hosts running virtual machines",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_reference("type", "virtualization/cluster-types"),
            FieldSpec::reference("group", "virtualization/cluster-groups"),
            FieldSpec::status(CLUSTER_STATUS),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::reference("site", "dcim/sites"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_virtual_machine",
        endpoint: "virtualization/virtual-machines",
        description: "Virtual machine hosted on a cluster or device",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::status(VM_STATUS),
            FieldSpec::reference("site", "dcim/sites"),
            FieldSpec::reference("cluster", "virtualization/clusters"),
            FieldSpec::reference("device", "dcim/devices"),
            FieldSpec::reference("role", "dcim/device-roles"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::reference("platform", "dcim/platforms"),
            FieldSpec::optional_float64("vcpus"),
            FieldSpec::optional_int64("memory"),
            FieldSpec::optional_int64("disk"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
];
