//! DCIM entities: sites, racks, devices, and their supporting object types.

use super::{EntitySpec, FieldRole, FieldSpec};

const SITE_STATUS: &[&str] = &["planned", "staging", "active", "decommissioning", "retired"];
const RACK_STATUS: &[&str] = &["reserved", "available", "planned", "active", "deprecated"];
const CABLE_STATUS: &[&str] = &["connected", "planned", "decommissioning"];
const POWER_FEED_STATUS: &[&str] = &["offline", "active", "planned", "failed"];
const DEVICE_STATUS: &[&str] = &[
    "offline",
    "active",
    "planned",
    "staged",
    "failed",
    "inventory",
    "decommissioning",
];

pub(super) static ENTITIES: &[EntitySpec] = &[
    EntitySpec {
        type_name: "netbox_region",
        endpoint: "dcim/regions",
        description: "Geographic region grouping sites",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::reference("parent", "dcim/regions"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_site_group",
        endpoint: "dcim/site-groups",
        description: "Functional grouping of sites",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::reference("parent", "dcim/site-groups"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_site",
        endpoint: "dcim/sites",
        description: "Physical site such as a campus or data center",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::status(SITE_STATUS),
            FieldSpec::reference("region", "dcim/regions"),
            FieldSpec::reference("group", "dcim/site-groups"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("facility"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_location",
        endpoint: "dcim/locations",
        description: "Location within a site, such as a floor or room",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::required_reference("site", "dcim/sites"),
            FieldSpec::reference("parent", "dcim/locations"),
            FieldSpec::status(SITE_STATUS),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_rack_role",
        endpoint: "dcim/rack-roles",
        description: "Functional role of a rack",
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
        type_name: "netbox_rack",
        endpoint: "dcim/racks",
        description: "Equipment rack within a site",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_reference("site", "dcim/sites"),
            FieldSpec::reference("location", "dcim/locations"),
            FieldSpec::status(RACK_STATUS),
            FieldSpec::reference("role", "dcim/rack-roles"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("serial"),
            FieldSpec::optional_string("asset_tag"),
            FieldSpec::optional_int64("u_height"),
            FieldSpec::optional_string("facility_id"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_manufacturer",
        endpoint: "dcim/manufacturers",
        description: "Hardware manufacturer",
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
        type_name: "netbox_device_type",
        endpoint: "dcim/device-types",
        description: "Hardware model made by a manufacturer",
        fields: &[
            FieldSpec::required_reference("manufacturer", "dcim/manufacturers"),
            FieldSpec::required_string("model"),
            FieldSpec::required_string("slug"),
            FieldSpec::optional_string("part_number"),
            FieldSpec::optional_float64("u_height"),
            FieldSpec::optional_bool("is_full_depth"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["model", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_device_role",
        endpoint: "dcim/device-roles",
        description: "Functional role of a device",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::optional_string("color"),
            FieldSpec::optional_bool("vm_role"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_platform",
        endpoint: "dcim/platforms",
        description: "Operating system or software platform",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::reference("manufacturer", "dcim/manufacturers"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_device",
        endpoint: "dcim/devices",
        description: "Physical device installed at a site",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_reference("device_type", "dcim/device-types"),
            FieldSpec::required_reference("role", "dcim/device-roles"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::reference("platform", "dcim/platforms"),
            FieldSpec::optional_string("serial"),
            FieldSpec::optional_string("asset_tag"),
            FieldSpec::required_reference("site", "dcim/sites"),
            FieldSpec::reference("location", "dcim/locations"),
            FieldSpec::reference("rack", "dcim/racks"),
            FieldSpec::optional_float64("position"),
            FieldSpec::optional_string("face"),
            FieldSpec::optional_float64("latitude"),
            FieldSpec::optional_float64("longitude"),
            FieldSpec::status(DEVICE_STATUS),
            FieldSpec::optional_string("airflow"),
            FieldSpec::optional_int64("vc_position"),
            FieldSpec::optional_int64("vc_priority"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_interface",
        endpoint: "dcim/interfaces",
        description: "Network interface on a device",
        fields: &[
            FieldSpec::required_reference("device", "dcim/devices"),
            FieldSpec::required_string("name"),
            FieldSpec::required_string("type"),
            FieldSpec::optional_bool("enabled"),
            FieldSpec::optional_int64("mtu"),
            FieldSpec::optional_string("mac_address"),
            FieldSpec::optional_bool("mgmt_only"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &[],
        has_data_source: false,
    },
    EntitySpec {
        type_name: "netbox_cable",
        endpoint: "dcim/cables",
        description: "Physical cable between two sets of termination points",
        fields: &[
            FieldSpec::terminations("a_terminations"),
            FieldSpec::terminations("b_terminations"),
            FieldSpec::optional_string("type"),
            FieldSpec::status_default(CABLE_STATUS, "connected"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("label"),
            FieldSpec::optional_string("color"),
            FieldSpec::optional_float64("length"),
            FieldSpec::optional_string("length_unit"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["label"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_virtual_chassis",
        endpoint: "dcim/virtual-chassis",
        description: "Set of devices acting as a single chassis",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::optional_string("domain"),
            FieldSpec::reference("master", "dcim/devices"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::optional_int64("member_count").role(FieldRole::Computed),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_power_panel",
        endpoint: "dcim/power-panels",
        description: "Power distribution panel within a site",
        fields: &[
            FieldSpec::required_reference("site", "dcim/sites"),
            FieldSpec::reference("location", "dcim/locations"),
            FieldSpec::required_string("name"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_power_feed",
        endpoint: "dcim/power-feeds",
        description: "Electrical feed from a power panel",
        fields: &[
            FieldSpec::required_reference("power_panel", "dcim/power-panels"),
            FieldSpec::reference("rack", "dcim/racks"),
            FieldSpec::required_string("name"),
            FieldSpec::status(POWER_FEED_STATUS),
            FieldSpec::optional_string("type"),
            FieldSpec::optional_string("supply"),
            FieldSpec::optional_string("phase"),
            FieldSpec::optional_int64("voltage"),
            FieldSpec::optional_int64("amperage"),
            FieldSpec::optional_int64("max_utilization"),
            FieldSpec::optional_bool("mark_connected"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
];
