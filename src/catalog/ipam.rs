//! IPAM entities: prefixes, addresses, VLANs, VRFs, and numbering resources.

use super::{EntitySpec, FieldSpec};

const VLAN_STATUS: &[&str] = &["active", "reserved", "deprecated"];
const PREFIX_STATUS: &[&str] = &["container", "active", "reserved", "deprecated"];
const RANGE_STATUS: &[&str] = &["active", "reserved", "deprecated"];
const IP_STATUS: &[&str] = &["active", "reserved", "deprecated", "dhcp", "slaac"];

pub(super) static ENTITIES: &[EntitySpec] = &[
    EntitySpec {
        type_name: "netbox_rir",
        endpoint: "ipam/rirs",
        description: "Regional Internet Registry or other numbering authority",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::optional_bool("is_private"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_aggregate",
        endpoint: "ipam/aggregates",
        description: "Top-level aggregate prefix delegated by a RIR",
        fields: &[
            FieldSpec::required_string("prefix"),
            FieldSpec::required_reference("rir", "ipam/rirs"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("date_added"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["prefix"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_asn",
        endpoint: "ipam/asns",
        description: "Autonomous system number",
        fields: &[
            FieldSpec::required_int64("asn"),
            FieldSpec::required_reference("rir", "ipam/rirs"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["asn"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_vrf",
        endpoint: "ipam/vrfs",
        description: "Virtual routing and forwarding instance",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::optional_string("rd"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_bool("enforce_unique"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "rd"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_route_target",
        endpoint: "ipam/route-targets",
        description: "BGP route target",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_ipam_role",
        endpoint: "ipam/roles",
        description: "Functional role of a prefix or VLAN",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::optional_int64("weight"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_vlan_group",
        endpoint: "ipam/vlan-groups",
        description: "Grouping of VLANs with a shared numbering space",
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
        type_name: "netbox_vlan",
        endpoint: "ipam/vlans",
        description: "Virtual LAN",
        fields: &[
            FieldSpec::required_int64("vid"),
            FieldSpec::required_string("name"),
            FieldSpec::reference("site", "dcim/sites"),
            FieldSpec::reference("group", "ipam/vlan-groups"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::status(VLAN_STATUS),
            FieldSpec::reference("role", "ipam/roles"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "vid"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_prefix",
        endpoint: "ipam/prefixes",
        description: "IPv4 or IPv6 network prefix",
        fields: &[
            FieldSpec::required_string("prefix"),
            FieldSpec::reference("site", "dcim/sites"),
            FieldSpec::reference("vrf", "ipam/vrfs"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::reference("vlan", "ipam/vlans"),
            FieldSpec::status(PREFIX_STATUS),
            FieldSpec::reference("role", "ipam/roles"),
            FieldSpec::optional_bool("is_pool"),
            FieldSpec::optional_bool("mark_utilized"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["prefix"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_ip_range",
        endpoint: "ipam/ip-ranges",
        description: "Contiguous range of IP addresses",
        fields: &[
            FieldSpec::required_string("start_address"),
            FieldSpec::required_string("end_address"),
            FieldSpec::reference("vrf", "ipam/vrfs"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::status(RANGE_STATUS),
            FieldSpec::reference("role", "ipam/roles"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["start_address"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_ip_address",
        endpoint: "ipam/ip-addresses",
        description: "Individual IP address, optionally assigned to an object",
        fields: &[
            FieldSpec::required_string("address"),
            FieldSpec::reference("vrf", "ipam/vrfs"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::status(IP_STATUS),
            FieldSpec::optional_string("role"),
            FieldSpec::optional_string("assigned_object_type"),
            FieldSpec::optional_int64("assigned_object_id"),
            FieldSpec::optional_string("dns_name"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["address", "dns_name"],
        has_data_source: true,
    },
];
