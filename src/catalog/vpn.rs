//! VPN entities: tunnels, tunnel groups, and L2VPNs.

use super::{EntitySpec, FieldSpec};

const TUNNEL_STATUS: &[&str] = &["planned", "active", "disabled"];

pub(super) static ENTITIES: &[EntitySpec] = &[
    EntitySpec {
        type_name: "netbox_tunnel_group",
        endpoint: "vpn/tunnel-groups",
        description: "Administrative grouping of tunnels",
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
        type_name: "netbox_tunnel",
        endpoint: "vpn/tunnels",
        description: "Point-to-point or hub-and-spoke tunnel",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::status(TUNNEL_STATUS),
            FieldSpec::reference("group", "vpn/tunnel-groups"),
            FieldSpec::required_string("encapsulation"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_int64("tunnel_id"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_l2vpn",
        endpoint: "vpn/l2vpns",
        description: "Layer 2 VPN such as VXLAN or VPLS",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::required_string("type"),
            FieldSpec::optional_int64("identifier"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
];
