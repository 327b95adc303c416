//! Wireless entities: wireless LANs and their groups.

use super::{EntitySpec, FieldSpec};

const WLAN_STATUS: &[&str] = &["active", "reserved", "disabled", "deprecated"];

pub(super) static ENTITIES: &[EntitySpec] = &[
    EntitySpec {
        type_name: "netbox_wireless_lan_group",
        endpoint: "wireless/wireless-lan-groups",
        description: "Hierarchical grouping of wireless LANs",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::reference("parent", "wireless/wireless-lan-groups"),
            FieldSpec::optional_string("description"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_wireless_lan",
        endpoint: "wireless/wireless-lans",
        description: "Wireless network identified by its SSID",
        fields: &[
            FieldSpec::required_string("ssid"),
            FieldSpec::reference("group", "wireless/wireless-lan-groups"),
            FieldSpec::status(WLAN_STATUS),
            FieldSpec::reference("vlan", "ipam/vlans"),
            FieldSpec::reference("tenant", "tenancy/tenants"),
            FieldSpec::optional_string("auth_type"),
            FieldSpec::optional_string("auth_cipher"),
            FieldSpec::optional_string("auth_psk"),
            FieldSpec::optional_string("description"),
            FieldSpec::optional_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &["ssid"],
        has_data_source: true,
    },
];
