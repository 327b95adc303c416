//! Extras entities: tags and journal entries.

use super::{EntitySpec, FieldSpec};

pub(super) static ENTITIES: &[EntitySpec] = &[
    EntitySpec {
        type_name: "netbox_tag",
        endpoint: "extras/tags",
        description: "Label that can be applied to most object types",
        fields: &[
            FieldSpec::required_string("name"),
            FieldSpec::required_string("slug"),
            FieldSpec::optional_string("color"),
            FieldSpec::optional_string("description"),
            FieldSpec::string_list("object_types"),
        ],
        lookup_keys: &["name", "slug"],
        has_data_source: true,
    },
    EntitySpec {
        type_name: "netbox_journal_entry",
        endpoint: "extras/journal-entries",
        description: "Dated note attached to another object",
        fields: &[
            FieldSpec::required_string("assigned_object_type").force_new(),
            FieldSpec::required_int64("assigned_object_id").force_new(),
            FieldSpec::optional_string("kind"),
            FieldSpec::required_string("comments"),
            FieldSpec::tags(),
            FieldSpec::custom_fields(),
        ],
        lookup_keys: &[],
        has_data_source: false,
    },
];
