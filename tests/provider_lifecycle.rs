//! End-to-end provider scenarios over the in-memory NetBox mock.

use hemmer_provider_netbox::testing::{
    assert_plan_changes_attribute, assert_plan_creates, assert_plan_no_changes,
    assert_plan_replaces, assert_plan_updates_in_place, tester_with_mock,
};
use serde_json::json;

#[tokio::test]
async fn site_create_then_replan_is_idempotent() {
    let (tester, _mock) = tester_with_mock();

    let config = json!({"name": "DC West", "slug": "dc-west"});

    let plan = tester.plan_create("netbox_site", config.clone()).await.unwrap();
    assert_plan_creates(&plan);

    let state = tester
        .create("netbox_site", plan.planned_state)
        .await
        .unwrap();
    assert_eq!(state["name"], "DC West");
    assert_eq!(state["status"], "active");

    // Planning the same configuration against the stored state is a no-op
    let replan = tester
        .plan_update("netbox_site", state.clone(), config)
        .await
        .unwrap();
    assert_plan_no_changes(&replan);
}

#[tokio::test]
async fn site_update_changes_only_the_edited_field() {
    let (tester, _mock) = tester_with_mock();

    let state = tester
        .lifecycle_create(
            "netbox_site",
            json!({"name": "DC West", "slug": "dc-west", "description": "primary"}),
        )
        .await
        .unwrap();

    let plan = tester
        .plan_update(
            "netbox_site",
            state.clone(),
            json!({"name": "DC West", "slug": "dc-west", "description": "secondary"}),
        )
        .await
        .unwrap();
    assert_plan_updates_in_place(&plan);
    assert_plan_changes_attribute(&plan, "description");
    assert_eq!(plan.changes.len(), 1);

    let updated = tester
        .update("netbox_site", state, plan.planned_state)
        .await
        .unwrap();
    assert_eq!(updated["description"], "secondary");
    assert_eq!(updated["name"], "DC West");
}

#[tokio::test]
async fn site_data_source_lookup_by_slug() {
    let (tester, mock) = tester_with_mock();

    mock.seed(
        "dcim/sites",
        json!({"name": "Test Site DS", "slug": "test-site-ds",
               "status": {"value": "active", "label": "Active"}}),
    );
    mock.seed(
        "dcim/sites",
        json!({"name": "Another", "slug": "another",
               "status": {"value": "planned", "label": "Planned"}}),
    );

    let state = tester
        .read_data_source("netbox_site", json!({"slug": "test-site-ds"}))
        .await
        .unwrap();

    assert_eq!(state["name"], "Test Site DS");
    assert_eq!(state["slug"], "test-site-ds");
    assert_eq!(state["status"], "active");
    assert_eq!(state["id"], "1");
}

#[tokio::test]
async fn data_source_rejects_zero_or_two_lookup_keys() {
    let (tester, _mock) = tester_with_mock();

    let err = tester
        .read_data_source("netbox_site", json!({}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("exactly one"));

    let err = tester
        .read_data_source("netbox_site", json!({"name": "A", "slug": "a"}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("only one"));
}

#[tokio::test]
async fn import_then_replan_shows_no_changes() {
    let (tester, mock) = tester_with_mock();

    let id = mock.seed(
        "dcim/sites",
        json!({"name": "Imported", "slug": "imported", "description": "pre-existing",
               "status": {"value": "active", "label": "Active"}}),
    );

    let imported = tester
        .import_resource("netbox_site", &id.to_string())
        .await
        .unwrap();
    assert_eq!(imported.len(), 1);
    let state = imported[0].state.clone();
    assert_eq!(state["id"], id.to_string());
    assert_eq!(state["description"], "pre-existing");

    // A configuration matching the imported state plans clean
    let plan = tester
        .plan_update(
            "netbox_site",
            state,
            json!({"name": "Imported", "slug": "imported", "description": "pre-existing"}),
        )
        .await
        .unwrap();
    assert_plan_no_changes(&plan);
}

#[tokio::test]
async fn read_prunes_state_when_object_was_deleted_externally() {
    let (tester, mock) = tester_with_mock();

    let state = tester
        .lifecycle_create("netbox_site", json!({"name": "DC West", "slug": "dc-west"}))
        .await
        .unwrap();
    let id: i64 = state["id"].as_str().unwrap().parse().unwrap();

    // Someone deleted the site directly in NetBox
    assert!(mock.remove("dcim/sites", id));

    let read_back = tester.read("netbox_site", state).await.unwrap();
    assert!(read_back.is_null());
}

#[tokio::test]
async fn reference_token_survives_round_trip_with_companion_id() {
    let (tester, mock) = tester_with_mock();

    mock.seed("dcim/regions", json!({"name": "EMEA", "slug": "emea"}));

    let state = tester
        .lifecycle_create(
            "netbox_site",
            json!({"name": "DC West", "slug": "dc-west", "region": "emea"}),
        )
        .await
        .unwrap();

    assert_eq!(state["region"], "emea");
    assert_eq!(state["region_id"], "1");

    let plan = tester
        .plan_update(
            "netbox_site",
            state,
            json!({"name": "DC West", "slug": "dc-west", "region": "emea"}),
        )
        .await
        .unwrap();
    assert_plan_no_changes(&plan);
}

#[tokio::test]
async fn journal_entry_identity_change_forces_replacement() {
    let (tester, mock) = tester_with_mock();

    let site_id = mock.seed("dcim/sites", json!({"name": "DC West", "slug": "dc-west"}));

    let state = tester
        .lifecycle_create(
            "netbox_journal_entry",
            json!({
                "assigned_object_type": "dcim.site",
                "assigned_object_id": site_id,
                "comments": "installed new PDU"
            }),
        )
        .await
        .unwrap();

    let plan = tester
        .plan_update(
            "netbox_journal_entry",
            state,
            json!({
                "assigned_object_type": "dcim.device",
                "assigned_object_id": site_id,
                "comments": "installed new PDU"
            }),
        )
        .await
        .unwrap();
    assert_plan_replaces(&plan);
}

#[tokio::test]
async fn slug_and_status_validation_produce_field_scoped_diagnostics() {
    let (tester, _mock) = tester_with_mock();

    let diags = tester
        .validate_resource_config_raw(
            "netbox_site",
            json!({"name": "Bad", "slug": "Not A Slug", "status": "melted"}),
        )
        .await
        .unwrap();
    assert_eq!(diags.len(), 2);
    let attrs: Vec<_> = diags.iter().filter_map(|d| d.attribute.as_deref()).collect();
    assert!(attrs.contains(&"slug"));
    assert!(attrs.contains(&"status"));

    tester
        .validate_resource_config(
            "netbox_site",
            json!({"name": "Good", "slug": "good", "status": "active"}),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn tags_and_custom_fields_round_trip() {
    let (tester, mock) = tester_with_mock();

    let state = tester
        .lifecycle_create(
            "netbox_device_role",
            json!({
                "name": "Leaf", "slug": "leaf",
                "tags": [{"name": "Fabric", "slug": "fabric"}],
                "custom_fields": [{"name": "rack_units", "type": "integer", "value": "1"}]
            }),
        )
        .await
        .unwrap();

    assert_eq!(state["tags"][0]["slug"], "fabric");
    assert_eq!(state["custom_fields"][0]["value"], "1");

    // The API payload carried the flattened custom field map
    let id: i64 = state["id"].as_str().unwrap().parse().unwrap();
    let stored = mock.stored("dcim/device-roles", id).unwrap();
    assert_eq!(stored["custom_fields"]["rack_units"], 1);
}

#[tokio::test]
async fn tag_order_in_configuration_does_not_cause_drift() {
    let (tester, _mock) = tester_with_mock();

    let state = tester
        .lifecycle_create(
            "netbox_site",
            json!({
                "name": "DC West", "slug": "dc-west",
                "tags": [
                    {"name": "Zone A", "slug": "zone-a"},
                    {"name": "Zone B", "slug": "zone-b"}
                ]
            }),
        )
        .await
        .unwrap();

    // Same tag set listed in the opposite order plans clean
    let plan = tester
        .plan_update(
            "netbox_site",
            state,
            json!({
                "name": "DC West", "slug": "dc-west",
                "tags": [
                    {"name": "Zone B", "slug": "zone-b"},
                    {"name": "Zone A", "slug": "zone-a"}
                ]
            }),
        )
        .await
        .unwrap();
    assert_plan_no_changes(&plan);
}

#[tokio::test]
async fn cable_lifecycle_with_terminations() {
    let (tester, mock) = tester_with_mock();

    let device_a = mock.seed("dcim/devices", json!({"name": "leaf-1"}));
    let device_b = mock.seed("dcim/devices", json!({"name": "leaf-2"}));

    let state = tester
        .lifecycle_create(
            "netbox_cable",
            json!({
                "a_terminations": [
                    {"object_type": "dcim.interface", "object_id": device_a}
                ],
                "b_terminations": [
                    {"object_type": "dcim.interface", "object_id": device_b}
                ],
                "type": "cat6",
                "label": "leaf-1 to leaf-2"
            }),
        )
        .await
        .unwrap();

    assert_eq!(state["status"], "connected");
    assert_eq!(state["a_terminations"][0]["object_type"], "dcim.interface");
    assert_eq!(state["b_terminations"][0]["object_id"], device_b);

    // Unchanged configuration plans clean
    let plan = tester
        .plan_update(
            "netbox_cable",
            state.clone(),
            json!({
                "a_terminations": [
                    {"object_type": "dcim.interface", "object_id": device_a}
                ],
                "b_terminations": [
                    {"object_type": "dcim.interface", "object_id": device_b}
                ],
                "type": "cat6",
                "label": "leaf-1 to leaf-2"
            }),
        )
        .await
        .unwrap();
    assert_plan_no_changes(&plan);

    let id: i64 = state["id"].as_str().unwrap().parse().unwrap();
    tester.delete("netbox_cable", state).await.unwrap();
    assert!(mock.stored("dcim/cables", id).is_none());
}

#[tokio::test]
async fn vlan_lifecycle_with_numeric_required_field() {
    let (tester, mock) = tester_with_mock();

    let updated = tester
        .lifecycle_crud(
            "netbox_vlan",
            json!({"name": "Servers", "slug": "servers", "vid": 100}),
            json!({"name": "Servers", "slug": "servers", "vid": 200}),
        )
        .await
        .unwrap();

    assert_eq!(updated["vid"], 200);
    assert_eq!(mock.count("ipam/vlans"), 0);
}
