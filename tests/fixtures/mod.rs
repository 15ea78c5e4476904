//! Portal snapshots shared by the integration tests.
#![allow(dead_code)]

use hubspot_audit::SnapshotGateway;
use serde_json::{json, Value};

/// Owner plus one ops super admin, six regular users, four enabled integrations
pub fn healthy_admin() -> Value {
    let mut users = vec![
        json!({"id": "1", "email": "owner@acme.test", "superAdmin": true}),
        json!({"id": "2", "email": "ops@acme.test", "superAdmin": true}),
    ];
    users.extend(
        (3..=8).map(|i| json!({"id": i.to_string(), "email": format!("rep{i}@acme.test")})),
    );

    json!({
        "users": users,
        "integrations": [
            {"name": "Salesforce", "enabled": true},
            {"name": "Slack", "enabled": true},
            {"name": "Zoom", "enabled": true},
            {"name": "Gmail", "enabled": true}
        ]
    })
}

/// `total` custom contact properties of which `unused` are bare free-text fields
pub fn custom_properties(total: usize, unused: usize) -> Value {
    let properties: Vec<Value> = (0..total)
        .map(|i| {
            if i < unused {
                json!({"name": format!("freetext{i}"), "hubspotDefined": false, "type": "string"})
            } else {
                json!({
                    "name": format!("segment{i}"),
                    "hubspotDefined": false,
                    "type": "enumeration",
                    "options": [{"value": "a"}, {"value": "b"}]
                })
            }
        })
        .chain([json!({"name": "email", "hubspotDefined": true, "type": "string"})])
        .collect();
    Value::Array(properties)
}

pub fn workflows(active: usize, inactive: usize) -> Value {
    let mut all: Vec<Value> = (0..active)
        .map(|i| json!({"id": i, "name": format!("Nurture {i}"), "enabled": true}))
        .collect();
    all.extend(
        (0..inactive)
            .map(|i| json!({"id": 100 + i, "name": format!("Paused {i}"), "enabled": false})),
    );
    Value::Array(all)
}

/// A portal that scores well everywhere
pub fn baseline() -> Value {
    let snapshot = healthy_admin();
    let snapshot = with(snapshot, "contact_properties", custom_properties(10, 0));
    let snapshot = with(snapshot, "workflows", workflows(6, 0));
    let snapshot = with(
        snapshot,
        "forms",
        json!([
            {"guid": "f1", "name": "Contact us", "isPublished": true},
            {"guid": "f2", "name": "Newsletter", "isPublished": true},
            {"guid": "f3", "name": "Demo request", "isPublished": true}
        ]),
    );
    let snapshot = with(snapshot, "form_submissions", json!({"f1": 40, "f2": 12, "f3": 3}));
    let snapshot = with(snapshot, "dashboards", json!([{"name": "Marketing"}, {"name": "Sales"}]));
    let snapshot = with(
        snapshot,
        "reports",
        json!([
            {"name": "Pipeline velocity", "isHubSpotDefined": false},
            {"name": "Contacts created", "isHubSpotDefined": true}
        ]),
    );
    with(
        snapshot,
        "pipelines",
        json!([
            {"label": "New business", "stages": [{"id": "s1"}, {"id": "s2"}]},
            {"label": "Renewals", "stages": [{"id": "s3"}]}
        ]),
    )
}

pub fn with(mut snapshot: Value, key: &str, value: Value) -> Value {
    snapshot
        .as_object_mut()
        .expect("snapshot is a JSON object")
        .insert(key.to_string(), value);
    snapshot
}

pub fn gateway(snapshot: &Value) -> SnapshotGateway {
    SnapshotGateway::from_json(&snapshot.to_string()).expect("valid snapshot")
}
