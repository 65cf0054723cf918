//! Architectural Contract Test: Reflection Between Host and Remote Shapes
//!
//! This test verifies that values survive the trip host → remote → host.
//!
//! Constraints verified:
//! - Scalars come back exactly as they were sent
//! - Extended attributes are wrapped on the way out and unwrapped on the way in
//! - The remote reference never lands in host attributes
//! - Compound fields other than extended attributes are not written to host state
//!
//! If this test fails, hosts will see spurious diffs after every read.

mod common;

use common::*;
use ibx_core::reflect::{deserialize, extattrs, serialize};
use ibx_core::resources::{network, nsgroup_forward};
use ibx_core::traits::ResourceData;
use ibx_core::{MemoryResourceData, REF_FIELD, RemoteObject};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn remote(value: Value) -> RemoteObject {
    RemoteObject::try_from(value).unwrap()
}

#[test]
fn remote_object_with_extattrs_deserializes_flat() {
    let mut data = MemoryResourceData::new();

    deserialize(
        remote(json!({
            "_ref": "x",
            "name": "ns-group-1",
            "extattrs": {"Site": {"value": "us-east-1"}}
        })),
        &mut data,
    );

    let expected: Map<String, Value> = serde_json::from_value(json!({
        "name": "ns-group-1",
        "extattrs": {"Site": "us-east-1"}
    }))
    .unwrap();
    assert_eq!(data.attributes(), &expected);
    assert!(!data.attributes().contains_key(REF_FIELD));
}

#[test]
fn scalars_round_trip_unchanged() {
    let resource = nsgroup_forward::definition();
    let sent = MemoryResourceData::new()
        .with_planned("name", json!("ns-group-1"))
        .with_planned("comment", json!(""));

    let object = serialize(resource.object_type, resource.schema.descriptors(), &sent, false);

    let mut received = MemoryResourceData::new();
    deserialize(object, &mut received);

    assert_eq!(received.attributes(), sent.attributes());
}

#[test]
fn non_extattrs_compound_fields_keep_host_value() {
    let servers = json!([{"name": "member-1.example.com", "forwarders_only": true}]);
    let mut data = MemoryResourceData::new().with_synced("forwarding_servers", servers.clone());

    deserialize(
        remote(json!({
            "_ref": "nsgroup:forwardingmember/abc",
            "name": "ns-group-1",
            "forwarding_servers": [{"name": "member-2.example.com"}]
        })),
        &mut data,
    );

    assert_eq!(data.get_ok("forwarding_servers"), Some(servers));
    assert_eq!(data.get_ok("name"), Some(json!("ns-group-1")));
}

#[test]
fn explicit_null_is_written_to_host() {
    let mut data = MemoryResourceData::new().with_synced("comment", json!("old"));

    deserialize(remote(json!({"comment": null})), &mut data);

    assert_eq!(data.synced_attributes().get("comment"), Some(&Value::Null));
    assert_eq!(data.get_ok("comment"), None);
}

#[tokio::test]
async fn network_extattrs_survive_create_and_read() {
    let (engine, mock) = engine_with_mock();
    mock.set_next_reference("network/ZG5zLm5ldHdvcmskMTAuMC4wLjAvMjQvMA:10.0.0.0/24/default");
    let resource = network::definition();

    let mut data = MemoryResourceData::new()
        .with_planned("network", json!("10.0.0.0/24"))
        .with_planned("extattrs", json!({"Site": "us-east-1", "Cloud Region": "us-east-1"}));

    engine.create(&resource, &mut data).await.unwrap();

    let created = Value::from(mock.created()[0].1.clone());
    assert_eq!(
        created["extattrs"],
        json!({
            "Site": {"value": "us-east-1"},
            "Cloud Region": {"value": "us-east-1"}
        })
    );

    assert_eq!(
        data.get_ok("extattrs"),
        Some(json!({"Site": "us-east-1", "Cloud Region": "us-east-1"}))
    );
    assert!(data.changed_keys().is_empty());
}

#[test]
#[should_panic]
fn malformed_remote_extattrs_is_fatal() {
    let mut data = MemoryResourceData::new();
    deserialize(remote(json!({"extattrs": {"Site": "bare"}})), &mut data);
}

proptest! {
    #[test]
    fn extattrs_wrap_unwrap_round_trip(
        attrs in proptest::collection::btree_map("[A-Za-z][A-Za-z0-9 _-]{0,15}", ".{0,24}", 0..8)
    ) {
        let flat = Value::Object(
            attrs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        );

        let wrapped = extattrs::wrap(&flat).unwrap();
        prop_assert_eq!(extattrs::unwrap(&wrapped).unwrap(), flat);
    }
}
