//! Contract Test: Zone-Record Replacement
//!
//! Constraints verified:
//! - Every record matching {name, type} is deleted from the draft, not just the first
//! - Records that differ in name or type are left alone
//! - The new record carries the resolved address and a 300s TTL
//! - The draft becomes live only after the record was added
//! - Any failure ends the run, including a failing zone-info lookup
//!
//! If this test fails, the replacement workflow no longer leaves exactly one
//! record for the target name and type.

mod common;

use common::*;
use ifddns_core::engine::DEFAULT_RECORD_TTL;
use ifddns_core::traits::NewRecord;
use ifddns_core::{AddressFamily, Error, ZoneEngine, ZoneTarget};

const ZONE: i64 = 1234;

fn target(family: AddressFamily) -> ZoneTarget {
    ZoneTarget {
        zone_id: ZONE,
        record: "home".to_string(),
        interface: "eth0".to_string(),
        family,
    }
}

fn source() -> StaticAddressSource {
    StaticAddressSource::new().with_interface("eth0", &["fe80::1/64", "192.0.2.7/24", "2001:db8::7/64"])
}

fn engine(api: &MockZoneApi) -> ZoneEngine {
    ZoneEngine::new(Box::new(source()), Box::new(api.clone()))
}

#[tokio::test]
async fn deletes_all_matching_records_before_adding() {
    let api = MockZoneApi::new(
        3,
        vec![
            record(1, "home", "A", "198.51.100.1"),
            record(2, "www", "A", "198.51.100.2"),
            record(3, "home", "A", "198.51.100.3"),
            record(4, "home", "AAAA", "2001:db8::99"),
            record(5, "home", "A", "198.51.100.5"),
        ],
    );

    let outcome = engine(&api).run(&target(AddressFamily::Ipv4)).await.unwrap();

    assert_eq!(outcome.version, 4);
    assert_eq!(outcome.deleted, vec![1, 3, 5]);
    assert_eq!(outcome.address.to_string(), "192.0.2.7");

    let remaining = api.records(4);
    let home_a: Vec<_> = remaining
        .iter()
        .filter(|r| r.name == "home" && r.record_type == "A")
        .collect();
    assert_eq!(home_a.len(), 1, "exactly one home/A record must remain");
    assert_eq!(home_a[0].value, "192.0.2.7");
    assert_eq!(home_a[0].ttl, DEFAULT_RECORD_TTL);

    assert!(remaining.iter().any(|r| r.id == 2), "www/A must survive");
    assert!(remaining.iter().any(|r| r.id == 4), "home/AAAA must survive");

    // The previously live version is untouched
    assert_eq!(api.records(3).len(), 5);
    assert_eq!(api.live_version(), 4);
}

#[tokio::test]
async fn calls_happen_in_workflow_order() {
    let api = MockZoneApi::new(7, vec![record(10, "home", "AAAA", "2001:db8::99")]);

    engine(&api).run(&target(AddressFamily::Ipv6)).await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            ZoneCall::Info(ZONE),
            ZoneCall::Clone { zone: ZONE, from: 7 },
            ZoneCall::List { zone: ZONE, version: 8 },
            ZoneCall::Delete { zone: ZONE, version: 8, record: 10 },
            ZoneCall::Add {
                zone: ZONE,
                version: 8,
                record: NewRecord {
                    name: "home".to_string(),
                    record_type: "AAAA".to_string(),
                    value: "2001:db8::7".to_string(),
                    ttl: 300,
                },
            },
            ZoneCall::Activate { zone: ZONE, version: 8 },
        ]
    );
}

#[tokio::test]
async fn no_matching_records_still_adds_and_activates() {
    let api = MockZoneApi::new(1, vec![record(1, "www", "A", "198.51.100.2")]);

    let outcome = engine(&api).run(&target(AddressFamily::Ipv4)).await.unwrap();

    assert!(outcome.deleted.is_empty());
    assert_eq!(outcome.record.name, "home");
    assert_eq!(api.live_version(), 2);
}

#[tokio::test]
async fn zone_info_failure_is_propagated() {
    let api = MockZoneApi::new(1, vec![]).failing(ZoneFailure::Info);

    let err = engine(&api).run(&target(AddressFamily::Ipv4)).await.unwrap_err();

    assert!(matches!(err, Error::Provider { .. }), "got {err}");
    assert_eq!(api.calls(), vec![ZoneCall::Info(ZONE)], "nothing may be cloned");
}

#[tokio::test]
async fn clone_failure_is_propagated() {
    let api = MockZoneApi::new(1, vec![]).failing(ZoneFailure::Clone);

    let err = engine(&api).run(&target(AddressFamily::Ipv4)).await.unwrap_err();

    assert!(matches!(err, Error::Provider { .. }), "got {err}");
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn refused_delete_stops_the_run() {
    let api = MockZoneApi::new(
        1,
        vec![
            record(1, "home", "A", "198.51.100.1"),
            record(2, "home", "A", "198.51.100.2"),
        ],
    )
    .failing(ZoneFailure::DeleteRefused);

    let err = engine(&api).run(&target(AddressFamily::Ipv4)).await.unwrap_err();

    assert!(err.to_string().contains("Deleting record failed"), "got {err}");
    let deletes = api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ZoneCall::Delete { .. }))
        .count();
    assert_eq!(deletes, 1);
    assert_eq!(api.live_version(), 1);
}

#[tokio::test]
async fn add_failure_leaves_draft_inactive() {
    let api = MockZoneApi::new(5, vec![]).failing(ZoneFailure::Add);

    assert!(engine(&api).run(&target(AddressFamily::Ipv4)).await.is_err());

    assert!(
        !api.calls()
            .iter()
            .any(|c| matches!(c, ZoneCall::Activate { .. }))
    );
    assert_eq!(api.live_version(), 5);
}

#[tokio::test]
async fn refused_activation_is_an_error() {
    let api = MockZoneApi::new(5, vec![]).failing(ZoneFailure::ActivateRefused);

    let err = engine(&api).run(&target(AddressFamily::Ipv4)).await.unwrap_err();
    assert!(err.to_string().contains("Setting new version live failed"), "got {err}");
}

#[tokio::test]
async fn activation_error_is_propagated() {
    let api = MockZoneApi::new(5, vec![]).failing(ZoneFailure::Activate);

    let err = engine(&api).run(&target(AddressFamily::Ipv4)).await.unwrap_err();
    assert!(matches!(err, Error::Provider { .. }), "got {err}");
}

#[tokio::test]
async fn resolver_failure_happens_before_any_remote_call() {
    let api = MockZoneApi::new(1, vec![]);
    let engine = ZoneEngine::new(
        Box::new(StaticAddressSource::new().with_interface("eth0", &["192.0.2.7/24"])),
        Box::new(api.clone()),
    );

    let err = engine.run(&target(AddressFamily::Ipv6)).await.unwrap_err();

    assert!(matches!(err, Error::AddressNotFound { .. }), "got {err}");
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn invalid_target_is_rejected() {
    let api = MockZoneApi::new(1, vec![]);
    let mut bad = target(AddressFamily::Ipv4);
    bad.zone_id = 0;

    let err = engine(&api).run(&bad).await.unwrap_err();

    assert!(matches!(err, Error::Config(_)), "got {err}");
    assert!(api.calls().is_empty());
}
