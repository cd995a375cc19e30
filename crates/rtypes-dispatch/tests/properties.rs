//! End-to-end behaviour of batches against JSON-backed collections.

use std::sync::Arc;

use rtypes_collections::{IterStep, ObjectFactory, RType, TypeName};
use rtypes_dispatch::{OperationDispatcher, ResponseRecord, Status};
use serde_json::{json, Value};
use tempfile::tempdir;

fn dispatcher_in(dir: &std::path::Path) -> OperationDispatcher {
    OperationDispatcher::new(Arc::new(ObjectFactory::open(dir).unwrap()))
}

fn process(dispatcher: &OperationDispatcher, batch: Value) -> Vec<ResponseRecord> {
    dispatcher
        .process_payload(&batch.to_string())
        .unwrap()
        .unwrap_or_default()
}

#[test]
fn test_append_then_get_item() {
    let dir = tempdir().unwrap();
    let d = dispatcher_in(dir.path());

    let records = process(
        &d,
        json!([
            {"id": "a", "object_type": "RList", "object_identifier": "L1", "operation": "append", "args": {"item": "x"}},
            {"id": "b", "object_type": "RList", "object_identifier": "L1", "operation": "length"},
            {"id": "c", "object_type": "RList", "object_identifier": "L1", "operation": "getItem", "args": {"index": 0}}
        ]),
    );

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.error.is_none()));
    assert_eq!(records[1].result, Some(json!(1)));
    assert_eq!(records[2].result, Some(json!("x")));
}

#[test]
fn test_missing_key_reports_error_without_result() {
    let dir = tempdir().unwrap();
    let d = dispatcher_in(dir.path());

    let records = process(
        &d,
        json!([
            {"id": 9, "object_type": "RDict", "object_identifier": "D1", "operation": "getItem", "args": {"key": "missing"}}
        ]),
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, Status::Error);
    assert!(records[0].result.is_none());
    assert!(records[0].error.as_deref().unwrap().starts_with("KeyNotFound"));

    let encoded = serde_json::to_value(&records[0]).unwrap();
    assert!(encoded.get("result").is_none());
}

#[test]
fn test_failures_do_not_abort_siblings() {
    let dir = tempdir().unwrap();
    let d = dispatcher_in(dir.path());

    let records = process(
        &d,
        json!([
            {"id": 1, "object_type": "RSet", "object_identifier": "S1", "operation": "pop"},
            {"id": 2, "object_type": "RSet", "object_identifier": "S1", "operation": "add", "args": {"item": "x"}}
        ]),
    );

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].error.as_deref(), Some("EmptyCollection"));
    assert_eq!(records[1], ResponseRecord::ok(json!(2), None));
}

#[test]
fn test_validation_codes() {
    let dir = tempdir().unwrap();
    let d = dispatcher_in(dir.path());

    let records = process(
        &d,
        json!([
            {"id": 1, "object_type": "RList", "operation": "length"},
            {"id": 2, "object_type": "RQueue", "object_identifier": "Q", "operation": "length"},
            {"id": 3, "object_type": "RList", "object_identifier": "L1", "operation": "iter"}
        ]),
    );

    let codes: Vec<&str> = records.iter().filter_map(|r| r.error.as_deref()).collect();
    assert_eq!(
        codes,
        vec!["MalformedOperation", "UnknownObjectType", "OperationNotSupported"]
    );
}

#[test]
fn test_malformed_payload_yields_no_response() {
    let dir = tempdir().unwrap();
    let d = dispatcher_in(dir.path());

    assert!(d.process_payload("{not json").is_err());
    assert!(d.process_payload(r#"{"id": 1}"#).is_err());
    assert!(d.factory().is_empty());
}

#[test]
fn test_state_survives_restart() {
    let dir = tempdir().unwrap();
    {
        let d = dispatcher_in(dir.path());
        process(
            &d,
            json!([
                {"id": 1, "object_type": "RDict", "object_identifier": "D1", "operation": "setItem", "args": {"key": "k", "item": "v"}},
                {"id": 2, "object_type": "RSet", "object_identifier": "S1", "operation": "add", "args": {"item": "a"}},
                {"id": 3, "object_type": "RSet", "object_identifier": "S2", "operation": "add", "args": {"item": "b"}}
            ]),
        );
    }

    let d = dispatcher_in(dir.path());
    let records = process(
        &d,
        json!([
            {"id": 1, "object_type": "RDict", "object_identifier": "D1", "operation": "getItem", "args": {"key": "k"}},
            {"id": 2, "object_type": "RSet", "object_identifier": "S1", "operation": "contains", "args": {"item": "a"}},
            {"id": 3, "object_type": "RSet", "object_identifier": "S2", "operation": "length"}
        ]),
    );

    assert_eq!(records[0].result, Some(json!("v")));
    assert_eq!(records[1].result, Some(json!(true)));
    assert_eq!(records[2].result, Some(json!(1)));
}

#[test]
fn test_counter_counts_only_real_changes() {
    let dir = tempdir().unwrap();
    let d = dispatcher_in(dir.path());

    process(
        &d,
        json!([
            {"id": 1, "object_type": "RSet", "object_identifier": "S1", "operation": "add", "args": {"item": "a"}},
            {"id": 2, "object_type": "RSet", "object_identifier": "S1", "operation": "add", "args": {"item": "a"}},
            {"id": 3, "object_type": "RSet", "object_identifier": "S1", "operation": "add", "args": {"item": "b"}},
            {"id": 4, "object_type": "RSet", "object_identifier": "S1", "operation": "remove", "args": {"item": "zzz"}}
        ]),
    );

    let handle = d.factory().get(TypeName::RSet, Some("S1")).unwrap();
    assert_eq!(handle.with(|c| c.modification_count()).unwrap(), 2);
}

#[test]
fn test_dispatch_cancels_live_iterator() {
    let dir = tempdir().unwrap();
    let d = dispatcher_in(dir.path());
    process(
        &d,
        json!([
            {"id": 1, "object_type": "RList", "object_identifier": "L1", "operation": "append", "args": {"item": "a"}},
            {"id": 2, "object_type": "RList", "object_identifier": "L1", "operation": "append", "args": {"item": "b"}},
            {"id": 3, "object_type": "RList", "object_identifier": "L1", "operation": "append", "args": {"item": "c"}}
        ]),
    );

    let handle = d.factory().get(TypeName::RList, Some("L1")).unwrap();
    let mut iter = handle.with(|c| c.iter()).unwrap();
    assert_eq!(iter.next_step(), IterStep::Item("a".to_string()));

    process(
        &d,
        json!([{"id": 4, "object_type": "RList", "object_identifier": "L1", "operation": "pop"}]),
    );

    assert_eq!(iter.next_step(), IterStep::Cancelled);
    assert_eq!(iter.next_step(), IterStep::Cancelled);
}

#[test]
fn test_untouched_iterator_exhausts_after_n_items() {
    let dir = tempdir().unwrap();
    let d = dispatcher_in(dir.path());
    process(
        &d,
        json!([
            {"id": 1, "object_type": "RDict", "object_identifier": "D1", "operation": "setItem", "args": {"key": "a", "item": "1"}},
            {"id": 2, "object_type": "RDict", "object_identifier": "D1", "operation": "setItem", "args": {"key": "b", "item": "2"}}
        ]),
    );

    let handle = d.factory().get(TypeName::RDict, Some("D1")).unwrap();
    let items: Vec<String> = handle
        .with(|c| c.iter())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(items, vec!["a: 1", "b: 2"]);
}
