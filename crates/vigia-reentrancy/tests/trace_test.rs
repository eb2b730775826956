use serde_json::json;
use vigia_core::{utils, Error};
use vigia_reentrancy::{parse_transaction_traces, validate_preorder, CallTraceEvent, TracePath};

const TOKEN: &str = "0x00000000000000000000000000000000000000a1";
const POOL: &str = "0x00000000000000000000000000000000000000b2";
const CALLER: &str = "0x00000000000000000000000000000000000000ee";

fn call_row(path: &[usize], to: &str, input: &str) -> serde_json::Value {
    json!({
        "action": {
            "callType": "call",
            "from": CALLER,
            "gas": "0x2dc6c0",
            "input": input,
            "to": to,
            "value": "0x0"
        },
        "result": { "gasUsed": "0x5208", "output": "0x" },
        "subtraces": 0,
        "traceAddress": path,
        "type": "call"
    })
}

fn create_row(path: &[usize]) -> serde_json::Value {
    json!({
        "action": {
            "from": CALLER,
            "gas": "0x2dc6c0",
            "init": "0x6080604052",
            "value": "0x0"
        },
        "result": { "address": TOKEN, "code": "0x6080", "gasUsed": "0x5208" },
        "subtraces": 0,
        "traceAddress": path,
        "type": "create"
    })
}

fn raw(rows: Vec<serde_json::Value>) -> Vec<u8> {
    serde_json::to_vec(&rows).unwrap()
}

#[test]
fn test_parse_valid_trace() {
    let bytes = raw(vec![
        call_row(&[], POOL, "0xa9059cbb"),
        call_row(&[0], TOKEN, "0x"),
        call_row(&[0, 0], POOL, "0xaabbccdd"),
        call_row(&[1], TOKEN, "0x70a08231"),
    ]);

    let events = parse_transaction_traces(&bytes).unwrap();
    assert_eq!(events.len(), 4);

    assert_eq!(events[0].path, TracePath::new(vec![]));
    assert_eq!(events[0].target, utils::hex_to_address(POOL).unwrap());
    assert_eq!(events[0].selector(), Some([0xa9, 0x05, 0x9c, 0xbb]));

    assert_eq!(events[1].path, TracePath::new(vec![0]));
    assert!(events[1].input.is_empty());
    assert_eq!(events[1].selector(), None);

    assert_eq!(events[2].path, TracePath::new(vec![0, 0]));
    assert_eq!(events[2].selector(), Some([0xaa, 0xbb, 0xcc, 0xdd]));

    assert_eq!(events[3].path, TracePath::new(vec![1]));
}

#[test]
fn test_parse_create_row_keeps_position() {
    let bytes = raw(vec![
        call_row(&[], POOL, "0x"),
        create_row(&[0]),
        call_row(&[1], POOL, "0xaabbccdd"),
    ]);

    let events = parse_transaction_traces(&bytes).unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[1].target, ethereum_types::Address::zero());
    assert!(events[1].input.is_empty());
    assert_eq!(events[1].path, TracePath::new(vec![0]));
}

#[test]
fn test_depth_jump_is_rejected() {
    let bytes = raw(vec![call_row(&[], POOL, "0x"), call_row(&[0, 0], TOKEN, "0x")]);

    let result = parse_transaction_traces(&bytes);
    match result {
        Err(Error::StructuralTraceError { index, .. }) => assert_eq!(index, 1),
        other => panic!("esperava StructuralTraceError, obteve {:?}", other),
    }
}

#[test]
fn test_prefix_break_is_rejected() {
    let bytes = raw(vec![
        call_row(&[], POOL, "0x"),
        call_row(&[0], TOKEN, "0x"),
        call_row(&[1, 0], TOKEN, "0x"),
    ]);

    let result = parse_transaction_traces(&bytes);
    match result {
        Err(Error::StructuralTraceError { index, .. }) => assert_eq!(index, 2),
        other => panic!("esperava StructuralTraceError, obteve {:?}", other),
    }
}

#[test]
fn test_trace_below_root_is_accepted() {
    let bytes = raw(vec![
        call_row(&[1, 0], POOL, "0x"),
        call_row(&[1, 0, 0], TOKEN, "0x"),
        call_row(&[1, 1], TOKEN, "0x"),
    ]);

    let events = parse_transaction_traces(&bytes).unwrap();
    assert_eq!(events.len(), 3);
}

#[test]
fn test_malformed_json_is_decode_error() {
    assert!(matches!(
        parse_transaction_traces(b"isso nao e json"),
        Err(Error::DecodeError(_)),
    ));
}

#[test]
fn test_invalid_address_is_decode_error() {
    let bytes = raw(vec![call_row(&[], "0x123", "0x")]);
    assert!(matches!(parse_transaction_traces(&bytes), Err(Error::DecodeError(_))));
}

#[test]
fn test_validate_preorder_direct() {
    let pool = utils::hex_to_address(POOL).unwrap();
    let ok = vec![
        CallTraceEvent::new(TracePath::new(vec![]), pool, Vec::new()),
        CallTraceEvent::new(TracePath::new(vec![0]), pool, Vec::new()),
        CallTraceEvent::new(TracePath::new(vec![0, 0]), pool, Vec::new()),
        CallTraceEvent::new(TracePath::new(vec![1]), pool, Vec::new()),
    ];
    assert!(validate_preorder(&ok).is_ok());
    assert!(validate_preorder(&[]).is_ok());

    let jump = vec![
        CallTraceEvent::new(TracePath::new(vec![]), pool, Vec::new()),
        CallTraceEvent::new(TracePath::new(vec![0]), pool, Vec::new()),
        CallTraceEvent::new(TracePath::new(vec![0, 0, 0]), pool, Vec::new()),
    ];
    assert!(matches!(
        validate_preorder(&jump),
        Err(Error::StructuralTraceError { index: 2, .. }),
    ));
}
