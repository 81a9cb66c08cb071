// vim: tw=80
//! Sequences constrain the order in which setups fire.

use understudy::*;

fn run(mock: &Mock, signature: &str) -> Result<DispatchOutcome> {
    mock.dispatch(signature, &[], ResultKind::None)
}

#[test]
fn ok() {
    let seq = Sequence::new();
    let service = Mock::new("IService");
    service.setup("Initialize", vec![]).in_sequence(&seq);
    service.setup("Execute", vec![]).in_sequence(&seq);
    run(&service, "Initialize").unwrap();
    run(&service, "Execute").unwrap();
}

#[test]
fn out_of_order() {
    let seq = Sequence::new();
    let service = Mock::new("IService");
    service.setup("Initialize", vec![]).in_sequence(&seq);
    service.setup("Execute", vec![]).in_sequence(&seq);
    let e = run(&service, "Execute").unwrap_err();
    assert!(matches!(e,
        Error::SequenceViolation{expected: 0, actual: 1, ..}));
    assert!(e.to_string().starts_with("Method sequence violation"));
}

/// A violation doesn't advance the sequence, so the test may still complete
/// it in the right order.
#[test]
fn violation_does_not_advance() {
    let seq = Sequence::new();
    let service = Mock::new("IService");
    service.setup("Initialize", vec![]).in_sequence(&seq);
    service.setup("Execute", vec![]).in_sequence(&seq);
    run(&service, "Execute").unwrap_err();
    assert_eq!(0, seq.expected_step());
    run(&service, "Initialize").unwrap();
    run(&service, "Execute").unwrap();
}

#[test]
fn across_mocks() {
    let seq = Sequence::new();
    let db = Mock::new("IDatabase");
    let cache = Mock::new("ICache");
    db.setup("Open", vec![]).in_sequence(&seq);
    cache.setup("Warm", vec![]).in_sequence(&seq);
    db.setup("Close", vec![]).in_sequence(&seq);

    run(&db, "Open").unwrap();
    run(&db, "Close").unwrap_err();
    run(&cache, "Warm").unwrap();
    run(&db, "Close").unwrap();
    assert_eq!(3, seq.len());
}

#[test]
fn exhausted() {
    let seq = Sequence::new();
    let service = Mock::new("IService");
    service.setup("Initialize", vec![]).in_sequence(&seq);
    run(&service, "Initialize").unwrap();
    run(&service, "Initialize").unwrap_err();
}

#[test]
fn cyclic() {
    let seq = Sequence::cyclic();
    let conn = Mock::new("IConnection");
    conn.setup("Send", vec![]).in_sequence(&seq);
    conn.setup("Receive", vec![]).in_sequence(&seq);
    for _ in 0..3 {
        run(&conn, "Send").unwrap();
        run(&conn, "Receive").unwrap();
    }
    run(&conn, "Receive").unwrap_err();
}

/// Calls that select no sequenced setup are unaffected.
#[test]
fn unsequenced_calls() {
    let seq = Sequence::new();
    let service = Mock::new("IService");
    service.setup("Initialize", vec![]).in_sequence(&seq);
    service.setup("Execute", vec![]).in_sequence(&seq);
    run(&service, "Log").unwrap();
    run(&service, "Initialize").unwrap();
    run(&service, "Log").unwrap();
    run(&service, "Execute").unwrap();
}

/// Out-of-order calls are still recorded
#[test]
fn violation_is_recorded() {
    let seq = Sequence::new();
    let service = Mock::new("IService");
    service.setup("Initialize", vec![]).in_sequence(&seq);
    service.setup("Execute", vec![]).in_sequence(&seq);
    run(&service, "Execute").unwrap_err();
    service.verify("Execute", &[], Times::once()).unwrap();
}
