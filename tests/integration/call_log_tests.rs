//! Integration tests for the call log and call-log assertions

use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tx_double::{args, CallAssertions, Method, MockTx, Tx};

// ── Ordering and contents ───────────────────────────────────────────

#[test]
fn log_preserves_call_order() {
    let tx = MockTx::new();
    tx.expect_exec();
    tx.expect_select();
    tx.expect_commit();

    tx.exec("INSERT INTO t VALUES (?)", &args![1]).unwrap();
    let _: Vec<Value> = tx.select("SELECT * FROM t", &[]).unwrap();
    tx.commit().unwrap();

    let methods: Vec<Method> = tx.calls().iter().map(|c| c.method).collect();
    assert_eq!(methods, vec![Method::Exec, Method::Select, Method::Commit]);
}

#[test]
fn matched_calls_record_their_return_slots() {
    let tx = MockTx::new();
    tx.expect_rebind().rebound("SELECT $1");

    tx.rebind("SELECT ?");

    let calls = tx.calls();
    assert!(calls[0].matched);
    assert_eq!(calls[0].returned.as_deref(), Some(&[Value::String("SELECT $1".into())][..]));
}

#[test]
fn unmatched_call_is_still_recorded() {
    let tx = MockTx::new();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _ = tx.commit();
    }));
    assert!(outcome.is_err());

    let calls = tx.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::Commit);
    assert!(!calls[0].matched);
    assert!(calls[0].returned.is_none());
}

// ── Assertions ──────────────────────────────────────────────────────

#[test]
fn assert_called_with_sees_the_query_as_argument_zero() {
    let tx = MockTx::new();
    tx.expect_exec();

    tx.exec("UPDATE t SET v = ?", &args![9]).unwrap();

    CallAssertions::new(&tx).assert_called_with(Method::Exec, &args!["UPDATE t SET v = ?", 9]);
}

#[test]
#[should_panic(expected = "no exec call with arguments")]
fn assert_called_with_fails_on_different_arguments() {
    let tx = MockTx::new();
    tx.expect_exec();

    tx.exec("UPDATE t SET v = ?", &args![9]).unwrap();

    CallAssertions::new(&tx).assert_called_with(Method::Exec, &args!["UPDATE t SET v = ?", 10]);
}

#[test]
fn calls_are_counted_across_clones() {
    let tx = MockTx::new();
    tx.expect_rollback();

    let worker = tx.clone();
    worker.rollback().unwrap();
    tx.rollback().unwrap();

    let calls = CallAssertions::new(&tx);
    calls.assert_number_of_calls(Method::Rollback, 2);
    calls.assert_not_called(Method::Commit);
}
