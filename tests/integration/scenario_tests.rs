//! End-to-end scenarios: a unit of work written against the `Tx` trait,
//! exercised with a builder-configured double.

use serde_json::json;
use tx_double::{args, CallAssertions, ExecResult, Method, MockTxBuilder, Tx, TxError};

const DEBIT: &str = "UPDATE accounts SET balance = balance - $1 WHERE id = $2";
const CREDIT: &str = "UPDATE accounts SET balance = balance + $1 WHERE id = $2";

// Representative code under test: moves money inside one transaction,
// rolling back if either statement fails.
fn transfer(tx: &impl Tx, from: i64, to: i64, amount: i64) -> Result<(), TxError> {
    let debit = tx.rebind("UPDATE accounts SET balance = balance - ? WHERE id = ?");
    let credit = tx.rebind("UPDATE accounts SET balance = balance + ? WHERE id = ?");

    let outcome = tx
        .exec(&debit, &args![amount, from])
        .and_then(|_| tx.exec(&credit, &args![amount, to]));
    match outcome {
        Ok(_) => tx.commit(),
        Err(err) => {
            tx.rollback()?;
            Err(err)
        }
    }
}

#[test]
fn transfer_commits_when_both_statements_succeed() {
    let tx = MockTxBuilder::new()
        .rebind_to("UPDATE accounts SET balance = balance - ? WHERE id = ?", DEBIT)
        .rebind_to("UPDATE accounts SET balance = balance + ? WHERE id = ?", CREDIT)
        .exec_result(DEBIT, ExecResult::new(1))
        .exec_result(CREDIT, ExecResult::new(1))
        .commit_ok()
        .build();

    transfer(&tx, 1, 2, 100).unwrap();

    let calls = CallAssertions::new(&tx);
    calls.assert_number_of_calls(Method::Exec, 2);
    calls.assert_called(Method::Commit);
    calls.assert_not_called(Method::Rollback);
    calls.assert_called_with(Method::Exec, &args![DEBIT, 100, 1]);
}

#[test]
fn transfer_rolls_back_when_the_credit_fails() {
    let tx = MockTxBuilder::new()
        .rebind_passthrough()
        .exec_result("UPDATE accounts SET balance = balance - ? WHERE id = ?", ExecResult::new(1))
        .exec_err("UPDATE accounts SET balance = balance + ? WHERE id = ?", "account closed")
        .rollback_ok()
        .build();

    let err = transfer(&tx, 1, 2, 100).unwrap_err();
    assert_eq!(err.message(), "account closed");

    let calls = CallAssertions::new(&tx);
    calls.assert_called(Method::Rollback);
    calls.assert_not_called(Method::Commit);
}

#[test]
fn reporting_code_reads_configured_rows() {
    #[derive(Debug, serde::Deserialize)]
    struct BalanceRow {
        id: i64,
        balance: i64,
    }

    let tx = MockTxBuilder::new()
        .select_rows(
            "SELECT id, balance FROM accounts WHERE balance < ?",
            json!([{"id": 4, "balance": -20}]),
        )
        .build();

    let overdrawn: Vec<BalanceRow> = tx
        .select("SELECT id, balance FROM accounts WHERE balance < ?", &args![0])
        .unwrap();

    assert_eq!(overdrawn.len(), 1);
    assert_eq!(overdrawn[0].id, 4);
    assert_eq!(overdrawn[0].balance, -20);
}
