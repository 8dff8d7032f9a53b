//! `MockTx`: the recorded double of [`Tx`].
//!
//! Every call is forwarded to a shared [`MockCore`]: the arguments are
//! appended to the call log, the first live expectation that accepts
//! them produces the configured return slots, and the slots are decoded
//! back into the method's return type. Slot layouts:
//!
//! | method   | slot 0                      | slot 1        |
//! |----------|-----------------------------|---------------|
//! | commit   | error message or null       | —             |
//! | rollback | error message or null       | —             |
//! | exec     | `ExecResult` object or null | error or null |
//! | select   | array of row objects        | error or null |
//! | rebind   | rebound query string        | —             |

use crate::engine::expectation::{Expectation, ReturnPlan, Times};
use crate::engine::matcher::ArgMatcher;
use crate::engine::recorder::{CallRecord, MockCore};
use crate::engine::Method;
use crate::tx::{ExecResult, Tx, TxError};
use crate::TxDoubleError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded test double for the [`Tx`] trait.
///
/// Clones share one expectation table and call log, so a test can hand
/// the double to the code under test and keep a handle for assertions.
/// Calls execute synchronously on the caller's thread.
///
/// # Panics
///
/// A call no expectation accepts, or a configured slot that does not
/// decode into the method's return type, panics with a diagnostic
/// listing the live expectations. Both are test bugs; the trait
/// signature has no channel for infrastructure errors.
#[derive(Clone, Default)]
pub struct MockTx {
    core: Arc<Mutex<MockCore>>,
}

impl MockTx {
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoned guards still hold a usable log; a panic mid-call on one
    // clone must not hide the record from the asserting test.
    fn lock(&self) -> MutexGuard<'_, MockCore> {
        match self.core.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn register(&self, method: Method, plan: ReturnPlan) -> Handle {
        let index = self.lock().add(Expectation::new(method, plan));
        Handle {
            core: Arc::clone(&self.core),
            index,
        }
    }

    /// Expect a `commit` call. Succeeds unless refined.
    pub fn expect_commit(&self) -> ExpectVoid {
        ExpectVoid {
            inner: self.register(Method::Commit, ReturnPlan::Slots(vec![Value::Null])),
        }
    }

    /// Expect a `rollback` call. Succeeds unless refined.
    pub fn expect_rollback(&self) -> ExpectVoid {
        ExpectVoid {
            inner: self.register(Method::Rollback, ReturnPlan::Slots(vec![Value::Null])),
        }
    }

    /// Expect an `exec` call. Returns `ExecResult::default()` unless refined.
    pub fn expect_exec(&self) -> ExpectExec {
        ExpectExec {
            inner: self.register(
                Method::Exec,
                ReturnPlan::Slots(vec![json!(ExecResult::default()), Value::Null]),
            ),
        }
    }

    /// Expect a `select` call. Returns no rows unless refined.
    pub fn expect_select(&self) -> ExpectSelect {
        ExpectSelect {
            inner: self.register(
                Method::Select,
                ReturnPlan::Slots(vec![Value::Array(Vec::new()), Value::Null]),
            ),
        }
    }

    /// Expect a `rebind` call. Echoes the query unless refined.
    pub fn expect_rebind(&self) -> ExpectRebind {
        let echo: ReturnPlan = ReturnPlan::Handler(Arc::new(|args: &[Value]| {
            vec![args.first().cloned().unwrap_or(Value::Null)]
        }));
        ExpectRebind {
            inner: self.register(Method::Rebind, echo),
        }
    }

    /// Snapshot of the call log, in call order.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.lock().calls().to_vec()
    }

    /// Number of recorded calls to one method, matched or not.
    pub fn calls_for(&self, method: Method) -> usize {
        self.lock().calls_for(method)
    }

    /// Check every call-count constraint.
    pub fn verify(&self) -> crate::Result<()> {
        self.lock().verify()
    }

    /// Panic listing every unmet expectation.
    pub fn assert_expectations(&self) {
        if let Err(err) = self.verify() {
            panic!("{err}");
        }
    }

    fn dispatch(&self, method: Method, args: Vec<Value>) -> Vec<Value> {
        let outcome = {
            let mut core = self.lock();
            core.dispatch(method, &args)
        };
        match outcome {
            Ok(slots) => slots,
            Err(err) => panic!("{err}"),
        }
    }
}

// The query is prepended to the recorded argument list, so matchers see
// it as argument zero.
fn prepend_query(query: &str, args: &[Value]) -> Vec<Value> {
    let mut call = Vec::with_capacity(args.len() + 1);
    call.push(Value::String(query.to_owned()));
    call.extend_from_slice(args);
    call
}

fn error_value(err: Option<TxError>) -> Value {
    match err {
        Some(err) => Value::String(err.message().to_owned()),
        None => Value::Null,
    }
}

fn error_slot(slots: &[Value], index: usize, method: Method) -> Result<(), TxError> {
    match slots.get(index) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(message)) => Err(TxError::new(message)),
        Some(other) => panic!(
            "{}",
            TxDoubleError::InvalidReturnValue(format!(
                "{method} slot {index} should be an error message or null, got {other}"
            ))
        ),
    }
}

impl Tx for MockTx {
    fn commit(&self) -> Result<(), TxError> {
        let slots = self.dispatch(Method::Commit, Vec::new());
        error_slot(&slots, 0, Method::Commit)
    }

    fn rollback(&self) -> Result<(), TxError> {
        let slots = self.dispatch(Method::Rollback, Vec::new());
        error_slot(&slots, 0, Method::Rollback)
    }

    fn exec(&self, query: &str, args: &[Value]) -> Result<ExecResult, TxError> {
        let slots = self.dispatch(Method::Exec, prepend_query(query, args));
        error_slot(&slots, 1, Method::Exec)?;
        match slots.first() {
            None | Some(Value::Null) => Ok(ExecResult::default()),
            Some(value) => match serde_json::from_value::<ExecResult>(value.clone()) {
                Ok(result) => Ok(result),
                Err(err) => panic!(
                    "{}",
                    TxDoubleError::InvalidReturnValue(format!(
                        "exec slot 0 is not an ExecResult: {err}"
                    ))
                ),
            },
        }
    }

    fn select<T: DeserializeOwned>(&self, query: &str, args: &[Value]) -> Result<Vec<T>, TxError> {
        let slots = self.dispatch(Method::Select, prepend_query(query, args));
        error_slot(&slots, 1, Method::Select)?;
        match slots.first() {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => match serde_json::from_value::<Vec<T>>(value.clone()) {
                Ok(rows) => Ok(rows),
                Err(err) => panic!(
                    "{}",
                    TxDoubleError::InvalidReturnValue(format!(
                        "select slot 0 does not deserialize into the requested row type: {err}"
                    ))
                ),
            },
        }
    }

    fn rebind(&self, query: &str) -> String {
        let slots = self.dispatch(Method::Rebind, vec![Value::String(query.to_owned())]);
        match slots.first() {
            Some(Value::String(rebound)) => rebound.clone(),
            other => panic!(
                "{}",
                TxDoubleError::InvalidReturnValue(format!(
                    "rebind slot 0 should be a query string, got {other:?}"
                ))
            ),
        }
    }
}

#[derive(Clone)]
struct Handle {
    core: Arc<Mutex<MockCore>>,
    index: usize,
}

impl Handle {
    fn lock(&self) -> MutexGuard<'_, MockCore> {
        match self.core.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn with(&self, matchers: Vec<ArgMatcher>) {
        self.lock().expectation_mut(self.index).set_matchers(matchers);
    }

    fn times(&self, times: Times) {
        self.lock().expectation_mut(self.index).set_times(times);
    }

    fn plan(&self, plan: ReturnPlan) {
        self.lock().expectation_mut(self.index).set_plan(plan);
    }
}

/// Expectation handle for `commit` and `rollback`.
pub struct ExpectVoid {
    inner: Handle,
}

impl ExpectVoid {
    pub fn times(self, n: usize) -> Self {
        self.inner.times(Times::Exactly(n));
        self
    }

    pub fn once(self) -> Self {
        self.times(1)
    }

    pub fn at_least(self, n: usize) -> Self {
        self.inner.times(Times::AtLeast(n));
        self
    }

    /// Succeed (the default, spelled out).
    pub fn ok(self) -> Self {
        self.inner.plan(ReturnPlan::Slots(vec![Value::Null]));
        self
    }

    /// Fail with the given error.
    pub fn error(self, err: impl Into<TxError>) -> Self {
        self.inner
            .plan(ReturnPlan::Slots(vec![error_value(Some(err.into()))]));
        self
    }

    /// Compute the outcome from the observed arguments.
    pub fn returning<F>(self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<(), TxError> + Send + Sync + 'static,
    {
        self.inner.plan(ReturnPlan::Handler(Arc::new(move |args| {
            vec![error_value(f(args).err())]
        })));
        self
    }
}

/// Expectation handle for `exec`.
pub struct ExpectExec {
    inner: Handle,
}

impl ExpectExec {
    /// Match the full argument list, query included, positionally.
    pub fn with(self, matchers: Vec<ArgMatcher>) -> Self {
        self.inner.with(matchers);
        self
    }

    /// Match this exact query with any statement arguments.
    pub fn with_query(self, query: &str) -> Self {
        self.with(vec![ArgMatcher::eq(query), ArgMatcher::Rest])
    }

    pub fn times(self, n: usize) -> Self {
        self.inner.times(Times::Exactly(n));
        self
    }

    pub fn once(self) -> Self {
        self.times(1)
    }

    pub fn at_least(self, n: usize) -> Self {
        self.inner.times(Times::AtLeast(n));
        self
    }

    /// Return the given execution summary.
    pub fn result(self, result: ExecResult) -> Self {
        self.inner
            .plan(ReturnPlan::Slots(vec![json!(result), Value::Null]));
        self
    }

    /// Fail with the given error.
    pub fn error(self, err: impl Into<TxError>) -> Self {
        self.inner.plan(ReturnPlan::Slots(vec![
            Value::Null,
            error_value(Some(err.into())),
        ]));
        self
    }

    /// Compute the outcome from the observed arguments.
    pub fn returning<F>(self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<ExecResult, TxError> + Send + Sync + 'static,
    {
        self.inner
            .plan(ReturnPlan::Handler(Arc::new(move |args| match f(args) {
                Ok(result) => vec![json!(result), Value::Null],
                Err(err) => vec![Value::Null, error_value(Some(err))],
            })));
        self
    }
}

/// Expectation handle for `select`.
pub struct ExpectSelect {
    inner: Handle,
}

impl ExpectSelect {
    /// Match the full argument list, query included, positionally.
    pub fn with(self, matchers: Vec<ArgMatcher>) -> Self {
        self.inner.with(matchers);
        self
    }

    /// Match this exact query with any statement arguments.
    pub fn with_query(self, query: &str) -> Self {
        self.with(vec![ArgMatcher::eq(query), ArgMatcher::Rest])
    }

    pub fn times(self, n: usize) -> Self {
        self.inner.times(Times::Exactly(n));
        self
    }

    pub fn once(self) -> Self {
        self.times(1)
    }

    pub fn at_least(self, n: usize) -> Self {
        self.inner.times(Times::AtLeast(n));
        self
    }

    /// Return the given JSON rows.
    pub fn rows(self, rows: Value) -> Self {
        self.inner.plan(ReturnPlan::Slots(vec![rows, Value::Null]));
        self
    }

    /// Return the given items, serialized as rows.
    ///
    /// # Panics
    ///
    /// Panics if the items are not JSON-serializable.
    pub fn items<T: Serialize>(self, items: &[T]) -> Self {
        match serde_json::to_value(items) {
            Ok(rows) => self.rows(rows),
            Err(err) => panic!(
                "{}",
                TxDoubleError::InvalidReturnValue(format!(
                    "select rows are not serializable: {err}"
                ))
            ),
        }
    }

    /// Fail with the given error.
    pub fn error(self, err: impl Into<TxError>) -> Self {
        self.inner.plan(ReturnPlan::Slots(vec![
            Value::Null,
            error_value(Some(err.into())),
        ]));
        self
    }

    /// Compute the rows from the observed arguments.
    pub fn returning<F>(self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, TxError> + Send + Sync + 'static,
    {
        self.inner
            .plan(ReturnPlan::Handler(Arc::new(move |args| match f(args) {
                Ok(rows) => vec![rows, Value::Null],
                Err(err) => vec![Value::Null, error_value(Some(err))],
            })));
        self
    }
}

/// Expectation handle for `rebind`.
pub struct ExpectRebind {
    inner: Handle,
}

impl ExpectRebind {
    /// Match this exact query.
    pub fn with_query(self, query: &str) -> Self {
        self.inner.with(vec![ArgMatcher::eq(query)]);
        self
    }

    pub fn times(self, n: usize) -> Self {
        self.inner.times(Times::Exactly(n));
        self
    }

    pub fn once(self) -> Self {
        self.times(1)
    }

    pub fn at_least(self, n: usize) -> Self {
        self.inner.times(Times::AtLeast(n));
        self
    }

    /// Return this rebound query instead of echoing.
    pub fn rebound(self, query: &str) -> Self {
        self.inner
            .plan(ReturnPlan::Slots(vec![Value::String(query.to_owned())]));
        self
    }

    /// Compute the rebound query from the original.
    pub fn returning<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.inner.plan(ReturnPlan::Handler(Arc::new(move |args| {
            let query = args.first().and_then(Value::as_str).unwrap_or_default();
            vec![Value::String(f(query))]
        })));
        self
    }
}
