//! The doubled transaction interface.
//!
//! `Tx` mirrors the five-method surface of a SQL transaction handle:
//! commit, rollback, statement execution, row selection, and query
//! rebinding. Dynamic arguments are carried as `serde_json::Value` so a
//! single double can stand in for any statement shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A database transaction scope.
///
/// The real implementation would wrap a driver transaction; this crate
/// only ships [`MockTx`](crate::MockTx), a recorded double of this
/// trait for unit tests.
pub trait Tx {
    /// Commit the transaction.
    fn commit(&self) -> Result<(), TxError>;

    /// Roll the transaction back.
    fn rollback(&self) -> Result<(), TxError>;

    /// Execute a statement, returning its affected-row summary.
    fn exec(&self, query: &str, args: &[Value]) -> Result<ExecResult, TxError>;

    /// Run a query and deserialize every returned row into `T`.
    fn select<T: DeserializeOwned>(&self, query: &str, args: &[Value]) -> Result<Vec<T>, TxError>;

    /// Translate placeholder syntax for the target dialect.
    fn rebind(&self, query: &str) -> String;
}

/// Summary of an executed statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }

    pub fn with_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

/// Error surfaced by a transaction method.
///
/// The double performs no validation or recovery of its own: whatever
/// error a test configures comes back unmodified, so this is a plain
/// message carrier with no taxonomy.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TxError {
    message: String,
}

impl TxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for TxError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for TxError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
