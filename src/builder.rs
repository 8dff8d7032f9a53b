//! One-shot scenario builder for the common cases: configure the whole
//! double in a single chain, then `build()`.

use crate::mock::MockTx;
use crate::tx::ExecResult;
use serde_json::Value;

pub struct MockTxBuilder {
    mock: MockTx,
}

impl Default for MockTxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTxBuilder {
    pub fn new() -> Self {
        Self {
            mock: MockTx::new(),
        }
    }

    pub fn commit_ok(self) -> Self {
        self.mock.expect_commit();
        self
    }

    pub fn commit_err(self, message: &str) -> Self {
        self.mock.expect_commit().error(message);
        self
    }

    pub fn rollback_ok(self) -> Self {
        self.mock.expect_rollback();
        self
    }

    pub fn rollback_err(self, message: &str) -> Self {
        self.mock.expect_rollback().error(message);
        self
    }

    pub fn exec_result(self, query: &str, result: ExecResult) -> Self {
        self.mock.expect_exec().with_query(query).result(result);
        self
    }

    pub fn exec_err(self, query: &str, message: &str) -> Self {
        self.mock.expect_exec().with_query(query).error(message);
        self
    }

    pub fn select_rows(self, query: &str, rows: Value) -> Self {
        self.mock.expect_select().with_query(query).rows(rows);
        self
    }

    pub fn select_err(self, query: &str, message: &str) -> Self {
        self.mock.expect_select().with_query(query).error(message);
        self
    }

    pub fn rebind_passthrough(self) -> Self {
        self.mock.expect_rebind();
        self
    }

    pub fn rebind_to(self, query: &str, rebound: &str) -> Self {
        self.mock.expect_rebind().with_query(query).rebound(rebound);
        self
    }

    pub fn build(self) -> MockTx {
        self.mock
    }
}
