//! Call-log assertions, for tests that verify interactions after the
//! fact instead of (or in addition to) call-count constraints.

use crate::args::format_args;
use crate::engine::Method;
use crate::mock::MockTx;
use serde_json::Value;

pub struct CallAssertions<'a> {
    mock: &'a MockTx,
}

impl<'a> CallAssertions<'a> {
    pub fn new(mock: &'a MockTx) -> Self {
        Self { mock }
    }

    /// Assert the method was called at least once.
    pub fn assert_called(&self, method: Method) {
        assert!(
            self.mock.calls_for(method) > 0,
            "expected at least one {method} call, saw none"
        );
    }

    /// Assert the method was never called.
    pub fn assert_not_called(&self, method: Method) {
        let calls = self.mock.calls_for(method);
        assert!(calls == 0, "expected no {method} calls, saw {calls}");
    }

    /// Assert the method was called exactly `expected` times.
    pub fn assert_number_of_calls(&self, method: Method, expected: usize) {
        let calls = self.mock.calls_for(method);
        assert!(
            calls == expected,
            "expected {expected} {method} call(s), saw {calls}"
        );
    }

    /// Assert some call to the method carried exactly these arguments.
    ///
    /// For `exec` and `select` the query is argument zero.
    pub fn assert_called_with(&self, method: Method, args: &[Value]) {
        let seen = self
            .mock
            .calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect::<Vec<_>>();
        let hit = seen.iter().any(|call| call.args == args);
        assert!(
            hit,
            "no {method} call with arguments [{}]; saw {} {method} call(s)",
            format_args(args),
            seen.len()
        );
    }
}
