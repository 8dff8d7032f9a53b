//! The call recorder backing a double: an ordered expectation table
//! plus a log of every call seen, matched or not.

use crate::args::format_args;
use crate::engine::expectation::Expectation;
use crate::engine::Method;
use crate::{logging, Result, TxDoubleError};
use itertools::Itertools;
use serde_json::Value;

/// One observed call, appended to the log on every dispatch.
#[derive(Clone, Debug)]
pub struct CallRecord {
    pub method: Method,
    pub args: Vec<Value>,
    pub matched: bool,
    pub returned: Option<Vec<Value>>,
}

/// Expectation table and call log shared by a double.
#[derive(Default)]
pub struct MockCore {
    expectations: Vec<Expectation>,
    calls: Vec<CallRecord>,
}

impl MockCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an expectation, returning its table index.
    pub fn add(&mut self, expectation: Expectation) -> usize {
        logging::log_expectation_registered(
            expectation.method().name(),
            &expectation.times().to_string(),
        );
        self.expectations.push(expectation);
        self.expectations.len() - 1
    }

    pub(crate) fn expectation_mut(&mut self, index: usize) -> &mut Expectation {
        &mut self.expectations[index]
    }

    /// Record a call and yield the configured return slots.
    ///
    /// Expectations are tried in registration order; the first live one
    /// whose matchers accept the arguments wins. An unmatched call is
    /// still logged before the error is surfaced.
    pub fn dispatch(&mut self, method: Method, args: &[Value]) -> Result<Vec<Value>> {
        let hit = self
            .expectations
            .iter()
            .position(|exp| exp.accepts(method, args));

        match hit {
            Some(index) => {
                let slots = self.expectations[index].produce(args);
                logging::log_call_recorded(method.name(), args.len(), true);
                self.calls.push(CallRecord {
                    method,
                    args: args.to_vec(),
                    matched: true,
                    returned: Some(slots.clone()),
                });
                Ok(slots)
            }
            None => {
                logging::log_unexpected_call(method.name(), &format_args(args));
                self.calls.push(CallRecord {
                    method,
                    args: args.to_vec(),
                    matched: false,
                    returned: None,
                });
                let configured = self
                    .expectations
                    .iter()
                    .filter(|exp| exp.method() == method)
                    .map(|exp| exp.describe())
                    .join("\n  ");
                let detail = if configured.is_empty() {
                    format!(
                        "{method}({}); no expectations configured for {method}",
                        format_args(args)
                    )
                } else {
                    format!(
                        "{method}({})\nLive expectations for {method}:\n  {configured}",
                        format_args(args)
                    )
                };
                Err(TxDoubleError::UnexpectedCall(detail).into())
            }
        }
    }

    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    pub fn calls_for(&self, method: Method) -> usize {
        self.calls.iter().filter(|c| c.method == method).count()
    }

    /// Check every call-count constraint.
    pub fn verify(&self) -> Result<()> {
        let unmet = self
            .expectations
            .iter()
            .filter(|exp| !exp.is_satisfied())
            .collect::<Vec<_>>();
        if unmet.is_empty() {
            return Ok(());
        }
        logging::log_verification_failed(unmet.len());
        let detail = unmet.iter().map(|exp| exp.describe()).join("\n  ");
        Err(TxDoubleError::UnmetExpectations(detail).into())
    }
}
