//! Configured behaviors: how often an expectation may fire and what it
//! returns when it does.
//!
//! Returns are positional slots, one `Vec<Value>` per call. Each mocked
//! method reads a fixed slot layout (an error slot carries a message
//! string or null). A `Handler` computes the slots from the observed
//! arguments instead of replaying fixed ones.

use crate::engine::matcher::{match_args, ArgMatcher};
use crate::engine::Method;
use itertools::Itertools;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// How many calls an expectation may absorb.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Times {
    /// No constraint; the expectation never stops matching.
    Any,
    /// Exactly `n` calls; the expectation goes dead once spent.
    Exactly(usize),
    /// At least `n` calls; keeps matching beyond the minimum.
    AtLeast(usize),
}

impl Times {
    fn allows(self, observed: usize) -> bool {
        match self {
            Times::Any | Times::AtLeast(_) => true,
            Times::Exactly(n) => observed < n,
        }
    }

    fn satisfied(self, observed: usize) -> bool {
        match self {
            Times::Any => true,
            Times::Exactly(n) => observed == n,
            Times::AtLeast(n) => observed >= n,
        }
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Times::Any => f.write_str("any number of times"),
            Times::Exactly(n) => write!(f, "exactly {n}"),
            Times::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Function stand-in computing return slots from the observed arguments.
pub type ReturnHandler = Arc<dyn Fn(&[Value]) -> Vec<Value> + Send + Sync>;

/// What a matched expectation hands back.
#[derive(Clone)]
pub enum ReturnPlan {
    /// Fixed positional return slots.
    Slots(Vec<Value>),
    /// A function stand-in invoked with the call's arguments.
    Handler(ReturnHandler),
}

impl ReturnPlan {
    pub fn produce(&self, args: &[Value]) -> Vec<Value> {
        match self {
            ReturnPlan::Slots(slots) => slots.clone(),
            ReturnPlan::Handler(f) => f(args),
        }
    }
}

impl fmt::Debug for ReturnPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnPlan::Slots(slots) => write!(f, "slots {slots:?}"),
            ReturnPlan::Handler(_) => f.write_str("<handler>"),
        }
    }
}

/// One configured behavior in the expectation table.
#[derive(Clone)]
pub struct Expectation {
    method: Method,
    matchers: Option<Vec<ArgMatcher>>,
    plan: ReturnPlan,
    times: Times,
    observed: usize,
}

impl Expectation {
    pub fn new(method: Method, plan: ReturnPlan) -> Self {
        Self {
            method,
            matchers: None,
            plan,
            times: Times::Any,
            observed: 0,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn times(&self) -> Times {
        self.times
    }

    pub fn observed(&self) -> usize {
        self.observed
    }

    pub(crate) fn set_matchers(&mut self, matchers: Vec<ArgMatcher>) {
        self.matchers = Some(matchers);
    }

    pub(crate) fn set_times(&mut self, times: Times) {
        self.times = times;
    }

    pub(crate) fn set_plan(&mut self, plan: ReturnPlan) {
        self.plan = plan;
    }

    /// Whether this expectation can still absorb a call at all.
    pub fn is_live(&self) -> bool {
        self.times.allows(self.observed)
    }

    /// Whether this expectation matches the given call right now.
    pub fn accepts(&self, method: Method, args: &[Value]) -> bool {
        self.method == method
            && self.is_live()
            && self
                .matchers
                .as_deref()
                .map_or(true, |matchers| match_args(matchers, args))
    }

    pub(crate) fn produce(&mut self, args: &[Value]) -> Vec<Value> {
        self.observed += 1;
        self.plan.produce(args)
    }

    /// Whether the call-count constraint has been met.
    pub fn is_satisfied(&self) -> bool {
        self.times.satisfied(self.observed)
    }

    /// One-line description for diagnostics.
    pub fn describe(&self) -> String {
        let args = match &self.matchers {
            None => "..".to_string(),
            Some(matchers) => matchers.iter().map(|m| format!("{m:?}")).join(", "),
        };
        format!(
            "{}({args}) expected {}, observed {}",
            self.method, self.times, self.observed
        )
    }
}
