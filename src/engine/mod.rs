//! The recorded-mock engine: expectation table, argument matchers, and
//! the call recorder the double dispatches through.

pub mod expectation;
pub mod matcher;
pub mod recorder;

use std::fmt;

/// The five methods of the doubled transaction interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Commit,
    Rollback,
    Exec,
    Select,
    Rebind,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Method::Commit => "commit",
            Method::Rollback => "rollback",
            Method::Exec => "exec",
            Method::Select => "select",
            Method::Rebind => "rebind",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
