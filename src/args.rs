//! Dynamic argument helpers.
//!
//! Statement arguments are plain JSON values. Data-driven tests can
//! express an argument list as a JSON string: an array becomes one
//! argument per element, any other document becomes a single argument.

use crate::{Result, TxDoubleError};
use itertools::Itertools;
use serde_json::Value;

/// Parse a JSON string into an argument list.
///
/// # Examples
///
/// ```
/// use tx_double::args::parse_args_string;
///
/// let args = parse_args_string(r#"["alice", 1000, true]"#).unwrap();
/// assert_eq!(args.len(), 3);
///
/// let args = parse_args_string(r#"{"id": 7}"#).unwrap();
/// assert_eq!(args.len(), 1);
/// ```
pub fn parse_args_string(json_str: &str) -> Result<Vec<Value>> {
    if json_str.trim().is_empty() {
        return Err(TxDoubleError::InvalidArguments("empty argument string".into()).into());
    }
    let value: Value = serde_json::from_str(json_str)
        .map_err(|err| TxDoubleError::InvalidArguments(err.to_string()))?;
    Ok(match value {
        Value::Array(items) => items,
        other => vec![other],
    })
}

/// Render an argument list for diagnostics and the call log.
pub fn format_args(args: &[Value]) -> String {
    args.iter().map(|arg| arg.to_string()).join(", ")
}

/// Build an argument list from JSON-convertible expressions.
///
/// ```
/// use tx_double::args;
///
/// let args = args!["alice", 1000, true];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::__json!($arg)),*]
    };
}
