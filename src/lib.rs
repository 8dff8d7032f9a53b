pub mod args;
pub mod assertions;
pub mod builder;
pub mod engine;
pub mod logging;
pub mod mock;
pub mod tx;
use miette::Diagnostic;

pub use assertions::CallAssertions;
pub use builder::MockTxBuilder;
pub use engine::matcher::{ArgMatcher, ValueKind};
pub use engine::Method;
pub use mock::MockTx;
pub use tx::{ExecResult, Tx, TxError};

#[doc(hidden)]
pub use serde_json::json as __json;

/// Result type alias for the double's own infrastructure errors
pub type Result<T> = miette::Result<T>;

/// Error types for the transaction double
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum TxDoubleError {
    #[error("Unexpected call: {0}")]
    #[diagnostic(
        code(tx_double::unexpected_call),
        help("Register an expectation for this method before exercising the code under test, or widen an existing expectation's argument matchers.")
    )]
    UnexpectedCall(String),

    #[error("Invalid return value: {0}")]
    #[diagnostic(
        code(tx_double::invalid_return_value),
        help("Check the expectation that produced this slot. Slot layouts per method are documented on MockTx.")
    )]
    InvalidReturnValue(String),

    #[error("Unmet expectations:\n  {0}")]
    #[diagnostic(
        code(tx_double::unmet_expectations),
        help("Every expectation with a call-count constraint must be satisfied before assert_expectations. Drop the constraint or exercise the call.")
    )]
    UnmetExpectations(String),

    #[error("Invalid arguments: {0}")]
    #[diagnostic(
        code(tx_double::invalid_arguments),
        help("Argument strings must be valid JSON. An array becomes one argument per element; any other document becomes a single argument.")
    )]
    InvalidArguments(String),
}
