//! # copad-exec
//!
//! Execution delegation for copad sessions.
//!
//! Nothing here runs code itself in any interesting sense: `javascript`
//! and `python` are handed to sandboxed WASI interpreter modules run
//! under wasmtime (the python module is lazily fetched from a CDN on
//! first use and shared for the process lifetime), while `go` and `java`
//! are shipped to the backend's execution service.
//!
//! Every path, including failures, is normalized to [`ExecOutcome`] so
//! callers never branch on error type.
//!
//! ## Example
//!
//! ```ignore
//! use copad_exec::Executor;
//!
//! let executor = Executor::new("http://localhost:8000");
//! let outcome = executor.execute("print(1)", "python").await;
//! match outcome.error {
//!     Some(error) => eprintln!("{error}"),
//!     None => println!("{}", outcome.output),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod executor;
mod service;
mod wasm;

pub use executor::Executor;
pub use service::ExecService;
pub use wasm::{ExecError, Interpreter, WasmInterpreter, JS_RUNTIME_URL, PYTHON_RUNTIME_URL};

use serde::{Deserialize, Serialize};

/// The uniform result shape for every execution path.
///
/// Exactly one of the two fields is meaningful: a failed execution has
/// empty `output` and a populated `error`. This mirrors the execution
/// service's response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOutcome {
    /// Captured output text (stdout for interpreters).
    pub output: String,
    /// Error message, if the execution failed.
    pub error: Option<String>,
}

impl ExecOutcome {
    /// A successful execution with the given output.
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    /// A failed execution. Output is always empty on failure.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            error: Some(error.into()),
        }
    }

    /// Whether the execution succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_has_empty_output() {
        let outcome = ExecOutcome::failure("boom");
        assert_eq!(outcome.output, "");
        assert_eq!(outcome.error.as_deref(), Some("boom"));
        assert!(!outcome.is_success());
    }

    #[test]
    fn outcome_matches_service_body_shape() {
        let outcome: ExecOutcome =
            serde_json::from_str(r#"{"output":"1\n","error":null}"#).unwrap();
        assert_eq!(outcome, ExecOutcome::success("1\n"));
    }
}
