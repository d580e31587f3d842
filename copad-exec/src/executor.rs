//! The execution dispatcher.

use std::sync::Arc;

use copad_types::Language;

use crate::service::ExecService;
use crate::wasm::{default_runtimes, ExecError, Interpreter};
use crate::ExecOutcome;

/// Dispatches execution requests by language tag.
///
/// Routing is fixed: `javascript` and `python` run in-process in their
/// sandboxed interpreters, `go` and `java` go to the remote service, and
/// anything else is rejected with a deterministic error. The outcome
/// shape is uniform across all five branches.
pub struct Executor {
    javascript: Arc<dyn Interpreter>,
    python: Arc<dyn Interpreter>,
    service: ExecService,
}

impl Executor {
    /// Create an executor with the stock interpreter runtimes and the
    /// execution service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let (javascript, python) = default_runtimes();
        Self {
            javascript,
            python,
            service: ExecService::new(base_url),
        }
    }

    /// Create an executor with explicit runtimes (for tests and
    /// embedders bringing their own sandboxes).
    pub fn with_runtimes(
        javascript: Arc<dyn Interpreter>,
        python: Arc<dyn Interpreter>,
        service: ExecService,
    ) -> Self {
        Self {
            javascript,
            python,
            service,
        }
    }

    /// Execute `code` under the language named by `language`.
    ///
    /// Takes the raw tag rather than a [`Language`] so that an unknown
    /// value surfaces as the documented `Unsupported language: <value>`
    /// outcome instead of being coerced to a default.
    pub async fn execute(&self, code: &str, language: &str) -> ExecOutcome {
        match Language::parse(language) {
            Some(Language::Javascript) => into_outcome(self.javascript.run(code).await),
            Some(Language::Python) => into_outcome(self.python.run(code).await),
            Some(lang @ (Language::Go | Language::Java)) => self.service.execute(code, lang).await,
            None => ExecOutcome::failure(format!("Unsupported language: {language}")),
        }
    }
}

fn into_outcome(result: Result<String, ExecError>) -> ExecOutcome {
    match result {
        Ok(output) => ExecOutcome::success(output),
        Err(e) => ExecOutcome::failure(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubInterpreter {
        result: Result<String, ExecError>,
        calls: AtomicU32,
    }

    impl StubInterpreter {
        fn ok(output: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(output.to_string()),
                calls: AtomicU32::new(0),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Err(ExecError::Runtime(message.to_string())),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Interpreter for StubInterpreter {
        async fn run(&self, _code: &str) -> Result<String, ExecError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn executor(js: Arc<StubInterpreter>, py: Arc<StubInterpreter>) -> Executor {
        Executor::with_runtimes(js, py, ExecService::new("http://127.0.0.1:1"))
    }

    #[tokio::test]
    async fn unsupported_language_is_deterministic() {
        let executor = executor(StubInterpreter::ok(""), StubInterpreter::ok(""));

        let outcome = executor.execute("whatever", "unsupported-lang").await;

        assert_eq!(
            outcome,
            ExecOutcome::failure("Unsupported language: unsupported-lang")
        );
    }

    #[tokio::test]
    async fn javascript_routes_to_js_interpreter() {
        let js = StubInterpreter::ok("hello\n");
        let py = StubInterpreter::ok("");
        let executor = executor(Arc::clone(&js), Arc::clone(&py));

        let outcome = executor.execute("console.log('hello')", "javascript").await;

        assert_eq!(outcome, ExecOutcome::success("hello\n"));
        assert_eq!(js.calls(), 1);
        assert_eq!(py.calls(), 0);
    }

    #[tokio::test]
    async fn python_routes_to_python_interpreter() {
        let js = StubInterpreter::ok("");
        let py = StubInterpreter::ok("1\n");
        let executor = executor(Arc::clone(&js), Arc::clone(&py));

        let outcome = executor.execute("print(1)", "python").await;

        assert_eq!(outcome, ExecOutcome::success("1\n"));
        assert_eq!(py.calls(), 1);
        assert_eq!(js.calls(), 0);
    }

    #[tokio::test]
    async fn interpreter_failure_is_normalized() {
        let js = StubInterpreter::failing("ReferenceError: x is not defined");
        let executor = executor(js, StubInterpreter::ok(""));

        let outcome = executor.execute("x", "javascript").await;

        assert_eq!(
            outcome,
            ExecOutcome::failure("ReferenceError: x is not defined")
        );
    }

    #[tokio::test]
    async fn go_routes_to_the_remote_service() {
        // The stub service URL is unreachable; the point is that neither
        // interpreter is consulted and the failure is still an outcome.
        let js = StubInterpreter::ok("");
        let py = StubInterpreter::ok("");
        let executor = executor(Arc::clone(&js), Arc::clone(&py));

        let outcome = executor.execute("package main", "go").await;

        assert!(!outcome.is_success());
        assert_eq!(js.calls() + py.calls(), 0);
    }

    #[tokio::test]
    async fn case_sensitive_tags_are_unsupported() {
        let executor = executor(StubInterpreter::ok(""), StubInterpreter::ok(""));

        let outcome = executor.execute("", "Python").await;

        assert_eq!(outcome, ExecOutcome::failure("Unsupported language: Python"));
    }
}
