//! Sandboxed interpreter runtimes under wasmtime.
//!
//! An interpreter is a WASI command module: it reads the program text
//! from stdin, writes program output to stdout, and diagnostics to
//! stderr. The module bytes are fetched from a remote URL the first
//! time the language is executed and reused for the process lifetime.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use wasmtime::{Engine, Linker, Module, Store};
use wasmtime_wasi::pipe::{MemoryInputPipe, MemoryOutputPipe};
use wasmtime_wasi::preview1::{self, WasiP1Ctx};
use wasmtime_wasi::{I32Exit, WasiCtxBuilder};

/// Default module URL for the javascript interpreter build.
///
/// Both URLs are overridable defaults; see [`WasmInterpreter::new`].
pub const JS_RUNTIME_URL: &str =
    "https://cdn.jsdelivr.net/wasm-interpreters/quickjs/quickjs.wasi.wasm";

/// Default module URL for the python interpreter build.
pub const PYTHON_RUNTIME_URL: &str =
    "https://cdn.jsdelivr.net/pyodide/v0.24.1/full/python.wasi.wasm";

/// Cap on captured stdout/stderr, matching the output panel's appetite.
const MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Errors from an interpreter run. Callers normalize these into
/// [`crate::ExecOutcome`]; nothing here is fatal.
#[derive(Debug, Clone, Error)]
pub enum ExecError {
    /// The interpreter module could not be fetched or compiled. The next
    /// execution retries the load.
    #[error("failed to load interpreter runtime: {0}")]
    Load(String),

    /// The program failed inside the sandbox.
    #[error("{0}")]
    Runtime(String),
}

/// An in-process language runtime.
///
/// The seam between the dispatcher and a concrete sandbox; tests plug in
/// stubs here.
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Run a program and return its captured output.
    async fn run(&self, code: &str) -> Result<String, ExecError>;
}

/// A WASI interpreter module fetched lazily from a remote URL.
///
/// The load is single-flight: concurrent executions before the first
/// load completes await the same in-flight fetch instead of triggering
/// parallel downloads. A failed load is surfaced as an error and retried
/// on the next execution.
pub struct WasmInterpreter {
    language: &'static str,
    module_url: String,
    http: reqwest::Client,
    engine: Engine,
    module: OnceCell<Module>,
}

impl WasmInterpreter {
    /// Create an interpreter that loads its module from `module_url`.
    pub fn new(language: &'static str, module_url: impl Into<String>) -> Self {
        Self {
            language,
            module_url: module_url.into(),
            http: reqwest::Client::new(),
            engine: Engine::default(),
            module: OnceCell::new(),
        }
    }

    /// Whether the module has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.module.initialized()
    }

    async fn load(&self) -> Result<Module, ExecError> {
        info!(language = self.language, url = %self.module_url, "fetching interpreter module");

        let response = self
            .http
            .get(&self.module_url)
            .send()
            .await
            .map_err(|e| ExecError::Load(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExecError::Load(format!("HTTP {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExecError::Load(e.to_string()))?;

        debug!(language = self.language, size = bytes.len(), "compiling interpreter module");
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || Module::new(&engine, &bytes))
            .await
            .map_err(|e| ExecError::Load(e.to_string()))?
            .map_err(|e| ExecError::Load(e.to_string()))
    }
}

#[async_trait]
impl Interpreter for WasmInterpreter {
    async fn run(&self, code: &str) -> Result<String, ExecError> {
        let module = self
            .module
            .get_or_try_init(|| self.load())
            .await?
            .clone();

        let engine = self.engine.clone();
        let code = code.to_string();
        tokio::task::spawn_blocking(move || run_module(&engine, &module, &code))
            .await
            .map_err(|e| ExecError::Runtime(e.to_string()))?
    }
}

/// Instantiate the module with the program on stdin and run `_start`.
fn run_module(engine: &Engine, module: &Module, code: &str) -> Result<String, ExecError> {
    let mut linker: Linker<WasiP1Ctx> = Linker::new(engine);
    preview1::add_to_linker_sync(&mut linker, |ctx| ctx)
        .map_err(|e| ExecError::Runtime(e.to_string()))?;

    let stdout = MemoryOutputPipe::new(MAX_OUTPUT_BYTES);
    let stderr = MemoryOutputPipe::new(MAX_OUTPUT_BYTES);
    let wasi = WasiCtxBuilder::new()
        .stdin(MemoryInputPipe::new(code.to_string()))
        .stdout(stdout.clone())
        .stderr(stderr.clone())
        .build_p1();

    let mut store = Store::new(engine, wasi);
    let result = (|| {
        let instance = linker.instantiate(&mut store, module)?;
        let start = instance.get_typed_func::<(), ()>(&mut store, "_start")?;
        start.call(&mut store, ())
    })();
    drop(store);

    let output = String::from_utf8_lossy(&stdout.contents()).into_owned();

    match result {
        Ok(()) => Ok(output),
        // A clean proc_exit(0) is a normal termination, not a trap.
        Err(e) if matches!(e.downcast_ref::<I32Exit>(), Some(I32Exit(0))) => Ok(output),
        Err(e) => {
            let diagnostics = String::from_utf8_lossy(&stderr.contents()).into_owned();
            if diagnostics.trim().is_empty() {
                Err(ExecError::Runtime(e.to_string()))
            } else {
                Err(ExecError::Runtime(diagnostics))
            }
        }
    }
}

/// Stock interpreters wired to the default module URLs.
pub(crate) fn default_runtimes() -> (Arc<dyn Interpreter>, Arc<dyn Interpreter>) {
    (
        Arc::new(WasmInterpreter::new("javascript", JS_RUNTIME_URL)),
        Arc::new(WasmInterpreter::new("python", PYTHON_RUNTIME_URL)),
    )
}
