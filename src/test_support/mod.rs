//! Test doubles for extforge unit tests.
//!
//! The external tools (pkg-config, msgfmt) sit behind traits; the fakes
//! here record how they were called so tests can assert on invocations
//! without those tools installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use extforge::test_support::{RecordingCompiler, ScriptedQuery};
//!
//! let query = ScriptedQuery::new().with(QueryMode::Cflags, "-I/usr/include/glib-2.0");
//! let compiler = RecordingCompiler::new();
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use anyhow::{bail, Result};

use crate::builder::catalog::CatalogCompiler;
use crate::builder::pkg_config::{FlagQuery, QueryMode};

/// Canned pkg-config responses, keyed by mode.
///
/// Unscripted modes answer with empty output. Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedQuery {
    responses: HashMap<&'static str, Result<String, String>>,
    calls: Arc<Mutex<Vec<(QueryMode, Vec<String>)>>>,
}

impl ScriptedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `mode` with `stdout`.
    pub fn with(mut self, mode: QueryMode, stdout: &str) -> Self {
        self.responses.insert(mode.flag(), Ok(stdout.to_string()));
        self
    }

    /// Fail `mode` with `message`.
    pub fn failing(mut self, mode: QueryMode, message: &str) -> Self {
        self.responses.insert(mode.flag(), Err(message.to_string()));
        self
    }

    /// Every query made so far.
    pub fn calls(&self) -> Vec<(QueryMode, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl FlagQuery for ScriptedQuery {
    fn query(&self, mode: QueryMode, packages: &[String]) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((mode, packages.to_vec()));
        match self.responses.get(mode.flag()) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(message)) => bail!("{}", message),
            None => Ok(String::new()),
        }
    }
}

/// Catalog compiler that writes a placeholder target and records calls.
#[derive(Debug, Clone)]
pub struct RecordingCompiler {
    produce_output: bool,
    calls: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
}

impl RecordingCompiler {
    pub fn new() -> Self {
        RecordingCompiler {
            produce_output: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report success without creating the target.
    pub fn producing_nothing(mut self) -> Self {
        self.produce_output = false;
        self
    }

    /// Every (source, target) pair compiled so far.
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for RecordingCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCompiler for RecordingCompiler {
    fn compile(&self, source: &Path, target: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), target.to_path_buf()));
        if self.produce_output {
            std::fs::write(target, b"\xde\x12\x04\x95")?;
        }
        Ok(())
    }

    fn describe(&self, source: &Path, target: &Path) -> String {
        format!("fake-msgfmt {} -o {}", source.display(), target.display())
    }
}

/// Set a file's modification time.
pub fn set_mtime(path: &Path, time: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}
