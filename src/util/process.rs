//! Subprocess execution utilities.
//!
//! Every external tool extforge talks to (`pkg-config`, `msgfmt`, stage
//! commands) goes through [`ProcessBuilder`], so failures always carry the
//! exact command line and working directory.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use thiserror::Error;

/// Failure to run an external tool.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn `{command}` (in {cwd}): {source}")]
    Spawn {
        command: String,
        cwd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with exit code {code:?} (in {cwd})\n{stderr}")]
    Failed {
        command: String,
        cwd: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// The directory the command runs in, for error messages.
    fn display_cwd(&self) -> String {
        match &self.cwd {
            Some(cwd) => cwd.display().to_string(),
            None => std::env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "<unknown directory>".to_string()),
        }
    }

    /// Execute the command and wait for completion.
    pub fn exec(&self) -> Result<Output, ProcessError> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("running `{}`", self.display_command());

        cmd.output().map_err(|source| ProcessError::Spawn {
            command: self.display_command(),
            cwd: self.display_cwd(),
            source,
        })
    }

    /// Execute and require success.
    pub fn exec_and_check(&self) -> Result<Output, ProcessError> {
        let output = self.exec()?;
        if !output.status.success() {
            return Err(ProcessError::Failed {
                command: self.display_command(),
                cwd: self.display_cwd(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }

    /// Execute with inherited stdio and require success.
    ///
    /// Used for stage commands whose output belongs to the user.
    pub fn run(&self) -> Result<(), ProcessError> {
        let mut cmd = self.build_command();
        tracing::debug!("running `{}`", self.display_command());

        let status = cmd.status().map_err(|source| ProcessError::Spawn {
            command: self.display_command(),
            cwd: self.display_cwd(),
            source,
        })?;

        if !status.success() {
            return Err(ProcessError::Failed {
                command: self.display_command(),
                cwd: self.display_cwd(),
                code: status.code(),
                stderr: String::new(),
            });
        }
        Ok(())
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
