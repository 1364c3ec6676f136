//! Environment health checks.
//!
//! The `doctor` command verifies that the external tools a build needs are
//! available:
//!
//! - pkg-config (or pkgconf), required to resolve extension flags
//! - msgfmt, required to compile message catalogs

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::util::config::ToolsConfig;
use crate::util::process::{find_executable, ProcessBuilder};

/// Where a tool was found and what it reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub path: PathBuf,

    /// First line of `--version`, when the tool answered
    pub version: Option<String>,
}

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,

    /// Set once the tool was located, even if it then failed
    pub tool: Option<ToolInfo>,

    pub duration: Duration,
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,
}

impl DoctorReport {
    /// Add a check result.
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if every check passed.
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Get the count of passed checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get the count of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }
}

/// Run all checks against the effective tool configuration.
pub fn doctor(tools: &ToolsConfig) -> DoctorReport {
    let start = Instant::now();
    let mut report = DoctorReport::default();

    report.add(check_tool(
        "pkg-config",
        &tools.pkg_config_program(),
        "needed to resolve extension flags",
    ));
    report.add(check_tool(
        "msgfmt",
        &tools.msgfmt_program(),
        "needed to compile message catalogs",
    ));

    report.total_duration = start.elapsed();
    report
}

/// Check that `program` exists and answers `--version`.
fn check_tool(name: &str, program: &Path, purpose: &str) -> CheckResult {
    let start = Instant::now();

    let located = if program.components().count() > 1 {
        program.is_file().then(|| program.to_path_buf())
    } else {
        find_executable(&program.to_string_lossy())
    };

    let (passed, message, tool) = match located {
        None => (
            false,
            format!("`{}` not found ({})", program.display(), purpose),
            None,
        ),
        Some(path) => match ProcessBuilder::new(&path).arg("--version").exec_and_check() {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let version = stdout.lines().next().map(|l| l.trim().to_string());
                (
                    true,
                    format!("{} is available", program.display()),
                    Some(ToolInfo { path, version }),
                )
            }
            Err(e) => (
                false,
                format!("{} is not usable: {}", program.display(), e),
                Some(ToolInfo {
                    path,
                    version: None,
                }),
            ),
        },
    };

    CheckResult {
        name: name.to_string(),
        passed,
        message,
        tool,
        duration: start.elapsed(),
    }
}

/// Format the report for terminal output.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "extforge doctor\n");

    for check in &report.checks {
        let status = if check.passed { "ok" } else { "FAIL" };
        let _ = writeln!(output, "  [{:>4}] {}", status, check.name);

        if verbose || !check.passed {
            let _ = writeln!(output, "         {}", check.message);
        }
        if let (true, Some(tool)) = (verbose, &check.tool) {
            let _ = writeln!(output, "         Path: {}", tool.path.display());
            if let Some(version) = &tool.version {
                let _ = writeln!(output, "         Version: {}", version);
            }
        }
    }

    let _ = writeln!(
        output,
        "\nSummary: {} passed, {} failed",
        report.passed_count(),
        report.failed_count()
    );

    output
}
