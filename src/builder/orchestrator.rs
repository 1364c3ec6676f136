//! Sequential execution of build stages.
//!
//! The orchestrator owns ordering and failure policy only; what a stage
//! does is up to the [`StageRunner`]. Stages run one at a time because
//! later stages read files earlier ones produce, and the first failure
//! stops the sequence.

use anyhow::{Context, Result};

use crate::builder::catalog::InstallEntry;
use crate::core::stage::{compute_order, BuildStage};

/// Executes individual stages.
pub trait StageRunner {
    /// Run one stage to completion.
    fn run_stage(&mut self, stage: &BuildStage) -> Result<StageOutput>;
}

/// What a stage produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageOutput {
    /// Files the stage wants installed
    pub install_entries: Vec<InstallEntry>,
}

impl StageOutput {
    pub fn with_entries(install_entries: Vec<InstallEntry>) -> Self {
        StageOutput { install_entries }
    }
}

/// Summary of a completed orchestrated build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Stages in the order they ran
    pub completed: Vec<BuildStage>,

    /// Install entries from every stage, in stage order
    pub install_entries: Vec<InstallEntry>,
}

/// Runs build stages in dependency-safe order.
#[derive(Debug, Clone)]
pub struct BuildOrchestrator {
    order: Vec<BuildStage>,
}

impl BuildOrchestrator {
    /// Create an orchestrator from the host's base stage list.
    pub fn new(base: &[BuildStage]) -> Self {
        BuildOrchestrator {
            order: compute_order(base),
        }
    }

    /// The execution order.
    pub fn order(&self) -> &[BuildStage] {
        &self.order
    }

    /// Run every stage in order, stopping at the first failure.
    pub fn run<R: StageRunner>(&self, runner: &mut R) -> Result<BuildReport> {
        let mut report = BuildReport::default();

        for stage in &self.order {
            tracing::debug!("running stage {}", stage);
            let output = runner
                .run_stage(stage)
                .with_context(|| format!("stage `{}` failed", stage))?;
            report.install_entries.extend(output.install_entries);
            report.completed.push(stage.clone());
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[derive(Default)]
    struct Recorder {
        ran: Vec<String>,
        fail_on: Option<BuildStage>,
    }

    impl StageRunner for Recorder {
        fn run_stage(&mut self, stage: &BuildStage) -> Result<StageOutput> {
            self.ran.push(stage.to_string());
            if self.fail_on.as_ref() == Some(stage) {
                bail!("compiler exploded");
            }
            if *stage == BuildStage::TranslationCompile {
                return Ok(StageOutput::with_entries(vec![InstallEntry::new(
                    "locale/de/LC_MESSAGES",
                    vec!["build/temp/locale/de/LC_MESSAGES/mypaint.mo".into()],
                )]));
            }
            Ok(StageOutput::default())
        }
    }

    #[test]
    fn test_runs_in_computed_order() {
        let orchestrator = BuildOrchestrator::new(&[
            BuildStage::SourcePackage,
            BuildStage::ExtensionCompile,
            BuildStage::Other("build_scripts".to_string()),
        ]);
        assert_eq!(orchestrator.order()[0], BuildStage::ExtensionCompile);
        let mut runner = Recorder::default();

        let report = orchestrator.run(&mut runner).unwrap();

        assert_eq!(
            runner.ran,
            vec!["build_ext", "build_py", "build_scripts", "build_translations"]
        );
        assert_eq!(report.completed.len(), 4);
        assert_eq!(report.install_entries.len(), 1);
    }

    #[test]
    fn test_failure_aborts_remaining_stages() {
        let orchestrator =
            BuildOrchestrator::new(&[BuildStage::SourcePackage, BuildStage::ExtensionCompile]);
        let mut runner = Recorder {
            fail_on: Some(BuildStage::ExtensionCompile),
            ..Recorder::default()
        };

        let err = orchestrator.run(&mut runner).unwrap_err();

        assert_eq!(runner.ran, vec!["build_ext"]);
        let msg = format!("{:#}", err);
        assert!(msg.contains("stage `build_ext` failed"));
        assert!(msg.contains("compiler exploded"));
    }
}
