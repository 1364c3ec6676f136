//! The orchestrated project build.
//!
//! Stage behaviour:
//! - `build_ext`: regenerate the header, resolve flags through pkg-config,
//!   write the extension plan, then run the stage command if one is set.
//! - `build_translations`: compile out-of-date message catalogs.
//! - anything else: run the stage command from `[build.commands]`, if any.
//!
//! Stage commands run in the project root with `EXTFORGE_TEMP_DIR` set, and
//! `build_ext` additionally gets `EXTFORGE_PLAN` pointing at the plan file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::builder::catalog::{CatalogOutcome, CatalogReport, InstallEntry};
use crate::builder::header::WriteOutcome;
use crate::builder::orchestrator::{BuildOrchestrator, StageOutput, StageRunner};
use crate::builder::pkg_config::{PkgConfig, Platform};
use crate::core::stage::BuildStage;
use crate::ops::data_files::collect_data_files;
use crate::ops::extension::{
    describe_queries, plan_extension, plan_path, prepare_header, resolve_extension_flags,
    ExtensionPlan,
};
use crate::ops::translations::build_translations;
use crate::util::context::Project;
use crate::util::fs::write_atomic;
use crate::util::process::ProcessBuilder;

/// Install manifest file name inside the temp root.
pub const INSTALL_MANIFEST_NAME: &str = "install-manifest.json";

/// Options for [`build`].
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Report intended actions without writing files or running tools
    pub dry_run: bool,

    /// Platform the extension is linked for
    pub platform: Platform,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            dry_run: false,
            platform: Platform::host(),
        }
    }
}

/// Result of a project build.
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// Stages in the order they ran
    pub completed: Vec<BuildStage>,

    /// Header path and what happened to it
    pub header: Option<(PathBuf, WriteOutcome)>,

    /// Extension plan (not produced on dry runs)
    pub plan: Option<ExtensionPlan>,

    /// Catalog outcomes
    pub catalogs: CatalogReport,

    /// Data files plus compiled catalogs
    pub install_entries: Vec<InstallEntry>,

    /// Written install manifest (not produced on dry runs)
    pub install_manifest: Option<PathBuf>,

    /// Commands that would have run on a dry run
    pub announcements: Vec<String>,
}

struct ProjectRunner<'a> {
    project: &'a Project,
    opts: &'a BuildOptions,
    outcome: BuildOutcome,
}

impl ProjectRunner<'_> {
    fn compile_extension(&mut self) -> Result<StageOutput> {
        let project = self.project;
        self.outcome.header = prepare_header(project, self.opts.dry_run)?;

        let mut env = Vec::new();
        if let Some(extension) = &project.manifest.extension {
            let pkg_config = PkgConfig::new(project.tools.pkg_config_program());
            let path = plan_path(&project.temp_dir(), extension);

            if self.opts.dry_run {
                self.announce_all(describe_queries(&pkg_config, &extension.packages));
                self.announce(format!("write {}", path.display()));
            } else {
                let flags = resolve_extension_flags(extension, pkg_config, self.opts.platform)?;
                let plan = plan_extension(extension, flags);
                let json = serde_json::to_string_pretty(&plan)?;
                write_atomic(&path, &json)?;
                tracing::info!("wrote extension plan {}", path.display());
                self.outcome.plan = Some(plan);
            }
            env.push(("EXTFORGE_PLAN", path.display().to_string()));
        }

        self.run_command(&BuildStage::ExtensionCompile, &env)?;
        Ok(StageOutput::default())
    }

    fn compile_translations(&mut self) -> Result<StageOutput> {
        let report = build_translations(self.project, self.opts.dry_run)?;
        for (_, outcome) in &report.outcomes {
            if let CatalogOutcome::WouldCompile { command } = outcome {
                self.outcome.announcements.push(command.clone());
            }
        }
        let entries = report.install_entries.clone();
        self.outcome.catalogs = report;
        Ok(StageOutput::with_entries(entries))
    }

    fn run_command(&mut self, stage: &BuildStage, env: &[(&str, String)]) -> Result<()> {
        let project = self.project;
        let Some(argv) = project.manifest.build.commands.get(stage.name()) else {
            tracing::debug!("no command configured for {}", stage);
            return Ok(());
        };
        let Some((program, args)) = argv.split_first() else {
            bail!("command for stage `{}` is empty", stage);
        };

        let mut cmd = ProcessBuilder::new(program)
            .args(args)
            .cwd(&project.root)
            .env("EXTFORGE_TEMP_DIR", project.temp_dir().display().to_string());
        for (key, value) in env {
            cmd = cmd.env(key, value);
        }

        if self.opts.dry_run {
            self.announce(cmd.display_command());
            return Ok(());
        }
        cmd.run()?;
        Ok(())
    }

    fn announce(&mut self, action: String) {
        tracing::debug!("dry run: {}", action);
        self.outcome.announcements.push(action);
    }

    fn announce_all(&mut self, actions: Vec<String>) {
        for action in actions {
            self.announce(action);
        }
    }
}

impl StageRunner for ProjectRunner<'_> {
    fn run_stage(&mut self, stage: &BuildStage) -> Result<StageOutput> {
        match stage {
            BuildStage::ExtensionCompile => self.compile_extension(),
            BuildStage::TranslationCompile => self.compile_translations(),
            other => {
                self.run_command(other, &[])?;
                Ok(StageOutput::default())
            }
        }
    }
}

/// Run every stage of the project build in order.
pub fn build(project: &Project, opts: &BuildOptions) -> Result<BuildOutcome> {
    let orchestrator = BuildOrchestrator::new(&project.manifest.build.stages);
    let mut runner = ProjectRunner {
        project,
        opts,
        outcome: BuildOutcome::default(),
    };

    let report = orchestrator.run(&mut runner)?;
    let mut outcome = runner.outcome;
    outcome.completed = report.completed;

    let mut install_entries = collect_data_files(&project.root, &project.manifest.data_files)?;
    install_entries.extend(report.install_entries);

    if !opts.dry_run {
        let path = project.temp_dir().join(INSTALL_MANIFEST_NAME);
        let json = serde_json::to_string_pretty(&install_entries)?;
        write_atomic(&path, &json)
            .with_context(|| format!("failed to write install manifest {}", path.display()))?;
        outcome.install_manifest = Some(path);
    }
    outcome.install_entries = install_entries;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::Manifest;
    use crate::util::config::ToolsConfig;
    use tempfile::TempDir;

    fn project(root: &std::path::Path, manifest: &str) -> Project {
        Project {
            root: root.to_path_buf(),
            manifest: Manifest::from_toml_str(manifest).unwrap(),
            tools: ToolsConfig::default(),
        }
    }

    #[test]
    fn test_header_only_build() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("defs.toml"),
            "[[inputs]]\nname = \"pressure\"\n",
        )
        .unwrap();
        let project = project(
            tmp.path(),
            "[header]\ndefinitions = \"defs.toml\"\noutput = \"lib/brushsettings.h\"\n",
        );

        let outcome = build(&project, &BuildOptions::default()).unwrap();

        assert_eq!(
            outcome.completed,
            vec![
                BuildStage::ExtensionCompile,
                BuildStage::SourcePackage,
                BuildStage::Other("build_scripts".to_string()),
                BuildStage::TranslationCompile,
            ]
        );
        let (path, written) = outcome.header.unwrap();
        assert_eq!(path, tmp.path().join("lib/brushsettings.h"));
        assert_eq!(written, WriteOutcome::Written);
        assert!(tmp.path().join("build/temp/install-manifest.json").exists());

        // A second build leaves the header alone.
        let again = build(&project, &BuildOptions::default()).unwrap();
        assert_eq!(again.header.unwrap().1, WriteOutcome::Unchanged);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("defs.toml"), "").unwrap();
        std::fs::create_dir_all(tmp.path().join("po")).unwrap();
        std::fs::write(tmp.path().join("po/de.po"), "").unwrap();
        let project = project(
            tmp.path(),
            r#"
            [header]
            definitions = "defs.toml"
            output = "brushsettings.h"

            [extension]
            name = "_mypaintlib"
            packages = ["libpng"]

            [build.commands]
            build_py = ["python3", "-m", "compileall", "lib"]
            "#,
        );

        let opts = BuildOptions {
            dry_run: true,
            platform: Platform::Posix,
        };
        let outcome = build(&project, &opts).unwrap();

        assert!(!tmp.path().join("brushsettings.h").exists());
        assert!(!tmp.path().join("build").exists());
        assert!(outcome.install_manifest.is_none());
        assert!(outcome.install_entries.is_empty());
        assert_eq!(outcome.header.unwrap().1, WriteOutcome::WouldWrite);
        assert!(outcome
            .announcements
            .iter()
            .any(|a| a.ends_with("--libs libpng")));
        assert!(outcome
            .announcements
            .iter()
            .any(|a| a == "python3 -m compileall lib"));
        assert!(outcome
            .announcements
            .iter()
            .any(|a| a.contains("de.po")));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_stage_command_aborts_build() {
        let tmp = TempDir::new().unwrap();
        let project = project(
            tmp.path(),
            r#"
            [build]
            stages = ["build_py", "build_scripts"]

            [build.commands]
            build_py = ["sh", "-c", "exit 2"]
            build_scripts = ["sh", "-c", "touch scripts-ran"]
            "#,
        );

        let err = build(&project, &BuildOptions::default()).unwrap_err();

        assert!(format!("{:#}", err).contains("stage `build_py` failed"));
        assert!(!tmp.path().join("scripts-ran").exists());
    }
}
