//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// extforge - build preparation for native extension modules
#[derive(Parser)]
#[command(name = "extforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate the constants header if the definitions changed
    Generate(GenerateArgs),

    /// Resolve and print the extension's compile/link flags
    Flags(FlagsArgs),

    /// Compile out-of-date message catalogs
    Translations(TranslationsArgs),

    /// Show the order build stages run in
    Order(OrderArgs),

    /// Run every build stage
    Build(BuildArgs),

    /// Remove the build temporary directory
    Clean(CleanArgs),

    /// Check that required external tools are available
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Definitions file (defaults to the manifest's [header] section)
    #[arg(long, requires = "output")]
    pub definitions: Option<PathBuf>,

    /// Header to write (defaults to the manifest's [header] section)
    #[arg(long, short, requires = "definitions")]
    pub output: Option<PathBuf>,

    /// Report whether the header would change without writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Query these packages instead of the manifest's
    #[arg(long = "package", short)]
    pub packages: Vec<String>,

    /// Emit JSON
    #[arg(long)]
    pub json: bool,

    /// Skip platform-specific link arguments
    #[arg(long)]
    pub no_platform: bool,
}

#[derive(Args)]
pub struct TranslationsArgs {
    /// Report what would be compiled without compiling
    #[arg(long)]
    pub dry_run: bool,

    /// Emit install entries as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct OrderArgs {
    /// Base stage order (defaults to the manifest's [build] stages)
    #[arg(value_name = "STAGE")]
    pub stages: Vec<String>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Report intended actions without writing files or running tools
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct DoctorArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
