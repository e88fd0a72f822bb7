pub mod merge;
pub mod profiles;
pub mod resolve;

use clap::{Parser, Subcommand};
use scanscope_core::error::ScanscopeError;
use scanscope_core::{BuildModel, ProjectManifest};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "scanscope",
    version,
    about = "Inspect discovered scanner settings of a build model",
    long_about = "Scanscope resolves which discovery profile governs a build scope, how its \
                  discovered include paths and macros are cached, and how per-file discovery \
                  results collapse into per-folder settings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List discovery profile ids declared by toolchains and tools
    Profiles {
        /// Project manifest (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Only report ids reachable from this toolchain
        #[arg(long, conflicts_with = "tool")]
        toolchain: Option<String>,
        /// Only report ids reachable from this tool
        #[arg(long)]
        tool: Option<String>,
    },
    /// Show the canonical scope, profile and caching strategy of a scope
    #[command(
        long_about = "Canonicalizes a scope to the coarsest one with the same scanner settings \
                            and reports the profile id governing it together with the cache owner."
    )]
    Resolve {
        /// Project manifest (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        #[arg(long)]
        configuration: String,
        /// Resource override path inside the configuration
        #[arg(long)]
        resource: Option<String>,
        #[arg(long)]
        tool: Option<String>,
        /// Input type of the tool
        #[arg(long, requires = "tool")]
        input: Option<String>,
    },
    /// Merge a per-file discovery map into per-resource settings
    #[command(
        long_about = "Reads a JSON object mapping project-relative paths to discovered info and \
                            prints the setting records it produces for a configuration."
    )]
    Merge {
        /// Project manifest (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Discovered per-file map (JSON)
        #[arg(value_name = "DISCOVERED")]
        discovered: PathBuf,
        /// Configuration to merge for. Defaults to the first one.
        #[arg(long)]
        configuration: Option<String>,
        /// Map entries one to one instead of computing folder majorities
        #[arg(long)]
        file_data: bool,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = scanscope_core::logging::init_logging("cli", false);

    let output = match cli.command {
        Commands::Profiles {
            manifest,
            toolchain,
            tool,
        } => profiles::render(&manifest, toolchain.as_deref(), tool.as_deref())?,
        Commands::Resolve {
            manifest,
            configuration,
            resource,
            tool,
            input,
        } => resolve::render(
            &manifest,
            &resolve::ScopeArgs {
                configuration,
                resource,
                tool,
                input,
            },
        )?,
        Commands::Merge {
            manifest,
            discovered,
            configuration,
            file_data,
        } => merge::render(&manifest, &discovered, configuration.as_deref(), file_data)?,
    };
    println!("{}", output);
    Ok(())
}

/// Loads a manifest and builds its model.
pub fn load_manifest(path: &Path) -> scanscope_core::Result<(ProjectManifest, BuildModel)> {
    let manifest = ProjectManifest::load(path)?;
    let model = manifest.to_model()?;
    tracing::info!(
        "Loaded {} configurations from {}",
        model.configurations().len(),
        path.display()
    );
    Ok((manifest, model))
}

fn not_found(kind: &str, name: &str) -> ScanscopeError {
    ScanscopeError::NotFound(format!("{kind} `{name}`"))
}
