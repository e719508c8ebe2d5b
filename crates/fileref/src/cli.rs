//! Command-line interface definitions using clap.

use crate::config::LayoutOverrides;
use crate::sandbox::CollisionPolicy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Task description file reference extractor
///
/// Finds `file:`, `files:`, `output:` and quoted paths in a task description,
/// checks that inputs exist locally, and rewrites the text to sandbox paths.
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments or configuration
///   3  - Description, context or config file not found
///   4  - Validation failed (--strict with unresolved inputs)
///  10  - External failure (file system, etc.)
#[derive(Parser)]
#[command(name = "fileref")]
#[command(about = "Extract file references from task descriptions", long_about = None)]
pub struct Cli {
    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log every checked path to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of .fileref/config.toml
    #[arg(long, global = true, env = "FILEREF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the JSON Schema of the parse result and exit
    #[arg(long)]
    pub schema: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract references from a description and print the rewritten text
    ///
    /// The description is taken from the argument, from --from-file, or from
    /// stdin when neither is given.
    Parse(ParseArgs),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args)]
pub struct ParseArgs {
    /// Task description text
    pub description: Option<String>,

    /// Read the description from a file
    #[arg(long, conflicts_with = "description")]
    pub from_file: Option<PathBuf>,

    /// Extra text scanned for `output:` references only
    #[arg(long)]
    pub context: Option<String>,

    /// Read the context text from a file
    #[arg(long, conflicts_with = "context")]
    pub context_file: Option<PathBuf>,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Output JSON format
    #[arg(long)]
    pub json: bool,

    /// Fail with exit code 4 if any referenced input could not be resolved
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration after merging file and flags
    Show {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Output JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Flags that override config file values
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Directory relative paths are resolved against (default: current directory)
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Sandbox root for input files
    #[arg(long)]
    pub input_root: Option<String>,

    /// Sandbox root for output files
    #[arg(long)]
    pub output_root: Option<String>,

    /// How to handle two inputs or outputs with the same file name
    #[arg(long, value_enum)]
    pub collision: Option<CollisionPolicy>,
}

impl LayoutArgs {
    pub fn overrides(&self) -> LayoutOverrides {
        LayoutOverrides {
            input_root: self.input_root.clone(),
            output_root: self.output_root.clone(),
            collision: self.collision,
        }
    }
}

impl Cli {
    /// Whether the selected command asked for JSON output
    pub fn wants_json(&self) -> bool {
        match &self.command {
            Some(Commands::Parse(args)) => args.json,
            Some(Commands::Config(ConfigCommands::Show { json, .. })) => *json,
            None => false,
        }
    }

    /// Name of the selected command, for JSON metadata
    pub fn command_name(&self) -> &'static str {
        match &self.command {
            Some(Commands::Parse(_)) => "parse",
            Some(Commands::Config(ConfigCommands::Show { .. })) => "config show",
            None => "fileref",
        }
    }
}
