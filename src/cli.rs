use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dca")]
#[command(
    version,
    about = "Design Component Analyzer - Turn design trees and screenshots into validated UI components",
    long_about = "Design Component Analyzer (DCA)\n\nModes:\n- analyze: run extraction, grouping, visual validation and style mapping on a design.\n- extract: emit descriptors, design tokens and the spatial summary only.\n- compare: report grouping-only vs grouping+validation metrics for one design.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for model/timeouts/grouping/spatial defaults; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(long, help = "Design input (Figma file/design URL or local .json node tree)")]
    pub input: String,

    #[arg(long, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, help = "Output file path (stdout if omitted)")]
    pub output: Option<PathBuf>,
}

/// Flags for subcommands that run the model stages.
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    #[arg(
        long,
        help = "Rendered screenshot (local png/jpg/webp/gif, http(s) or data: URL); defaults to the Figma export"
    )]
    pub image: Option<String>,

    #[arg(
        long,
        help = "Skip model calls and use the heuristic grouping/validation paths"
    )]
    pub offline: bool,

    #[arg(
        long,
        default_value = "60",
        value_name = "SECS",
        help = "Timeout (seconds) for the grouping model call"
    )]
    pub grouping_timeout: u64,

    #[arg(
        long,
        default_value = "60",
        value_name = "SECS",
        help = "Timeout (seconds) for the vision validation call"
    )]
    pub validation_timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full analysis pipeline and emit mapped components
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Extract descriptors, design tokens and spatial relationships only
    Extract {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Compare grouping-only output against grouping + visual validation
    Compare {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
