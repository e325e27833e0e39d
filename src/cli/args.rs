//! CLI argument parsing

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Generate UML class diagrams from Java sources
#[derive(Parser, Debug)]
#[command(name = "classmap")]
#[command(about = "Generate UML class diagrams from Java source archives")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract a zip archive of Java sources and generate its class diagram
    Generate {
        /// Path to the uploaded archive
        archive: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Generate the class diagram of an already extracted source tree
    Analyze {
        /// Root of the Java source tree
        path: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Show version information
    Version,
}

/// Flags shared by every diagram-producing command
#[derive(ClapArgs, Debug, Clone)]
pub struct RunOptions {
    /// Config file path
    #[arg(short, long, default_value = "classmap.toml")]
    pub config: PathBuf,

    /// Output directory for the diagram
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Diagram name
    #[arg(long)]
    pub name: Option<String>,

    /// Glob patterns to exclude (can be repeated)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Skip running the external renderer
    #[arg(long)]
    pub no_render: bool,

    /// Skip the speculative injection heuristic
    #[arg(long)]
    pub no_heuristics: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub report: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
