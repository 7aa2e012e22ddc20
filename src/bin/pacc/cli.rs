//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// pacc - a package manager for C and C++ projects
#[derive(Parser)]
#[command(name = "pacc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the dependencies of the current package
    Resolve(ResolveArgs),

    /// Show compile/link flags for a project
    Flags(FlagsArgs),

    /// Display the dependency tree
    Tree(TreeArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Print the resolved package as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Project name
    pub project: String,

    /// Show the flags of a filter overlay (e.g. `configurations:Debug`)
    #[arg(long)]
    pub filter: Option<String>,

    /// Show only compile flags
    #[arg(long, conflicts_with = "link")]
    pub compile: bool,

    /// Show only link flags
    #[arg(long)]
    pub link: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Show duplicate dependencies
    #[arg(long)]
    pub duplicates: bool,
}
