//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Starlift - warehouse ETL pipelines for the star schema
#[derive(Parser, Debug)]
#[command(name = "sl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a pipeline against the warehouse
    Run(RunArgs),

    /// List built-in pipelines and their tasks
    Ls(LsArgs),

    /// Validate the config and every built-in pipeline graph
    Validate,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pipeline to run
    #[arg(long, default_value = sl_pipelines::definitions::STAR_SCHEMA)]
    pub pipeline: String,

    /// Maximum tasks running concurrently within a level
    #[arg(long, default_value_t = 4)]
    pub threads: usize,

    /// Override the warehouse path from the config
    #[arg(long)]
    pub warehouse: Option<String>,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: LsOutput,

    /// Only show one pipeline
    #[arg(long)]
    pub pipeline: Option<String>,
}

/// List output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
    /// Dependency tree
    Tree,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
