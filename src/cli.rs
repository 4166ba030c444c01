// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "Dependency-ordered deployment orchestration for containerized services")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit JSON lines instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the unit graph: cycles, unknown dependencies
    Validate,

    /// Preview the order units would be brought up (or torn down) in
    Plan {
        /// Walk the teardown direction instead of bring-up
        #[arg(long)]
        down: bool,
    },
}
