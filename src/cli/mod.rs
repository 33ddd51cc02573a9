//! CLI surface: the entry points the external scheduler invokes.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "straitwatch",
    version,
    about = "Maritime chokepoint crisis monitor"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Alternate config file (default: straitwatch.yaml + environment)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and run migrations
    Init,
    /// Evaluate all eight alert triggers once and dispatch fired alerts
    Triggers,
    /// Print the current composite threat level with its breakdown
    Threat,
    /// Scenario intelligence pipeline
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScenarioCommands {
    /// Run one collect → analyze → persist → dispatch cycle
    Run,
    /// Broadcast the full scenario status report
    Report,
}
