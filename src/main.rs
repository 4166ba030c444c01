// ABOUTME: Entry point for the convoy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use convoy::config::Config;
use convoy::diagnostics::Diagnostics;
use convoy::error::Result;
use convoy::graph::{
    ActionError, CancelToken, Graph, GraphBuilder, UnitAction, run_down, run_up,
};
use convoy::output::{Output, OutputMode};
use convoy::types::UnitName;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let config = Config::discover(&cwd)?;
    let diag = Diagnostics::new();
    let graph = GraphBuilder::new()
        .unknown_dependency(config.unknown_dependencies)
        .build(&config.dependency_map(), &diag)?;

    match cli.command {
        Commands::Validate => {
            for warning in diag.warnings() {
                output.warning(&warning.message);
            }
            output.success(&format!(
                "graph OK: {} unit(s), no cycles",
                graph.len()
            ));
        }
        Commands::Plan { down } => {
            let order = plan_order(&graph, down).await?;
            let verb = if down { "stop" } else { "start" };
            for (index, unit) in order.iter().enumerate() {
                output.progress(&format!("{:>3}. would {verb} {unit}", index + 1));
            }
            for warning in diag.warnings() {
                output.warning(&warning.message);
            }
            output.success(&format!("plan OK: {} unit(s)", order.len()));
        }
    }

    Ok(())
}

/// Dry-run the traversal to observe one valid ordering.
async fn plan_order(graph: &Graph, down: bool) -> Result<Vec<UnitName>> {
    let action = Arc::new(RecordingAction::default());
    let cancel = CancelToken::new();
    if down {
        run_down(graph, Arc::clone(&action), cancel).await?;
    } else {
        run_up(graph, Arc::clone(&action), cancel).await?;
    }
    Ok(action.order.lock().clone())
}

/// No-op action that records the order units were launched in.
#[derive(Default)]
struct RecordingAction {
    order: Mutex<Vec<UnitName>>,
}

#[async_trait]
impl UnitAction for RecordingAction {
    async fn run(&self, unit: &UnitName, _cancel: &CancelToken) -> std::result::Result<(), ActionError> {
        self.order.lock().push(unit.clone());
        Ok(())
    }
}
