// ABOUTME: Dependency-graph scheduler for independently deployable units.
// ABOUTME: Exports the graph model, builder, and concurrent traversal engine.

mod builder;
mod cycle;
mod error;
mod traversal;
mod unit;

pub use builder::{GraphBuilder, UnknownDependency};
pub use error::{ActionError, GraphError};
pub use traversal::{CancelToken, Direction, UnitAction, run, run_down, run_up};
pub use unit::{Graph, Unit, UnitStatus};
