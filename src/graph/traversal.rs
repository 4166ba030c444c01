// ABOUTME: Concurrent graph traversal spawning one task per eligible unit.
// ABOUTME: Completion handlers re-check neighbors under a single status mutex.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinSet;

use crate::types::UnitName;

use super::error::{ActionError, GraphError};
use super::unit::{Graph, UnitStatus};

/// Which way to walk the dependency edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bring up: dependencies before dependents.
    Forward,
    /// Tear down: dependents before dependencies.
    Reverse,
}

/// Cooperative cancellation signal.
///
/// Cancelling prevents new units from launching. Units already running are
/// not aborted; long-running actions observe the token at their own poll
/// points.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// The per-unit work a traversal invokes exactly once per unit.
#[async_trait]
pub trait UnitAction: Send + Sync {
    async fn run(&self, unit: &UnitName, cancel: &CancelToken) -> Result<(), ActionError>;
}

/// Cross-task traversal state. The only shared mutable data; every access
/// goes through one mutex.
struct Table {
    statuses: BTreeMap<UnitName, UnitStatus>,
    launched: BTreeSet<UnitName>,
}

impl Table {
    fn new(graph: &Graph) -> Self {
        Self {
            statuses: graph
                .unit_names()
                .map(|n| (n.clone(), UnitStatus::Pending))
                .collect(),
            launched: BTreeSet::new(),
        }
    }

    fn is_active(&self, name: &UnitName) -> bool {
        self.statuses.get(name) == Some(&UnitStatus::Active)
    }
}

/// Bring the project up: every unit starts only after all its dependencies
/// are Active.
pub async fn run_up<A: UnitAction + 'static>(
    graph: &Graph,
    action: Arc<A>,
    cancel: CancelToken,
) -> Result<(), GraphError> {
    run(graph, Direction::Forward, action, cancel).await
}

/// Tear the project down: every unit stops only after all its dependents
/// have finished.
pub async fn run_down<A: UnitAction + 'static>(
    graph: &Graph,
    action: Arc<A>,
    cancel: CancelToken,
) -> Result<(), GraphError> {
    run(graph, Direction::Reverse, action, cancel).await
}

/// Walk the graph in the given direction, invoking `action` once per unit.
///
/// The first action error stops new launches and is returned after all
/// in-flight units drain; completed units are not undone.
pub async fn run<A: UnitAction + 'static>(
    graph: &Graph,
    direction: Direction,
    action: Arc<A>,
    cancel: CancelToken,
) -> Result<(), GraphError> {
    let table = Mutex::new(Table::new(graph));
    let mut tasks: JoinSet<(UnitName, Result<(), ActionError>)> = JoinSet::new();
    let mut task_units: HashMap<tokio::task::Id, UnitName> = HashMap::new();

    // Seed the wave with the start set: units with no required neighbors.
    {
        let mut table = table.lock();
        if !cancel.is_cancelled() {
            let start: Vec<UnitName> = graph
                .unit_names()
                .filter(|&name| eligible(graph, direction, &table, name))
                .cloned()
                .collect();
            for name in start {
                launch(&mut tasks, &mut task_units, &mut table, &action, &cancel, name);
            }
        }
    }

    let mut first_error: Option<GraphError> = None;

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, (name, Ok(())))) => {
                task_units.remove(&id);
                tracing::debug!("unit {} completed", name);

                // Completion handler: mark Active and launch newly-unblocked
                // neighbors while still holding the lock.
                let mut table = table.lock();
                table.statuses.insert(name.clone(), UnitStatus::Active);

                if first_error.is_some() || cancel.is_cancelled() {
                    continue;
                }

                let unblocked: Vec<UnitName> = recheck_set(graph, direction, &name)
                    .iter()
                    .filter(|&n| eligible(graph, direction, &table, n))
                    .cloned()
                    .collect();
                for next in unblocked {
                    launch(&mut tasks, &mut task_units, &mut table, &action, &cancel, next);
                }
            }
            Ok((id, (name, Err(source)))) => {
                task_units.remove(&id);
                tracing::warn!("unit {} failed: {}", name, source);
                if first_error.is_none() {
                    first_error = Some(GraphError::UnitFailed { unit: name, source });
                }
            }
            Err(join_error) => {
                let unit = task_units
                    .remove(&join_error.id())
                    .expect("every spawned task has a recorded unit");
                if first_error.is_none() {
                    first_error = Some(GraphError::UnitPanicked {
                        unit,
                        message: join_error.to_string(),
                    });
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Neighbors whose eligibility may have changed when `completed` finished.
fn recheck_set<'g>(graph: &'g Graph, direction: Direction, completed: &UnitName) -> &'g [UnitName] {
    match direction {
        Direction::Forward => graph.dependents_of(completed),
        Direction::Reverse => graph.dependencies_of(completed),
    }
}

/// A unit is eligible once unlaunched and every required neighbor is Active.
fn eligible(graph: &Graph, direction: Direction, table: &Table, name: &UnitName) -> bool {
    if table.launched.contains(name) {
        return false;
    }
    let required = match direction {
        Direction::Forward => graph.dependencies_of(name),
        Direction::Reverse => graph.dependents_of(name),
    };
    required.iter().all(|n| table.is_active(n))
}

/// Spawn the unit's action as an independently scheduled task with owned
/// per-unit copies of everything it touches.
fn launch<A: UnitAction + 'static>(
    tasks: &mut JoinSet<(UnitName, Result<(), ActionError>)>,
    task_units: &mut HashMap<tokio::task::Id, UnitName>,
    table: &mut Table,
    action: &Arc<A>,
    cancel: &CancelToken,
    name: UnitName,
) {
    table.launched.insert(name.clone());
    tracing::debug!("launching unit {}", name);

    let action = Arc::clone(action);
    let cancel = cancel.clone();
    let unit = name.clone();
    let handle = tasks.spawn(async move {
        let result = action.run(&unit, &cancel).await;
        (unit, result)
    });
    task_units.insert(handle.id(), name);
}
