// ABOUTME: Graph construction from a unit -> dependency-names map.
// ABOUTME: Unknown dependencies are dropped (lenient, default) or rejected (strict).

use std::collections::BTreeMap;

use crate::diagnostics::{Diagnostics, Warning};
use crate::types::UnitName;

use super::cycle;
use super::error::GraphError;
use super::unit::{Graph, Unit};

/// How to treat a dependency naming a unit that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDependency {
    /// Drop the edge and record a warning. The build never fails.
    #[default]
    Lenient,
    /// Fail the build.
    Strict,
}

/// Builds a validated [`Graph`] from declared dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    unknown: UnknownDependency,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unknown_dependency(mut self, mode: UnknownDependency) -> Self {
        self.unknown = mode;
        self
    }

    /// Construct the graph. Fails on a dependency cycle, and in strict mode
    /// on a dependency naming an unknown unit.
    pub fn build(
        &self,
        declared: &BTreeMap<UnitName, Vec<UnitName>>,
        diag: &Diagnostics,
    ) -> Result<Graph, GraphError> {
        let mut units = BTreeMap::new();

        for (name, dependencies) in declared {
            let mut kept = Vec::with_capacity(dependencies.len());
            for dep in dependencies {
                if declared.contains_key(dep) {
                    kept.push(dep.clone());
                    continue;
                }
                match self.unknown {
                    UnknownDependency::Strict => {
                        return Err(GraphError::UnknownDependency {
                            unit: name.clone(),
                            dependency: dep.clone(),
                        });
                    }
                    UnknownDependency::Lenient => {
                        diag.warn(Warning::unknown_dependency(format!(
                            "unit {name} depends on unknown unit {dep}; edge ignored"
                        )));
                    }
                }
            }
            units.insert(name.clone(), Unit::new(name.clone(), kept));
        }

        let graph = Graph::new(units);

        if let Some(path) = cycle::detect(&graph) {
            return Err(GraphError::CycleDetected(path));
        }

        Ok(graph)
    }
}
