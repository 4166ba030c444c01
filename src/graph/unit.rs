// ABOUTME: Unit and graph data model for deployable units.
// ABOUTME: Topology is immutable after construction; only per-unit status mutates.

use crate::types::UnitName;
use std::collections::BTreeMap;

/// Lifecycle status of a unit during a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitStatus {
    /// Not yet brought up (or torn down) by the current traversal.
    #[default]
    Pending,
    /// The unit's action completed successfully.
    Active,
}

/// An independently deployable unit with its declared dependencies.
#[derive(Debug, Clone)]
pub struct Unit {
    name: UnitName,
    dependencies: Vec<UnitName>,
}

impl Unit {
    pub(crate) fn new(name: UnitName, dependencies: Vec<UnitName>) -> Self {
        Self { name, dependencies }
    }

    pub fn name(&self) -> &UnitName {
        &self.name
    }

    /// Units this one requires Active before it starts (forward direction).
    pub fn dependencies(&self) -> &[UnitName] {
        &self.dependencies
    }
}

/// Immutable dependency graph of units.
///
/// Both adjacency directions are precomputed at build time: dependencies
/// for forward traversal, dependents for reverse traversal.
#[derive(Debug, Clone)]
pub struct Graph {
    units: BTreeMap<UnitName, Unit>,
    dependents: BTreeMap<UnitName, Vec<UnitName>>,
}

impl Graph {
    pub(crate) fn new(units: BTreeMap<UnitName, Unit>) -> Self {
        let mut dependents: BTreeMap<UnitName, Vec<UnitName>> = units
            .keys()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        for unit in units.values() {
            for dep in unit.dependencies() {
                if let Some(list) = dependents.get_mut(dep) {
                    list.push(unit.name().clone());
                }
            }
        }
        Self { units, dependents }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, name: &UnitName) -> bool {
        self.units.contains_key(name)
    }

    /// Unit names in deterministic (sorted) order.
    pub fn unit_names(&self) -> impl Iterator<Item = &UnitName> {
        self.units.keys()
    }

    pub fn unit(&self, name: &UnitName) -> Option<&Unit> {
        self.units.get(name)
    }

    /// Units `name` requires Active before starting.
    pub fn dependencies_of(&self, name: &UnitName) -> &[UnitName] {
        self.units
            .get(name)
            .map(|u| u.dependencies())
            .unwrap_or(&[])
    }

    /// Units that declared a dependency on `name`.
    pub fn dependents_of(&self, name: &UnitName) -> &[UnitName] {
        self.dependents.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
