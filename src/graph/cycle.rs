// ABOUTME: Cycle detection over the unit dependency graph.
// ABOUTME: Three-color DFS per root, reporting the joined cycle path.

use std::collections::BTreeMap;

use crate::types::UnitName;

use super::unit::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Color {
    /// Not yet visited.
    #[default]
    White,
    /// On the active DFS path.
    Gray,
    /// Fully explored.
    Black,
}

/// Returns the joined path of the first cycle found (`a -> b -> c -> a`),
/// or `None` if the graph is acyclic.
pub(crate) fn detect(graph: &Graph) -> Option<String> {
    let mut colors: BTreeMap<&UnitName, Color> =
        graph.unit_names().map(|n| (n, Color::White)).collect();

    for root in graph.unit_names() {
        if colors[root] == Color::White {
            let mut path = Vec::new();
            if let Some(cycle) = visit(graph, root, &mut colors, &mut path) {
                return Some(cycle);
            }
        }
    }

    None
}

fn visit<'g>(
    graph: &'g Graph,
    node: &'g UnitName,
    colors: &mut BTreeMap<&'g UnitName, Color>,
    path: &mut Vec<&'g UnitName>,
) -> Option<String> {
    colors.insert(node, Color::Gray);
    path.push(node);

    for dep in graph.dependencies_of(node) {
        match colors.get(dep).copied().unwrap_or_default() {
            Color::Gray => {
                // Back edge: the cycle runs from the first occurrence of
                // `dep` on the active path back to `dep`.
                let start = path.iter().position(|n| *n == dep).unwrap_or(0);
                let mut names: Vec<&str> = path[start..].iter().map(|n| n.as_str()).collect();
                names.push(dep.as_str());
                return Some(names.join(" -> "));
            }
            Color::White => {
                if let Some(cycle) = visit(graph, dep, colors, path) {
                    return Some(cycle);
                }
            }
            Color::Black => {}
        }
    }

    path.pop();
    colors.insert(node, Color::Black);
    None
}
