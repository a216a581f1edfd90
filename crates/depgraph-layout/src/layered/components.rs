use super::graph::{NodeIx, WorkGraph};
use super::positions::Positions;
use std::collections::VecDeque;
use tracing::trace;

/// A weakly-connected set of positioned nodes and its cross-axis extent
#[derive(Debug, Clone, PartialEq)]
struct Component {
    nodes: Vec<NodeIx>,
    min: f64,
    max: f64,
}

/// Lay the weakly-connected components out side by side
///
/// Components are ordered by their leftmost node and shifted so that each one
/// starts `gap` after the end of the previous one. Returns the number of
/// components found.
pub(crate) fn pack_components(graph: &WorkGraph, positions: &mut Positions, gap: f64) -> usize {
    let mut components = weak_components(graph, positions);
    if components.len() <= 1 {
        return components.len();
    }

    components.sort_by(|a, b| a.min.total_cmp(&b.min));

    let mut prev_max = components[0].max;
    for component in &components[1..] {
        let dx = prev_max + gap - component.min;
        trace!("Shifting component of {} nodes by {dx}", component.nodes.len());
        for &node in &component.nodes {
            positions.shift(node, dx);
        }
        prev_max = component.max + dx;
    }

    components.len()
}

/// Breadth-first search over both edge directions, seeded in handle order
fn weak_components(graph: &WorkGraph, positions: &Positions) -> Vec<Component> {
    let mut seen = vec![false; graph.len()];
    let mut components = Vec::new();

    for seed in 0..graph.len() {
        let Some(x) = positions.get(seed) else {
            continue;
        };
        if seen[seed] {
            continue;
        }

        seen[seed] = true;
        let mut component = Component {
            nodes: Vec::new(),
            min: x,
            max: x,
        };
        let mut queue = VecDeque::from([seed]);

        while let Some(node) = queue.pop_front() {
            let x = positions.at(node);
            component.min = component.min.min(x);
            component.max = component.max.max(x);
            component.nodes.push(node);

            for next in graph.children(node).chain(graph.parents(node)) {
                if !seen[next] && positions.get(next).is_some() {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }

        components.push(component);
    }

    components
}
