use super::graph::{NodeIx, WorkGraph};
use super::positions::{mean, Positions, Spacing};

/// Pull nodes toward their real neighbours without breaking layer spacing
///
/// Runs once top-down and once bottom-up. Within a layer nodes are visited
/// left to right and never pass their left or right layer-mate.
pub(crate) fn compact_layers(
    graph: &WorkGraph,
    layers: &mut [Vec<NodeIx>],
    positions: &mut Positions,
    spacing: Spacing,
) {
    for layer in layers.iter_mut() {
        compact_layer(graph, layer, positions, spacing);
    }
    for layer in layers.iter_mut().rev() {
        compact_layer(graph, layer, positions, spacing);
    }
}

fn compact_layer(
    graph: &WorkGraph,
    layer: &mut [NodeIx],
    positions: &mut Positions,
    spacing: Spacing,
) {
    positions.sort_layer(layer);

    for index in 0..layer.len() {
        let node = layer[index];
        let Some(target) = real_neighbour_average(graph, positions, node) else {
            continue;
        };

        let kind = graph.kind(node);
        let min = match index.checked_sub(1).map(|i| layer[i]) {
            Some(left) => positions.at(left) + spacing.gap(graph.kind(left), kind),
            None => f64::NEG_INFINITY,
        };
        let max = match layer.get(index + 1) {
            Some(&right) => positions.at(right) - spacing.gap(kind, graph.kind(right)),
            None => f64::INFINITY,
        };

        if min <= max {
            positions.set(node, target.clamp(min, max));
        }
    }
}

/// Average position of the real children, or of the real parents when the
/// node has no real child
fn real_neighbour_average(graph: &WorkGraph, positions: &Positions, node: NodeIx) -> Option<f64> {
    let real = |n: &NodeIx| graph.is_real(*n);
    mean(graph.children(node).filter(real).filter_map(|n| positions.get(n)))
        .or_else(|| mean(graph.parents(node).filter(real).filter_map(|n| positions.get(n))))
}
