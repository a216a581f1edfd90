use super::graph::{NodeIx, WorkGraph};
use super::LayoutError;
use petgraph::algo::toposort;

/// Assign each node the length of the longest path reaching it from a root
///
/// Roots (nodes without parents) land on layer 0, every other node one layer
/// below its deepest parent, so every edge points to a strictly higher layer.
pub(crate) fn assign_layers(graph: &WorkGraph) -> Result<Vec<usize>, LayoutError> {
    let topo_order = toposort(&graph.edges, None).map_err(|cycle| LayoutError::Cycle {
        node: graph.id(cycle.node_id()).to_owned(),
    })?;

    let mut layer_of = vec![0; graph.len()];
    for node in topo_order {
        layer_of[node] = graph
            .parents(node)
            .map(|parent| layer_of[parent] + 1)
            .max()
            .unwrap_or(0);
    }

    Ok(layer_of)
}

/// Group nodes by layer, keeping handle order within each layer
pub(crate) fn group_layers(layer_of: &[usize]) -> Vec<Vec<NodeIx>> {
    let Some(&max_layer) = layer_of.iter().max() else {
        return Vec::new();
    };

    let mut layers = vec![Vec::new(); max_layer + 1];
    for (node, &layer) in layer_of.iter().enumerate() {
        layers[layer].push(node);
    }
    layers
}
