//! Break edges spanning several layers into chains of virtual nodes.
//!
//! After this pass every edge of the working graph connects two adjacent
//! layers, which is what the barycenter placement and the crossing count
//! rely on.

use super::graph::{NodeIx, WorkGraph};
use tracing::debug;

/// Replace every long edge by a chain of virtual nodes, one per skipped layer
///
/// New nodes are appended to `layer_of` and to the bucket of their layer.
/// Returns the number of virtual nodes inserted.
pub(crate) fn insert_virtual_nodes(
    graph: &mut WorkGraph,
    layer_of: &mut Vec<usize>,
    layers: &mut [Vec<NodeIx>],
) -> usize {
    let long_edges: Vec<(NodeIx, NodeIx)> = graph
        .edges
        .all_edges()
        .filter(|&(source, target, _)| layer_of[target] > layer_of[source] + 1)
        .map(|(source, target, _)| (source, target))
        .collect();

    let mut inserted = 0;
    for (source, target) in long_edges {
        graph.edges.remove_edge(source, target);

        let mut prev = source;
        for layer in layer_of[source] + 1..layer_of[target] {
            let dummy = graph.add_virtual();
            layer_of.push(layer);
            layers[layer].push(dummy);
            graph.edges.add_edge(prev, dummy, ());
            prev = dummy;
            inserted += 1;
        }
        graph.edges.add_edge(prev, target, ());
    }

    debug_assert_eq!(layer_of.len(), graph.len());
    debug_assert!(graph
        .edges
        .all_edges()
        .all(|(source, target, _)| layer_of[target] == layer_of[source] + 1));

    if inserted > 0 {
        debug!("Inserted {inserted} virtual nodes");
    }

    inserted
}

#[cfg(test)]
mod tests {
    use super::super::layers::{assign_layers, group_layers};
    use super::*;
    use crate::GraphInput;
    use test_log::test;

    #[test]
    fn skip_edge_becomes_a_chain() {
        let mut graph = WorkGraph::build(&GraphInput::new(
            ["a", "b", "c", "d"],
            [("a", "b"), ("b", "c"), ("c", "d"), ("a", "d")],
        ));
        let mut layer_of = assign_layers(&graph).unwrap();
        let mut layers = group_layers(&layer_of);

        let inserted = insert_virtual_nodes(&mut graph, &mut layer_of, &mut layers);

        assert_eq!(inserted, 2);
        assert_eq!(layer_of, vec![0, 1, 2, 3, 1, 2]);
        assert_eq!(layers, vec![vec![0], vec![1, 4], vec![2, 5], vec![3]]);
        assert!(!graph.edges.contains_edge(0, 3));

        let chain: Vec<_> = graph.children(0).filter(|&n| !graph.is_real(n)).collect();
        assert_eq!(chain, vec![4]);
        assert_eq!(graph.children(4).collect::<Vec<_>>(), vec![5]);
        assert_eq!(graph.children(5).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn short_edges_are_untouched() {
        let mut graph = WorkGraph::build(&GraphInput::new(["a", "b", "c"], [("a", "b"), ("a", "c")]));
        let mut layer_of = assign_layers(&graph).unwrap();
        let mut layers = group_layers(&layer_of);

        assert_eq!(insert_virtual_nodes(&mut graph, &mut layer_of, &mut layers), 0);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edges.edge_count(), 2);
    }
}
