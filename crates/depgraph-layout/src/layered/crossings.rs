use super::graph::{NodeIx, WorkGraph};

/// Count the number of edge crossings in the current layer ordering
///
/// Two edges between the same pair of adjacent layers cross when their
/// sources and targets are ordered differently. Virtual nodes take part, so
/// a long edge counts once per layer gap it crosses through.
pub(crate) fn count_crossings(graph: &WorkGraph, layers: &[Vec<NodeIx>]) -> usize {
    let mut order = vec![0; graph.len()];
    for layer in layers {
        for (index, &node) in layer.iter().enumerate() {
            order[node] = index;
        }
    }

    let mut crossings = 0;
    for upper_layer in layers {
        let edges: Vec<(usize, usize)> = upper_layer
            .iter()
            .flat_map(|&source| graph.children(source).map(move |target| (source, target)))
            .map(|(source, target)| (order[source], order[target]))
            .collect();

        for (i, &(source1, target1)) in edges.iter().enumerate() {
            for &(source2, target2) in &edges[i + 1..] {
                if (source1 < source2 && target1 > target2) || (source1 > source2 && target1 < target2) {
                    crossings += 1;
                }
            }
        }
    }

    crossings
}
