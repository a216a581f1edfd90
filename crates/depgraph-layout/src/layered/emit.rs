use super::graph::WorkGraph;
use super::positions::Positions;
use crate::{Direction, Point, PositionedNode};

/// Turn (layer, cross) pairs of the real nodes into final coordinates
///
/// The cross axis is shifted so that its smallest real coordinate is zero.
/// Every input node gets an entry, in input order.
pub(crate) fn emit_positions(
    graph: &WorkGraph,
    layer_of: &[usize],
    positions: &Positions,
    direction: Direction,
    rank_step: f64,
) -> Vec<PositionedNode> {
    let min_cross = (0..graph.real_count())
        .filter_map(|node| positions.get(node))
        .reduce(f64::min)
        .unwrap_or(0.0);

    graph
        .inputs()
        .iter()
        .map(|&node| {
            let position = match positions.get(node) {
                Some(cross) => direction.orient(layer_of[node] as f64 * rank_step, cross - min_cross),
                None => Point::default(),
            };
            PositionedNode {
                id: graph.id(node).to_owned(),
                position,
            }
        })
        .collect()
}
