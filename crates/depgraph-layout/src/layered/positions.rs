use super::graph::{NodeIx, NodeKind, WorkGraph};
use std::cmp::Ordering;
use tracing::trace;

/// Slack allowed when checking gaps, absorbs rounding of averaged positions
const EPSILON: f64 = 1e-6;

/// Minimum center-to-center gaps between layer-mates
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Spacing {
    /// Between two real nodes
    pub(crate) real: f64,
    /// Between two virtual nodes
    pub(crate) dummy: f64,
}

impl Spacing {
    /// Required gap between two nodes of the given kinds
    pub(crate) fn gap(&self, a: NodeKind, b: NodeKind) -> f64 {
        match (a, b) {
            (NodeKind::Real, NodeKind::Real) => self.real,
            (NodeKind::Virtual, NodeKind::Virtual) => self.dummy,
            _ => (self.real + self.dummy) / 2.0,
        }
    }
}

/// Cross-axis coordinate of every node, indexed by handle
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Positions(Vec<Option<f64>>);

impl Positions {
    pub(crate) fn new(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub(crate) fn get(&self, node: NodeIx) -> Option<f64> {
        self.0.get(node).copied().flatten()
    }

    /// Position of a node that is known to be placed
    pub(crate) fn at(&self, node: NodeIx) -> f64 {
        debug_assert!(self.get(node).is_some(), "node {node} has no position");
        self.get(node).unwrap_or_default()
    }

    pub(crate) fn set(&mut self, node: NodeIx, x: f64) {
        self.0[node] = Some(x);
    }

    pub(crate) fn shift(&mut self, node: NodeIx, dx: f64) {
        if let Some(x) = &mut self.0[node] {
            *x += dx;
        }
    }

    /// Sort a layer by ascending position
    pub(crate) fn sort_layer(&self, layer: &mut [NodeIx]) {
        layer.sort_by(|&a, &b| self.at(a).total_cmp(&self.at(b)));
    }
}

/// Which neighbours a layer is placed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reference {
    Parents,
    Children,
}

/// Assign a cross-axis coordinate to every node of every layer
///
/// The first layer is laid out left to right, every following layer is
/// placed against its parents. The result is then refined by `iterations`
/// rounds of a bottom-up sweep followed by a top-down sweep. Each layer in
/// `layers` ends up sorted by position.
pub(crate) fn assign_coordinates(
    graph: &WorkGraph,
    layers: &mut [Vec<NodeIx>],
    spacing: Spacing,
    iterations: usize,
) -> Positions {
    let mut positions = Positions::new(graph.len());

    let Some((first, rest)) = layers.split_first_mut() else {
        return positions;
    };
    for (index, &node) in first.iter().enumerate() {
        positions.set(node, index as f64 * spacing.real);
    }
    for layer in rest {
        place_layer(graph, layer, &mut positions, Reference::Parents, spacing);
    }

    for iteration in 0..iterations {
        for layer in layers.iter_mut().rev() {
            place_layer(graph, layer, &mut positions, Reference::Children, spacing);
        }
        for layer in layers.iter_mut() {
            place_layer(graph, layer, &mut positions, Reference::Parents, spacing);
        }
        trace!("Finished refinement sweep {iteration}");
    }

    positions
}

/// Mean position of the placed neighbours of `node`
///
/// Placing against parents only looks at parents, so parentless nodes are
/// orphans. Placing against children falls back to the parents when no child
/// has a position yet.
pub(crate) fn barycenter(
    graph: &WorkGraph,
    positions: &Positions,
    node: NodeIx,
    reference: Reference,
) -> Option<f64> {
    let parents = || mean(graph.parents(node).filter_map(|n| positions.get(n)));
    let children = || mean(graph.children(node).filter_map(|n| positions.get(n)));
    match reference {
        Reference::Parents => parents(),
        Reference::Children => children().or_else(parents),
    }
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), x| (sum + x, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    kind: NodeKind,
    x: f64,
}

/// Re-place every node of a layer around the barycenter of its neighbours
fn place_layer(
    graph: &WorkGraph,
    layer: &mut Vec<NodeIx>,
    positions: &mut Positions,
    reference: Reference,
    spacing: Spacing,
) {
    let mut order: Vec<(NodeIx, Option<f64>)> = layer
        .iter()
        .map(|&node| (node, barycenter(graph, positions, node, reference)))
        .collect();

    // Orphans (no placed neighbour) go last, stable sort keeps ties in layer order
    order.sort_by(|a, b| match (a.1, b.1) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let mut slots: Vec<Slot> = Vec::with_capacity(order.len());
    for &(node, score) in &order {
        let kind = graph.kind(node);
        let x = match score {
            Some(desired) => nearest_free_slot(desired, kind, &slots, spacing),
            None => after_rightmost(kind, &slots, spacing),
        };
        positions.set(node, x);
        slots.push(Slot { kind, x });
    }

    layer.clear();
    layer.extend(order.into_iter().map(|(node, _)| node));
    positions.sort_layer(layer);
}

/// The coordinate closest to `desired` keeping the required gap to every slot
///
/// Tries `desired` itself and both sides of every placed slot. Falls back to
/// appending after the rightmost slot when no candidate is free.
fn nearest_free_slot(desired: f64, kind: NodeKind, placed: &[Slot], spacing: Spacing) -> f64 {
    let is_free = |x: f64| {
        placed
            .iter()
            .all(|slot| (x - slot.x).abs() + EPSILON >= spacing.gap(slot.kind, kind))
    };

    let candidates = std::iter::once(desired).chain(placed.iter().flat_map(|slot| {
        let gap = spacing.gap(slot.kind, kind);
        [slot.x + gap, slot.x - gap]
    }));

    let mut best: Option<f64> = None;
    for candidate in candidates.filter(|&x| is_free(x)) {
        if best.map_or(true, |b| (candidate - desired).abs() < (b - desired).abs()) {
            best = Some(candidate);
        }
    }

    best.unwrap_or_else(|| after_rightmost(kind, placed, spacing))
}

/// First coordinate right of every placed slot, or 0 in an empty layer
fn after_rightmost(kind: NodeKind, placed: &[Slot], spacing: Spacing) -> f64 {
    placed
        .iter()
        .map(|slot| slot.x + spacing.gap(slot.kind, kind))
        .reduce(f64::max)
        .unwrap_or(0.0)
}
