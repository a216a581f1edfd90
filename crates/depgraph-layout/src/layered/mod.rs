mod compact;
mod components;
mod crossings;
mod emit;
mod graph;
mod layers;
mod normalize;
mod positions;

use crate::{Direction, GraphInput, LayoutEngine, PositionedNode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use compact::compact_layers;
use components::pack_components;
use crossings::count_crossings;
use emit::emit_positions;
use graph::{NodeIx, WorkGraph};
use layers::{assign_layers, group_layers};
use normalize::insert_virtual_nodes;
use positions::{assign_coordinates, Spacing};

/// Errors that can occur during layered layout computation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The graph contains a cycle going through the given node
    #[error("graph contains a cycle at node {node:?}")]
    Cycle { node: String },
}

/// Configuration for the layered (Sugiyama-style) DAG layout
///
/// Placing a node tries every placed layer-mate's left and right slot and checks
/// each candidate against all of them, so a layer of width `k` costs `O(k³)`
/// per sweep. Keep layers narrow (a few hundred nodes) for interactive use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredLayout {
    /// Width of a node's footprint along the cross axis
    pub node_width: f64,

    /// Height of a node's footprint along the layer axis
    pub node_height: f64,

    /// Free space between the footprints of two real layer-mates
    pub node_separation: f64,

    /// Minimum center-to-center gap between two virtual layer-mates
    pub dummy_separation: f64,

    /// Free space between two consecutive layers
    pub rank_separation: f64,

    /// Number of bottom-up/top-down refinement rounds
    pub iterations: usize,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 70.0,
            node_separation: 80.0,
            dummy_separation: 40.0,
            rank_separation: 120.0,
            iterations: 4,
        }
    }
}

impl LayeredLayout {
    /// Minimum center-to-center gap between two real layer-mates
    pub fn min_spacing(&self) -> f64 {
        self.node_width + self.node_separation
    }

    /// Distance between two consecutive layers along the layer axis
    pub fn rank_step(&self) -> f64 {
        self.node_height + self.rank_separation
    }

    fn spacing(&self) -> Spacing {
        Spacing {
            real: self.min_spacing(),
            dummy: self.dummy_separation,
        }
    }
}

/// Layer structure that can be cached and reused
///
/// Holds the working graph with its virtual nodes and the nodes organized
/// into layers. It only depends on the graph structure, not on spacing.
#[derive(Debug, Clone)]
pub struct Layers {
    pub(crate) graph: WorkGraph,

    /// Layer of every node, virtual ones included
    pub(crate) layer_of: Vec<usize>,

    /// Nodes organized into layers
    pub(crate) nodes: Vec<Vec<NodeIx>>,
}

impl Layers {
    /// Number of layers
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Layer assigned to the node with the given id
    pub fn layer_of(&self, id: &str) -> Option<usize> {
        self.graph.node(id).map(|node| self.layer_of[node])
    }

    /// Number of virtual nodes inserted to break long edges
    pub fn virtual_count(&self) -> usize {
        self.graph.len() - self.graph.real_count()
    }
}

/// Result of a layout run
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// One entry per input node, in input order
    pub nodes: Vec<PositionedNode>,

    /// Number of layers
    pub layer_count: usize,

    /// Number of weakly-connected components
    pub components: usize,

    /// Number of edge crossings (quality metric)
    pub crossings: usize,
}

impl LayeredLayout {
    /// Compute layer structure (cache this)
    ///
    /// This phase assigns nodes to layers and breaks long edges with virtual
    /// nodes. Edges naming unknown nodes are ignored.
    ///
    /// # Errors
    /// Returns an error if the graph contains cycles
    pub fn compute_layers(&self, input: &GraphInput) -> Result<Layers, LayoutError> {
        let mut graph = WorkGraph::build(input);
        let mut layer_of = assign_layers(&graph)?;
        let mut nodes = group_layers(&layer_of);
        insert_virtual_nodes(&mut graph, &mut layer_of, &mut nodes);

        debug!(
            "Assigned {} nodes to {} layers",
            graph.real_count(),
            nodes.len()
        );

        Ok(Layers {
            graph,
            layer_of,
            nodes,
        })
    }

    /// Compute positions from cached layers
    ///
    /// This phase orders and places the nodes of every layer, packs the
    /// disconnected components and maps the result onto `direction`.
    pub fn compute_positions(&self, layers: &Layers, direction: Direction) -> Layout {
        let spacing = self.spacing();
        let graph = &layers.graph;
        let mut order = layers.nodes.clone();

        let mut positions = assign_coordinates(graph, &mut order, spacing, self.iterations);
        compact_layers(graph, &mut order, &mut positions, spacing);
        let components = pack_components(graph, &mut positions, spacing.real);

        for layer in &mut order {
            positions.sort_layer(layer);
        }
        let crossings = count_crossings(graph, &order);

        debug!("Laid out {components} components with {crossings} crossings");

        debug_assert!(order.iter().all(|layer| {
            layer.windows(2).all(|pair| {
                let gap = spacing.gap(graph.kind(pair[0]), graph.kind(pair[1]));
                positions.at(pair[1]) - positions.at(pair[0]) >= gap - 1e-6
            })
        }));

        Layout {
            nodes: emit_positions(graph, &layers.layer_of, &positions, direction, self.rank_step()),
            layer_count: layers.len(),
            components,
            crossings,
        }
    }
}

// Implement LayoutEngine for any dependency graph
impl LayoutEngine for LayeredLayout {
    type Error = LayoutError;

    fn layout(
        &self,
        graph: &GraphInput,
        direction: Direction,
    ) -> Result<Vec<PositionedNode>, LayoutError> {
        let layers = self.compute_layers(graph)?;
        Ok(self.compute_positions(&layers, direction).nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::graph::NodeKind;
    use super::*;
    use crate::Point;
    use std::collections::{BTreeMap, HashSet};
    use test_log::test;

    const EPSILON: f64 = 1e-6;

    fn layout(nodes: &[&str], edges: &[(&str, &str)]) -> Vec<PositionedNode> {
        layout_with(nodes, edges, Direction::TopToBottom)
    }

    fn layout_with(nodes: &[&str], edges: &[(&str, &str)], direction: Direction) -> Vec<PositionedNode> {
        let graph = GraphInput::new(nodes.iter().copied(), edges.iter().copied());
        LayeredLayout::default().layout(&graph, direction).unwrap()
    }

    fn position(nodes: &[PositionedNode], id: &str) -> Point {
        nodes.iter().find(|n| n.id == id).unwrap().position
    }

    /// A graph with long edges, fan-in, fan-out and an isolated node
    fn workflow() -> (Vec<&'static str>, Vec<(&'static str, &'static str)>) {
        let nodes = vec![
            "brief", "design", "api", "db", "ui", "auth", "tests", "docs", "review", "release",
            "notes", "standalone",
        ];
        let edges = vec![
            ("brief", "design"),
            ("design", "api"),
            ("design", "db"),
            ("design", "ui"),
            ("api", "auth"),
            ("db", "auth"),
            ("auth", "tests"),
            ("ui", "tests"),
            ("brief", "docs"),
            ("docs", "release"),
            ("tests", "review"),
            ("review", "release"),
            ("brief", "release"),
            ("notes", "docs"),
        ];
        (nodes, edges)
    }

    #[test]
    fn empty_graph() {
        assert!(layout(&[], &[]).is_empty());
    }

    #[test]
    fn single_node() {
        assert_eq!(
            layout(&["A"], &[]),
            vec![PositionedNode {
                id: "A".into(),
                position: Point::default(),
            }]
        );
    }

    #[test]
    fn linear_chain() {
        let nodes = layout(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let step = LayeredLayout::default().rank_step();

        let (a, b, c) = (position(&nodes, "A"), position(&nodes, "B"), position(&nodes, "C"));
        assert_eq!((a.y, b.y, c.y), (0.0, step, 2.0 * step));
        assert_eq!(a.x, b.x);
        assert_eq!(b.x, c.x);
    }

    #[test]
    fn diamond() {
        let nodes = layout(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        );

        let (b, c, d) = (position(&nodes, "B"), position(&nodes, "C"), position(&nodes, "D"));
        assert_eq!(b.y, c.y);
        assert!((b.x - c.x).abs() >= LayeredLayout::default().min_spacing() - EPSILON);
        assert!(d.x > b.x.min(c.x) && d.x < b.x.max(c.x));
    }

    #[test]
    fn skip_edge() {
        let graph = GraphInput::new(
            ["A", "B", "C", "D"],
            [("A", "B"), ("B", "C"), ("C", "D"), ("A", "D")],
        );
        let engine = LayeredLayout::default();

        let layers = engine.compute_layers(&graph).unwrap();
        assert_eq!(layers.layer_of("D"), Some(3));
        assert_eq!(layers.virtual_count(), 2);
        assert_eq!(layers.len(), 4);

        let layout = engine.compute_positions(&layers, Direction::TopToBottom);
        let ids: Vec<_> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "D"]);
        assert_eq!(position(&layout.nodes, "D").y, 3.0 * engine.rank_step());
    }

    #[test]
    fn disconnected_components_do_not_overlap() {
        let nodes = layout(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);

        let span = |ids: [&str; 2]| {
            let xs = ids.map(|id| position(&nodes, id).x);
            (xs[0].min(xs[1]), xs[0].max(xs[1]))
        };
        let (first, second) = (span(["A", "B"]), span(["C", "D"]));
        let (left, right) = if first.0 <= second.0 { (first, second) } else { (second, first) };
        assert!(right.0 - left.1 >= LayeredLayout::default().min_spacing() - EPSILON);
    }

    #[test]
    fn every_input_node_is_emitted_once_in_order() {
        let (ids, edges) = workflow();
        let nodes = layout(&ids, &edges);

        let emitted: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(emitted, ids);
        assert_eq!(emitted.iter().collect::<HashSet<_>>().len(), ids.len());
        assert!(nodes.iter().all(|n| n.position.x >= 0.0 && n.position.y >= 0.0));
    }

    #[test]
    fn edges_point_to_later_layers() {
        let (ids, edges) = workflow();
        let nodes = layout(&ids, &edges);

        for (source, target) in edges {
            assert!(
                position(&nodes, target).y > position(&nodes, source).y,
                "{source} -> {target}"
            );
        }
    }

    #[test]
    fn real_layer_mates_keep_their_distance() {
        let (ids, edges) = workflow();
        let nodes = layout(&ids, &edges);
        let min_spacing = LayeredLayout::default().min_spacing();

        let mut by_layer: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
        for node in &nodes {
            by_layer.entry(node.position.y.to_bits()).or_default().push(node.position.x);
        }

        for xs in by_layer.values_mut() {
            xs.sort_by(f64::total_cmp);
            for pair in xs.windows(2) {
                assert!(pair[1] - pair[0] >= min_spacing - EPSILON, "{xs:?}");
            }
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let (ids, edges) = workflow();
        let first = layout(&ids, &edges);
        let second = layout(&ids, &edges);

        let bits = |nodes: &[PositionedNode]| {
            nodes
                .iter()
                .map(|n| (n.id.clone(), n.position.x.to_bits(), n.position.y.to_bits()))
                .collect::<Vec<_>>()
        };
        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn left_to_right_transposes_top_to_bottom() {
        let (ids, edges) = workflow();
        let vertical = layout_with(&ids, &edges, Direction::TopToBottom);
        let horizontal = layout_with(&ids, &edges, Direction::LeftToRight);

        for (v, h) in vertical.iter().zip(&horizontal) {
            assert_eq!(v.id, h.id);
            assert_eq!((v.position.x, v.position.y), (h.position.y, h.position.x));
        }
    }

    #[test]
    fn unknown_endpoints_are_ignored() {
        let nodes = layout(&["A", "B"], &[("A", "B"), ("A", "ghost"), ("ghost", "B")]);
        assert_eq!(nodes.len(), 2);
        assert!(position(&nodes, "B").y > position(&nodes, "A").y);
    }

    #[test]
    fn duplicate_ids_share_a_position() {
        let nodes = layout(&["A", "B", "A"], &[("A", "B")]);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], nodes[2]);
    }

    #[test]
    fn cycles_are_reported() {
        let graph = GraphInput::new(["A", "B"], [("A", "B"), ("B", "A")]);
        let err = LayeredLayout::default()
            .layout(&graph, Direction::TopToBottom)
            .unwrap_err();
        assert!(matches!(err, LayoutError::Cycle { .. }));
    }

    #[test]
    fn crossings_are_untangled() {
        let graph = GraphInput::new(["a", "b", "c", "d"], [("a", "d"), ("b", "c"), ("a", "c")]);
        let engine = LayeredLayout::default();
        let layout = engine.compute_positions(&engine.compute_layers(&graph).unwrap(), Direction::TopToBottom);

        assert_eq!(layout.crossings, 0);
        assert_eq!(layout.components, 1);
        assert_eq!(layout.layer_count, 2);
    }

    #[test]
    fn custom_spacing_is_honored() {
        let engine = LayeredLayout {
            node_width: 100.0,
            node_separation: 20.0,
            rank_separation: 30.0,
            ..Default::default()
        };
        let graph = GraphInput::new(["A", "B", "C"], [("A", "B"), ("A", "C")]);
        let nodes = engine.layout(&graph, Direction::TopToBottom).unwrap();

        let (b, c) = (position(&nodes, "B"), position(&nodes, "C"));
        assert_eq!(b.y, 100.0);
        assert!((b.x - c.x).abs() >= 120.0 - EPSILON);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let engine: LayeredLayout = serde_json::from_str(r#"{"iterations": 8}"#).unwrap();
        assert_eq!(
            engine,
            LayeredLayout {
                iterations: 8,
                ..Default::default()
            }
        );
        assert_eq!(engine.min_spacing(), 260.0);
        assert_eq!(engine.rank_step(), 190.0);
    }

    #[test]
    fn virtual_kinds_are_tracked() {
        let graph = GraphInput::new(["A", "B", "C"], [("A", "B"), ("B", "C"), ("A", "C")]);
        let layers = LayeredLayout::default().compute_layers(&graph).unwrap();

        let virtuals: Vec<_> = (0..layers.graph.len())
            .filter(|&n| layers.graph.kind(n) == NodeKind::Virtual)
            .collect();
        assert_eq!(virtuals, vec![3]);
        assert_eq!(layers.layer_of[3], 1);
    }
}
