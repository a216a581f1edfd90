use crate::GraphInput;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction::{Incoming, Outgoing};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Handle of a node in the working graph
pub(crate) type NodeIx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Real,
    /// Inserted to break an edge spanning several layers
    Virtual,
}

/// Arena of real and virtual nodes plus the edges between them
///
/// Real nodes get the handles `0..ids.len()` in input order, virtual nodes
/// are appended after them.
#[derive(Debug, Clone, Default)]
pub(crate) struct WorkGraph {
    ids: Vec<String>,
    index: HashMap<String, NodeIx>,
    kinds: Vec<NodeKind>,
    /// Handle of every input node, in input order
    inputs: Vec<NodeIx>,
    pub(crate) edges: DiGraphMap<NodeIx, ()>,
}

impl WorkGraph {
    /// Build the working graph, keeping only edges between known nodes
    pub(crate) fn build(input: &GraphInput) -> Self {
        let mut graph = Self::default();

        for id in &input.nodes {
            let node = match graph.index.get(id.as_str()) {
                Some(&node) => {
                    warn!("Duplicate node id {id:?}, sharing the position of its first occurrence");
                    node
                }
                None => {
                    let node = graph.ids.len();
                    graph.ids.push(id.clone());
                    graph.index.insert(id.clone(), node);
                    graph.kinds.push(NodeKind::Real);
                    graph.edges.add_node(node);
                    node
                }
            };
            graph.inputs.push(node);
        }

        let mut dropped = 0;
        for (source, target) in &input.edges {
            match (graph.node(source), graph.node(target)) {
                (Some(source), Some(target)) => {
                    graph.edges.add_edge(source, target, ());
                }
                _ => dropped += 1,
            }
        }

        debug!(
            "Built graph with {} nodes and {} edges ({dropped} edges with unknown endpoints dropped)",
            graph.ids.len(),
            graph.edges.edge_count()
        );

        graph
    }

    /// Total number of nodes, virtual ones included
    pub(crate) fn len(&self) -> usize {
        self.kinds.len()
    }

    pub(crate) fn real_count(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn node(&self, id: &str) -> Option<NodeIx> {
        self.index.get(id).copied()
    }

    /// Id of a real node
    pub(crate) fn id(&self, node: NodeIx) -> &str {
        &self.ids[node]
    }

    pub(crate) fn inputs(&self) -> &[NodeIx] {
        &self.inputs
    }

    pub(crate) fn kind(&self, node: NodeIx) -> NodeKind {
        self.kinds[node]
    }

    pub(crate) fn is_real(&self, node: NodeIx) -> bool {
        self.kind(node) == NodeKind::Real
    }

    pub(crate) fn children(&self, node: NodeIx) -> impl Iterator<Item = NodeIx> + '_ {
        self.edges.neighbors_directed(node, Outgoing)
    }

    pub(crate) fn parents(&self, node: NodeIx) -> impl Iterator<Item = NodeIx> + '_ {
        self.edges.neighbors_directed(node, Incoming)
    }

    /// Add an unconnected virtual node and return its handle
    pub(crate) fn add_virtual(&mut self) -> NodeIx {
        let node = self.kinds.len();
        self.kinds.push(NodeKind::Virtual);
        self.edges.add_node(node);
        node
    }
}
