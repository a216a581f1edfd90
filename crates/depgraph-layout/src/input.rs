use crate::Point;
use serde::{Deserialize, Serialize};

/// A dependency graph as handed over by the caller
///
/// Edges are `(source, target)` pairs of node ids. Edges naming an id that
/// is not in `nodes` are ignored by the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphInput {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

impl GraphInput {
    pub fn new<N, E, S, T>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        E: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            edges: edges
                .into_iter()
                .map(|(source, target)| (source.into(), target.into()))
                .collect(),
        }
    }
}

/// A node id with its computed position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    #[serde(flatten)]
    pub position: Point,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn edges_default_to_empty() {
        let graph: GraphInput = serde_json::from_str(r#"{"nodes": ["a", "b"]}"#).unwrap();
        assert_eq!(graph, GraphInput::new(["a", "b"], Vec::<(&str, &str)>::new()));
    }

    #[test]
    fn positioned_node_serializes_flat() {
        let node = PositionedNode {
            id: "a".into(),
            position: Point::new(260.0, 190.0),
        };
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r#"{"id":"a","x":260.0,"y":190.0}"#
        );
    }
}
