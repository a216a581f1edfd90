use crate::{Direction, GraphInput, PositionedNode};

/// A layout engine that can compute positions for graph nodes
///
/// Implementors turn a [`GraphInput`] into one [`PositionedNode`] per input
/// node, in input order. Given the same graph and direction an engine must
/// always return the same positions.
pub trait LayoutEngine {
    /// The error returned when the graph cannot be laid out
    type Error: std::error::Error;

    /// Compute node positions for the given graph
    ///
    /// # Errors
    /// Returns an error if the layout computation fails (e.g., graph contains
    /// cycles for DAG layouts, or other layout-specific constraints are violated)
    fn layout(
        &self,
        graph: &GraphInput,
        direction: Direction,
    ) -> Result<Vec<PositionedNode>, Self::Error>;
}
