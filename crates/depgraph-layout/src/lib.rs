//! Layered layout for dependency graphs
//!
//! This crate computes 2D positions for the nodes of a directed acyclic
//! graph given as a flat list of string ids and `(source, target)` edges.
//! Nodes are assigned to layers by longest path, long edges are broken by
//! virtual nodes, layer-mates are ordered and placed with a barycenter
//! heuristic, and disconnected components are packed side by side.
//!
//! # Layout Engines
//!
//! - [`LayeredLayout`]: Sugiyama-style layered layout for DAGs
//!
//! # Example
//!
//! ```
//! use depgraph_layout::{Direction, GraphInput, LayeredLayout, LayoutEngine};
//!
//! let graph = GraphInput::new(
//!     ["build", "test", "release"],
//!     [("build", "test"), ("test", "release")],
//! );
//!
//! let engine = LayeredLayout::default();
//!
//! // Use the LayoutEngine trait (simple, single-phase):
//! let nodes = engine.layout(&graph, Direction::TopToBottom).unwrap();
//! assert_eq!(nodes.len(), 3);
//!
//! // Or directly by calling each step for better control
//! let layers = engine.compute_layers(&graph).unwrap();
//! let layout = engine.compute_positions(&layers, Direction::LeftToRight);
//! assert_eq!(layout.layer_count, 3);
//! ```

mod engine;
mod geometry;
mod input;

pub mod layered;

// Re-export core types and traits
pub use engine::LayoutEngine;
pub use geometry::{Direction, Point};
pub use input::{GraphInput, PositionedNode};

// Re-export layered layout types
pub use layered::{LayeredLayout, Layers, Layout, LayoutError};
