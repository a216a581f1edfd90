use serde::{Deserialize, Serialize};

/// 2D point with f64 coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Orientation of the layers in the emitted diagram
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Direction {
    /// Layers stack downwards, layer-mates spread horizontally
    #[default]
    TopToBottom,
    /// Layers stack rightwards, layer-mates spread vertically
    LeftToRight,
}

impl Direction {
    /// Map a (primary, cross) pair onto screen coordinates
    pub fn orient(self, primary: f64, cross: f64) -> Point {
        match self {
            Direction::TopToBottom => Point::new(cross, primary),
            Direction::LeftToRight => Point::new(primary, cross),
        }
    }
}
