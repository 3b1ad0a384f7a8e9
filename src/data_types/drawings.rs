use serde::{Deserialize, Serialize};

use super::data::Color;

/// A point in data space: dense bar slot (padding-adjusted), value on the
/// pane's Y axis, and the pane it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataCoordinate {
    pub bar: i64,
    pub value: f64,
    pub pane: usize,
}

/// A point in screen space, relative to the chart canvas origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: PixelPoint) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingKind {
    Line,
    Fibonacci,
}

/// Retracement ladder drawn by a fibonacci element, top to bottom.
pub const FIB_LEVELS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawingStyle {
    pub color: Color,
    pub line_width: f32,
}

impl Default for DrawingStyle {
    fn default() -> Self {
        Self {
            color: Color::new("#3b82f6"),
            line_width: 2.0,
        }
    }
}

/// A two-anchor annotation element. Mutated in place by id; only a move that
/// crosses a pane boundary may reassign its pane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawingElement {
    pub id: String,
    pub kind: DrawingKind,
    pub points: [DataCoordinate; 2],
    pub pane: usize,
    #[serde(default)]
    pub style: DrawingStyle,
}

impl DrawingElement {
    pub fn line(id: impl Into<String>, start: DataCoordinate, end: DataCoordinate) -> Self {
        Self {
            id: id.into(),
            kind: DrawingKind::Line,
            points: [start, end],
            pane: start.pane,
            style: DrawingStyle::default(),
        }
    }

    pub fn fibonacci(id: impl Into<String>, start: DataCoordinate, end: DataCoordinate) -> Self {
        Self {
            id: id.into(),
            kind: DrawingKind::Fibonacci,
            points: [start, end],
            pane: start.pane,
            style: DrawingStyle::default(),
        }
    }
}
