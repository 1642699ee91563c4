//! Board text items

use serde::{Deserialize, Serialize};

use super::layer::Layer;
use crate::geometry::stroke_font::text_strokes;
use crate::geometry::{Point, Segment, Size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    pub position: Point,
    /// Glyph cell size
    pub size: Size,
    pub thickness: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub mirrored: bool,
    pub layer: Layer,
}

impl Text {
    pub fn new(text: &str, position: Point, size: Size, thickness: f64, layer: Layer) -> Self {
        Self {
            text: text.to_string(),
            position,
            size,
            thickness,
            angle: 0.0,
            mirrored: false,
            layer,
        }
    }

    /// Stroke centrelines in board coordinates.
    pub fn stroke_segments(&self) -> Vec<Segment> {
        let place = |p: Point| {
            let p = if self.mirrored { Point::new(-p.x, p.y) } else { p };
            p.rotated(self.angle) + self.position
        };
        text_strokes(&self.text, self.size)
            .into_iter()
            .map(|s| Segment::new(place(s.start), place(s.end)))
            .collect()
    }
}
