//! Typed coordinates for the canvas.
//!
//! Distinct types for world and screen space so the two can't be mixed by
//! accident.
//!
//! # Coordinate Spaces
//!
//! - **Canvas (world) space**: where objects live (unbounded, independent of zoom/pan)
//! - **Screen space**: pixels on the visible rendering surface, after the viewport transform

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in canvas (world) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint(pub Vec2);

/// Position in screen space, in pixels relative to the rendering surface origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint(pub Vec2);

/// Width and height in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize(pub Vec2);

/// Movement in canvas space (not a position).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDelta(pub Vec2);

// === CanvasPoint ===

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for CanvasPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasPoint> for Vec2 {
    fn from(p: CanvasPoint) -> Self {
        p.0
    }
}

impl Add<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, delta: CanvasDelta) -> Self::Output {
        CanvasPoint(self.0 + delta.0)
    }
}

impl Sub for CanvasPoint {
    type Output = CanvasDelta;

    fn sub(self, other: CanvasPoint) -> Self::Output {
        CanvasDelta(self.0 - other.0)
    }
}

// === ScreenPoint ===

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for ScreenPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<ScreenPoint> for Vec2 {
    fn from(p: ScreenPoint) -> Self {
        p.0
    }
}

impl Sub for ScreenPoint {
    type Output = Vec2;

    /// Pixel offset between two screen points.
    fn sub(self, other: ScreenPoint) -> Self::Output {
        self.0 - other.0
    }
}

// === CanvasSize ===

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.0.x
    }

    pub fn height(&self) -> f32 {
        self.0.y
    }

    pub fn half(&self) -> CanvasDelta {
        CanvasDelta(self.0 * 0.5)
    }
}

impl From<Vec2> for CanvasSize {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasSize> for Vec2 {
    fn from(s: CanvasSize) -> Self {
        s.0
    }
}

// === CanvasDelta ===

impl CanvasDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }

    pub fn dx(&self) -> f32 {
        self.0.x
    }

    pub fn dy(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for CanvasDelta {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl Sub for CanvasDelta {
    type Output = CanvasDelta;

    fn sub(self, other: CanvasDelta) -> Self::Output {
        CanvasDelta(self.0 - other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_point_add_delta() {
        let point = CanvasPoint::new(10.0, 20.0);
        let result = point + CanvasDelta::new(20.0, 20.0);
        assert_eq!(result, CanvasPoint::new(30.0, 40.0));
    }

    #[test]
    fn canvas_point_sub_gives_delta() {
        let delta = CanvasPoint::new(10.0, 20.0) - CanvasPoint::new(3.0, 5.0);
        assert_eq!(delta.dx(), 7.0);
        assert_eq!(delta.dy(), 15.0);
    }

    #[test]
    fn screen_points_subtract_to_pixel_offset() {
        let offset = ScreenPoint::new(40.0, 10.0) - ScreenPoint::new(25.0, 30.0);
        assert_eq!(offset, Vec2::new(15.0, -20.0));
    }

    #[test]
    fn half_size_is_a_delta() {
        let half = CanvasSize::new(300.0, 100.0).half();
        assert_eq!(half, CanvasDelta::new(150.0, 50.0));
    }
}
