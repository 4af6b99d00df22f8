//! Axis-aligned bounds in world space.
//!
//! Objects are never rotated, so every bound stays axis-aligned. An empty
//! collection reduces to [`Rect::EMPTY`], an inverted infinite rect that
//! callers must special-case before computing a scale from it.

use crate::{CanvasObject, CanvasPoint, CanvasSize};
use glam::Vec2;

/// An axis-aligned rectangle represented by minimum and maximum corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Identity for [`Rect::union`]: any union with it yields the other rect.
    pub const EMPTY: Rect = Rect {
        min: Vec2::INFINITY,
        max: Vec2::NEG_INFINITY,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: CanvasPoint, size: CanvasSize) -> Self {
        Self {
            min: origin.0,
            max: origin.0 + size.0,
        }
    }

    /// True for the sentinel and for any rect with no extent.
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Union of the bounds of every visible object.
///
/// Returns [`Rect::EMPTY`] when nothing is visible.
pub fn bounds_of<'a>(objects: impl IntoIterator<Item = &'a CanvasObject>) -> Rect {
    objects
        .into_iter()
        .filter(|o| o.visible)
        .fold(Rect::EMPTY, |acc, o| acc.union(&o.bounds()))
}
