//! Scaled overview of the canvas with the current viewport outlined.

use canvas::Viewport;
use glam::Vec2;
use node::{bounds_of, CanvasObject, CanvasPoint, ObjectId, Rect, ScreenPoint};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// Raster size in pixels.
    pub width: f32,
    pub height: f32,
    /// Smallest world region shown, per axis.
    pub min_region: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            width: 150.0,
            height: 100.0,
            min_region: 1000.0,
        }
    }
}

/// Mapping between world space and minimap pixels for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapLayout {
    /// World region mapped into the minimap.
    pub region: Rect,
    /// Uniform world-to-pixel scale.
    pub scale: f32,
    /// Letterbox padding in pixels.
    pub offset: Vec2,
}

impl MinimapLayout {
    pub fn compute(objects: &[CanvasObject], config: &MinimapConfig) -> Self {
        let bounds = bounds_of(objects);
        let floor = Vec2::splat(config.min_region.max(1.0));
        let region = if bounds.is_empty() {
            Rect::new(Vec2::ZERO, floor)
        } else {
            let size = bounds.size().max(floor);
            let center = bounds.center();
            Rect::new(center - size * 0.5, center + size * 0.5)
        };

        let pixels = Vec2::new(config.width, config.height).max(Vec2::ONE);
        let per_axis = pixels / region.size();
        let scale = per_axis.x.min(per_axis.y);
        let offset = (pixels - region.size() * scale) * 0.5;
        Self {
            region,
            scale,
            offset,
        }
    }

    pub fn to_minimap(&self, world: CanvasPoint) -> Vec2 {
        (world.0 - self.region.min) * self.scale + self.offset
    }

    pub fn to_world(&self, pixel: Vec2) -> CanvasPoint {
        CanvasPoint((pixel - self.offset) / self.scale + self.region.min)
    }

    /// Pixel rectangles of every visible object.
    pub fn object_rects(&self, objects: &[CanvasObject]) -> Vec<(ObjectId, Rect)> {
        objects
            .iter()
            .filter(|o| o.visible)
            .map(|o| {
                let bounds = o.bounds();
                let min = self.to_minimap(CanvasPoint(bounds.min));
                let max = self.to_minimap(CanvasPoint(bounds.max));
                (o.id, Rect::new(min, max))
            })
            .collect()
    }

    /// Outline of what the main viewport currently shows.
    pub fn viewport_rect(&self, viewport: &Viewport, viewport_size: Vec2) -> Rect {
        let visible = viewport.visible_world_rect(viewport_size);
        Rect::new(
            self.to_minimap(CanvasPoint(visible.min)),
            self.to_minimap(viewport.screen_to_world(ScreenPoint(viewport_size))),
        )
    }
}

/// Pointer handling for the minimap. Every press or drag jumps the camera to
/// the world point under the pointer.
#[derive(Debug, Default)]
pub struct Minimap {
    config: MinimapConfig,
    dragging: bool,
}

impl Minimap {
    pub fn new(config: MinimapConfig) -> Self {
        Self {
            config,
            dragging: false,
        }
    }

    pub fn config(&self) -> &MinimapConfig {
        &self.config
    }

    pub fn layout(&self, objects: &[CanvasObject]) -> MinimapLayout {
        MinimapLayout::compute(objects, &self.config)
    }

    pub fn pointer_down(&mut self, objects: &[CanvasObject], pixel: Vec2) -> CanvasPoint {
        self.dragging = true;
        self.layout(objects).to_world(pixel)
    }

    pub fn pointer_move(&mut self, objects: &[CanvasObject], pixel: Vec2) -> Option<CanvasPoint> {
        self.dragging.then(|| self.layout(objects).to_world(pixel))
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasSize, ObjectKind};

    fn spanning(min: f32, max: f32) -> Vec<CanvasObject> {
        vec![
            CanvasObject::new(ObjectKind::Note, CanvasPoint::new(min, min)),
            CanvasObject::new(ObjectKind::Note, CanvasPoint::new(max - 200.0, max - 200.0)),
        ]
    }

    #[test]
    fn letterboxes_wide_minimap() {
        let layout = MinimapLayout::compute(&spanning(0.0, 1000.0), &MinimapConfig::default());
        assert!((layout.scale - 0.1).abs() < 1e-6);
        assert!((layout.offset.x - 25.0).abs() < 1e-4);
        assert!(layout.offset.y.abs() < 1e-4);
    }

    #[test]
    fn click_in_middle_targets_world_center() {
        let objects = spanning(0.0, 1000.0);
        let mut minimap = Minimap::new(MinimapConfig::default());
        let target = minimap.pointer_down(&objects, Vec2::new(75.0, 50.0));
        assert!((target.x() - 500.0).abs() < 1.0);
        assert!((target.y() - 500.0).abs() < 1.0);
    }

    #[test]
    fn drag_only_while_pressed() {
        let objects = spanning(0.0, 1000.0);
        let mut minimap = Minimap::new(MinimapConfig::default());
        assert!(minimap.pointer_move(&objects, Vec2::new(10.0, 10.0)).is_none());
        minimap.pointer_down(&objects, Vec2::new(75.0, 50.0));
        let target = minimap.pointer_move(&objects, Vec2::new(25.0, 0.0)).unwrap();
        assert!(target.x().abs() < 1e-3 && target.y().abs() < 1e-3);
        minimap.pointer_up();
        assert!(!minimap.is_dragging());
    }

    #[test]
    fn tiny_canvas_uses_region_floor() {
        let objects = vec![CanvasObject::new(ObjectKind::Note, CanvasPoint::new(0.0, 0.0))
            .with_size(CanvasSize::new(50.0, 50.0))];
        let layout = MinimapLayout::compute(&objects, &MinimapConfig::default());
        assert!((layout.scale - 0.1).abs() < 1e-6);
        assert_eq!(layout.region.center(), Vec2::new(25.0, 25.0));
    }

    #[test]
    fn empty_canvas_has_finite_scale() {
        let layout = MinimapLayout::compute(&[], &MinimapConfig::default());
        assert!(layout.scale.is_finite());
        assert_eq!(layout.object_rects(&[]), Vec::new());
    }

    #[test]
    fn viewport_outline_tracks_camera() {
        let objects = spanning(0.0, 1000.0);
        let layout = MinimapLayout::compute(&objects, &MinimapConfig::default());
        let viewport = Viewport::default();
        let outline = layout.viewport_rect(&viewport, Vec2::new(500.0, 500.0));
        assert_eq!(outline.min, Vec2::new(25.0, 0.0));
        assert!((outline.max.x - 75.0).abs() < 1e-4);
        assert!((outline.max.y - 50.0).abs() < 1e-4);
    }
}
