use glam::Vec2;
use node::{bounds_of, CanvasObject, CanvasPoint, Rect, ScreenPoint};
use serde::{Deserialize, Serialize};

/// Smallest zoom, in percent.
pub const MIN_ZOOM: f32 = 1.0;
/// Largest zoom, in percent.
pub const MAX_ZOOM: f32 = 6400.0;
pub const DEFAULT_ZOOM: f32 = 100.0;
pub const ZOOM_IN_FACTOR: f32 = 1.1;
pub const ZOOM_OUT_FACTOR: f32 = 0.9;

/// How fit operations frame their content.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Share of the visible viewport the whole canvas fills on zoom-to-fit.
    pub fit_fraction: f32,
    /// Share of the visible viewport the selection fills on zoom-to-selection.
    pub selection_fraction: f32,
    /// Screen-space gap left between the viewport origin and the content's top-left.
    pub margin: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            fit_fraction: 0.9,
            selection_fraction: 0.8,
            margin: 40.0,
        }
    }
}

/// Camera state for the canvas.
///
/// `screen = world * (zoom / 100) + pan`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Zoom level in percent (100 = 1:1).
    pub zoom: f32,
    /// World-to-screen translation in screen pixels.
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zoom as a plain multiplier (1.0 = 100%).
    pub fn scale(&self) -> f32 {
        self.zoom / 100.0
    }

    /// Set the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom * ZOOM_OUT_FACTOR);
    }

    /// Wheel zoom: scrolling up (negative delta) zooms in, down zooms out.
    pub fn zoom_by_wheel(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.zoom_in();
        } else if delta_y > 0.0 {
            self.zoom_out();
        }
    }

    /// Back to 100% without touching the pan.
    pub fn zoom_to_100(&mut self) {
        self.zoom = DEFAULT_ZOOM;
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Pan by a delta in screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn world_to_screen(&self, point: CanvasPoint) -> ScreenPoint {
        ScreenPoint(point.0 * self.scale() + self.pan)
    }

    pub fn screen_to_world(&self, point: ScreenPoint) -> CanvasPoint {
        CanvasPoint((point.0 - self.pan) / self.scale())
    }

    /// Pan so `world` lands in the middle of a viewport of `viewport_size` pixels.
    pub fn center_on(&mut self, world: CanvasPoint, viewport_size: Vec2) {
        self.pan = viewport_size * 0.5 - world.0 * self.scale();
    }

    /// The world-space rectangle currently visible.
    pub fn visible_world_rect(&self, viewport_size: Vec2) -> Rect {
        let min = self.screen_to_world(ScreenPoint(Vec2::ZERO)).0;
        Rect::new(min, min + viewport_size / self.scale())
    }

    /// Fit every visible object into the viewport.
    ///
    /// An empty canvas resets the zoom to 100% and leaves the pan alone.
    pub fn zoom_to_fit<'a>(
        &mut self,
        objects: impl IntoIterator<Item = &'a CanvasObject>,
        viewport_size: Vec2,
        options: &FitOptions,
    ) {
        let bounds = bounds_of(objects);
        if bounds.is_empty() {
            self.zoom_to_100();
            return;
        }
        self.frame(bounds, viewport_size, options.fit_fraction, options.margin);
    }

    /// Fit the selected objects into the viewport. No-op for an empty selection.
    pub fn zoom_to_selection<'a>(
        &mut self,
        selected: impl IntoIterator<Item = &'a CanvasObject>,
        viewport_size: Vec2,
        options: &FitOptions,
    ) {
        let bounds = bounds_of(selected);
        if bounds.is_empty() {
            return;
        }
        self.frame(bounds, viewport_size, options.selection_fraction, options.margin);
    }

    fn frame(&mut self, bounds: Rect, viewport_size: Vec2, fraction: f32, margin: f32) {
        let content = bounds.size().max(Vec2::ONE);
        let available = viewport_size.max(Vec2::ONE) * fraction;
        let scale = (available.x / content.x).min(available.y / content.y);
        self.set_zoom(scale * 100.0);
        self.pan = Vec2::splat(margin) - bounds.min * self.scale();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasSize, ObjectKind};

    fn note(x: f32, y: f32, w: f32, h: f32) -> CanvasObject {
        CanvasObject::new(ObjectKind::Note, CanvasPoint::new(x, y)).with_size(CanvasSize::new(w, h))
    }

    #[test]
    fn zoom_stays_clamped() {
        let mut viewport = Viewport::new();
        for _ in 0..200 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.zoom, MAX_ZOOM);
        for _ in 0..500 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.zoom, MIN_ZOOM);

        viewport.set_zoom(-40.0);
        assert_eq!(viewport.zoom, MIN_ZOOM);
        viewport.set_zoom(f32::NAN);
        assert_eq!(viewport.zoom, MIN_ZOOM);
    }

    #[test]
    fn wheel_direction_picks_factor() {
        let mut viewport = Viewport::new();
        viewport.zoom_by_wheel(-3.0);
        assert!((viewport.zoom - 110.0).abs() < 1e-3);
        viewport.zoom_by_wheel(3.0);
        assert!((viewport.zoom - 99.0).abs() < 1e-3);
        viewport.zoom_by_wheel(0.0);
        assert!((viewport.zoom - 99.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_to_100_keeps_pan() {
        let mut viewport = Viewport {
            zoom: 250.0,
            pan: Vec2::new(-30.0, 12.0),
        };
        viewport.zoom_to_100();
        assert_eq!(viewport.zoom, 100.0);
        assert_eq!(viewport.pan, Vec2::new(-30.0, 12.0));
    }

    #[test]
    fn world_screen_roundtrip() {
        let viewport = Viewport {
            zoom: 200.0,
            pan: Vec2::new(10.0, -20.0),
        };
        let screen = viewport.world_to_screen(CanvasPoint::new(5.0, 5.0));
        assert_eq!(screen, ScreenPoint::new(20.0, -10.0));
        assert_eq!(viewport.screen_to_world(screen), CanvasPoint::new(5.0, 5.0));
    }

    #[test]
    fn empty_canvas_fit_resets_zoom_only() {
        let mut viewport = Viewport {
            zoom: 300.0,
            pan: Vec2::new(7.0, 9.0),
        };
        viewport.zoom_to_fit(&Vec::<CanvasObject>::new(), Vec2::new(800.0, 600.0), &FitOptions::default());
        assert_eq!(viewport.zoom, 100.0);
        assert_eq!(viewport.pan, Vec2::new(7.0, 9.0));
    }

    #[test]
    fn fit_uses_smaller_axis_and_aligns_top_left() {
        let objects = vec![note(100.0, 100.0, 900.0, 100.0)];
        let mut viewport = Viewport::new();
        viewport.zoom_to_fit(&objects, Vec2::new(1000.0, 1000.0), &FitOptions::default());

        // Width-bound: 900 px available for 900 units.
        assert!((viewport.zoom - 100.0).abs() < 1e-3);
        let top_left = viewport.world_to_screen(CanvasPoint::new(100.0, 100.0));
        assert!((top_left.x() - 40.0).abs() < 1e-3);
        assert!((top_left.y() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn fit_is_idempotent() {
        let objects = vec![note(-300.0, 50.0, 120.0, 80.0), note(900.0, 700.0, 400.0, 250.0)];
        let size = Vec2::new(1200.0, 700.0);
        let options = FitOptions::default();

        let mut viewport = Viewport::new();
        viewport.zoom_to_fit(&objects, size, &options);
        let first = viewport;
        viewport.zoom_to_fit(&objects, size, &options);
        assert_eq!(viewport, first);
    }

    #[test]
    fn fit_clamps_to_max_zoom() {
        let objects = vec![note(0.0, 0.0, 50.0, 50.0)];
        let mut viewport = Viewport::new();
        viewport.zoom_to_fit(&objects, Vec2::new(100_000.0, 100_000.0), &FitOptions::default());
        assert_eq!(viewport.zoom, MAX_ZOOM);
    }

    #[test]
    fn selection_fit_is_noop_when_empty() {
        let mut viewport = Viewport {
            zoom: 42.0,
            pan: Vec2::new(1.0, 2.0),
        };
        let before = viewport;
        viewport.zoom_to_selection(&Vec::<CanvasObject>::new(), Vec2::new(800.0, 600.0), &FitOptions::default());
        assert_eq!(viewport, before);
    }

    #[test]
    fn selection_fit_uses_tighter_fraction() {
        let objects = vec![note(0.0, 0.0, 1000.0, 1000.0)];
        let size = Vec2::new(1000.0, 1000.0);
        let mut fit = Viewport::new();
        fit.zoom_to_fit(&objects, size, &FitOptions::default());
        let mut selection = Viewport::new();
        selection.zoom_to_selection(&objects, size, &FitOptions::default());
        assert!((fit.zoom - 90.0).abs() < 1e-3);
        assert!((selection.zoom - 80.0).abs() < 1e-3);
    }

    #[test]
    fn center_on_puts_point_mid_viewport() {
        let mut viewport = Viewport {
            zoom: 50.0,
            pan: Vec2::ZERO,
        };
        let size = Vec2::new(800.0, 600.0);
        viewport.center_on(CanvasPoint::new(500.0, 500.0), size);
        let screen = viewport.world_to_screen(CanvasPoint::new(500.0, 500.0));
        assert_eq!(screen, ScreenPoint::new(400.0, 300.0));
        let visible = viewport.visible_world_rect(size);
        assert_eq!(visible.center(), Vec2::new(500.0, 500.0));
    }
}
