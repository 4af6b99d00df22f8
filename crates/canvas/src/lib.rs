//! The canvas core: camera, tools, selection, and the adapter that keeps a
//! retained-mode drawing surface in step with the object model.
//!
//! Drawing itself happens behind [`RenderSurface`]. [`HeadlessSurface`] is an
//! in-memory implementation for tests and scripted runs.

mod adapter;
pub mod gesture;
mod headless;
mod image;
mod selection;
mod surface;
mod tools;
mod viewport;

pub use adapter::{CanvasEvent, ReconcileReport, RenderAdapter};
pub use gesture::{Gesture, GestureState, PointerDown};
pub use headless::{HeadlessSurface, NativePrimitive, PrimitiveKey};
pub use image::{ImageData, ImageError, ImageLoader, ImageRequest, QueuedImageLoader};
pub use selection::{Selection, SelectionReconciler};
pub use surface::{
    parse_color, Color, Primitive, PrimitiveAttrs, RenderSurface, SurfaceEvent, Visual,
};
pub use tools::{Cursor, Tool};
pub use viewport::{
    FitOptions, Viewport, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};

pub use node::{CanvasPoint, CanvasSize, ScreenPoint};
