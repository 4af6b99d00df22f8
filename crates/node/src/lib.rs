//! Object model for the canvas workspace.
//!
//! Canvas objects form a flat collection with a `parent_id` back-reference
//! for grouping. Paint order is `z_index`, ties broken by position in the
//! collection.

mod bounds;
pub mod coords;
mod object;
mod object_id;

pub use bounds::{bounds_of, Rect};
pub use coords::{CanvasDelta, CanvasPoint, CanvasSize, ScreenPoint};
pub use object::{
    clamp_size, CanvasObject, ObjectData, ObjectDraft, ObjectKind, ObjectPatch, ParentChange,
    MIN_OBJECT_SIZE,
};
pub use object_id::{ObjectId, ParseIdError};
