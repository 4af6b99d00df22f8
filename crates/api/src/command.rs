//! Workspace commands: every operation that changes canvas state.
//!
//! Commands describe intent, not mechanics. They serialize as tagged JSON so
//! they can be scripted, recorded and replayed.

use crate::Target;
use canvas::Tool;
use glam::Vec2;
use node::{ObjectData, ObjectId, ObjectKind, ObjectPatch};
use serde::{Deserialize, Serialize};
use ui::Field;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Objects ===
    /// Create an object. Without a position it is centered in the viewport.
    Create {
        kind: ObjectKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Vec2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<Vec2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ObjectData>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<ObjectId>,
    },

    /// Copy targets, offset from the originals, and select the copies.
    Duplicate {
        #[serde(default)]
        target: Target,
        /// Defaults to the configured duplicate offset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        offset: Option<Vec2>,
    },

    /// Delete targets. Locked objects are skipped.
    Delete {
        #[serde(default)]
        target: Target,
    },

    /// Apply a partial update to one object.
    Update { id: ObjectId, patch: ObjectPatch },

    Move {
        #[serde(default)]
        target: Target,
        delta: Vec2,
    },

    SetPosition {
        #[serde(default)]
        target: Target,
        position: Vec2,
    },

    SetSize {
        #[serde(default)]
        target: Target,
        size: Vec2,
    },

    ToggleVisibility { id: ObjectId },

    ToggleLock { id: ObjectId },

    /// Attach targets to a parent, or detach them with `null`.
    SetParent {
        #[serde(default)]
        target: Target,
        parent: Option<ObjectId>,
    },

    /// Properties-panel input for the first selected object.
    EditField { field: Field, value: String },

    // === Selection ===
    Select {
        target: Target,
        #[serde(default)]
        add_to_selection: bool,
    },

    /// A click on a layer row; `shift` toggles instead of replacing.
    ClickLayer {
        id: ObjectId,
        #[serde(default)]
        shift: bool,
    },

    ClearSelection,

    SelectAll,

    // === Layers panel ===
    SearchLayers { query: String },

    ToggleExpanded { id: ObjectId },

    // === Viewport ===
    ZoomIn,
    ZoomOut,
    SetZoom { zoom: f32 },
    ZoomToFit,
    #[serde(rename = "zoom_to_100")]
    ZoomTo100,
    ZoomToSelection,
    SetPan { pan: Vec2 },
    Pan { delta: Vec2 },
    /// Center the camera on a world point.
    CenterOn { point: Vec2 },
    /// Press on the minimap at a pixel position.
    MinimapJump { pixel: Vec2 },

    // === Tool ===
    SetTool { tool: Tool },

    // === Batch ===
    Batch { commands: Vec<Command> },
}

/// Outcome of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    Success {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<ObjectId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<ObjectId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<ObjectId>,
    },
    Error {
        message: String,
    },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn created(ids: Vec<ObjectId>) -> Self {
        Self::Success {
            created: ids,
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn modified(ids: Vec<ObjectId>) -> Self {
        Self::Success {
            created: vec![],
            modified: ids,
            deleted: vec![],
        }
    }

    pub fn deleted(ids: Vec<ObjectId>) -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: ids,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Fold another result into this one. The first error wins.
    pub fn merge(self, other: CommandResult) -> CommandResult {
        match (self, other) {
            (
                Self::Success {
                    mut created,
                    mut modified,
                    mut deleted,
                },
                Self::Success {
                    created: c,
                    modified: m,
                    deleted: d,
                },
            ) => {
                created.extend(c);
                modified.extend(m);
                deleted.extend(d);
                Self::Success {
                    created,
                    modified,
                    deleted,
                }
            }
            (error @ Self::Error { .. }, _) | (_, error @ Self::Error { .. }) => error,
        }
    }
}
