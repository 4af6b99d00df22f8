//! Read-only queries against a workspace.

use crate::Target;
use canvas::Tool;
use glam::Vec2;
use node::{CanvasObject, ObjectId};
use serde::{Deserialize, Serialize};
use ui::{InspectorView, LayerRow};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    GetSelection,

    GetAllObjects,

    GetObjects { target: Target },

    GetObject { id: ObjectId },

    /// Bounding box of every visible object.
    GetCanvasBounds,

    GetViewport,

    GetTool,

    GetObjectCount,

    /// Rows of the layers panel as currently filtered and expanded.
    GetLayers,

    /// What the properties panel shows for the selection.
    GetInspector,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Selection { ids: Vec<ObjectId> },

    Objects { objects: Vec<CanvasObject> },

    Object { object: Option<CanvasObject> },

    /// Both `None` on an empty canvas.
    Bounds {
        min: Option<Vec2>,
        max: Option<Vec2>,
    },

    Viewport { zoom: f32, pan: Vec2 },

    Tool { tool: Tool },

    Count { count: usize },

    Layers { rows: Vec<LayerRow> },

    Inspector { view: Option<InspectorView> },

    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_use_type_tag() {
        let json = serde_json::to_value(Query::GetObject {
            id: ObjectId::from_u128(1),
        })
        .unwrap();
        assert_eq!(json["type"], "get_object");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000001");
    }

    #[test]
    fn empty_bounds_serialize_as_null() {
        let json = serde_json::to_value(QueryResult::Bounds { min: None, max: None }).unwrap();
        assert!(json["min"].is_null());
    }
}
