use crate::coords::{CanvasDelta, CanvasPoint, CanvasSize};
use crate::{ObjectId, Rect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Smallest width or height any object may have, in world units.
pub const MIN_OBJECT_SIZE: f32 = 50.0;

/// Enforce the size floor on both axes.
///
/// Zero, negative and NaN inputs all come back as [`MIN_OBJECT_SIZE`].
pub fn clamp_size(width: f32, height: f32) -> (f32, f32) {
    (width.max(MIN_OBJECT_SIZE), height.max(MIN_OBJECT_SIZE))
}

fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

/// The kind of object, mirrored by the [`ObjectData`] variant it carries.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
    Text,
    Image,
    Note,
    Section,
    Shot,
    Script,
    Group,
}

impl ObjectKind {
    /// Human-facing name, used for generated labels.
    pub fn title(&self) -> &'static str {
        match self {
            ObjectKind::Text => "Text",
            ObjectKind::Image => "Image",
            ObjectKind::Note => "Note",
            ObjectKind::Section => "Section",
            ObjectKind::Shot => "Shot",
            ObjectKind::Script => "Script",
            ObjectKind::Group => "Group",
        }
    }

    /// Size a freshly created object of this kind starts with.
    pub fn default_size(&self) -> CanvasSize {
        match self {
            ObjectKind::Text => CanvasSize::new(300.0, 100.0),
            ObjectKind::Image => CanvasSize::new(300.0, 200.0),
            ObjectKind::Note => CanvasSize::new(200.0, 200.0),
            ObjectKind::Section => CanvasSize::new(600.0, 400.0),
            ObjectKind::Shot => CanvasSize::new(320.0, 240.0),
            ObjectKind::Script => CanvasSize::new(400.0, 300.0),
            ObjectKind::Group => CanvasSize::new(400.0, 300.0),
        }
    }
}

fn default_font_size() -> f32 {
    16.0
}

fn default_font_family() -> String {
    "Inter".to_string()
}

/// Type-specific payload of a canvas object.
///
/// Every field has a serde default so partial records coming back from the
/// store deserialize instead of failing; renderers treat empty strings as
/// "show a placeholder".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectData {
    Text {
        #[serde(default)]
        content: String,
        #[serde(default = "default_font_size")]
        font_size: f32,
        #[serde(default = "default_font_family")]
        font_family: String,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Note {
        #[serde(default)]
        content: String,
        #[serde(default)]
        color: String,
    },
    Section {
        #[serde(default)]
        label: String,
        #[serde(default)]
        background_color: String,
        #[serde(default)]
        border_color: String,
    },
    Shot {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shot_number: Option<u32>,
        #[serde(default)]
        description: String,
    },
    Script {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scene_number: Option<u32>,
        #[serde(default)]
        content: String,
    },
    Group {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl ObjectData {
    /// Default payload for a new object of `kind`.
    pub fn default_for(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Text => ObjectData::Text {
                content: "Text".to_string(),
                font_size: default_font_size(),
                font_family: default_font_family(),
            },
            ObjectKind::Image => ObjectData::Image {
                src: None,
                placeholder: Some("Image".to_string()),
            },
            ObjectKind::Note => ObjectData::Note {
                content: String::new(),
                color: "#fef08a".to_string(),
            },
            ObjectKind::Section => ObjectData::Section {
                label: "Section".to_string(),
                background_color: "#f4f4f5".to_string(),
                border_color: "#d4d4d8".to_string(),
            },
            ObjectKind::Shot => ObjectData::Shot {
                label: None,
                shot_number: None,
                description: String::new(),
            },
            ObjectKind::Script => ObjectData::Script {
                heading: None,
                scene_number: None,
                content: String::new(),
            },
            ObjectKind::Group => ObjectData::Group { label: None },
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectData::Text { .. } => ObjectKind::Text,
            ObjectData::Image { .. } => ObjectKind::Image,
            ObjectData::Note { .. } => ObjectKind::Note,
            ObjectData::Section { .. } => ObjectKind::Section,
            ObjectData::Shot { .. } => ObjectKind::Shot,
            ObjectData::Script { .. } => ObjectKind::Script,
            ObjectData::Group { .. } => ObjectKind::Group,
        }
    }

    /// An explicit, non-empty label if the payload has one.
    pub fn label(&self) -> Option<&str> {
        let label = match self {
            ObjectData::Section { label, .. } => Some(label.as_str()),
            ObjectData::Shot { label, .. } | ObjectData::Group { label } => label.as_deref(),
            ObjectData::Text { .. }
            | ObjectData::Image { .. }
            | ObjectData::Note { .. }
            | ObjectData::Script { .. } => None,
        };
        label.filter(|l| !l.trim().is_empty())
    }

    /// An explicit, non-empty heading if the payload has one.
    pub fn heading(&self) -> Option<&str> {
        match self {
            ObjectData::Script { heading, .. } => heading.as_deref().filter(|h| !h.trim().is_empty()),
            _ => None,
        }
    }

    /// Type name plus its number, for kinds that carry one ("Shot 12", "Scene 4").
    pub fn numbered_title(&self) -> Option<String> {
        match self {
            ObjectData::Shot {
                shot_number: Some(n),
                ..
            } => Some(format!("Shot {n}")),
            ObjectData::Script {
                scene_number: Some(n),
                ..
            } => Some(format!("Scene {n}")),
            _ => None,
        }
    }

    /// The image source, if this is an image with a non-empty `src`.
    pub fn image_src(&self) -> Option<&str> {
        match self {
            ObjectData::Image { src, .. } => src.as_deref().filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

/// Everything needed to create an object, minus the id the store assigns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDraft {
    pub data: ObjectData,
    pub position: CanvasPoint,
    pub size: CanvasSize,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ObjectId>,
}

fn default_opacity() -> f32 {
    1.0
}

fn default_visible() -> bool {
    true
}

impl ObjectDraft {
    /// A draft with the kind's default payload and size.
    pub fn new(kind: ObjectKind, position: CanvasPoint) -> Self {
        Self {
            data: ObjectData::default_for(kind),
            position,
            size: kind.default_size(),
            z_index: 0,
            opacity: 1.0,
            visible: true,
            locked: false,
            parent_id: None,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.data.kind()
    }
}

/// A canvas object: the unit of placement on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasObject {
    pub id: ObjectId,
    pub data: ObjectData,
    /// Top-left corner in world space.
    pub position: CanvasPoint,
    /// Never below [`MIN_OBJECT_SIZE`] on either axis.
    pub size: CanvasSize,
    /// Paint order; ties fall back to insertion order.
    #[serde(default)]
    pub z_index: i32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ObjectId>,
}

impl CanvasObject {
    pub fn new(kind: ObjectKind, position: CanvasPoint) -> Self {
        Self::from_draft(ObjectId::new(), ObjectDraft::new(kind, position))
    }

    /// Materialize a draft under `id`, enforcing the size and opacity invariants.
    pub fn from_draft(id: ObjectId, draft: ObjectDraft) -> Self {
        let (width, height) = clamp_size(draft.size.width(), draft.size.height());
        Self {
            id,
            data: draft.data,
            position: draft.position,
            size: CanvasSize::new(width, height),
            z_index: draft.z_index,
            opacity: clamp_opacity(draft.opacity),
            visible: draft.visible,
            locked: draft.locked,
            parent_id: draft.parent_id,
        }
    }

    /// Every field except the id.
    pub fn to_draft(&self) -> ObjectDraft {
        ObjectDraft {
            data: self.data.clone(),
            position: self.position,
            size: self.size,
            z_index: self.z_index,
            opacity: self.opacity,
            visible: self.visible,
            locked: self.locked,
            parent_id: self.parent_id,
        }
    }

    pub fn with_size(mut self, size: CanvasSize) -> Self {
        let (width, height) = clamp_size(size.width(), size.height());
        self.size = CanvasSize::new(width, height);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    pub fn with_data(mut self, data: ObjectData) -> Self {
        self.data = data;
        self
    }

    pub fn kind(&self) -> ObjectKind {
        self.data.kind()
    }

    pub fn x(&self) -> f32 {
        self.position.x()
    }

    pub fn y(&self) -> f32 {
        self.position.y()
    }

    pub fn width(&self) -> f32 {
        self.size.width()
    }

    pub fn height(&self) -> f32 {
        self.size.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Check if a world point is inside this object's bounding box.
    pub fn contains_point(&self, point: CanvasPoint) -> bool {
        self.bounds().contains(point.0)
    }

    pub fn translate(&mut self, delta: CanvasDelta) {
        self.position = self.position + delta;
    }

    /// Apply a partial update, clamping geometry to the object invariants.
    ///
    /// Returns whether anything changed. A payload of a different kind is
    /// ignored: an object's type is fixed at creation.
    pub fn apply(&mut self, patch: &ObjectPatch) -> bool {
        let before = self.clone();

        if let Some(x) = patch.x {
            self.position.0.x = x;
        }
        if let Some(y) = patch.y {
            self.position.0.y = y;
        }
        let (width, height) = clamp_size(
            patch.width.unwrap_or(self.size.width()),
            patch.height.unwrap_or(self.size.height()),
        );
        self.size = CanvasSize::new(width, height);
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = clamp_opacity(opacity);
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        match patch.parent {
            Some(ParentChange::Detach) => self.parent_id = None,
            Some(ParentChange::Attach(parent)) if parent != self.id => self.parent_id = Some(parent),
            _ => {}
        }
        if let Some(data) = &patch.data {
            if data.kind() == self.kind() {
                self.data = data.clone();
            } else {
                log::warn!(
                    "ignoring {} payload for {} object {:?}",
                    data.kind(),
                    self.kind(),
                    self.id
                );
            }
        }

        *self != before
    }
}

/// How a patch changes an object's parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentChange {
    Detach,
    Attach(ObjectId),
}

/// A partial update: only the fields that are `Some` change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ObjectData>,
}

impl ObjectPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// A resize, with the size floor already applied.
    pub fn size(width: f32, height: f32) -> Self {
        let (width, height) = clamp_size(width, height);
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Default::default()
        }
    }

    pub fn locked(locked: bool) -> Self {
        Self {
            locked: Some(locked),
            ..Default::default()
        }
    }

    pub fn data(data: ObjectData) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn clamp_size_enforces_floor() {
        assert_eq!(clamp_size(0.0, -20.0), (50.0, 50.0));
        assert_eq!(clamp_size(49.9, 300.0), (50.0, 300.0));
        assert_eq!(clamp_size(f32::NAN, 120.0), (50.0, 120.0));
        assert_eq!(clamp_size(75.0, 50.0), (75.0, 50.0));
    }

    #[test]
    fn new_text_object_uses_default_geometry() {
        let text = CanvasObject::new(ObjectKind::Text, CanvasPoint::new(0.0, 0.0));
        assert_eq!(text.width(), 300.0);
        assert_eq!(text.height(), 100.0);
        assert_eq!(text.opacity, 1.0);
        assert!(text.visible);
        assert!(!text.locked);
    }

    #[test]
    fn every_kind_has_a_matching_default_payload() {
        for kind in ObjectKind::iter() {
            assert_eq!(ObjectData::default_for(kind).kind(), kind);
            let size = kind.default_size();
            assert!(size.width() >= MIN_OBJECT_SIZE && size.height() >= MIN_OBJECT_SIZE);
        }
    }

    #[test]
    fn patch_changes_only_given_fields() {
        let mut object = CanvasObject::new(ObjectKind::Note, CanvasPoint::new(10.0, 10.0));
        let before = object.clone();
        assert!(object.apply(&ObjectPatch::position(120.0, 80.0)));
        assert_eq!(object.position, CanvasPoint::new(120.0, 80.0));
        assert_eq!(object.size, before.size);
        assert_eq!(object.data, before.data);
    }

    #[test]
    fn patch_clamps_size_and_opacity() {
        let mut object = CanvasObject::new(ObjectKind::Note, CanvasPoint::default());
        object.apply(&ObjectPatch {
            width: Some(-5.0),
            opacity: Some(3.0),
            ..Default::default()
        });
        assert_eq!(object.width(), MIN_OBJECT_SIZE);
        assert_eq!(object.height(), 200.0);
        assert_eq!(object.opacity, 1.0);
    }

    #[test]
    fn patch_with_other_kind_payload_is_ignored() {
        let mut object = CanvasObject::new(ObjectKind::Note, CanvasPoint::default());
        let changed = object.apply(&ObjectPatch::data(ObjectData::default_for(ObjectKind::Text)));
        assert!(!changed);
        assert_eq!(object.kind(), ObjectKind::Note);
    }

    #[test]
    fn object_cannot_become_its_own_parent() {
        let mut object = CanvasObject::new(ObjectKind::Group, CanvasPoint::default());
        let id = object.id;
        object.apply(&ObjectPatch {
            parent: Some(ParentChange::Attach(id)),
            ..Default::default()
        });
        assert_eq!(object.parent_id, None);
    }

    #[test]
    fn draft_roundtrip_keeps_everything_but_id() {
        let object = CanvasObject::new(ObjectKind::Section, CanvasPoint::new(5.0, 6.0)).with_z_index(3);
        let copy = CanvasObject::from_draft(ObjectId::new(), object.to_draft());
        assert_ne!(copy.id, object.id);
        assert_eq!(copy.position, object.position);
        assert_eq!(copy.z_index, 3);
        assert_eq!(copy.data, object.data);
    }

    #[test]
    fn sparse_payload_deserializes_with_defaults() {
        let data: ObjectData = serde_json::from_str(r#"{"type": "text"}"#).unwrap();
        match data {
            ObjectData::Text {
                content,
                font_size,
                font_family,
            } => {
                assert!(content.is_empty());
                assert_eq!(font_size, 16.0);
                assert_eq!(font_family, "Inter");
            }
            other => panic!("expected text payload, got {other:?}"),
        }
    }

    #[test]
    fn label_resolution_helpers() {
        let shot = ObjectData::Shot {
            label: None,
            shot_number: Some(12),
            description: String::new(),
        };
        assert_eq!(shot.label(), None);
        assert_eq!(shot.numbered_title().as_deref(), Some("Shot 12"));

        let script = ObjectData::Script {
            heading: Some("INT. STUDIO - NIGHT".into()),
            scene_number: Some(4),
            content: String::new(),
        };
        assert_eq!(script.heading(), Some("INT. STUDIO - NIGHT"));

        let blank_section = ObjectData::Section {
            label: "  ".into(),
            background_color: String::new(),
            border_color: String::new(),
        };
        assert_eq!(blank_section.label(), None);
    }
}
