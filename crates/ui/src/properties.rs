//! Properties panel for the current selection.
//!
//! Only the first selected object (in collection order) is shown and edited.
//! Input is parsed leniently: anything unparseable becomes a safe default
//! instead of an error.

use canvas::Selection;
use node::{clamp_size, CanvasObject, ObjectData, ObjectId, ObjectKind, ObjectPatch};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// An editable inspector field.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, EnumIter, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    X,
    Y,
    Width,
    Height,
    /// Percent, 0 to 100.
    Opacity,
    /// Sections only.
    Label,
    /// Text and notes only.
    Content,
}

impl Field {
    /// Whether the field applies to objects of `kind`.
    pub fn applies_to(self, kind: ObjectKind) -> bool {
        match self {
            Field::X | Field::Y | Field::Width | Field::Height | Field::Opacity => true,
            Field::Label => kind == ObjectKind::Section,
            Field::Content => matches!(kind, ObjectKind::Text | ObjectKind::Note),
        }
    }
}

/// What the panel displays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InspectorView {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Size of the whole selection; edits still only touch `id`.
    pub selected_count: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub opacity_percent: f32,
    pub visible: bool,
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

pub fn inspect(objects: &[CanvasObject], selection: &Selection) -> Option<InspectorView> {
    let object = selection.objects(objects).next()?;
    let (label, content) = match &object.data {
        ObjectData::Section { label, .. } => (Some(label.clone()), None),
        ObjectData::Text { content, .. } | ObjectData::Note { content, .. } => (None, Some(content.clone())),
        _ => (None, None),
    };
    Some(InspectorView {
        id: object.id,
        kind: object.kind(),
        selected_count: selection.len(),
        x: object.x(),
        y: object.y(),
        width: object.width(),
        height: object.height(),
        opacity_percent: object.opacity * 100.0,
        visible: object.visible,
        locked: object.locked,
        label,
        content,
    })
}

/// Turn raw field input into a single-field patch for the first selected object.
///
/// Returns `None` with nothing selected or when the field does not apply to
/// the object's type.
pub fn edit(
    objects: &[CanvasObject],
    selection: &Selection,
    field: Field,
    input: &str,
) -> Option<(ObjectId, ObjectPatch)> {
    let object = selection.objects(objects).next()?;
    if !field.applies_to(object.kind()) {
        log::debug!("{field} does not apply to {} objects", object.kind());
        return None;
    }

    let mut patch = ObjectPatch::default();
    match field {
        Field::X => patch.x = Some(parse_number(input).unwrap_or(0.0)),
        Field::Y => patch.y = Some(parse_number(input).unwrap_or(0.0)),
        Field::Width => {
            let (width, _) = clamp_size(parse_number(input).unwrap_or(0.0), object.height());
            patch.width = Some(width);
        }
        Field::Height => {
            let (_, height) = clamp_size(object.width(), parse_number(input).unwrap_or(0.0));
            patch.height = Some(height);
        }
        Field::Opacity => {
            let percent = parse_number(input).unwrap_or(100.0).clamp(0.0, 100.0);
            patch.opacity = Some(percent / 100.0);
        }
        Field::Label | Field::Content => patch.data = Some(with_text(&object.data, field, input)),
    }
    Some((object.id, patch))
}

fn parse_number(input: &str) -> Option<f32> {
    input
        .trim()
        .trim_end_matches('%')
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
}

fn with_text(data: &ObjectData, field: Field, input: &str) -> ObjectData {
    let mut data = data.clone();
    match (&mut data, field) {
        (ObjectData::Section { label, .. }, Field::Label) => *label = input.to_string(),
        (ObjectData::Text { content, .. } | ObjectData::Note { content, .. }, Field::Content) => {
            *content = input.to_string()
        }
        _ => {}
    }
    data
}
