//! The boundary between the canvas core and whatever draws it.
//!
//! A [`RenderSurface`] owns retained primitives, a world transform, a native
//! selection and a cursor. It reports user interaction back as
//! [`SurfaceEvent`]s. Nothing in this crate depends on how it draws.

use crate::image::ImageData;
use crate::tools::Cursor;
use glam::Vec2;
use node::{CanvasObject, CanvasPoint, CanvasSize, ObjectData, ObjectId, ScreenPoint};
use palette::Srgb;
use std::fmt::Debug;
use std::hash::Hash;

pub type Color = Srgb<u8>;

pub const NOTE_FILL: Color = Srgb::new(0xfe, 0xf0, 0x8a);
pub const SECTION_FILL: Color = Srgb::new(0xf4, 0xf4, 0xf5);
pub const SECTION_STROKE: Color = Srgb::new(0xd4, 0xd4, 0xd8);

/// Parse a `#rrggbb` / `#rgb` string, falling back when it is missing or malformed.
pub fn parse_color(value: &str, fallback: Color) -> Color {
    let value = value.trim();
    if value.is_empty() {
        return fallback;
    }
    value.parse::<Color>().unwrap_or_else(|err| {
        log::debug!("unparseable color {value:?} ({err}), using fallback");
        fallback
    })
}

/// What a primitive draws, derived from an object's payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    TextBlock {
        text: String,
        font_size: f32,
        font_family: String,
    },
    Image {
        src: Option<String>,
        placeholder: String,
    },
    StickyNote {
        text: String,
        fill: Color,
    },
    Frame {
        label: String,
        fill: Color,
        stroke: Color,
    },
    /// Shots and script pages: a titled card.
    Card {
        title: String,
        body: String,
    },
    Group {
        label: String,
    },
}

impl Visual {
    pub fn for_object(object: &CanvasObject) -> Self {
        match &object.data {
            ObjectData::Text {
                content,
                font_size,
                font_family,
            } => Visual::TextBlock {
                text: or_placeholder(content, "Text"),
                font_size: if *font_size > 0.0 { *font_size } else { 16.0 },
                font_family: or_placeholder(font_family, "Inter"),
            },
            ObjectData::Image { src, placeholder } => Visual::Image {
                src: src.clone().filter(|s| !s.trim().is_empty()),
                placeholder: placeholder.clone().unwrap_or_else(|| "Image".to_string()),
            },
            ObjectData::Note { content, color } => Visual::StickyNote {
                text: content.clone(),
                fill: parse_color(color, NOTE_FILL),
            },
            ObjectData::Section {
                label,
                background_color,
                border_color,
            } => Visual::Frame {
                label: or_placeholder(label, "Section"),
                fill: parse_color(background_color, SECTION_FILL),
                stroke: parse_color(border_color, SECTION_STROKE),
            },
            ObjectData::Shot { description, .. } => Visual::Card {
                title: object
                    .data
                    .label()
                    .map(str::to_string)
                    .or_else(|| object.data.numbered_title())
                    .unwrap_or_else(|| "Shot".to_string()),
                body: description.clone(),
            },
            ObjectData::Script { content, .. } => Visual::Card {
                title: object
                    .data
                    .heading()
                    .map(str::to_string)
                    .or_else(|| object.data.numbered_title())
                    .unwrap_or_else(|| "Script".to_string()),
                body: content.clone(),
            },
            ObjectData::Group { label } => Visual::Group {
                label: label.clone().unwrap_or_else(|| "Group".to_string()),
            },
        }
    }

    /// The image source to resolve, if this visual shows one.
    pub fn image_src(&self) -> Option<&str> {
        match self {
            Visual::Image { src, .. } => src.as_deref(),
            _ => None,
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Geometry and state attributes of a primitive, in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveAttrs {
    pub position: CanvasPoint,
    pub size: CanvasSize,
    pub opacity: f32,
    pub visible: bool,
    /// Locked objects render but cannot be selected, moved or resized.
    pub interactive: bool,
    pub z_index: i32,
}

impl PrimitiveAttrs {
    pub fn for_object(object: &CanvasObject) -> Self {
        Self {
            position: object.position,
            size: object.size,
            opacity: object.opacity,
            visible: object.visible,
            interactive: !object.locked,
            z_index: object.z_index,
        }
    }
}

/// A retained drawable, tagged with the id of the object it represents.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub tag: ObjectId,
    pub visual: Visual,
    pub attrs: PrimitiveAttrs,
}

impl Primitive {
    pub fn for_object(object: &CanvasObject) -> Self {
        Self {
            tag: object.id,
            visual: Visual::for_object(object),
            attrs: PrimitiveAttrs::for_object(object),
        }
    }
}

/// User interaction reported by a surface, in terms of its own handles.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent<H> {
    PointerDown {
        position: ScreenPoint,
        /// Topmost interactive primitive under the pointer.
        target: Option<H>,
    },
    PointerMove {
        position: ScreenPoint,
    },
    PointerUp {
        position: ScreenPoint,
    },
    PointerLeave,
    Wheel {
        delta_y: f32,
    },
    SpaceDown,
    SpaceUp,
    /// A native move or resize finished.
    ObjectModified {
        target: H,
        position: CanvasPoint,
        size: CanvasSize,
    },
    SelectionCreated {
        selected: Vec<H>,
    },
    SelectionUpdated {
        selected: Vec<H>,
    },
    SelectionCleared,
}

/// A retained-mode 2D drawing surface.
pub trait RenderSurface {
    type Handle: Copy + Eq + Hash + Debug;

    fn insert(&mut self, primitive: Primitive) -> Self::Handle;
    fn remove(&mut self, handle: Self::Handle);
    fn set_attrs(&mut self, handle: Self::Handle, attrs: &PrimitiveAttrs);
    fn set_visual(&mut self, handle: Self::Handle, visual: &Visual);
    fn set_image(&mut self, handle: Self::Handle, image: &ImageData);

    /// The object id a primitive was inserted with.
    fn tag(&self, handle: Self::Handle) -> Option<ObjectId>;

    /// Apply `screen = world * scale + translation` to everything drawn.
    fn set_transform(&mut self, scale: f32, translation: Vec2);

    /// Currently selected primitives.
    fn active_objects(&self) -> Vec<Self::Handle>;
    fn set_active_objects(&mut self, handles: &[Self::Handle]);
    fn discard_active_objects(&mut self);

    /// Toggle native selection and dragging.
    fn set_interaction_enabled(&mut self, enabled: bool);
    fn set_cursor(&mut self, cursor: Cursor);

    fn request_render(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::ObjectKind;

    #[test]
    fn bad_colors_fall_back() {
        assert_eq!(parse_color("", NOTE_FILL), NOTE_FILL);
        assert_eq!(parse_color("not a color", NOTE_FILL), NOTE_FILL);
        assert_eq!(parse_color("#ff0000", NOTE_FILL), Srgb::new(255, 0, 0));
    }

    #[test]
    fn empty_payloads_render_placeholders() {
        let mut text = CanvasObject::new(ObjectKind::Text, CanvasPoint::new(0.0, 0.0));
        text.data = ObjectData::Text {
            content: String::new(),
            font_size: 0.0,
            font_family: String::new(),
        };
        assert_eq!(
            Visual::for_object(&text),
            Visual::TextBlock {
                text: "Text".into(),
                font_size: 16.0,
                font_family: "Inter".into(),
            }
        );

        let image = CanvasObject::new(ObjectKind::Image, CanvasPoint::new(0.0, 0.0)).with_data(
            ObjectData::Image {
                src: Some("  ".into()),
                placeholder: None,
            },
        );
        let visual = Visual::for_object(&image);
        assert_eq!(visual.image_src(), None);
    }

    #[test]
    fn shot_card_uses_number_when_unlabeled() {
        let shot = CanvasObject::new(ObjectKind::Shot, CanvasPoint::new(0.0, 0.0)).with_data(
            ObjectData::Shot {
                label: None,
                shot_number: Some(4),
                description: "wide".into(),
            },
        );
        assert_eq!(
            Visual::for_object(&shot),
            Visual::Card {
                title: "Shot 4".into(),
                body: "wide".into(),
            }
        );
    }

    #[test]
    fn locked_objects_are_not_interactive() {
        let mut note = CanvasObject::new(ObjectKind::Note, CanvasPoint::new(0.0, 0.0));
        note.locked = true;
        assert!(!PrimitiveAttrs::for_object(&note).interactive);
    }
}
