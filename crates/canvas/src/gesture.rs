//! Tool-modal pointer handling.
//!
//! The pan/select mode is a pure function of the armed tool and whether
//! space is held; [`GestureState`] only tracks the gesture in flight.

use crate::tools::{Cursor, Tool};
use glam::Vec2;
use node::{ObjectId, ObjectKind, ScreenPoint};

/// A pointer gesture in progress.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
    Panning { last: ScreenPoint },
    /// The surface is moving or resizing an object natively.
    Dragging { target: ObjectId },
    /// Rubber-band selection from an empty-canvas press.
    Marquee { start: ScreenPoint },
}

/// What a pointer-down turned into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerDown {
    Pan,
    Drag(ObjectId),
    Marquee,
    Place(ObjectKind),
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct GestureState {
    tool: Tool,
    space_held: bool,
    active: Option<Gesture>,
}

impl GestureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            log::debug!("tool {} -> {}", self.tool, tool);
            self.tool = tool;
        }
    }

    pub fn space_held(&self) -> bool {
        self.space_held
    }

    /// Hold or release the transient pan key. Releasing it ends a pan in flight.
    pub fn set_space_held(&mut self, held: bool) {
        self.space_held = held;
        if !self.pans() && matches!(self.active, Some(Gesture::Panning { .. })) {
            self.active = None;
        }
    }

    /// Whether a press pans instead of selecting.
    pub fn pans(&self) -> bool {
        self.tool == Tool::Hand || self.space_held
    }

    /// Whether the surface's own selection and dragging should be live.
    pub fn native_interaction(&self) -> bool {
        !self.pans()
    }

    pub fn active(&self) -> Option<&Gesture> {
        self.active.as_ref()
    }

    pub fn cursor(&self) -> Cursor {
        match self.active {
            Some(Gesture::Panning { .. }) => Cursor::Grabbing,
            _ if self.pans() => Cursor::Grab,
            _ => self.tool.idle_cursor(),
        }
    }

    /// Start a gesture. `target` is the interactive object under the pointer.
    pub fn pointer_down(&mut self, position: ScreenPoint, target: Option<ObjectId>) -> PointerDown {
        if self.pans() {
            self.active = Some(Gesture::Panning { last: position });
            return PointerDown::Pan;
        }
        match self.tool {
            Tool::Select => match target {
                Some(target) => {
                    self.active = Some(Gesture::Dragging { target });
                    PointerDown::Drag(target)
                }
                None => {
                    self.active = Some(Gesture::Marquee { start: position });
                    PointerDown::Marquee
                }
            },
            Tool::Text | Tool::Frame => self
                .tool
                .placement_kind()
                .map_or(PointerDown::Ignored, PointerDown::Place),
            Tool::Zoom | Tool::Hand => PointerDown::Ignored,
        }
    }

    /// Advance the gesture. Returns the pan delta while panning.
    pub fn pointer_move(&mut self, position: ScreenPoint) -> Option<Vec2> {
        match &mut self.active {
            Some(Gesture::Panning { last }) => {
                let delta = position - *last;
                *last = position;
                (delta != Vec2::ZERO).then_some(delta)
            }
            _ => None,
        }
    }

    /// Finish whatever is in flight (pointer up or leaving the surface).
    pub fn end(&mut self) -> Option<Gesture> {
        self.active.take()
    }
}
