//! Canvas tools and the cursor each one shows.

use node::ObjectKind;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The active interaction mode of the canvas.
#[derive(
    Default,
    Debug,
    Display,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tool {
    /// Click to select, drag to move or resize, drag on empty canvas to marquee
    #[default]
    Select,
    /// Drag anywhere to pan
    Hand,
    /// Reserved; wheel zoom works with every tool
    Zoom,
    /// Places text objects
    Text,
    /// Places section frames
    Frame,
}

impl Tool {
    /// Single-key shortcut shown in the toolbar.
    pub fn shortcut(self) -> char {
        match self {
            Tool::Select => 'v',
            Tool::Hand => 'h',
            Tool::Zoom => 'z',
            Tool::Text => 't',
            Tool::Frame => 'f',
        }
    }

    /// The object kind a pointer-down creates, for placement tools.
    pub fn placement_kind(self) -> Option<ObjectKind> {
        match self {
            Tool::Text => Some(ObjectKind::Text),
            Tool::Frame => Some(ObjectKind::Section),
            Tool::Select | Tool::Hand | Tool::Zoom => None,
        }
    }

    /// Cursor while the tool is armed but no gesture is running.
    pub fn idle_cursor(self) -> Cursor {
        match self {
            Tool::Select => Cursor::Default,
            Tool::Hand => Cursor::Grab,
            Tool::Zoom => Cursor::ZoomIn,
            Tool::Text => Cursor::Text,
            Tool::Frame => Cursor::Crosshair,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Grabbing,
    Text,
    Crosshair,
    ZoomIn,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn shortcuts_are_unique() {
        let mut keys: Vec<char> = Tool::iter().map(Tool::shortcut).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys, vec!['f', 'h', 't', 'v', 'z']);
    }

    #[test]
    fn only_text_and_frame_place_objects() {
        let placing: Vec<Tool> = Tool::iter().filter(|t| t.placement_kind().is_some()).collect();
        assert_eq!(placing, vec![Tool::Text, Tool::Frame]);
    }

    #[test]
    fn parses_snake_case_names() {
        assert_eq!("hand".parse::<Tool>().unwrap(), Tool::Hand);
        assert_eq!(Tool::Frame.to_string(), "frame");
    }
}
