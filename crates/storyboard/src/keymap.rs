//! Named workspace actions and the keystrokes bound to them.
//!
//! Keystrokes are written as dash-separated modifiers followed by the key,
//! e.g. `"cmd-shift-a"`, `"shift-1"` or `"delete"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Something a keystroke can trigger.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    ZoomToFit,
    #[serde(rename = "zoom_to_100")]
    #[strum(serialize = "zoom_to_100")]
    ZoomTo100,
    ZoomToSelection,
    ZoomIn,
    ZoomOut,
    SelectAll,
    Deselect,
    Duplicate,
    Delete,
    SelectTool,
    HandTool,
    ZoomTool,
    TextTool,
    FrameTool,
}

impl Action {
    pub fn description(self) -> &'static str {
        match self {
            Action::ZoomToFit => "Zoom to fit",
            Action::ZoomTo100 => "Zoom to 100%",
            Action::ZoomToSelection => "Zoom to selection",
            Action::ZoomIn => "Zoom in",
            Action::ZoomOut => "Zoom out",
            Action::SelectAll => "Select all",
            Action::Deselect => "Deselect",
            Action::Duplicate => "Duplicate selection",
            Action::Delete => "Delete selection",
            Action::SelectTool => "Select tool",
            Action::HandTool => "Hand tool",
            Action::ZoomTool => "Zoom tool",
            Action::TextTool => "Text tool",
            Action::FrameTool => "Frame tool",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    /// Cmd on macOS, the super key elsewhere.
    pub platform: bool,
    pub function: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keystroke {
    pub modifiers: Modifiers,
    pub key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum KeystrokeError {
    #[error("empty keystroke")]
    Empty,

    #[error("unknown modifier {modifier:?} in {keystroke:?}")]
    UnknownModifier { modifier: String, keystroke: String },
}

impl Keystroke {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            modifiers: Modifiers::default(),
            key: key.into(),
        }
    }
}

impl FromStr for Keystroke {
    type Err = KeystrokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeystrokeError::Empty);
        }

        // The key itself may be "-", as in "-" or "cmd--".
        let (prefix, key) = if s == "-" {
            ("", "-")
        } else if let Some(prefix) = s.strip_suffix("--") {
            (prefix, "-")
        } else {
            match s.rsplit_once('-') {
                Some((prefix, key)) => (prefix, key),
                None => ("", s),
            }
        };
        if key.is_empty() {
            return Err(KeystrokeError::Empty);
        }

        let mut modifiers = Modifiers::default();
        for part in prefix.split('-').filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.control = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "cmd" | "meta" | "command" | "platform" => modifiers.platform = true,
                "fn" | "function" => modifiers.function = true,
                other => {
                    return Err(KeystrokeError::UnknownModifier {
                        modifier: other.to_string(),
                        keystroke: s.to_string(),
                    })
                }
            }
        }

        Ok(Self {
            modifiers,
            key: key.to_lowercase(),
        })
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (on, name) in [
            (m.control, "ctrl"),
            (m.alt, "alt"),
            (m.shift, "shift"),
            (m.platform, "cmd"),
            (m.function, "fn"),
        ] {
            if on {
                write!(f, "{name}-")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

const DEFAULT_BINDINGS: &[(&str, Action)] = &[
    ("v", Action::SelectTool),
    ("h", Action::HandTool),
    ("z", Action::ZoomTool),
    ("t", Action::TextTool),
    ("f", Action::FrameTool),
    ("shift-1", Action::ZoomToFit),
    ("shift-0", Action::ZoomTo100),
    ("shift-2", Action::ZoomToSelection),
    ("=", Action::ZoomIn),
    ("-", Action::ZoomOut),
    ("cmd-a", Action::SelectAll),
    ("cmd-d", Action::Duplicate),
    ("delete", Action::Delete),
    ("backspace", Action::Delete),
    ("escape", Action::Deselect),
];

/// Keystroke-to-action bindings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyMap {
    bindings: BTreeMap<Keystroke, Action>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in bindings.
    pub fn standard() -> Self {
        let mut keymap = Self::new();
        for (keystroke, action) in DEFAULT_BINDINGS {
            if let Ok(keystroke) = keystroke.parse() {
                keymap.bind(keystroke, *action);
            }
        }
        keymap
    }

    /// Standard bindings with `overrides` layered on top.
    pub fn with_overrides(overrides: &BTreeMap<String, Action>) -> Result<Self, KeystrokeError> {
        let mut keymap = Self::standard();
        for (keystroke, action) in overrides {
            keymap.bind(keystroke.parse()?, *action);
        }
        Ok(keymap)
    }

    pub fn bind(&mut self, keystroke: Keystroke, action: Action) {
        if let Some(previous) = self.bindings.insert(keystroke.clone(), action) {
            if previous != action {
                log::debug!("rebinding {keystroke} from {previous} to {action}");
            }
        }
    }

    pub fn action_for(&self, keystroke: &Keystroke) -> Option<Action> {
        self.bindings.get(keystroke).copied()
    }

    /// Parse `input` and look it up.
    pub fn resolve(&self, input: &str) -> Result<Option<Action>, KeystrokeError> {
        Ok(self.action_for(&input.parse()?))
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&Keystroke, Action)> {
        self.bindings.iter().map(|(k, a)| (k, *a))
    }

    /// Every keystroke bound to `action`.
    pub fn keystrokes_for(&self, action: Action) -> Vec<&Keystroke> {
        self.bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_modifiers_and_key() {
        let keystroke: Keystroke = "cmd-shift-A".parse().unwrap();
        assert!(keystroke.modifiers.platform);
        assert!(keystroke.modifiers.shift);
        assert!(!keystroke.modifiers.control);
        assert_eq!(keystroke.key, "a");
        assert_eq!(keystroke.to_string(), "shift-cmd-a");
    }

    #[test]
    fn dash_can_be_the_key() {
        assert_eq!("-".parse::<Keystroke>().unwrap(), Keystroke::new("-"));
        let zoom_out: Keystroke = "cmd--".parse().unwrap();
        assert!(zoom_out.modifiers.platform);
        assert_eq!(zoom_out.key, "-");
    }

    #[test]
    fn rejects_bad_keystrokes() {
        assert!(matches!("".parse::<Keystroke>(), Err(KeystrokeError::Empty)));
        assert!(matches!(
            "hyper-x".parse::<Keystroke>(),
            Err(KeystrokeError::UnknownModifier { .. })
        ));
    }

    #[test]
    fn standard_map_covers_every_action() {
        let keymap = KeyMap::standard();
        for action in Action::iter() {
            assert!(
                !keymap.keystrokes_for(action).is_empty(),
                "{action} has no default binding"
            );
        }
        assert_eq!(keymap.resolve("V").unwrap(), Some(Action::SelectTool));
        assert_eq!(keymap.resolve("backspace").unwrap(), Some(Action::Delete));
        assert_eq!(keymap.resolve("q").unwrap(), None);
    }

    #[test]
    fn overrides_replace_defaults() {
        let overrides = BTreeMap::from([
            ("h".to_string(), Action::Deselect),
            ("ctrl-0".to_string(), Action::ZoomTo100),
        ]);
        let keymap = KeyMap::with_overrides(&overrides).unwrap();
        assert_eq!(keymap.resolve("h").unwrap(), Some(Action::Deselect));
        assert_eq!(keymap.resolve("ctrl-0").unwrap(), Some(Action::ZoomTo100));
        assert_eq!(keymap.resolve("shift-0").unwrap(), Some(Action::ZoomTo100));
    }

    #[test]
    fn action_names_are_snake_case() {
        assert_eq!(Action::ZoomTo100.to_string(), "zoom_to_100");
        assert_eq!("hand_tool".parse::<Action>().unwrap(), Action::HandTool);
        let json = serde_json::to_string(&Action::ZoomToSelection).unwrap();
        assert_eq!(json, "\"zoom_to_selection\"");
    }
}
