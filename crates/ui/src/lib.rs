//! Panel view-models around the canvas: layers, minimap and properties.
//!
//! These hold no object state of their own. Each call derives what to show
//! from the current object collection and selection, and user input comes
//! back out as intents or patches for the workspace to apply.

mod layers;
mod minimap;
pub mod properties;

pub use layers::{display_label, LayerIntent, LayerRow, LayersPanel};
pub use minimap::{Minimap, MinimapConfig, MinimapLayout};
pub use properties::{Field, InspectorView};
