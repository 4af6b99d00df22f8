//! The storyboard workspace: an infinite canvas of production objects.
//!
//! [`Workspace`] ties the pieces together. It reads objects from an
//! [`api::ObjectStore`], drives a [`canvas::RenderSurface`] through the
//! canvas adapter, and owns selection, camera, tool and panel state.
//! [`execute_command`] and [`execute_query`] expose it to scripts.

mod config;
mod executor;
pub mod keymap;
mod workspace;

pub use config::{Chrome, ConfigError, SurfaceSize, WorkspaceConfig};
pub use executor::{execute_command, execute_query};
pub use keymap::{Action, KeyMap, Keystroke, KeystrokeError};
pub use workspace::Workspace;
