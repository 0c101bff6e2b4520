//! Console Bevy Plugin
//!
//! Hosts the console controller as a Bevy resource, builds the UI tree and
//! wires buttons, keyboard input and network events to the controller.

mod plugin;
mod style;
mod systems;

pub use plugin::{ConsoleEventReceiver, ConsolePlugin, ConsoleResource};
pub use style::{ConsoleTheme, parse_color};
pub use systems::*;
