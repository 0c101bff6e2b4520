//! # WebSocket Debug Console for Bevy
//!
//! Opens a WebSocket connection, sends a few canned messages and renders an
//! append-only, newest-first log of connection, server and client events.
//!
//! ## Example
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_ws_console::{ConsoleConfig, ConsolePlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin::new(
//!             ConsoleConfig::default().with_endpoint("ws://localhost:3000/ws/connect"),
//!         ))
//!         .add_systems(Startup, |mut commands: Commands| {
//!             commands.spawn(Camera2d);
//!         })
//!         .run();
//! }
//! ```
pub mod console;
pub mod console_bevy;
pub mod error;
pub mod ws;

pub use console::{Category, ConsoleConfig, ConsoleController, LogEntry, OutboundMessage};
pub use console_bevy::{ConsolePlugin, ConsoleResource, ConsoleTheme};
pub use error::ConsoleError;
