//! Console Controller
//!
//! The connection slot, the guarded user actions and the event log.
//! No Bevy dependencies - the plugin drives this from its systems.

mod config;
mod controller;
mod event_log;
mod message;

pub use config::{ConsoleConfig, DEFAULT_ENDPOINT, DEFAULT_ID_PARAM};
pub use controller::*;
pub use event_log::{Category, EventLog, LogChange, LogEntry, iso_timestamp};
pub use message::{OutboundMessage, render_value};
