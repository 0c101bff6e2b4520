use bevy::prelude::*;

use crate::console::Category;

/// A console control; pressing the button runs the action
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    Connect,
    Disconnect,
    SendPing,
    SendText,
    ClearLog,
}

impl ConsoleAction {
    pub fn label(self) -> &'static str {
        match self {
            ConsoleAction::Connect => "Connect",
            ConsoleAction::Disconnect => "Disconnect",
            ConsoleAction::SendPing => "Send PING",
            ConsoleAction::SendText => "Send",
            ConsoleAction::ClearLog => "Clear",
        }
    }
}

/// Marker component for the container that receives log entries
#[derive(Component)]
pub struct EventStream;

/// Marker component for a rendered log entry
#[derive(Component, Debug)]
pub struct LogEntryNode {
    pub category: Category,
}

/// Marker component for the clickable text input box
#[derive(Component)]
pub struct TextInputField;

/// Marker component for the text showing the input buffer
#[derive(Component)]
pub struct TextInputDisplay;

/// Contents and focus of the single text input
#[derive(Resource, Debug)]
pub struct TextInputState {
    pub value: String,
    pub focused: bool,
}

impl Default for TextInputState {
    fn default() -> Self {
        // Focused from the start so typing works right away
        Self {
            value: String::new(),
            focused: true,
        }
    }
}
