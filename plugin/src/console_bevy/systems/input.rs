use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::console::OutboundMessage;
use crate::console_bevy::ConsoleResource;
use crate::console_bevy::systems::{ConsoleAction, TextInputField, TextInputState};

/// Run the console action of every pressed button
pub fn handle_button_interactions(
    query: Query<(&Interaction, &ConsoleAction), Changed<Interaction>>,
    mut console: ResMut<ConsoleResource>,
    mut input: ResMut<TextInputState>,
) {
    for (interaction, action) in &query {
        if *interaction != Interaction::Pressed {
            continue;
        }

        log::debug!("Console action: {:?}", action);
        match action {
            ConsoleAction::Connect => console.connect(),
            ConsoleAction::Disconnect => console.disconnect(),
            ConsoleAction::SendPing => console.send_message(&OutboundMessage::Ping),
            ConsoleAction::SendText => console.send_text(&mut input.value),
            ConsoleAction::ClearLog => console.clear_log(),
        }
    }
}

/// Focus the text input when it is clicked
pub fn handle_input_focus(
    query: Query<&Interaction, (Changed<Interaction>, With<TextInputField>)>,
    mut input: ResMut<TextInputState>,
) {
    for interaction in &query {
        if *interaction == Interaction::Pressed && !input.focused {
            input.focused = true;
        }
    }
}

/// Edit the focused text input; Enter sends it
pub fn handle_keyboard_input(
    mut keyboard_events: MessageReader<KeyboardInput>,
    mut console: ResMut<ConsoleResource>,
    mut input: ResMut<TextInputState>,
) {
    for event in keyboard_events.read() {
        if event.state != ButtonState::Pressed || !input.focused {
            continue;
        }

        match &event.logical_key {
            Key::Enter => console.send_text(&mut input.value),
            Key::Escape => input.focused = false,
            Key::Backspace => {
                input.value.pop();
            }
            Key::Space => input.value.push(' '),
            Key::Character(chars) => {
                input
                    .value
                    .extend(chars.as_str().chars().filter(|c| !c.is_control()));
            }
            _ => {}
        }
    }
}
