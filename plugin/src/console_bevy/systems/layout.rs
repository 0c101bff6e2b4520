use bevy::prelude::*;

use crate::console_bevy::ConsoleTheme;
use crate::console_bevy::systems::{ConsoleAction, EventStream, TextInputDisplay, TextInputField};

/// Spawn the console: a toolbar, the text input row and the event stream
pub fn spawn_console_ui(mut commands: Commands, theme: Res<ConsoleTheme>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(theme.background),
        ))
        .with_children(|root| {
            root.spawn((
                Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(8.0),
                    ..default()
                },
                children![
                    action_button(ConsoleAction::Connect, &theme),
                    action_button(ConsoleAction::Disconnect, &theme),
                    action_button(ConsoleAction::SendPing, &theme),
                    action_button(ConsoleAction::ClearLog, &theme),
                ],
            ));

            root.spawn((
                Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(8.0),
                    ..default()
                },
                children![
                    (
                        TextInputField,
                        Interaction::default(),
                        Node {
                            flex_grow: 1.0,
                            padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                        BackgroundColor(theme.panel),
                        BorderColor::all(theme.button),
                        children![(
                            TextInputDisplay,
                            Text::new(String::new()),
                            TextFont::from_font_size(14.0),
                            TextColor(theme.text),
                        )],
                    ),
                    action_button(ConsoleAction::SendText, &theme),
                ],
            ));

            root.spawn((
                EventStream,
                Node {
                    flex_direction: FlexDirection::Column,
                    flex_grow: 1.0,
                    row_gap: Val::Px(4.0),
                    overflow: Overflow::scroll_y(),
                    ..default()
                },
                BackgroundColor(theme.panel),
            ));
        });

    log::info!("Spawned console UI");
}

fn action_button(action: ConsoleAction, theme: &ConsoleTheme) -> impl Bundle + use<> {
    (
        Button,
        action,
        Node {
            padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(theme.button),
        children![(
            Text::new(action.label()),
            TextFont::from_font_size(14.0),
            TextColor(theme.text),
        )],
    )
}
