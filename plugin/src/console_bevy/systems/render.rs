use bevy::prelude::*;

use crate::console::{LogChange, LogEntry};
use crate::console_bevy::systems::{EventStream, LogEntryNode, TextInputDisplay, TextInputState};
use crate::console_bevy::{ConsoleEventReceiver, ConsoleResource, ConsoleTheme};

const INPUT_PLACEHOLDER: &str = "Type a message and press Enter";

/// Hand every pending network event to the controller
pub fn drain_connection_events(
    receiver: Res<ConsoleEventReceiver>,
    mut console: ResMut<ConsoleResource>,
) {
    while let Some(event) = receiver.try_recv() {
        console.handle_event(event);
    }
}

/// Build the view of one log entry: the timestamp above the content,
/// both tinted by category
pub fn log_entry_bundle(entry: &LogEntry, theme: &ConsoleTheme) -> impl Bundle + use<> {
    let accent = theme.category_color(entry.category);

    (
        LogEntryNode {
            category: entry.category,
        },
        Node {
            flex_direction: FlexDirection::Column,
            padding: UiRect::all(Val::Px(6.0)),
            border: UiRect::left(Val::Px(3.0)),
            row_gap: Val::Px(2.0),
            ..default()
        },
        BackgroundColor(theme.entry_background),
        BorderColor::all(accent),
        children![
            (
                Text::new(format!("{} {}", entry.category.prefix(), entry.timestamp)),
                TextFont::from_font_size(11.0),
                TextColor(accent),
            ),
            (
                Text::new(entry.content.clone()),
                TextFont::from_font_size(14.0),
                TextColor(theme.text),
            ),
        ],
    )
}

/// Apply pending log changes to the event stream
pub fn apply_log_changes(
    mut commands: Commands,
    mut console: ResMut<ConsoleResource>,
    theme: Res<ConsoleTheme>,
    streams: Query<Entity, With<EventStream>>,
) {
    if !console.log().has_pending_changes() {
        return;
    }

    let Ok(stream) = streams.single() else {
        log::warn!("apply_log_changes: No event stream to render into");
        return;
    };

    for change in console.log_mut().drain_changes() {
        match change {
            LogChange::Prepend(entry) => {
                let node = commands.spawn(log_entry_bundle(&entry, &theme)).id();
                commands.entity(stream).insert_children(0, &[node]);
            }
            LogChange::Clear => {
                commands.entity(stream).despawn_related::<Children>();
            }
        }
    }
}

/// Mirror the input buffer into its text node
pub fn refresh_text_input(
    input: Res<TextInputState>,
    mut displays: Query<(&mut Text, &mut TextColor), With<TextInputDisplay>>,
    theme: Res<ConsoleTheme>,
) {
    if !input.is_changed() {
        return;
    }

    for (mut text, mut color) in &mut displays {
        if input.value.is_empty() && !input.focused {
            text.0 = INPUT_PLACEHOLDER.to_string();
            color.0 = theme.muted_text;
        } else {
            let caret = if input.focused { "|" } else { "" };
            text.0 = format!("{}{}", input.value, caret);
            color.0 = theme.text;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{Category, ConsoleConfig, ConsoleController};
    use crate::error::ConsoleError;
    use crate::ws::{ConnectionId, Connector, Transport};

    struct NullConnector;

    struct NullTransport;

    impl Connector for NullConnector {
        fn connect(&self, _url: String) -> Box<dyn Transport> {
            Box::new(NullTransport)
        }
    }

    impl Transport for NullTransport {
        fn id(&self) -> ConnectionId {
            ConnectionId(1)
        }

        fn send(&self, _text: String) -> Result<(), ConsoleError> {
            Ok(())
        }

        fn close(&self) {}
    }

    fn app() -> (App, Entity) {
        let mut app = App::new();
        let controller =
            ConsoleController::new(ConsoleConfig::new().with_auto_connect(false), NullConnector);
        app.insert_resource(ConsoleResource(controller))
            .insert_resource(ConsoleTheme::default())
            .add_systems(Update, apply_log_changes);
        let stream = app.world_mut().spawn((EventStream, Node::default())).id();
        (app, stream)
    }

    fn rendered_categories(app: &App, stream: Entity) -> Vec<Category> {
        let Some(children) = app.world().get::<Children>(stream) else {
            return Vec::new();
        };
        (0..children.len())
            .map(|i| app.world().get::<LogEntryNode>(children[i]).unwrap().category)
            .collect()
    }

    #[test]
    fn test_newest_entry_is_rendered_first() {
        let (mut app, stream) = app();

        app.world_mut()
            .resource_mut::<ConsoleResource>()
            .disconnect();
        app.update();
        app.world_mut().resource_mut::<ConsoleResource>().connect();
        app.update();

        assert_eq!(
            rendered_categories(&app, stream),
            vec![Category::Info, Category::Error]
        );
    }

    #[test]
    fn test_clear_empties_the_stream() {
        let (mut app, stream) = app();

        {
            let mut console = app.world_mut().resource_mut::<ConsoleResource>();
            console.disconnect();
            console.disconnect();
        }
        app.update();
        assert_eq!(rendered_categories(&app, stream).len(), 2);

        app.world_mut()
            .resource_mut::<ConsoleResource>()
            .clear_log();
        app.update();

        assert!(rendered_categories(&app, stream).is_empty());
    }
}
