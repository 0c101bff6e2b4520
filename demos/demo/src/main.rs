use bevy::prelude::*;
use bevy_ws_console::{Category, ConsoleConfig, ConsolePlugin, ConsoleTheme};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "WebSocket Console".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(
            ConsolePlugin::new(ConsoleConfig::default()).with_theme(
                ConsoleTheme::default()
                    .with_category_color(Category::Server, "#4caf50")
                    .with_category_color(Category::Client, "#b388ff"),
            ),
        )
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
