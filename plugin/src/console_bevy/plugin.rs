//! Console Plugin Implementation

use bevy::prelude::*;

use crate::console::{ConsoleConfig, ConsoleController};
use crate::console_bevy::ConsoleTheme;
use crate::console_bevy::systems::*;
use crate::ws::{WebSocketManager, WsEventReceiver, WsEventSender};

/// Bevy Resource wrapper for the console controller.
///
/// Systems take it through `ResMut`, so every user action and network
/// reaction runs to completion before the next one starts.
#[derive(Resource, Deref, DerefMut)]
pub struct ConsoleResource(pub ConsoleController);

/// Bevy Resource wrapper for the connection event receiver.
#[derive(Resource, Deref)]
pub struct ConsoleEventReceiver(pub WsEventReceiver);

/// Bevy plugin for the WebSocket debug console.
///
/// This plugin:
/// - Creates the connection manager and the console controller
/// - Spawns the console UI and, if configured, connects on startup
/// - Feeds network events and user input to the controller each frame
///
/// ## Usage
///
/// ```ignore
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(ConsolePlugin::new(ConsoleConfig::default()))
///     .run();
/// ```
#[derive(Default)]
pub struct ConsolePlugin {
    config: ConsoleConfig,
    theme: ConsoleTheme,
}

impl ConsolePlugin {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            theme: ConsoleTheme::default(),
        }
    }

    pub fn with_theme(mut self, theme: ConsoleTheme) -> Self {
        self.theme = theme;
        self
    }
}

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        log::info!("Building console plugin...");

        if let Err(e) = self.config.validate() {
            log::error!("Console endpoint is not usable: {}", e);
        }

        let (events, receiver) = WsEventSender::channel();
        let manager = WebSocketManager::new(events).with_origin(self.config.origin.clone());
        let controller = ConsoleController::new(self.config.clone(), manager);

        app.insert_resource(ConsoleResource(controller))
            .insert_resource(ConsoleEventReceiver(receiver))
            .insert_resource(self.theme.clone())
            .init_resource::<TextInputState>()
            .add_systems(Startup, (spawn_console_ui, auto_connect).chain())
            .add_systems(
                Update,
                (
                    drain_connection_events,
                    handle_button_interactions,
                    handle_input_focus,
                    handle_keyboard_input,
                    apply_log_changes,
                    refresh_text_input,
                )
                    .chain(),
            );

        log::info!("Console plugin configured for {}", self.config.endpoint);
    }
}

/// Connect once at startup, as the page did on load.
fn auto_connect(mut console: ResMut<ConsoleResource>) {
    if console.config().auto_connect {
        console.connect();
    }
}
