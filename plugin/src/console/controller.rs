use rand::Rng;
use serde_json::Value;

use crate::console::{Category, ConsoleConfig, EventLog, OutboundMessage};
use crate::error::ConsoleError;
use crate::ws::{ConnectionId, Connector, ReadyState, Transport, WsEvent, WsEventKind};

/// Client ids are drawn uniformly from `0..CLIENT_ID_BOUND`.
pub const CLIENT_ID_BOUND: u32 = 1_000_000_000;

pub const MSG_ALREADY_CONNECTED: &str = "Already connected!";
pub const MSG_CONNECTING: &str = "Connecting...";
pub const MSG_CONNECTED: &str = "Connected to server";
pub const MSG_CONNECT_FAILED: &str = "Failed to connect to server";
pub const MSG_DISCONNECTED: &str = "Disconnected from server";
pub const MSG_DISCONNECTING: &str = "Disconnecting...";
pub const MSG_DISCONNECT_WITHOUT_CONNECTION: &str = "Attempted to disconnect without a connection";
pub const MSG_ALREADY_DISCONNECTED: &str = "Already disonnected";
pub const MSG_SEND_WITHOUT_CONNECTION: &str = "Attempted to send message without a connection";
pub const MSG_SEND_NOT_OPEN: &str = "Attempted to send message on non-open connection";

/// The single connection owned by the controller
pub struct Connection {
    transport: Box<dyn Transport>,
    state: ReadyState,
}

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.transport.id()
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state
    }
}

/// Owns the connection slot and the event log, and guards every user action
/// against the current connection state.
pub struct ConsoleController {
    config: ConsoleConfig,
    connector: Box<dyn Connector>,
    connection: Option<Connection>,
    log: EventLog,
}

impl ConsoleController {
    pub fn new(config: ConsoleConfig, connector: impl Connector + 'static) -> Self {
        Self {
            config,
            connector: Box::new(connector),
            connection: None,
            log: EventLog::new(),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// `None` while no connection has been opened.
    pub fn ready_state(&self) -> Option<ReadyState> {
        self.connection.as_ref().map(Connection::ready_state)
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    /// Open a new connection unless the current one is open.
    pub fn connect(&mut self) {
        if self.ready_state() == Some(ReadyState::Open) {
            self.log.push_text(Category::Error, MSG_ALREADY_CONNECTED);
            return;
        }

        self.log.push_text(Category::Info, MSG_CONNECTING);
        let client_id = rand::thread_rng().gen_range(0..CLIENT_ID_BOUND);

        let url = match self.config.client_url(client_id) {
            Ok(url) => url,
            Err(e) => {
                log::error!("Cannot build connection URL: {}", e);
                self.log
                    .push_text(Category::Error, &format!("{}: {}", MSG_CONNECT_FAILED, e));
                return;
            }
        };

        let transport = self.connector.connect(url);
        log::debug!(
            "Opened connection {} as client {}",
            transport.id(),
            client_id
        );
        self.connection = Some(Connection {
            transport,
            state: ReadyState::Connecting,
        });
    }

    /// Request a graceful close of the current connection.
    pub fn disconnect(&mut self) {
        let Some(connection) = self.connection.as_mut() else {
            self.log
                .push_text(Category::Error, MSG_DISCONNECT_WITHOUT_CONNECTION);
            return;
        };

        if connection.state == ReadyState::Closed {
            self.log.push_text(Category::Error, MSG_ALREADY_DISCONNECTED);
            return;
        }

        self.log.push_text(Category::Info, MSG_DISCONNECTING);
        connection.state = ReadyState::Closing;
        connection.transport.close();
    }

    /// Serialize and transmit `message` on the open connection.
    pub fn send_message(&mut self, message: &OutboundMessage) {
        let Some(connection) = self.connection.as_ref() else {
            self.log
                .push_text(Category::Error, MSG_SEND_WITHOUT_CONNECTION);
            return;
        };

        if connection.state != ReadyState::Open {
            self.log.push_text(Category::Error, MSG_SEND_NOT_OPEN);
            return;
        }

        match transmit(connection, message) {
            Ok(value) => self.log.push_value(Category::Client, &value),
            Err(e) => {
                log::error!("Failed to send {:?}: {}", message, e);
                self.log
                    .push_text(Category::Error, &format!("Failed to send message: {}", e));
            }
        }
    }

    /// Send the input buffer as a TEXT message and clear it. Empty input is ignored.
    pub fn send_text(&mut self, input: &mut String) {
        if input.is_empty() {
            return;
        }

        let text = std::mem::take(input);
        self.send_message(&OutboundMessage::Text { text });
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// React to a network event.
    ///
    /// Events from a superseded connection are still logged but leave the
    /// current connection's state alone.
    pub fn handle_event(&mut self, event: WsEvent) {
        let current = self
            .connection
            .as_ref()
            .is_some_and(|c| c.id() == event.connection);
        if !current {
            log::debug!(
                "Event from superseded connection {}: {:?}",
                event.connection,
                event.kind
            );
        }

        match event.kind {
            WsEventKind::Open => self.on_open(current),
            WsEventKind::Message(data) => self.on_message(&data),
            WsEventKind::Error(reason) => self.on_error(&reason),
            WsEventKind::Close { code, reason } => self.on_close(current, code, &reason),
        }
    }

    fn on_open(&mut self, current: bool) {
        if current {
            self.set_state(ReadyState::Open);
        }
        self.log.push_text(Category::Info, MSG_CONNECTED);
    }

    fn on_close(&mut self, current: bool, code: u16, reason: &str) {
        log::debug!("Connection closed: code={} reason={}", code, reason);
        if current {
            self.set_state(ReadyState::Closed);
        }
        self.log.push_text(Category::Warn, MSG_DISCONNECTED);
    }

    fn on_error(&mut self, reason: &str) {
        log::debug!("Transport error: {}", reason);
        self.log.push_text(Category::Error, MSG_CONNECT_FAILED);
    }

    fn on_message(&mut self, data: &str) {
        match serde_json::from_str::<Value>(data) {
            Ok(value) => self.log.push_value(Category::Server, &value),
            Err(e) => log::error!("Unable to parse message from server: {} ({})", e, data),
        }
    }

    fn set_state(&mut self, state: ReadyState) {
        if let Some(connection) = self.connection.as_mut() {
            log::debug!(
                "Connection {}: {} -> {}",
                connection.id(),
                connection.state,
                state
            );
            connection.state = state;
        }
    }
}

fn transmit(connection: &Connection, message: &OutboundMessage) -> Result<Value, ConsoleError> {
    let value = message.to_value()?;
    connection.transport.send(message.to_wire()?)?;
    Ok(value)
}
