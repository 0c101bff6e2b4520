//! Connection Protocol
//!
//! Ready states, events and the connector seam between the console
//! controller and the network.

use std::fmt;

use crate::error::ConsoleError;

/// Close code used when a connection ends without a close frame.
pub const ABNORMAL_CLOSURE: u16 = 1006;
/// Close code reported when the peer's close frame carries no code.
pub const NORMAL_CLOSURE: u16 = 1000;

/// WebSocket ready states (matching browser API)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadyState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReadyState::Connecting => "CONNECTING",
            ReadyState::Open => "OPEN",
            ReadyState::Closing => "CLOSING",
            ReadyState::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}

/// Identifies one connection attempt for the lifetime of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u32);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network event pushed from a connection worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsEvent {
    pub connection: ConnectionId,
    pub kind: WsEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsEventKind {
    /// Handshake completed
    Open,
    /// Text frame received
    Message(String),
    /// Transport failure, always followed by a `Close`
    Error(String),
    /// Connection finished
    Close { code: u16, reason: String },
}

/// Commands sent from a handle to its connection worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsCommand {
    Text(String),
    Close,
}

/// Opens connections on behalf of the console controller.
///
/// `connect` returns immediately; the outcome of the attempt arrives later as
/// [`WsEvent`]s tagged with the returned transport's id.
pub trait Connector: Send + Sync {
    fn connect(&self, url: String) -> Box<dyn Transport>;
}

/// The sending half of one live connection.
pub trait Transport: Send + Sync {
    fn id(&self) -> ConnectionId;

    /// Queue a text frame.
    fn send(&self, text: String) -> Result<(), ConsoleError>;

    /// Request a graceful close. Fire and forget.
    fn close(&self);
}
