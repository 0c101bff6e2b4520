use thiserror::Error;

use crate::ws::ConnectionId;

/// Errors raised inside the console.
///
/// None of these cross the controller boundary: the controller turns them
/// into log entries, and transport workers turn them into error/close events.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("invalid endpoint `{url}`: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme `{0}`, only ws:// endpoints are supported")]
    UnsupportedScheme(String),

    #[error("invalid Origin header value `{0}`")]
    InvalidOrigin(String),

    #[error("TCP connection failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("handshake failed: {0}")]
    Handshake(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("connection {0} is no longer running")]
    ChannelClosed(ConnectionId),

    #[error("failed to start connection worker: {0}")]
    Runtime(#[source] std::io::Error),
}
