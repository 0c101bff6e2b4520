//! WebSocket Transport
//!
//! Browser-style WebSocket connections backed by tokio-tungstenite.
//! No Bevy dependencies - events are pushed over a plain channel and
//! polled by whoever owns the receiver.

mod client;
mod manager;
mod protocol;

pub use client::{WsEventReceiver, WsEventSender};
pub use manager::{WebSocketHandle, WebSocketManager};
pub use protocol::*;
