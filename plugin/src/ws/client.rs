use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::ws::{ConnectionId, WsEvent, WsEventKind};

/// Thread-safe handle for pushing connection events to the main thread
#[derive(Clone, Debug)]
pub struct WsEventSender {
    tx: Sender<WsEvent>,
}

impl WsEventSender {
    /// Create a new sender and its corresponding receiver
    pub fn channel() -> (WsEventSender, WsEventReceiver) {
        let (tx, rx) = mpsc::channel();

        (
            WsEventSender { tx },
            WsEventReceiver { rx: Mutex::new(rx) },
        )
    }

    /// Push an event for the given connection
    pub fn dispatch(&self, connection: ConnectionId, kind: WsEventKind) {
        log::debug!("[WebSocket {}] Dispatching {:?}", connection, kind);
        if let Err(e) = self.tx.send(WsEvent { connection, kind }) {
            log::warn!("[WebSocket {}] Event receiver dropped: {}", connection, e);
        }
    }
}

/// Receiving end, polled once per frame
pub struct WsEventReceiver {
    rx: Mutex<Receiver<WsEvent>>,
}

impl WsEventReceiver {
    /// Try to receive the next event without blocking
    pub fn try_recv(&self) -> Option<WsEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }
}
