//! WebSocket connections on worker threads
//!
//! Each connection gets its own thread and tokio runtime. The handle returned
//! by [`WebSocketManager::connect`] only holds the command channel; everything
//! the connection observes is pushed back through a [`WsEventSender`].

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use url::Url;

use crate::error::ConsoleError;
use crate::ws::{
    ABNORMAL_CLOSURE, ConnectionId, Connector, NORMAL_CLOSURE, Transport, WsCommand, WsEventKind,
    WsEventSender,
};

/// A handle to send messages to a WebSocket connection
pub struct WebSocketHandle {
    id: ConnectionId,
    sender: mpsc::UnboundedSender<WsCommand>,
    close_requested: Arc<AtomicBool>,
}

impl Transport for WebSocketHandle {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn send(&self, text: String) -> Result<(), ConsoleError> {
        log::debug!("[WebSocket {}] Queueing {} bytes", self.id, text.len());
        self.sender
            .send(WsCommand::Text(text))
            .map_err(|_| ConsoleError::ChannelClosed(self.id))
    }

    fn close(&self) {
        if self.close_requested.swap(true, Ordering::SeqCst) {
            return;
        }
        log::info!("[WebSocket {}] Closing", self.id);
        if self.sender.send(WsCommand::Close).is_err() {
            log::debug!("[WebSocket {}] Worker already exited", self.id);
        }
    }
}

/// Opens WebSocket connections and reports their events
pub struct WebSocketManager {
    events: WsEventSender,
    origin: Option<String>,
    next_id: AtomicU32,
}

impl WebSocketManager {
    pub fn new(events: WsEventSender) -> Self {
        Self {
            events,
            origin: None,
            next_id: AtomicU32::new(1),
        }
    }

    /// Send an `Origin` header with every handshake.
    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin;
        self
    }

    /// Connect to a WebSocket URL, returns the handle immediately
    pub fn connect(&self, url: String) -> WebSocketHandle {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = mpsc::unbounded_channel::<WsCommand>();
        let close_requested = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            id,
            url,
            origin: self.origin.clone(),
            events: self.events.clone(),
            close_requested: close_requested.clone(),
        };

        let spawned = std::thread::Builder::new()
            .name(format!("websocket-{}", id))
            .spawn(move || worker.run(rx));

        if let Err(e) = spawned {
            let error = ConsoleError::Runtime(e);
            log::error!("[WebSocket {}] {}", id, error);
            self.events.dispatch(id, WsEventKind::Error(error.to_string()));
            self.events.dispatch(
                id,
                WsEventKind::Close {
                    code: ABNORMAL_CLOSURE,
                    reason: "Connection failed".to_string(),
                },
            );
        }

        WebSocketHandle {
            id,
            sender: tx,
            close_requested,
        }
    }
}

impl Connector for WebSocketManager {
    fn connect(&self, url: String) -> Box<dyn Transport> {
        Box::new(WebSocketManager::connect(self, url))
    }
}

/// State moved onto the connection thread
struct Worker {
    id: ConnectionId,
    url: String,
    origin: Option<String>,
    events: WsEventSender,
    close_requested: Arc<AtomicBool>,
}

impl Worker {
    fn run(self, commands: mpsc::UnboundedReceiver<WsCommand>) {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                self.fail(&ConsoleError::Runtime(e));
                return;
            }
        };

        rt.block_on(self.session(commands));
    }

    /// Report a failure that ends the connection.
    fn fail(&self, error: &ConsoleError) {
        log::error!("[WebSocket {}] {}", self.id, error);
        self.events
            .dispatch(self.id, WsEventKind::Error(error.to_string()));
        self.events.dispatch(
            self.id,
            WsEventKind::Close {
                code: ABNORMAL_CLOSURE,
                reason: "Connection failed".to_string(),
            },
        );
    }

    async fn open(&self) -> Result<WebSocketStream<TcpStream>, ConsoleError> {
        log::info!("[WebSocket {}] Connecting to {}", self.id, self.url);

        let url = Url::parse(&self.url).map_err(|source| ConsoleError::InvalidEndpoint {
            url: self.url.clone(),
            source,
        })?;
        if url.scheme() != "ws" {
            return Err(ConsoleError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = url.host_str().unwrap_or("localhost");
        let port = url.port_or_known_default().unwrap_or(80);
        let addr = format!("{}:{}", host, port);

        log::info!("[WebSocket {}] Connecting TCP to {}", self.id, addr);
        let tcp_stream = TcpStream::connect(&addr)
            .await
            .map_err(ConsoleError::Connect)?;
        log::info!("[WebSocket {}] TCP connected", self.id);

        let mut request = self.url.as_str().into_client_request()?;
        if let Some(ref origin) = self.origin {
            let value = origin
                .parse::<HeaderValue>()
                .map_err(|_| ConsoleError::InvalidOrigin(origin.clone()))?;
            request.headers_mut().insert(ORIGIN, value);
        }

        log::info!("[WebSocket {}] Performing WebSocket handshake", self.id);
        let (stream, response) = tokio_tungstenite::client_async(request, tcp_stream).await?;
        log::info!(
            "[WebSocket {}] Connected successfully (status: {})",
            self.id,
            response.status()
        );

        Ok(stream)
    }

    /// Abandon an attempt the handle closed before the handshake finished.
    fn abandon(&self) {
        log::info!("[WebSocket {}] Closed before open, dropping connection", self.id);
        self.events.dispatch(
            self.id,
            WsEventKind::Error("Connection closed before open".to_string()),
        );
        self.events.dispatch(
            self.id,
            WsEventKind::Close {
                code: ABNORMAL_CLOSURE,
                reason: "Closed before open".to_string(),
            },
        );
    }

    async fn session(self, mut commands: mpsc::UnboundedReceiver<WsCommand>) {
        let mut pending = Vec::new();
        let ws_stream = tokio::select! {
            opened = self.open() => match opened {
                Ok(stream) => stream,
                Err(e) => {
                    self.fail(&e);
                    return;
                }
            },
            _ = wait_for_close(&mut commands, &mut pending) => {
                self.abandon();
                return;
            }
        };

        if self.close_requested.load(Ordering::SeqCst) {
            self.abandon();
            return;
        }

        self.events.dispatch(self.id, WsEventKind::Open);

        let (mut write, mut read) = ws_stream.split();

        // Forward outgoing frames until the handle closes or drops
        let id = self.id;
        let send_task = tokio::spawn(async move {
            for text in pending {
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    log::error!("[WebSocket {}] Send error: {}", id, e);
                    return;
                }
            }
            while let Some(command) = commands.recv().await {
                match command {
                    WsCommand::Text(text) => {
                        if let Err(e) = write.send(Message::Text(text.into())).await {
                            log::error!("[WebSocket {}] Send error: {}", id, e);
                            break;
                        }
                    }
                    WsCommand::Close => {
                        if let Err(e) = write.send(Message::Close(None)).await {
                            log::error!("[WebSocket {}] Close error: {}", id, e);
                        }
                        break;
                    }
                }
            }
        });

        // Keep reading after a close frame so tungstenite can finish the
        // closing handshake; the stream ends once it has.
        let mut close_frame: Option<(u16, String)> = None;
        let (code, reason) = loop {
            match read.next().await {
                Some(Ok(Message::Text(text))) => {
                    log::debug!(
                        "[WebSocket {}] Received: {}",
                        self.id,
                        text.chars().take(100).collect::<String>()
                    );
                    self.events
                        .dispatch(self.id, WsEventKind::Message(text.to_string()));
                }
                Some(Ok(Message::Binary(data))) => {
                    log::debug!(
                        "[WebSocket {}] Ignoring binary frame ({} bytes)",
                        self.id,
                        data.len()
                    );
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (f.code.into(), f.reason.to_string()))
                        .unwrap_or((NORMAL_CLOSURE, String::new()));
                    log::info!("[WebSocket {}] Received close: {} {}", self.id, code, reason);
                    close_frame = Some((code, reason));
                }
                Some(Err(e)) => {
                    if let Some(frame) = close_frame.take() {
                        break frame;
                    }
                    log::error!("[WebSocket {}] Read error: {}", self.id, e);
                    self.events
                        .dispatch(self.id, WsEventKind::Error(e.to_string()));
                    break (ABNORMAL_CLOSURE, "Connection error".to_string());
                }
                None => {
                    break close_frame
                        .take()
                        .unwrap_or((ABNORMAL_CLOSURE, "Connection ended".to_string()));
                }
            }
        };

        send_task.abort();
        self.events
            .dispatch(self.id, WsEventKind::Close { code, reason });
        log::info!("[WebSocket {}] Connection ended", self.id);
    }
}

/// Resolve once the handle asks to close. Frames queued in the meantime are
/// kept in `pending`; a dropped handle never resolves.
async fn wait_for_close(
    commands: &mut mpsc::UnboundedReceiver<WsCommand>,
    pending: &mut Vec<String>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            WsCommand::Text(text) => pending.push(text),
            WsCommand::Close => return,
        }
    }
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::{WsEvent, WsEventReceiver};
    use std::time::Duration;
    use tokio::net::TcpListener;

    async fn next_event(receiver: &WsEventReceiver) -> WsEvent {
        for _ in 0..500 {
            if let Some(event) = receiver.try_recv() {
                return event;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for a websocket event");
    }

    async fn spawn_echo_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(msg)) = ws.next().await {
                if msg.is_text() && ws.send(msg).await.is_err() {
                    break;
                }
            }
        });

        format!("ws://{}/ws/connect?id=1", addr)
    }

    #[tokio::test]
    async fn test_open_echo_and_close() {
        let url = spawn_echo_server().await;
        let (events, receiver) = WsEventSender::channel();
        let manager = WebSocketManager::new(events);

        let handle = manager.connect(url);
        let id = handle.id();

        let opened = next_event(&receiver).await;
        assert_eq!(opened.connection, id);
        assert_eq!(opened.kind, WsEventKind::Open);

        handle.send(r#"{"type":"PING"}"#.to_string()).unwrap();
        let echoed = next_event(&receiver).await;
        assert_eq!(
            echoed.kind,
            WsEventKind::Message(r#"{"type":"PING"}"#.to_string())
        );

        handle.close();
        let closed = next_event(&receiver).await;
        assert_eq!(closed.connection, id);
        assert!(matches!(closed.kind, WsEventKind::Close { .. }));
    }

    #[tokio::test]
    async fn test_refused_connection_reports_error_then_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (events, receiver) = WsEventSender::channel();
        let manager = WebSocketManager::new(events);
        let _handle = manager.connect(format!("ws://{}/ws/connect", addr));

        assert!(matches!(
            next_event(&receiver).await.kind,
            WsEventKind::Error(_)
        ));
        assert_eq!(
            next_event(&receiver).await.kind,
            WsEventKind::Close {
                code: ABNORMAL_CLOSURE,
                reason: "Connection failed".to_string(),
            }
        );
    }

    /// Accepts TCP connections and never answers the handshake.
    async fn spawn_silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        format!("ws://{}/ws/connect?id=1", addr)
    }

    #[tokio::test]
    async fn test_close_during_stalled_handshake_ends_attempt() {
        let url = spawn_silent_server().await;
        let (events, receiver) = WsEventSender::channel();
        let manager = WebSocketManager::new(events);

        let handle = manager.connect(url);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(receiver.try_recv().is_none());

        handle.close();

        let error = next_event(&receiver).await;
        assert_eq!(error.connection, handle.id());
        assert!(matches!(error.kind, WsEventKind::Error(_)));
        assert_eq!(
            next_event(&receiver).await.kind,
            WsEventKind::Close {
                code: ABNORMAL_CLOSURE,
                reason: "Closed before open".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_close_before_connecting_never_opens() {
        let url = spawn_echo_server().await;
        let (events, receiver) = WsEventSender::channel();
        let manager = WebSocketManager::new(events);

        let handle = manager.connect(url);
        handle.close();

        assert!(matches!(
            next_event(&receiver).await.kind,
            WsEventKind::Error(_)
        ));
        assert!(matches!(
            next_event(&receiver).await.kind,
            WsEventKind::Close {
                code: ABNORMAL_CLOSURE,
                ..
            }
        ));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_wss_is_rejected() {
        let (events, receiver) = WsEventSender::channel();
        let manager = WebSocketManager::new(events);
        let _handle = manager.connect("wss://localhost:3000/ws/connect".to_string());

        match next_event(&receiver).await.kind {
            WsEventKind::Error(message) => assert!(message.contains("wss")),
            other => panic!("expected an error event, got {:?}", other),
        }
    }

    #[test]
    fn test_connection_ids_are_unique() {
        let (events, _receiver) = WsEventSender::channel();
        let manager = WebSocketManager::new(events);

        let first = manager.connect("not a url".to_string());
        let second = manager.connect("not a url".to_string());

        assert_ne!(first.id(), second.id());
    }
}
