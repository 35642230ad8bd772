//! Individual client connection handling

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use aerolink_shared::{codec, now_ms, ServerMessage};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::SessionManager;
use crate::command::Dispatcher;

/// Outbound queue depth per client; writes beyond this are dropped
const OUTBOUND_BUFFER: usize = 64;

static CLIENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a process-unique client identifier
fn next_client_id() -> String {
    let seq = CLIENT_SEQ.fetch_add(1, Ordering::SeqCst) + 1;
    format!("client-{}-{}", now_ms(), seq)
}

/// Handle to send messages to a specific client
#[derive(Clone)]
pub struct SessionHandle {
    pub client_id: String,
    pub addr: SocketAddr,
    outbound: mpsc::Sender<String>,
}

impl SessionHandle {
    pub(crate) fn new(client_id: String, addr: SocketAddr, outbound: mpsc::Sender<String>) -> Self {
        Self {
            client_id,
            addr,
            outbound,
        }
    }

    /// Queue an envelope for delivery to this client
    ///
    /// Returns false when the message was dropped: the socket is closed or
    /// the client is too slow to drain its queue. Telemetry is lossy, so
    /// neither case is an error.
    pub fn send(&self, msg: &ServerMessage) -> bool {
        let text = match codec::encode(msg) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to encode message for {}: {}", self.client_id, e);
                return false;
            }
        };

        match self.outbound.try_send(text) {
            Ok(()) => true,
            Err(e) => {
                debug!("Dropping message for {}: {}", self.client_id, e);
                false
            }
        }
    }
}

/// Serve one client connection to completion
///
/// Performs the WebSocket handshake, registers the session, pumps inbound
/// frames through the dispatcher, and tears the session down when the
/// socket closes.
pub async fn run(
    stream: TcpStream,
    addr: SocketAddr,
    sessions: Arc<SessionManager>,
    dispatcher: Arc<Dispatcher>,
) {
    let ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed for {}: {}", addr, e);
            return;
        }
    };

    let (mut sink, mut source) = ws.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);

    // Writer task owns the sink; every send for this client funnels through
    // one queue, so delivery order matches handler order.
    let writer = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if sink.send(Message::text(text)).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let handle = SessionHandle::new(next_client_id(), addr, outbound_tx);
    let client_id = handle.client_id.clone();

    sessions.register(handle.clone()).await;
    info!("Client connected: {} ({})", client_id, addr);

    dispatcher.on_connect(&handle).await;

    while let Some(frame) = source.next().await {
        match frame {
            Ok(Message::Text(text)) => dispatcher.on_message(&handle, &text).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {} // binary/ping/pong frames are not part of the protocol
            Err(e) => {
                debug!("Read error from {}: {}", client_id, e);
                break;
            }
        }
    }

    sessions.unregister(&client_id).await;
    writer.abort();
    info!("Client disconnected: {}", client_id);
}
