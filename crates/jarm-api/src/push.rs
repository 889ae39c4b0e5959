//! Push channel with auto-reconnect.
//!
//! Speaks Socket.IO v5 over an Engine.IO v4 websocket transport to the
//! backend's `/socket.io/` endpoint and streams named events through a
//! [`tokio::sync::broadcast`] channel. Reconnection uses exponential
//! backoff with jitter.
//!
//! Each connection runs the engine handshake (`0{...}` open, `40`
//! namespace connect, `40{...}` ack), then emits `join_monitoring`.
//! Server pings are answered with pongs and a connection that stays
//! silent past `pingInterval + pingTimeout` is dropped. On shutdown the
//! client emits `leave_monitoring` and disconnects the namespace.
//!
//! # Example
//!
//! ```rust,ignore
//! use jarm_api::push::{PushHandle, ReconnectConfig, ChannelEvent};
//! use jarm_api::TlsMode;
//! use tokio_util::sync::CancellationToken;
//! use url::Url;
//!
//! let cancel = CancellationToken::new();
//! let url = Url::parse("ws://127.0.0.1:5000/socket.io/?EIO=4&transport=websocket")?;
//!
//! let handle = PushHandle::connect(url, ReconnectConfig::default(), TlsMode::System, cancel.clone());
//! let mut rx = handle.subscribe();
//!
//! while let Ok(event) = rx.recv().await {
//!     if let ChannelEvent::Frame(frame) = event.as_ref() {
//!         println!("{}: {}", frame.event, frame.data);
//!     }
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::socketio::{ENGINE_QUERY, OpenHandshake, Packet};
use crate::transport::TlsMode;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Budget for the open packet and the namespace ack.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

const JOIN_COMMAND: &str = "join_monitoring";
const LEAVE_COMMAND: &str = "leave_monitoring";

// ── Frames ───────────────────────────────────────────────────────────

/// A named event received on the push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushFrame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Everything a subscriber can observe on the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The namespace handshake completed and `join_monitoring` was sent.
    Connected,
    /// The connection attempt failed or an established connection dropped.
    Disconnected { reason: String },
    /// An inbound named event.
    Frame(PushFrame),
}

// ── ReconnectConfig ──────────────────────────────────────────────────

/// Exponential backoff configuration for push channel reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 30s.
    pub max_delay: Duration,

    /// Maximum reconnection attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

// ── PushHandle ───────────────────────────────────────────────────────

/// Handle to a running push channel.
///
/// Call [`shutdown`](Self::shutdown) (or cancel the token passed to
/// [`connect`](Self::connect)) to tear down the background task.
pub struct PushHandle {
    event_rx: broadcast::Receiver<Arc<ChannelEvent>>,
    cancel: CancellationToken,
}

impl PushHandle {
    /// Spawn the connection loop and return immediately.
    ///
    /// The first connection attempt happens asynchronously. Subscribe to
    /// observe [`ChannelEvent::Connected`] and incoming frames.
    ///
    /// `url` may omit the Engine.IO query; `EIO=4&transport=websocket` is
    /// added when missing. `tls` applies to `wss://` URLs.
    pub fn connect(
        url: Url,
        reconnect: ReconnectConfig,
        tls: TlsMode,
        cancel: CancellationToken,
    ) -> Self {
        let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            push_loop(engine_url(url), event_tx, reconnect, tls, task_cancel).await;
        });

        Self { event_rx, cancel }
    }

    /// Get a new broadcast receiver for the channel.
    ///
    /// Events sent before the call are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ChannelEvent>> {
        self.event_rx.resubscribe()
    }

    /// Signal the background task to leave the room and close.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background reconnection loop ─────────────────────────────────────

async fn push_loop(
    url: Url,
    event_tx: broadcast::Sender<Arc<ChannelEvent>>,
    reconnect: ReconnectConfig,
    tls: TlsMode,
    cancel: CancellationToken,
) {
    let connector = match tls.push_connector() {
        Ok(connector) => connector,
        Err(e) => {
            // A bad CA file will not fix itself between attempts.
            tracing::warn!(error = %e, "push channel TLS setup failed");
            let _ = event_tx.send(Arc::new(ChannelEvent::Disconnected {
                reason: e.to_string(),
            }));
            return;
        }
    };

    let mut attempt: u32 = 0;

    loop {
        // Cancellation is handled inside so the leave event can be sent.
        let result =
            connect_and_read(&url, connector.clone(), &event_tx, &cancel, &mut attempt).await;

        if cancel.is_cancelled() {
            break;
        }

        let reason = match &result {
            Ok(()) => "closed by server".to_owned(),
            Err(e) => e.to_string(),
        };
        let _ = event_tx.send(Arc::new(ChannelEvent::Disconnected { reason }));

        if let Err(e) = result {
            tracing::warn!(error = %e, attempt, "push channel error");
        } else {
            tracing::info!("push channel closed, reconnecting");
        }

        if let Some(max) = reconnect.max_retries {
            if attempt >= max {
                tracing::warn!(max_retries = max, "push reconnection limit reached, giving up");
                break;
            }
        }

        let delay = calculate_backoff(attempt, &reconnect);
        tracing::debug!(
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            attempt,
            "waiting before reconnect"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }

        attempt = attempt.saturating_add(1);
    }

    tracing::debug!("push loop exiting");
}

// ── Single connection lifecycle ──────────────────────────────────────

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, Message>;
type WsRead = SplitStream<WsStream>;

/// Add the Engine.IO query pairs the caller left out.
fn engine_url(mut url: Url) -> Url {
    let missing: Vec<(&str, &str)> = ENGINE_QUERY
        .iter()
        .filter(|(key, _)| !url.query_pairs().any(|(k, _)| k == *key))
        .copied()
        .collect();
    if !missing.is_empty() {
        url.query_pairs_mut().extend_pairs(missing);
    }
    url
}

/// Establish one connection, complete the namespace handshake, join the
/// monitoring room and read events until it drops. Resets `attempt` once
/// the handshake succeeds.
async fn connect_and_read(
    url: &Url,
    connector: Option<Connector>,
    event_tx: &broadcast::Sender<Arc<ChannelEvent>>,
    cancel: &CancellationToken,
    attempt: &mut u32,
) -> Result<(), Error> {
    tracing::info!(url = %url, "connecting push channel");

    let (ws_stream, _response) = tokio::select! {
        biased;
        () = cancel.cancelled() => return Ok(()),
        conn = tokio_tungstenite::connect_async_tls_with_config(url.as_str(), None, false, connector) => {
            conn.map_err(|e| Error::WebSocketConnect(e.to_string()))?
        }
    };

    let (mut write, mut read) = ws_stream.split();

    let open = tokio::select! {
        biased;
        () = cancel.cancelled() => return Ok(()),
        open = tokio::time::timeout(HANDSHAKE_TIMEOUT, handshake(&mut write, &mut read)) => {
            open.map_err(|_| Error::WebSocketConnect("handshake timed out".into()))??
        }
    };

    send(&mut write, &Packet::bare_event(JOIN_COMMAND)).await?;

    tracing::info!(sid = %open.sid, "push channel connected");
    *attempt = 0;
    let _ = event_tx.send(Arc::new(ChannelEvent::Connected));

    let liveness = open.liveness_window();
    let silence = tokio::time::sleep(liveness);
    tokio::pin!(silence);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                let _ = send(&mut write, &Packet::bare_event(LEAVE_COMMAND)).await;
                let _ = send(&mut write, &Packet::Disconnect).await;
                let _ = write.close().await;
                return Ok(());
            }
            () = &mut silence => {
                return Err(Error::WebSocketConnect(format!(
                    "no ping from server within {liveness:?}"
                )));
            }
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match Packet::decode(text.as_str()) {
                        Some(Packet::Ping) => {
                            silence.as_mut().reset(tokio::time::Instant::now() + liveness);
                            send(&mut write, &Packet::Pong).await?;
                        }
                        Some(Packet::Event { name, data }) => {
                            broadcast_frame(PushFrame { event: name, data }, event_tx);
                        }
                        Some(Packet::Disconnect | Packet::Close) => {
                            tracing::info!("push channel closed by server");
                            return Ok(());
                        }
                        Some(other) => tracing::trace!(packet = ?other, "ignored push packet"),
                        None => tracing::debug!(text = %text.as_str(), "unparseable push packet"),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        return match frame {
                            Some(cf) if cf.code != CloseCode::Normal => {
                                Err(Error::WebSocketClosed {
                                    code: u16::from(cf.code),
                                    reason: cf.reason.as_str().to_owned(),
                                })
                            }
                            _ => Ok(()),
                        };
                    }
                    Some(Err(e)) => return Err(Error::WebSocketConnect(e.to_string())),
                    None => {
                        tracing::info!("push stream ended");
                        return Ok(());
                    }
                    // Websocket pings are answered by tungstenite; binary attachments are unused.
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

/// Wait for the engine open packet, connect the default namespace and
/// wait for its ack. A server ping during the handshake is answered.
async fn handshake(write: &mut WsWrite, read: &mut WsRead) -> Result<OpenHandshake, Error> {
    let mut open = None;

    while let Some(frame) = read.next().await {
        let frame = frame.map_err(|e| Error::WebSocketConnect(e.to_string()))?;
        let Message::Text(text) = frame else {
            continue;
        };
        match Packet::decode(text.as_str()) {
            Some(Packet::Open(handshake)) => {
                send(write, &Packet::Connect).await?;
                open = Some(handshake);
            }
            Some(Packet::Connect) => {
                return open.ok_or_else(|| {
                    Error::WebSocketConnect("namespace ack before engine open".into())
                });
            }
            Some(Packet::ConnectError(message)) => {
                return Err(Error::WebSocketConnect(format!(
                    "namespace connect refused: {message}"
                )));
            }
            Some(Packet::Ping) => send(write, &Packet::Pong).await?,
            Some(Packet::Close | Packet::Disconnect) => break,
            _ => {}
        }
    }

    Err(Error::WebSocketConnect("connection closed during handshake".into()))
}

async fn send(write: &mut WsWrite, packet: &Packet) -> Result<(), Error> {
    write
        .send(Message::text(packet.encode()))
        .await
        .map_err(|e| Error::WebSocketConnect(e.to_string()))
}

fn broadcast_frame(frame: PushFrame, event_tx: &broadcast::Sender<Arc<ChannelEvent>>) {
    tracing::trace!(event = %frame.event, "push frame");
    // No subscribers is fine.
    let _ = event_tx.send(Arc::new(ChannelEvent::Frame(frame)));
}

// ── Backoff calculation ──────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) * (1 ± 0.25)`
pub fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let exponent = i32::try_from(attempt.min(32)).unwrap_or(32);
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(exponent);
    let capped = base.min(config.max_delay.as_secs_f64());

    // Deterministic jitter seeded from the attempt number.
    let jitter_factor = 1.0 + 0.25 * (f64::from(attempt) * 7.3).sin();
    let with_jitter = (capped * jitter_factor).max(0.0);

    Duration::from_secs_f64(with_jitter)
}

// ── Tests ────────────────────────────────────────────────────────────
