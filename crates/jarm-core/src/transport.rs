// ── Transport manager ──
//
// Owns the single logical push channel to the backend and re-publishes its
// named events to in-process subscribers. Poll cycles in the scheduler run
// regardless, so push delivery is an optimization and never a dependency.

use std::sync::Arc;

use dashmap::DashMap;
use strum::{Display, EnumString};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use jarm_api::models::{
    AlertNotificationEvent, MetricsUpdateEvent, SystemStatusEvent, TaskUpdateEvent,
};
use jarm_api::{ChannelEvent, PushFrame, PushHandle, ReconnectConfig, TlsMode};

use crate::model::{LiveAlert, MetricSample, SystemStatus, Task};

// ── Topics & messages ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PushTopic {
    Connected,
    Disconnected,
    SystemStatus,
    MetricsUpdate,
    AlertNotification,
    TaskUpdate,
}

/// A decoded push event.
#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    Connected,
    Disconnected { reason: String },
    SystemStatus(SystemStatus),
    MetricsUpdate(MetricSample),
    AlertNotification(LiveAlert),
    TaskUpdate(Task),
}

impl PushMessage {
    pub fn topic(&self) -> PushTopic {
        match self {
            Self::Connected => PushTopic::Connected,
            Self::Disconnected { .. } => PushTopic::Disconnected,
            Self::SystemStatus(_) => PushTopic::SystemStatus,
            Self::MetricsUpdate(_) => PushTopic::MetricsUpdate,
            Self::AlertNotification(_) => PushTopic::AlertNotification,
            Self::TaskUpdate(_) => PushTopic::TaskUpdate,
        }
    }

    /// Decode a raw frame. Unknown events and undecodable payloads yield `None`.
    pub fn decode(frame: &PushFrame) -> Option<Self> {
        let Ok(topic) = frame.event.parse::<PushTopic>() else {
            debug!(event = %frame.event, "ignoring unknown push event");
            return None;
        };

        let data = frame.data.clone();
        let decoded = match topic {
            PushTopic::SystemStatus => serde_json::from_value::<SystemStatusEvent>(data)
                .map(|e| Self::SystemStatus(e.into())),
            PushTopic::MetricsUpdate => match serde_json::from_value::<MetricsUpdateEvent>(data) {
                Ok(e) if e.success == Some(false) => {
                    debug!("dropping unsuccessful metrics update");
                    return None;
                }
                other => other.map(|e| Self::MetricsUpdate(e.metrics.into())),
            },
            PushTopic::AlertNotification => serde_json::from_value::<AlertNotificationEvent>(data)
                .map(|e| Self::AlertNotification(e.into())),
            PushTopic::TaskUpdate => serde_json::from_value::<TaskUpdateEvent>(data)
                .map(|e| Self::TaskUpdate(e.into())),
            // Connection lifecycle comes from the channel itself, not from frames.
            PushTopic::Connected | PushTopic::Disconnected => {
                debug!(event = %frame.event, "ignoring lifecycle frame");
                return None;
            }
        };

        match decoded {
            Ok(message) => Some(message),
            Err(e) => {
                debug!(event = %frame.event, error = %e, "dropping undecodable push event");
                None
            }
        }
    }
}

// ── Event bus ────────────────────────────────────────────────────────

pub type Handler = Arc<dyn Fn(&PushMessage) + Send + Sync>;

/// Synchronous publish/subscribe keyed by topic.
///
/// Multiple handlers per topic are invoked in registration order.
#[derive(Default)]
pub struct EventBus {
    handlers: DashMap<PushTopic, Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, topic: PushTopic, handler: Handler) {
        self.handlers.entry(topic).or_default().push(handler);
    }

    /// Invoke every handler registered for the message's topic.
    pub fn publish(&self, message: &PushMessage) {
        // Clone the list out so handlers may register further handlers.
        let handlers = self
            .handlers
            .get(&message.topic())
            .map(|h| h.value().clone())
            .unwrap_or_default();
        for handler in &handlers {
            handler(message);
        }
    }

    pub fn handler_count(&self, topic: PushTopic) -> usize {
        self.handlers.get(&topic).map_or(0, |h| h.len())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.handlers.len())
            .finish()
    }
}

// ── Connection state ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum TransportMode {
    Push,
    #[default]
    Poll,
}

/// Drives the status indicator only. Data delivery never waits on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub mode: TransportMode,
    pub connected: bool,
}

impl ConnectionState {
    pub const fn push() -> Self {
        Self {
            mode: TransportMode::Push,
            connected: true,
        }
    }

    pub const fn poll() -> Self {
        Self {
            mode: TransportMode::Poll,
            connected: false,
        }
    }
}

// ── TransportManager ─────────────────────────────────────────────────

pub struct TransportManager {
    bus: Arc<EventBus>,
    state: watch::Sender<ConnectionState>,
    push_url: Option<Url>,
    reconnect: ReconnectConfig,
    tls: TlsMode,
    cancel: Option<CancellationToken>,
    pump: Option<JoinHandle<()>>,
}

impl TransportManager {
    /// `push_url == None` keeps the manager in poll mode permanently.
    /// `tls` governs `wss://` push URLs.
    pub fn new(push_url: Option<Url>, reconnect: ReconnectConfig, tls: TlsMode) -> Self {
        let (state, _) = watch::channel(ConnectionState::poll());
        Self {
            bus: Arc::new(EventBus::new()),
            state,
            push_url,
            reconnect,
            tls,
            cancel: None,
            pump: None,
        }
    }

    pub fn on(&self, topic: PushTopic, handler: Handler) {
        self.bus.on(topic, handler);
    }

    pub fn publish(&self, message: &PushMessage) {
        self.bus.publish(message);
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn current_state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Open the push channel and start the pump task. Idempotent.
    pub fn connect(&mut self) {
        if self.cancel.is_some() {
            return;
        }
        let Some(url) = self.push_url.clone() else {
            info!("push channel disabled, polling only");
            return;
        };

        let cancel = CancellationToken::new();
        let handle = PushHandle::connect(
            url,
            self.reconnect.clone(),
            self.tls.clone(),
            cancel.clone(),
        );
        let rx = handle.subscribe();

        let bus = Arc::clone(&self.bus);
        let state = self.state.clone();
        self.pump = Some(tokio::spawn(pump(handle, rx, bus, state, cancel.clone())));
        self.cancel = Some(cancel);
    }

    /// Leave the monitoring topic and close the channel.
    pub fn disconnect(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
            info!("push channel shut down");
        }
        self.pump = None;
        self.state.send_replace(ConnectionState::poll());
    }
}

impl Drop for TransportManager {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

/// Forward channel events to the bus, tracking connection transitions.
async fn pump(
    handle: PushHandle,
    mut rx: broadcast::Receiver<Arc<ChannelEvent>>,
    bus: Arc<EventBus>,
    state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
) {
    // `None` until the first connect attempt resolves.
    let mut connected: Option<bool> = None;

    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = rx.recv() => event,
        };

        let event = match event {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "push pump lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let message = match event.as_ref() {
            ChannelEvent::Connected => {
                if connected == Some(true) {
                    continue;
                }
                connected = Some(true);
                state.send_replace(ConnectionState::push());
                info!("live updates via push channel");
                PushMessage::Connected
            }
            ChannelEvent::Disconnected { reason } => {
                if connected == Some(false) {
                    continue;
                }
                connected = Some(false);
                state.send_replace(ConnectionState::poll());
                info!(%reason, "push channel unavailable, polling");
                PushMessage::Disconnected {
                    reason: reason.clone(),
                }
            }
            ChannelEvent::Frame(frame) => match PushMessage::decode(frame) {
                Some(message) => message,
                None => continue,
            },
        };

        bus.publish(&message);
    }

    handle.shutdown();
    debug!("push pump exiting");
}
