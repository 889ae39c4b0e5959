// Engine.IO v4 / Socket.IO v5 text packet codec
//
// Only what the push channel needs over a websocket-only transport: the
// engine open/close/ping/pong packets and the default-namespace
// connect, disconnect, event and connect-error packets. Binary
// attachments and acknowledgements are not used by the backend.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Query pairs the engine expects on the websocket upgrade request.
pub(crate) const ENGINE_QUERY: [(&str, &str); 2] = [("EIO", "4"), ("transport", "websocket")];

/// Payload of the engine `open` packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpenHandshake {
    #[serde(default)]
    pub sid: String,
    /// Milliseconds between server pings.
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong; also our grace period.
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

impl OpenHandshake {
    /// How long the connection may stay silent before it counts as dead.
    pub fn liveness_window(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Packet {
    Open(OpenHandshake),
    Close,
    Ping,
    Pong,
    Noop,
    /// Namespace connect acknowledged.
    Connect,
    Disconnect,
    Event { name: String, data: Value },
    ConnectError(String),
}

impl Packet {
    pub fn decode(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let engine = chars.next()?;
        let rest = chars.as_str();
        match engine {
            '0' => serde_json::from_str(rest).ok().map(Self::Open),
            '1' => Some(Self::Close),
            '2' => Some(Self::Ping),
            '3' => Some(Self::Pong),
            '4' => decode_message(rest),
            '6' => Some(Self::Noop),
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Open(_) => "0".to_owned(),
            Self::Close => "1".to_owned(),
            Self::Ping => "2".to_owned(),
            Self::Pong => "3".to_owned(),
            Self::Noop => "6".to_owned(),
            Self::Connect => "40".to_owned(),
            Self::Disconnect => "41".to_owned(),
            Self::Event { name, data } => {
                let args = if data.is_null() {
                    Value::Array(vec![Value::String(name.clone())])
                } else {
                    Value::Array(vec![Value::String(name.clone()), data.clone()])
                };
                format!("42{args}")
            }
            Self::ConnectError(message) => {
                format!("44{}", serde_json::json!({ "message": message }))
            }
        }
    }

    /// An event without arguments, e.g. `42["join_monitoring"]`.
    pub fn bare_event(name: &str) -> Self {
        Self::Event {
            name: name.to_owned(),
            data: Value::Null,
        }
    }
}

fn decode_message(rest: &str) -> Option<Packet> {
    let mut chars = rest.chars();
    let kind = chars.next()?;
    let body = chars.as_str();

    // Only the default namespace is joined; packets for others are ignored.
    if body.starts_with('/') {
        return None;
    }

    match kind {
        '0' => Some(Packet::Connect),
        '1' => Some(Packet::Disconnect),
        '2' => {
            // Skip an optional acknowledgement id.
            let json = body.trim_start_matches(|c: char| c.is_ascii_digit());
            let Value::Array(mut args) = serde_json::from_str(json).ok()? else {
                return None;
            };
            if args.is_empty() {
                return None;
            }
            let Value::String(name) = args.remove(0) else {
                return None;
            };
            let data = if args.is_empty() {
                Value::Null
            } else {
                args.swap_remove(0)
            };
            Some(Packet::Event { name, data })
        }
        '4' => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| match v {
                    Value::String(s) => Some(s),
                    Value::Object(map) => map
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    _ => None,
                })
                .unwrap_or_else(|| "connection refused".to_owned());
            Some(Packet::ConnectError(message))
        }
        _ => None,
    }
}
