// jarm-api: Async Rust client for the JARM monitoring backend (HTTP + push channel)

pub mod client;
pub mod error;
pub mod models;
pub mod push;
pub mod transport;

mod alerts;
mod diagnostics;
mod monitoring;
mod processes;
mod socketio;
mod tasks;

pub use client::ApiClient;
pub use error::Error;
pub use push::{ChannelEvent, PushFrame, PushHandle, ReconnectConfig};
pub use transport::{TlsMode, TransportConfig};
