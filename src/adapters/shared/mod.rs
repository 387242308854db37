//! Helpers shared by all exchange adapters.

pub mod websocket;

pub use websocket::{connect_tls, TlsWebSocketStream};
