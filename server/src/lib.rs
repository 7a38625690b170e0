//! `rts-relay`
//!
//! WebSocket relay for the RTS client: hands new clients the last known unit
//! positions and fans out move orders between clients.

pub mod config;
pub mod protocol;
pub mod relay;
pub mod server;

pub use config::RelayConfig;
pub use server::serve;
