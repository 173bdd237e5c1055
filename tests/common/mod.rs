//! Integration test common infrastructure.
//!
//! Starts in-process consoles on ephemeral ports and provides a raw TCP
//! client that understands the prompt-framed protocol.

pub mod client;

#[allow(unused_imports)]
pub use client::TestClient;

use remcon::{Console, ConsoleConfig};
use std::net::SocketAddr;

/// Start an in-process console on an ephemeral local port.
#[allow(dead_code)]
pub fn start_console() -> anyhow::Result<(Console, SocketAddr)> {
    start_console_with(ConsoleConfig::default())
}

/// Start an in-process console with a custom configuration.
#[allow(dead_code)]
pub fn start_console_with(config: ConsoleConfig) -> anyhow::Result<(Console, SocketAddr)> {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
    let addr = listener.local_addr()?;
    let console = Console::new(config);
    console.listen_on(listener)?;
    Ok((console, addr))
}
