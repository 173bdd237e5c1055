//! Gateway - the console's listener and event-loop body.
//!
//! One `select!` loop over three sources: the shutdown watch, a one-second
//! flush tick for the pending-log queue, and `accept`. Runs on the console's
//! dedicated current-thread runtime, so every connection task it spawns is
//! multiplexed on that same thread.

use crate::network::Connection;
use crate::state::Hub;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// Cadence of the pending-log flush.
const LOG_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Bind `port` on the first workable candidate address.
///
/// An explicit bind address restricts the listener to that interface;
/// otherwise IPv4-any is tried before IPv6-any.
pub(crate) fn bind_port(
    port: u16,
    bind_address: Option<IpAddr>,
) -> io::Result<std::net::TcpListener> {
    let candidates: Vec<SocketAddr> = match bind_address {
        Some(ip) => vec![SocketAddr::new(ip, port)],
        None => vec![
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port),
        ],
    };

    let mut last_error = None;
    for addr in candidates {
        match std::net::TcpListener::bind(addr) {
            Ok(listener) => {
                let local = listener.local_addr()?;
                let family = if local.is_ipv6() { "IPV6" } else { "IPV4" };
                info!(addr = %local, "{} console server is listening", family);
                return Ok(listener);
            }
            Err(error) => last_error = Some(error),
        }
    }
    Err(last_error
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no bindable address")))
}

pub(crate) struct Gateway {
    listener: TcpListener,
    hub: Arc<Hub>,
    shutdown: watch::Receiver<bool>,
}

impl Gateway {
    pub(crate) fn new(listener: TcpListener, hub: Arc<Hub>, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            listener,
            hub,
            shutdown,
        }
    }

    /// Accept clients and flush broadcast logs until shutdown.
    pub(crate) async fn run(mut self) {
        let mut flush = tokio::time::interval(LOG_FLUSH_INTERVAL);
        let mut next_id: u64 = 0;

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                _ = flush.tick() => self.hub.flush_pending_logs(),
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        next_id += 1;
                        let connection = Connection::new(
                            next_id,
                            stream,
                            addr,
                            Arc::clone(&self.hub),
                            self.shutdown.clone(),
                        );
                        tokio::spawn(connection.run());
                    }
                    // Accept faults don't stop the loop.
                    Err(error) => error!(%error, "failed to accept connection"),
                },
            }
        }

        self.hub.close_all();
        info!("console loop stopped");
    }
}
