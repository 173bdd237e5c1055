//! Connection - handles an individual client.
//!
//! Each accepted client gets one task on the console's event-loop runtime:
//! a read-dispatch loop over the socket plus a small writer task draining
//! the client's outgoing queue. The queue's sender is what handlers see, as
//! a [`ClientHandle`] - cheap to clone and usable from any thread, which is
//! how deferred callbacks answer clients long after the original request.

use crate::dispatch;
use crate::state::Hub;
use remcon_proto::WireReader;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Messages queued for a client's writer task.
#[derive(Debug)]
pub(crate) enum Outgoing {
    Text(String),
    Close,
}

/// Cheap cloneable handle to a connected client.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: u64,
    addr: SocketAddr,
    tx: mpsc::UnboundedSender<Outgoing>,
    close_requested: Arc<AtomicBool>,
}

impl ClientHandle {
    pub(crate) fn new(id: u64, addr: SocketAddr, tx: mpsc::UnboundedSender<Outgoing>) -> Self {
        Self {
            id,
            addr,
            tx,
            close_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Queue text for delivery. Best-effort: output for a client that has
    /// already gone away is dropped.
    pub fn send(&self, text: impl Into<String>) {
        let _ = self.tx.send(Outgoing::Text(text.into()));
    }

    /// Ask the event loop to close this connection.
    pub fn close(&self) {
        self.close_requested.store(true, Ordering::Release);
        let _ = self.tx.send(Outgoing::Close);
    }

    /// Connection id, unique for the lifetime of the console.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remote peer address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub(crate) fn close_requested(&self) -> bool {
        self.close_requested.load(Ordering::Acquire)
    }
}

pub(crate) struct Connection {
    id: u64,
    stream: TcpStream,
    addr: SocketAddr,
    hub: Arc<Hub>,
    shutdown: watch::Receiver<bool>,
}

impl Connection {
    pub(crate) fn new(
        id: u64,
        stream: TcpStream,
        addr: SocketAddr,
        hub: Arc<Hub>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id,
            stream,
            addr,
            hub,
            shutdown,
        }
    }

    /// Run the connection read-dispatch loop until close.
    pub(crate) async fn run(self) {
        let Connection {
            id,
            stream,
            addr,
            hub,
            mut shutdown,
        } = self;

        info!(id, %addr, "client connected");

        let (read_half, write_half) = stream.into_split();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ClientHandle::new(id, addr, tx.clone());

        hub.register_sender(id, tx);
        tokio::spawn(write_outgoing(write_half, rx));
        hub.send_prompt(&handle);

        let mut reader = WireReader::new(read_half);
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                keep = dispatch::parse_command(&mut reader, &handle, &hub) => {
                    if !keep || handle.close_requested() {
                        break;
                    }
                }
            }
        }

        hub.unregister_sender(id);
        handle.close();
        info!(id, %addr, open = hub.connection_count(), "client disconnected");
    }
}

async fn write_outgoing(mut half: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<Outgoing>) {
    while let Some(message) = rx.recv().await {
        match message {
            Outgoing::Text(text) => {
                if let Err(error) = half.write_all(text.as_bytes()).await {
                    debug!(%error, "write failed");
                    break;
                }
            }
            Outgoing::Close => break,
        }
    }
    let _ = half.shutdown().await;
}
