//! Shared console state.
//!
//! One `Hub` per console instance. The event-loop thread owns all socket
//! lifecycle and registry reads during dispatch; the only cross-thread
//! touchpoints are the pending-log queue (any producer thread) and the
//! registry lock (host registration calls).

use crate::commands::Registry;
use crate::config::ConsoleConfig;
use crate::network::{ClientHandle, Outgoing};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

pub(crate) struct Hub {
    pub(crate) registry: RwLock<Registry>,
    /// Outgoing queues of every open connection. This map *is* the
    /// connection set: entries are added on accept and removed exactly once
    /// at teardown.
    senders: DashMap<u64, mpsc::UnboundedSender<Outgoing>>,
    /// Mailbox from producer threads, drained by the event loop's flush tick.
    pending_logs: Mutex<Vec<String>>,
    broadcast_enabled: AtomicBool,
    prompt: RwLock<String>,
    separator: RwLock<char>,
    pub(crate) write_root: PathBuf,
}

impl Hub {
    pub(crate) fn new(config: &ConsoleConfig) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            senders: DashMap::new(),
            pending_logs: Mutex::new(Vec::new()),
            broadcast_enabled: AtomicBool::new(false),
            prompt: RwLock::new(config.prompt.clone()),
            separator: RwLock::new(config.command_separator),
            write_root: config.write_root.clone(),
        }
    }

    pub(crate) fn register_sender(&self, id: u64, sender: mpsc::UnboundedSender<Outgoing>) {
        self.senders.insert(id, sender);
    }

    pub(crate) fn unregister_sender(&self, id: u64) {
        self.senders.remove(&id);
    }

    pub(crate) fn connection_count(&self) -> usize {
        self.senders.len()
    }

    pub(crate) fn send_prompt(&self, handle: &ClientHandle) {
        handle.send(self.prompt());
    }

    /// Queue a message for broadcast. Dropped while broadcasting is off.
    pub(crate) fn log(&self, message: String) {
        if self.broadcast_enabled() {
            self.pending_logs.lock().push(message);
        }
    }

    /// Fan queued messages out to every open connection, FIFO.
    ///
    /// Best-effort: a contended queue lock defers the whole flush to the
    /// next tick rather than blocking the event loop.
    pub(crate) fn flush_pending_logs(&self) {
        if !self.broadcast_enabled() {
            return;
        }
        let Some(mut pending) = self.pending_logs.try_lock() else {
            return;
        };
        for message in pending.drain(..) {
            for entry in self.senders.iter() {
                let _ = entry.value().send(Outgoing::Text(message.clone()));
            }
        }
    }

    pub(crate) fn broadcast_enabled(&self) -> bool {
        self.broadcast_enabled.load(Ordering::Acquire)
    }

    pub(crate) fn set_broadcast_enabled(&self, enabled: bool) {
        self.broadcast_enabled.store(enabled, Ordering::Release);
    }

    pub(crate) fn prompt(&self) -> String {
        self.prompt.read().clone()
    }

    pub(crate) fn set_prompt(&self, prompt: String) {
        *self.prompt.write() = prompt;
    }

    pub(crate) fn separator(&self) -> char {
        *self.separator.read()
    }

    /// Close every open connection and forget it.
    pub(crate) fn close_all(&self) {
        for entry in self.senders.iter() {
            let _ = entry.value().send(Outgoing::Close);
        }
        self.senders.clear();
    }
}
