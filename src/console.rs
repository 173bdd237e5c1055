//! The console server: lifecycle, registry surface, log entry point.

use crate::commands::{Command, builtins};
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::network::{Gateway, bind_port};
use crate::state::Hub;
use parking_lot::{Mutex, RwLock};
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, warn};

struct Worker {
    thread: thread::JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

/// An embedded TCP administration console.
///
/// Lifecycle is `Idle -> Listening -> Stopped`: [`listen_on_tcp`] or
/// [`listen_on`] starts the event-loop thread, [`stop`] signals it and
/// joins. The instance can listen again after a stop. All methods take
/// `&self`, so a console can be shared across threads; [`log`] in
/// particular is meant to be called from arbitrary producer threads.
///
/// [`listen_on_tcp`]: Console::listen_on_tcp
/// [`listen_on`]: Console::listen_on
/// [`stop`]: Console::stop
/// [`log`]: Console::log
pub struct Console {
    hub: Arc<Hub>,
    bind_address: RwLock<Option<String>>,
    worker: Mutex<Option<Worker>>,
    is_ipv6: AtomicBool,
}

impl Console {
    /// Create a console with the built-in commands registered.
    pub fn new(config: ConsoleConfig) -> Self {
        let hub = Arc::new(Hub::new(&config));
        builtins::install(&hub);
        Self {
            hub,
            bind_address: RwLock::new(config.bind_address),
            worker: Mutex::new(None),
            is_ipv6: AtomicBool::new(false),
        }
    }

    /// Bind `port` and start serving.
    ///
    /// The configured bind address restricts the listener to one interface;
    /// otherwise the first workable address family wins.
    pub fn listen_on_tcp(&self, port: u16) -> Result<(), ConsoleError> {
        let bind_ip = match self.bind_address.read().as_deref() {
            Some(address) => Some(
                address
                    .parse::<IpAddr>()
                    .map_err(|_| ConsoleError::InvalidBindAddress(address.to_string()))?,
            ),
            None => None,
        };
        let listener =
            bind_port(port, bind_ip).map_err(|source| ConsoleError::Bind { port, source })?;
        self.listen_on(listener)
    }

    /// Adopt an already-open listener and start serving on it.
    ///
    /// Rejected while already listening; `stop()` first.
    pub fn listen_on(&self, listener: std::net::TcpListener) -> Result<(), ConsoleError> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            warn!("console already started; 'stop' it before calling 'listen' again");
            return Err(ConsoleError::AlreadyListening);
        }

        let is_ipv6 = listener.local_addr().map(|a| a.is_ipv6()).unwrap_or(false);
        self.is_ipv6.store(is_ipv6, Ordering::Release);
        listener.set_nonblocking(true)?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let hub = Arc::clone(&self.hub);
        let thread = thread::Builder::new()
            .name("remcon-console".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_io()
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(error) => {
                        error!(%error, "failed to build console runtime");
                        return;
                    }
                };
                runtime.block_on(async move {
                    let listener = match TcpListener::from_std(listener) {
                        Ok(listener) => listener,
                        Err(error) => {
                            error!(%error, "failed to adopt console listener");
                            return;
                        }
                    };
                    Gateway::new(listener, hub, shutdown_rx).run().await;
                });
            })?;

        *worker = Some(Worker {
            thread,
            shutdown: shutdown_tx,
        });
        Ok(())
    }

    /// Signal the event loop and join its thread.
    ///
    /// No-op when never started; idempotent. Every open client socket and
    /// the listener are closed on the way out.
    pub fn stop(&self) {
        let taken = self.worker.lock().take();
        if let Some(worker) = taken {
            let _ = worker.shutdown.send(true);
            if worker.thread.join().is_err() {
                error!("console worker thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Whether the active (or last) listener is IPv6.
    pub fn is_ipv6_server(&self) -> bool {
        self.is_ipv6.load(Ordering::Acquire)
    }

    /// Queue a message for broadcast to every connected client.
    ///
    /// Callable from any thread. Dropped unless forwarding was enabled
    /// (`debugmsg on`). Delivery happens on the next flush tick.
    pub fn log(&self, message: impl Into<String>) {
        self.hub.log(message.into());
    }

    /// Restrict which local interface `listen_on_tcp` binds.
    pub fn set_bind_address(&self, address: impl Into<String>) {
        *self.bind_address.write() = Some(address.into());
    }

    pub fn prompt(&self) -> String {
        self.hub.prompt()
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.hub.set_prompt(prompt.into());
    }

    /// Register a command, replacing any previous one with the same name.
    pub fn add_command(&self, command: Command) {
        self.hub.registry.write().add(command);
    }

    /// Attach a subcommand to a registered command.
    pub fn add_sub_command(&self, parent: &str, sub: Command) {
        self.hub.registry.write().add_sub(parent, sub);
    }

    /// Look up a command; returns a deep copy of its subtree.
    pub fn get_command(&self, name: &str) -> Option<Command> {
        self.hub.registry.read().get(name).cloned()
    }

    pub fn get_sub_command(&self, parent: &str, name: &str) -> Option<Command> {
        self.hub.registry.read().get_sub(parent, name).cloned()
    }

    pub fn remove_command(&self, name: &str) {
        self.hub.registry.write().remove(name);
    }

    pub fn remove_sub_command(&self, parent: &str, name: &str) {
        self.hub.registry.write().remove_sub(parent, name);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.stop();
    }
}
