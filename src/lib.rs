//! remcon - an embedded TCP administration console.
//!
//! A small, line-oriented TCP server that lives inside a long-running host
//! process. Telnet-style clients connect, issue commands against a
//! hierarchical registry, receive help listings, upload files through a
//! chunked base64 sub-protocol, and get log lines broadcast from the host's
//! own threads. The console owns a single event-loop thread; everything the
//! host touches from other threads (the log entry point, client handles held
//! by deferred callbacks) is safe to call from anywhere.
//!
//! ```no_run
//! use remcon::{Command, Console, ConsoleConfig};
//!
//! let console = Console::new(ConsoleConfig::default());
//! console.add_command(Command::with_handler(
//!     "fps",
//!     "Turn on / off the FPS overlay. Args: [-h | help | on | off | ]",
//!     |handle, _args| handle.send("FPS is: off\n"),
//! ));
//! console.listen_on_tcp(5678).expect("console failed to listen");
//! // ... host main loop runs; producers may call console.log(...) ...
//! console.stop();
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod schedule;

mod console;
mod dispatch;
mod network;
mod state;
mod upload;

pub use commands::{Callback, Command, Registry};
pub use config::{ConfigError, ConsoleConfig};
pub use console::Console;
pub use error::{ConsoleError, DispatchError};
pub use network::ClientHandle;
pub use schedule::{MainThreadExecutor, Task, TaskQueue, TaskRunner};
