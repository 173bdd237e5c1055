//! Unified error handling for the console server.

use std::io;
use thiserror::Error;

/// Lifecycle and transport errors surfaced by [`Console`](crate::Console).
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Listen was called while the console is already listening.
    #[error("console already listening; stop() it before calling listen again")]
    AlreadyListening,

    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("failed to bind port {port}: {source}")]
    Bind { port: u16, source: io::Error },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Dispatch faults that become client-visible text.
///
/// The connection survives these; only the offending line is cut short.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// A statement with no tokens at all.
    #[error("Unknown command. Type 'help' for options")]
    Empty,

    /// The statement's first token matched no registered command.
    #[error("Unknown command {0}. Type 'help' for options")]
    Unknown(String),
}

impl DispatchError {
    /// Wire form sent back to the offending client.
    pub fn client_message(&self) -> String {
        format!("{self}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_are_newline_terminated() {
        assert_eq!(
            DispatchError::Empty.client_message(),
            "Unknown command. Type 'help' for options\n"
        );
        assert_eq!(
            DispatchError::Unknown("frobnicate".into()).client_message(),
            "Unknown command frobnicate. Type 'help' for options\n"
        );
    }
}
