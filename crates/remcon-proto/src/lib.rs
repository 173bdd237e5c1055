//! Wire protocol for the remcon embedded administration console.
//!
//! The console speaks a newline-terminated ASCII command protocol with one
//! binary sub-protocol (chunked base64 file uploads). This crate owns the
//! transport-facing half of that: bounded buffered reads with the framing
//! the dispatcher needs, statement splitting/tokenizing, and the upload
//! filename and quantum rules.

pub mod error;
pub mod statement;
pub mod upload;
pub mod wire;

pub use error::ProtocolError;
pub use wire::{Frame, WireReader};
