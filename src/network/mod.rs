//! Network layer: listener gateway and per-client connections.

mod connection;
mod gateway;

pub use connection::ClientHandle;
pub(crate) use connection::{Connection, Outgoing};
pub(crate) use gateway::{Gateway, bind_port};
