//! Dispatcher: turns client bytes into command invocations.
//!
//! `parse_command` reads one exchange off the wire: it sniffs the first six
//! bytes to special-case `upload`, completes the line, splits it into
//! separator-delimited statements, and runs each through the registry. A
//! dispatch fault is written back to the client and the connection lives on;
//! only transport failure or end-of-stream closes it.

use crate::error::DispatchError;
use crate::network::ClientHandle;
use crate::state::Hub;
use crate::upload;
use remcon_proto::statement;
use remcon_proto::{Frame, WireReader};
use tokio::io::AsyncRead;
use tracing::debug;

/// Command line cap; longer lines are completed with a continuation read.
const LINE_BUFSIZ: usize = 512;
/// Length of the `upload` token sniffed off the front of a line.
const UPLOAD_TOKEN_LEN: usize = 6;

const UPLOAD_INVALID_ARGS: &str = "upload: invalid args! Type 'help' for options\n";
const READ_FAILED: &str = "Unknown error!\n";

/// Read and execute one command line. Returns false when the connection
/// should be closed (read failure or end-of-stream); command faults return
/// true and only produce text.
pub(crate) async fn parse_command<R>(
    reader: &mut WireReader<R>,
    handle: &ClientHandle,
    hub: &Hub,
) -> bool
where
    R: AsyncRead + Unpin,
{
    let (mut line, more) = match reader.read_chunk(UPLOAD_TOKEN_LEN).await {
        Ok(Frame::Chunk { bytes, more }) => (bytes, more),
        Ok(Frame::Closed) => return false,
        Err(error) => {
            debug!(%error, "read failed");
            return false;
        }
    };

    if line.as_slice() == b"upload" {
        // The byte after the token decides: a space starts the transfer,
        // anything else is a usage fault.
        match reader.read_byte().await {
            Ok(Some(b' ')) => upload::receive(reader, handle, hub).await,
            _ => handle.send(UPLOAD_INVALID_ARGS),
        }
        hub.send_prompt(handle);
        return true;
    }

    if more {
        match reader.read_line(LINE_BUFSIZ - UPLOAD_TOKEN_LEN).await {
            Ok(Frame::Chunk { bytes, .. }) => line.extend_from_slice(&bytes),
            Ok(Frame::Closed) => return false,
            Err(error) => {
                debug!(%error, "read failed");
                hub.send_prompt(handle);
                handle.send(READ_FAILED);
                return false;
            }
        }
    }

    let line = String::from_utf8_lossy(&line);
    for piece in statement::split_statements(&line, hub.separator()) {
        if let Err(fault) = perform(hub, handle, piece) {
            handle.send(fault.client_message());
            break;
        }
    }

    hub.send_prompt(handle);
    true
}

/// Resolve and invoke a single trimmed statement.
pub(crate) fn perform(
    hub: &Hub,
    handle: &ClientHandle,
    statement: &str,
) -> Result<(), DispatchError> {
    let (name, args) = statement::split_command(statement).ok_or(DispatchError::Empty)?;

    // Clone the command out so the registry lock is not held across the
    // handler; handlers may re-enter the registry through the console API.
    let command = hub
        .registry
        .read()
        .get(name)
        .cloned()
        .ok_or_else(|| DispatchError::Unknown(statement.to_string()))?;

    command.invoke(handle, &args);
    Ok(())
}
