//! Upload transfer: filename off the wire, base64 quanta into a file.

use crate::network::ClientHandle;
use crate::state::Hub;
use remcon_proto::upload::{QUANTUM_LEN, decode_quantum, read_filename};
use remcon_proto::{Frame, ProtocolError, WireReader};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, info};

const INVALID_FILENAME: &str = "upload: invalid file name!\n";
const CREATE_FAILED: &str = "can't create file!\n";

/// Receive one upload. Called after the dispatcher consumed `upload `.
///
/// Errors never close the connection: a bad filename or unopenable
/// destination gets a text reply and aborts the transfer; transport faults
/// abort silently and are caught by the next dispatcher read.
pub(crate) async fn receive<R>(reader: &mut WireReader<R>, handle: &ClientHandle, hub: &Hub)
where
    R: AsyncRead + Unpin,
{
    let filename = match read_filename(reader).await {
        Ok(name) => name,
        Err(ProtocolError::ForbiddenFilenameChar(character)) => {
            debug!(?character, "rejected upload filename");
            handle.send(INVALID_FILENAME);
            return;
        }
        Err(ProtocolError::Io(error)) => {
            debug!(%error, "upload aborted");
            return;
        }
    };

    let path = hub.write_root.join(&filename);
    let mut file = match File::create(&path).await {
        Ok(file) => file,
        Err(error) => {
            debug!(path = %path.display(), %error, "failed to open upload destination");
            handle.send(CREATE_FAILED);
            return;
        }
    };

    let mut written = 0usize;
    loop {
        match reader.read_chunk(QUANTUM_LEN).await {
            Ok(Frame::Chunk { bytes, more: true }) => match decode_quantum(&bytes) {
                Ok(decoded) => {
                    if let Err(error) = file.write_all(&decoded).await {
                        debug!(%error, "failed to write upload data");
                        return;
                    }
                    written += decoded.len();
                }
                Err(error) => debug!(%error, "skipping undecodable quantum"),
            },
            // A newline inside the quantum read, or the peer going away,
            // ends the transfer.
            Ok(Frame::Chunk { more: false, .. }) | Ok(Frame::Closed) => break,
            Err(error) => {
                debug!(%error, "upload read failed");
                break;
            }
        }
    }

    // tokio file writes complete in the background; settle them before the
    // dispatcher acknowledges with a prompt.
    if let Err(error) = file.flush().await {
        debug!(%error, "failed to flush upload destination");
    }

    info!(file = %path.display(), bytes = written, "upload complete");
}
