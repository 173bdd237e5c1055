//! Upload sub-protocol rules: filename scanning and base64 quanta.
//!
//! An upload line is `upload <filename> <base64 body...>`. The body is sent
//! as consecutive 4-byte base64 quanta and terminated by the line's newline.
//! Protocol precondition: the encoder must never emit a raw 0x0A byte, which
//! any conforming base64 encoder guarantees (its output is printable ASCII),
//! so a newline inside a quantum read can only be the terminator.

use crate::error::ProtocolError;
use crate::wire::WireReader;
use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine as _};
use tokio::io::AsyncRead;

/// Characters that abort an upload before any file is opened.
pub const FORBIDDEN_FILENAME_CHARS: &[u8] = &[
    b':', b'/', b'\\', b'?', b'%', b'*', b'<', b'>', b'"', b'|', b'\r', b'\n', b'\t',
];

/// Cap on the destination filename, in bytes.
pub const MAX_FILENAME_LEN: usize = 511;

/// One base64 quantum: four transmitted bytes, up to three decoded.
pub const QUANTUM_LEN: usize = 4;

/// Read the destination filename off the wire.
///
/// Stops at the first space (consumed, not included), at end-of-stream, or
/// at [`MAX_FILENAME_LEN`] bytes. A forbidden character aborts with
/// [`ProtocolError::ForbiddenFilenameChar`] without consuming further input.
pub async fn read_filename<R>(reader: &mut WireReader<R>) -> Result<String, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut name = Vec::new();
    while name.len() < MAX_FILENAME_LEN {
        match reader.read_byte().await? {
            None | Some(b' ') => break,
            Some(byte) if FORBIDDEN_FILENAME_CHARS.contains(&byte) => {
                return Err(ProtocolError::ForbiddenFilenameChar(byte as char));
            }
            Some(byte) => name.push(byte),
        }
    }
    Ok(String::from_utf8_lossy(&name).into_owned())
}

/// Decode one 4-byte base64 quantum.
pub fn decode_quantum(quantum: &[u8]) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(quantum)
}

/// Convenience check used by tests and host tooling.
pub fn filename_is_valid(name: &str) -> bool {
    !name.bytes().any(|b| FORBIDDEN_FILENAME_CHARS.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filename_stops_at_space_and_excludes_it() {
        let mut reader = WireReader::new(&b"ok.bin QUJD\n"[..]);
        assert_eq!(read_filename(&mut reader).await.unwrap(), "ok.bin");
        assert_eq!(reader.read_byte().await.unwrap(), Some(b'Q'));
    }

    #[tokio::test]
    async fn forbidden_character_aborts() {
        let mut reader = WireReader::new(&b"evil:name data"[..]);
        match read_filename(&mut reader).await {
            Err(ProtocolError::ForbiddenFilenameChar(':')) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn newline_counts_as_forbidden() {
        let mut reader = WireReader::new(&b"\n"[..]);
        assert!(matches!(
            read_filename(&mut reader).await,
            Err(ProtocolError::ForbiddenFilenameChar('\n'))
        ));
    }

    #[tokio::test]
    async fn end_of_stream_ends_the_name() {
        let mut reader = WireReader::new(&b"trailing"[..]);
        assert_eq!(read_filename(&mut reader).await.unwrap(), "trailing");
    }

    #[test]
    fn quantum_decodes_three_zero_bytes() {
        assert_eq!(decode_quantum(b"AAAA").unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn padded_quantum_decodes_short() {
        assert_eq!(decode_quantum(b"QQ==").unwrap(), b"A".to_vec());
        assert_eq!(decode_quantum(b"QUI=").unwrap(), b"AB".to_vec());
    }

    #[test]
    fn garbage_quantum_is_an_error() {
        assert!(decode_quantum(b"!!!!").is_err());
    }

    #[test]
    fn validity_check_matches_the_forbidden_set() {
        assert!(filename_is_valid("ok.bin"));
        assert!(!filename_is_valid("evil:name"));
        assert!(!filename_is_valid("a\\b"));
    }
}
