//! RFC 1035 §4.2.2 framing: every message is preceded by a two-byte
//! big-endian length. Shared by the upstream DoT session and the inbound TCP
//! listener.

use autobgp_domain::DomainError;
use std::io;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const MAX_TCP_MESSAGE_SIZE: usize = 65535;

pub async fn send_with_length_prefix<S>(stream: &mut S, message_bytes: &[u8]) -> io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("message too large: {} bytes", message_bytes.len()),
        )
    })?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

pub async fn read_with_length_prefix<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let message_len = u16::from_be_bytes(len_buf) as usize;

    let mut message = vec![0u8; message_len];
    stream.read_exact(&mut message).await?;

    Ok(message)
}

/// Maps a stream failure to the transport error taxonomy.
pub fn io_error(server: &str, error: io::Error) -> DomainError {
    let server = server.to_string();
    match error.kind() {
        io::ErrorKind::TimedOut => DomainError::TransportTimeout { server },
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused { server },
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => DomainError::TransportConnectionReset { server },
        _ => DomainError::TransportFailed {
            server,
            reason: error.to_string(),
        },
    }
}
