//! Bidirectional TCP relay
//!
//! The terminal phase of a session: once the tunnel exists, bytes pass
//! through unmodified and in order, with no framing or inspection.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// Relay bytes between client and remote until either side closes
///
/// Both directions are copied concurrently. The first direction to finish
/// (clean EOF or error) wins the select, the other copy is dropped, and
/// both streams are dropped on return, so closing either side promptly
/// tears down the whole tunnel. Half-open tunnels are not supported.
pub async fn relay<A, B>(client: A, remote: B)
where
    A: AsyncRead + AsyncWrite + Unpin,
    B: AsyncRead + AsyncWrite + Unpin,
{
    let (mut client_read, mut client_write) = tokio::io::split(client);
    let (mut remote_read, mut remote_write) = tokio::io::split(remote);

    let upstream = tokio::io::copy(&mut client_read, &mut remote_write);
    let downstream = tokio::io::copy(&mut remote_read, &mut client_write);

    tokio::select! {
        result = upstream => match result {
            Ok(bytes) => debug!("client->remote finished: {} bytes", bytes),
            Err(e) => debug!("client->remote error: {}", e),
        },
        result = downstream => match result {
            Ok(bytes) => debug!("remote->client finished: {} bytes", bytes),
            Err(e) => debug!("remote->client error: {}", e),
        },
    }
}
