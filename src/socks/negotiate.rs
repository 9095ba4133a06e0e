//! SOCKS5 method negotiation
//!
//! First exchange on every session:
//!
//! ```text
//! +----+----------+----------+        +----+--------+
//! |VER | NMETHODS | METHODS  |   ->   |VER | METHOD |
//! +----+----------+----------+        +----+--------+
//! | 1  |    1     | 1 to 255 |        | 1  |   1    |
//! +----+----------+----------+        +----+--------+
//! ```
//!
//! Only "no authentication required" is acceptable. A client that does not
//! offer it gets method byte 0xFF and the session ends there.

use super::consts::*;
use super::reply::send_method;
use crate::error::Socks5Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

/// Negotiate the authentication method on a fresh session
///
/// On success the no-auth method has been confirmed to the client and the
/// stream is positioned at the request message. Every failure sends a
/// best-effort 0xFF rejection first; rejection-write errors are not
/// reported over the original failure.
pub async fn negotiate<S>(stream: &mut S) -> Result<(), Socks5Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut header = [0u8; 2];
    stream.read_exact(&mut header).await?;

    let version = header[0];
    let num_methods = header[1] as usize;

    if version != SOCKS5_VERSION {
        let _ = send_method(stream, SOCKS5_METHOD_NO_ACCEPTABLE).await;
        return Err(Socks5Error::UnsupportedVersion(version));
    }

    let mut methods = vec![0u8; num_methods];
    stream.read_exact(&mut methods).await?;

    if !methods.contains(&SOCKS5_METHOD_NO_AUTH) {
        let _ = send_method(stream, SOCKS5_METHOD_NO_ACCEPTABLE).await;
        return Err(Socks5Error::NoAcceptableMethod);
    }

    send_method(stream, SOCKS5_METHOD_NO_AUTH).await?;

    Ok(())
}
