//! SOCKS5 request decoder
//!
//! Parses the command message that follows a successful negotiation.
//!
//! ```text
//! +----+-----+-------+------+----------+----------+
//! |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
//! +----+-----+-------+------+----------+----------+
//! | 1  |  1  | X'00' |  1   | Variable |    2     |
//! +----+-----+-------+------+----------+----------+
//! ```
//!
//! Decoding is pure: failures carry their classification back to the
//! session, which owns sending the mapped reply.

use super::addr::read_address;
use super::consts::*;
use super::types::{SocksCommand, TargetAddr};
use crate::error::Socks5Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// A decoded proxy request, immutable once parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Requested command
    pub command: SocksCommand,
    /// Destination address and port
    pub target: TargetAddr,
}

/// Read and decode one request message
///
/// The version byte must be 5 before any other field is trusted. The
/// reserved byte is ignored, not validated. Unknown command and address
/// type bytes are preserved in the returned error for diagnostics.
pub async fn read_request<S>(stream: &mut S) -> Result<Request, Socks5Error>
where
    S: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    stream.read_exact(&mut header).await?;

    let version = header[0];
    let command_byte = header[1];
    let _reserved = header[2];
    let addr_type = header[3];

    if version != SOCKS5_VERSION {
        return Err(Socks5Error::UnsupportedVersion(version));
    }

    let command = SocksCommand::from_byte(command_byte)
        .ok_or(Socks5Error::CommandNotSupported(command_byte))?;

    let target = read_address(stream, addr_type).await?;

    Ok(Request { command, target })
}
