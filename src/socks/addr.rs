//! SOCKS5 address codec
//!
//! Reads and writes the DST.ADDR/BND.ADDR + port fields shared by requests
//! and replies. The three encodings:
//!
//! ```text
//! ATYP 0x01: 4-byte IPv4 address
//! ATYP 0x03: 1-byte length, then that many domain bytes
//! ATYP 0x04: 16-byte IPv6 address
//! ```
//!
//! The port always follows the address as a big-endian u16, independent of
//! address type.

use super::consts::*;
use super::types::TargetAddr;
use crate::error::Socks5Error;
use std::net::{Ipv4Addr, Ipv6Addr};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read an address and port for the given ATYP byte
///
/// Consumes exactly the bytes the encoding declares; a stream that ends
/// early surfaces as [`Socks5Error::Stream`]. Any ATYP outside the three
/// defined encodings fails with the raw byte preserved.
pub async fn read_address<S>(stream: &mut S, addr_type: u8) -> Result<TargetAddr, Socks5Error>
where
    S: AsyncRead + Unpin,
{
    match addr_type {
        SOCKS5_ATYP_IPV4 => {
            let mut octets = [0u8; 4];
            stream.read_exact(&mut octets).await?;
            let port = read_port(stream).await?;

            Ok(TargetAddr::ipv4(Ipv4Addr::from(octets), port))
        }

        SOCKS5_ATYP_DOMAIN => {
            // Length prefix first; zero is a valid (if useless) length
            let mut len_buf = [0u8; 1];
            stream.read_exact(&mut len_buf).await?;

            let mut domain_buf = vec![0u8; len_buf[0] as usize];
            stream.read_exact(&mut domain_buf).await?;
            let domain = String::from_utf8(domain_buf)?;

            let port = read_port(stream).await?;

            Ok(TargetAddr::domain(domain, port))
        }

        SOCKS5_ATYP_IPV6 => {
            let mut octets = [0u8; 16];
            stream.read_exact(&mut octets).await?;
            let port = read_port(stream).await?;

            Ok(TargetAddr::ipv6(Ipv6Addr::from(octets), port))
        }

        other => Err(Socks5Error::AddressTypeNotSupported(other)),
    }
}

/// Append the wire encoding of an address (ATYP, address bytes, port)
pub fn write_address(buf: &mut Vec<u8>, addr: &TargetAddr) {
    match addr {
        TargetAddr::Ip(std::net::SocketAddr::V4(v4)) => {
            buf.push(SOCKS5_ATYP_IPV4);
            buf.extend_from_slice(&v4.ip().octets());
        }
        TargetAddr::Ip(std::net::SocketAddr::V6(v6)) => {
            buf.push(SOCKS5_ATYP_IPV6);
            buf.extend_from_slice(&v6.ip().octets());
        }
        TargetAddr::Domain(domain, _) => {
            debug_assert!(domain.len() <= MAX_DOMAIN_LEN);
            buf.push(SOCKS5_ATYP_DOMAIN);
            buf.push(domain.len() as u8);
            buf.extend_from_slice(domain.as_bytes());
        }
    }
    buf.extend_from_slice(&addr.port().to_be_bytes());
}

/// Read the big-endian port that trails every address encoding
async fn read_port<S>(stream: &mut S) -> std::io::Result<u16>
where
    S: AsyncRead + Unpin,
{
    let mut port_buf = [0u8; 2];
    stream.read_exact(&mut port_buf).await?;
    Ok(u16::from_be_bytes(port_buf))
}
