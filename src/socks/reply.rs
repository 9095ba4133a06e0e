//! SOCKS5 reply builder
//!
//! ```text
//! +----+-----+-------+------+----------+----------+
//! |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
//! +----+-----+-------+------+----------+----------+
//! | 1  |  1  | X'00' |  1   | Variable |    2     |
//! +----+-----+-------+------+----------+----------+
//! ```
//!
//! Replies are sized from their own encoded address, never from the request
//! that triggered them.

use super::addr::write_address;
use super::consts::*;
use super::types::TargetAddr;
use crate::error::Socks5ReplyCode;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Build the reply message for a code and bound address
pub fn reply_bytes(code: Socks5ReplyCode, bound: &TargetAddr) -> Vec<u8> {
    let mut reply = vec![SOCKS5_VERSION, code.to_byte(), SOCKS5_RESERVED];
    write_address(&mut reply, bound);
    reply
}

/// Build and send a reply, flushing the stream
pub async fn send_reply<S>(
    stream: &mut S,
    code: Socks5ReplyCode,
    bound: &TargetAddr,
) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&reply_bytes(code, bound)).await?;
    stream.flush().await
}

/// Send the two-byte negotiation reply (VER, METHOD)
pub async fn send_method<S>(stream: &mut S, method: u8) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&[SOCKS5_VERSION, method]).await?;
    stream.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_reply_bytes_ipv4() {
        let bound = TargetAddr::ipv4(Ipv4Addr::new(127, 0, 0, 1), 8080);
        let reply = reply_bytes(Socks5ReplyCode::Succeeded, &bound);

        assert_eq!(reply, vec![5, 0, 0, 1, 127, 0, 0, 1, 0x1F, 0x90]);
    }

    #[test]
    fn test_reply_bytes_ipv6() {
        let bound = TargetAddr::ipv6(Ipv6Addr::LOCALHOST, 443);
        let reply = reply_bytes(Socks5ReplyCode::Succeeded, &bound);

        assert_eq!(reply[0], SOCKS5_VERSION);
        assert_eq!(reply[1], 0);
        assert_eq!(reply[2], SOCKS5_RESERVED);
        assert_eq!(reply[3], SOCKS5_ATYP_IPV6);
        assert_eq!(reply.len(), 4 + 16 + 2);
    }

    #[test]
    fn test_reply_bytes_domain_sized_from_own_address() {
        let bound = TargetAddr::domain("example.com".to_string(), 443);
        let reply = reply_bytes(Socks5ReplyCode::Succeeded, &bound);

        assert_eq!(reply[3], SOCKS5_ATYP_DOMAIN);
        assert_eq!(reply[4] as usize, "example.com".len());
        assert_eq!(&reply[5..16], b"example.com");
        assert_eq!(reply.len(), 4 + 1 + "example.com".len() + 2);
    }

    #[test]
    fn test_reply_bytes_failure_with_default_address() {
        let reply = reply_bytes(Socks5ReplyCode::ConnectionRefused, &TargetAddr::default());

        assert_eq!(reply, vec![5, 5, 0, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_reply_bytes_carries_each_code() {
        for code in [
            Socks5ReplyCode::Succeeded,
            Socks5ReplyCode::GeneralFailure,
            Socks5ReplyCode::NetworkUnreachable,
            Socks5ReplyCode::HostUnreachable,
            Socks5ReplyCode::ConnectionRefused,
            Socks5ReplyCode::CommandNotSupported,
            Socks5ReplyCode::AddressTypeNotSupported,
        ] {
            let reply = reply_bytes(code, &TargetAddr::default());
            assert_eq!(reply[1], code.to_byte());
        }
    }

    #[tokio::test]
    async fn test_send_reply() {
        let mut buffer = Vec::new();
        let bound = TargetAddr::ipv4(Ipv4Addr::new(10, 0, 0, 1), 9090);

        send_reply(&mut buffer, Socks5ReplyCode::Succeeded, &bound)
            .await
            .unwrap();

        assert_eq!(buffer, reply_bytes(Socks5ReplyCode::Succeeded, &bound));
    }

    #[tokio::test]
    async fn test_send_method() {
        let mut buffer = Vec::new();

        send_method(&mut buffer, SOCKS5_METHOD_NO_AUTH).await.unwrap();
        assert_eq!(buffer, vec![5, 0]);

        buffer.clear();
        send_method(&mut buffer, SOCKS5_METHOD_NO_ACCEPTABLE)
            .await
            .unwrap();
        assert_eq!(buffer, vec![5, 0xFF]);
    }
}
