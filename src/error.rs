//! Error types for socksd
//!
//! Protocol failures and the reply codes they map to. Every protocol error
//! is terminal for the session that raised it: the session sends a single
//! best-effort reply and closes the stream.

use std::io;
use thiserror::Error;

/// SOCKS5 protocol errors
///
/// The offending byte is captured at construction so diagnostics keep the
/// raw wire value even after classification.
#[derive(Error, Debug)]
pub enum Socks5Error {
    /// Version byte was not 0x05
    #[error("unsupported SOCKS version: {0:#04x}")]
    UnsupportedVersion(u8),

    /// Client's method set does not include "no authentication required"
    #[error("no acceptable authentication method")]
    NoAcceptableMethod,

    /// Command byte outside {CONNECT, BIND, UDP ASSOCIATE}
    #[error("command not supported: {0:#04x}")]
    CommandNotSupported(u8),

    /// Address type byte outside {IPv4, domain, IPv6}
    #[error("address type not supported: {0:#04x}")]
    AddressTypeNotSupported(u8),

    /// Domain name bytes are not valid UTF-8
    #[error("invalid domain name encoding")]
    InvalidDomain(#[from] std::string::FromUtf8Error),

    /// Truncated message, or the stream failed mid-exchange
    #[error("stream error during SOCKS exchange: {0}")]
    Stream(#[from] io::Error),
}

impl Socks5Error {
    /// The reply code sent to the client before the session closes
    pub fn reply_code(&self) -> Socks5ReplyCode {
        match self {
            Socks5Error::CommandNotSupported(_) => Socks5ReplyCode::CommandNotSupported,
            Socks5Error::AddressTypeNotSupported(_) => Socks5ReplyCode::AddressTypeNotSupported,
            Socks5Error::UnsupportedVersion(_)
            | Socks5Error::NoAcceptableMethod
            | Socks5Error::InvalidDomain(_)
            | Socks5Error::Stream(_) => Socks5ReplyCode::GeneralFailure,
        }
    }
}

/// SOCKS5 reply codes
///
/// Closed enumeration, one-to-one with the REP wire bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Socks5ReplyCode {
    /// Request succeeded
    Succeeded = 0x00,
    /// General SOCKS server failure
    GeneralFailure = 0x01,
    /// Connection not allowed by ruleset
    NotAllowedByRuleset = 0x02,
    /// Network unreachable
    NetworkUnreachable = 0x03,
    /// Host unreachable
    HostUnreachable = 0x04,
    /// Connection refused
    ConnectionRefused = 0x05,
    /// TTL expired
    TtlExpired = 0x06,
    /// Command not supported
    CommandNotSupported = 0x07,
    /// Address type not supported
    AddressTypeNotSupported = 0x08,
}

impl Socks5ReplyCode {
    /// Convert to the REP wire byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Parse a REP wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Socks5ReplyCode::Succeeded),
            0x01 => Some(Socks5ReplyCode::GeneralFailure),
            0x02 => Some(Socks5ReplyCode::NotAllowedByRuleset),
            0x03 => Some(Socks5ReplyCode::NetworkUnreachable),
            0x04 => Some(Socks5ReplyCode::HostUnreachable),
            0x05 => Some(Socks5ReplyCode::ConnectionRefused),
            0x06 => Some(Socks5ReplyCode::TtlExpired),
            0x07 => Some(Socks5ReplyCode::CommandNotSupported),
            0x08 => Some(Socks5ReplyCode::AddressTypeNotSupported),
            _ => None,
        }
    }
}

/// Classify an outbound connect failure.
///
/// First match wins: address unavailable on this host maps to host
/// unreachable, an active refusal stays a refusal, and everything else
/// (including DNS failures and connect timeouts) is network unreachable.
impl From<&io::Error> for Socks5ReplyCode {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::AddrNotAvailable => Socks5ReplyCode::HostUnreachable,
            io::ErrorKind::ConnectionRefused => Socks5ReplyCode::ConnectionRefused,
            _ => Socks5ReplyCode::NetworkUnreachable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_code_bytes() {
        assert_eq!(Socks5ReplyCode::Succeeded.to_byte(), 0x00);
        assert_eq!(Socks5ReplyCode::GeneralFailure.to_byte(), 0x01);
        assert_eq!(Socks5ReplyCode::NotAllowedByRuleset.to_byte(), 0x02);
        assert_eq!(Socks5ReplyCode::NetworkUnreachable.to_byte(), 0x03);
        assert_eq!(Socks5ReplyCode::HostUnreachable.to_byte(), 0x04);
        assert_eq!(Socks5ReplyCode::ConnectionRefused.to_byte(), 0x05);
        assert_eq!(Socks5ReplyCode::TtlExpired.to_byte(), 0x06);
        assert_eq!(Socks5ReplyCode::CommandNotSupported.to_byte(), 0x07);
        assert_eq!(Socks5ReplyCode::AddressTypeNotSupported.to_byte(), 0x08);
    }

    #[test]
    fn test_reply_code_round_trip() {
        for byte in 0x00..=0x08 {
            let code = Socks5ReplyCode::from_byte(byte).unwrap();
            assert_eq!(code.to_byte(), byte);
        }
    }

    #[test]
    fn test_reply_code_from_byte_invalid() {
        assert_eq!(Socks5ReplyCode::from_byte(0x09), None);
        assert_eq!(Socks5ReplyCode::from_byte(0xFF), None);
    }

    #[test]
    fn test_connect_failure_classification() {
        let err = io::Error::new(io::ErrorKind::AddrNotAvailable, "addr not available");
        assert_eq!(
            Socks5ReplyCode::from(&err),
            Socks5ReplyCode::HostUnreachable
        );

        let err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(
            Socks5ReplyCode::from(&err),
            Socks5ReplyCode::ConnectionRefused
        );

        // Everything else falls through to network unreachable
        let err = io::Error::new(io::ErrorKind::TimedOut, "timed out");
        assert_eq!(
            Socks5ReplyCode::from(&err),
            Socks5ReplyCode::NetworkUnreachable
        );

        let err = io::Error::new(io::ErrorKind::NotFound, "no such host");
        assert_eq!(
            Socks5ReplyCode::from(&err),
            Socks5ReplyCode::NetworkUnreachable
        );

        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            Socks5ReplyCode::from(&err),
            Socks5ReplyCode::NetworkUnreachable
        );
    }

    #[test]
    fn test_protocol_error_reply_codes() {
        assert_eq!(
            Socks5Error::UnsupportedVersion(4).reply_code(),
            Socks5ReplyCode::GeneralFailure
        );
        assert_eq!(
            Socks5Error::CommandNotSupported(0x02).reply_code(),
            Socks5ReplyCode::CommandNotSupported
        );
        assert_eq!(
            Socks5Error::AddressTypeNotSupported(0x02).reply_code(),
            Socks5ReplyCode::AddressTypeNotSupported
        );

        let truncated = Socks5Error::Stream(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "early eof",
        ));
        assert_eq!(truncated.reply_code(), Socks5ReplyCode::GeneralFailure);
    }

    #[test]
    fn test_protocol_error_display_keeps_raw_byte() {
        let err = Socks5Error::CommandNotSupported(0x99);
        assert_eq!(format!("{}", err), "command not supported: 0x99");

        let err = Socks5Error::AddressTypeNotSupported(0x02);
        assert_eq!(format!("{}", err), "address type not supported: 0x02");

        let err = Socks5Error::UnsupportedVersion(4);
        assert_eq!(format!("{}", err), "unsupported SOCKS version: 0x04");
    }
}
