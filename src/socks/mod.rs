//! SOCKS5 protocol implementation
//!
//! Everything with wire-format precision lives here: the constant tables,
//! the address codec, method negotiation, request decoding, reply encoding,
//! the per-connection session, and the byte relay. The listener in
//! [`crate::server`] feeds each accepted stream to [`handle_connection`].

pub mod addr;
pub mod consts;
pub mod handler;
pub mod negotiate;
pub mod reply;
pub mod request;
pub mod tcp_relay;
pub mod types;

pub use consts::*;
pub use handler::handle_connection;
pub use negotiate::negotiate;
pub use reply::{reply_bytes, send_method, send_reply};
pub use request::{read_request, Request};
pub use tcp_relay::relay;
pub use types::{SocksCommand, TargetAddr};
