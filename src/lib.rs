//! # Socksd - Lightweight SOCKS5 Proxy Server
//!
//! Socksd is a small SOCKS5 (RFC 1928) proxy server. It accepts client
//! connections, negotiates the no-authentication method, decodes the proxy
//! request, opens a TCP connection to the requested destination, and relays
//! bytes in both directions until either side closes.
//!
//! ## Features
//!
//! - **CONNECT relaying**: full TCP CONNECT support for IPv4, IPv6, and
//!   domain-name targets (BIND and UDP ASSOCIATE are answered with
//!   "command not supported")
//! - **No-auth only**: clients that do not offer "no authentication
//!   required" are rejected with 0xFF
//! - **Per-connection isolation**: one task per session, no shared state;
//!   a failed session never disturbs the listener
//! - **RFC reply mapping**: outbound connect failures map to the protocol's
//!   reply codes (host unreachable, connection refused, network unreachable)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use socksd::config::load_config;
//! use socksd::server::run_server;
//! use tokio::sync::broadcast;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config("config.toml")?;
//!     let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
//!
//!     run_server(config, shutdown_rx).await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! SOCKS5 Client -> socksd (negotiate, decode, connect) -> Target
//!                         <------ byte relay ------>
//! ```
//!
//! The listener in [`server`] spawns one session per accepted stream; the
//! protocol itself lives in [`socks`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod server;
pub mod socks;

// Re-export commonly used items
pub use config::{load_config, Config};
pub use error::{Socks5Error, Socks5ReplyCode};
pub use server::{run_server, Server};

/// Version of the socksd library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");
