//! Per-connection SOCKS5 session
//!
//! One session per accepted stream, owned exclusively by its task. The
//! session walks the protocol phases in order (method negotiation, request
//! decoding, outbound connect, relay) and any failure collapses it: one
//! best-effort reply, then the stream closes. Reply-send failures are never
//! retried.

use super::negotiate::negotiate;
use super::reply::send_reply;
use super::request::read_request;
use super::tcp_relay::relay;
use super::types::{SocksCommand, TargetAddr};
use crate::config::ServerConfig;
use crate::error::Socks5ReplyCode;
use crate::server::SocketOpts;
use anyhow::{Context, Result};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// Drive one client stream through the complete SOCKS5 session
///
/// `peer` is the client's address, used only for diagnostics. The stream is
/// consumed: on return it has been closed or handed to the relay and run to
/// completion. Errors returned here are per-session and never affect the
/// listener.
pub async fn handle_connection<S>(
    mut stream: S,
    peer: SocketAddr,
    config: &ServerConfig,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    negotiate(&mut stream)
        .await
        .with_context(|| format!("method negotiation with {} failed", peer))?;

    let request = match read_request(&mut stream).await {
        Ok(request) => request,
        Err(err) => {
            let _ = send_reply(&mut stream, err.reply_code(), &TargetAddr::default()).await;
            return Err(err).with_context(|| format!("request from {} rejected", peer));
        }
    };

    debug!("{} requested {} to {}", peer, request.command, request.target);

    match request.command {
        SocksCommand::Connect => connect_and_relay(stream, peer, request.target, config).await,
        SocksCommand::Bind | SocksCommand::UdpAssociate => {
            warn!("{} sent unsupported {} command", peer, request.command);
            send_reply(
                &mut stream,
                Socks5ReplyCode::CommandNotSupported,
                &TargetAddr::default(),
            )
            .await?;
            Ok(())
        }
    }
}

/// Open the outbound connection, confirm the tunnel, and relay
///
/// The success reply echoes the originally requested target as the bound
/// address. Connect failures classify through the reply-code table and end
/// the session after one failure reply.
async fn connect_and_relay<S>(
    mut client: S,
    peer: SocketAddr,
    target: TargetAddr,
    config: &ServerConfig,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let connect_timeout = Duration::from_secs(config.connect_timeout);

    let remote = match open_target(&target, connect_timeout).await {
        Ok(remote) => remote,
        Err(err) => {
            let code = Socks5ReplyCode::from(&err);
            warn!("{} connect to {} failed: {} (reply {:?})", peer, target, err, code);
            let _ = send_reply(&mut client, code, &target).await;
            return Err(err).with_context(|| format!("connect to {} failed", target));
        }
    };

    if let Err(e) = SocketOpts::from_tcp_config(&config.tcp).apply(&remote) {
        warn!("failed to apply socket options to {}: {}", target, e);
    }

    send_reply(&mut client, Socks5ReplyCode::Succeeded, &target)
        .await
        .with_context(|| format!("success reply to {} failed", peer))?;

    info!("{} tunneled to {}", peer, target);

    relay(client, remote).await;

    debug!("{} tunnel to {} closed", peer, target);

    Ok(())
}

/// Resolve and connect to the requested target within the timeout
async fn open_target(target: &TargetAddr, connect_timeout: Duration) -> io::Result<TcpStream> {
    let resolved = target.resolve().await?;

    match tokio::time::timeout(connect_timeout, TcpStream::connect(resolved)).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("connect to {} timed out", resolved),
        )),
    }
}
