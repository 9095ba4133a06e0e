//! TCP listener and accept loop
//!
//! Binds the configured address and hands every accepted stream to a fresh
//! session task. Sessions share nothing; a failed session is logged and the
//! loop keeps accepting.

use crate::config::{Config, TcpConfig};
use crate::socks::handle_connection;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Socket options applied to accepted and outbound connections
#[derive(Debug, Clone)]
pub struct SocketOpts {
    /// Enable TCP_NODELAY
    pub nodelay: bool,
    /// TCP keepalive timeout in seconds
    pub keepalive_secs: Option<u64>,
    /// TCP keepalive interval in seconds
    pub keepalive_interval: Option<u64>,
}

impl Default for SocketOpts {
    fn default() -> Self {
        SocketOpts {
            nodelay: true,
            keepalive_secs: Some(20),
            keepalive_interval: Some(8),
        }
    }
}

impl SocketOpts {
    /// Create socket options from TCP config
    pub fn from_tcp_config(config: &TcpConfig) -> Self {
        SocketOpts {
            nodelay: config.nodelay,
            keepalive_secs: Some(config.keepalive_secs),
            keepalive_interval: Some(config.keepalive_interval),
        }
    }

    /// Apply socket options to a TCP stream
    pub fn apply(&self, stream: &TcpStream) -> std::io::Result<()> {
        stream.set_nodelay(self.nodelay)?;

        if let (Some(timeout), Some(interval)) = (self.keepalive_secs, self.keepalive_interval) {
            let socket = socket2::SockRef::from(stream);
            let keepalive = socket2::TcpKeepalive::new()
                .with_time(Duration::from_secs(timeout))
                .with_interval(Duration::from_secs(interval));
            socket.set_tcp_keepalive(&keepalive)?;
        }

        Ok(())
    }
}

/// SOCKS5 proxy server
///
/// Owns the bound listener. [`Server::serve`] consumes it and runs the
/// accept loop until the shutdown channel fires.
pub struct Server {
    listener: TcpListener,
    config: Config,
}

impl Server {
    /// Validate the configuration and bind the listen address
    pub async fn bind(config: Config) -> Result<Self> {
        config
            .server
            .validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| "Invalid server configuration")?;

        let listener = TcpListener::bind(&config.server.listen_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;

        Ok(Server { listener, config })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(Into::into)
    }

    /// Run the accept loop until shutdown
    ///
    /// Each accepted connection gets its own spawned session; session
    /// failures never propagate to the loop.
    pub async fn serve(self, mut shutdown: broadcast::Receiver<bool>) -> Result<()> {
        info!("listening on {}", self.listener.local_addr()?);

        let socket_opts = SocketOpts::from_tcp_config(&self.config.server.tcp);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!("accepted connection from {}", peer);

                            if let Err(e) = socket_opts.apply(&stream) {
                                warn!("failed to apply socket options for {}: {}", peer, e);
                            }

                            let server_config = self.config.server.clone();
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, peer, &server_config).await {
                                    warn!("session with {} ended: {:#}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            warn!("accept failed: {}", e);
                            tokio::time::sleep(Duration::from_millis(100)).await;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("shutdown signal received, stopping listener");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Bind the configured address and serve until shutdown
pub async fn run_server(config: Config, shutdown: broadcast::Receiver<bool>) -> Result<()> {
    Server::bind(config).await?.serve(shutdown).await
}
