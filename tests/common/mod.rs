//! Test utilities for socksd integration tests
//!
//! Helpers to stand up a proxy on an ephemeral port plus the destination
//! servers the scenarios talk to.

use socksd::config::{Config, ServerConfig};
use socksd::Server;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

/// Start a socksd instance on an ephemeral port
///
/// Returns the bound address and the shutdown sender keeping it alive.
pub async fn start_proxy() -> (SocketAddr, broadcast::Sender<bool>) {
    let config = Config {
        server: ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            connect_timeout: 2,
            ..Default::default()
        },
    };

    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(server.serve(shutdown_rx));

    (addr, shutdown_tx)
}

/// Start an echo server on an ephemeral port
pub async fn start_echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut stream, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        loop {
                            match stream.read(&mut buf).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => {
                                    if stream.write_all(&buf[..n]).await.is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a server that accepts connections and immediately drops them
pub async fn start_hangup_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });

    addr
}

/// Port that was just bound and released, so nothing is listening on it
pub async fn refused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Complete the no-auth handshake on a fresh client connection
pub async fn handshake(stream: &mut TcpStream) {
    stream.write_all(&[5, 1, 0]).await.unwrap();

    let mut reply = [0u8; 2];
    stream.read_exact(&mut reply).await.unwrap();
    assert_eq!(reply, [5, 0]);
}
