//! Listener selection and server bootstrap.
//!
//! # Responsibilities
//! - Pick one transport from the listener configuration: Unix-domain
//!   socket, TLS-wrapped TCP, or plain TCP (in that precedence order)
//! - Bind it and serve the composed router
//!
//! Bind failures are fatal at launch; there is no rebinding or retry.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use tokio::net::{TcpListener, UnixListener};

use crate::config::ListenerConfig;
use crate::net::tls::load_tls_config;

/// Error type for listener operations.
#[derive(Debug)]
pub enum NetError {
    /// Bind address did not parse.
    BadAddress(String),
    /// Failed to bind or prepare the listening socket.
    Bind(std::io::Error),
    /// Serving failed after startup.
    Serve(std::io::Error),
}

impl std::fmt::Display for NetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetError::BadAddress(addr) => write!(f, "Invalid listen address: {}", addr),
            NetError::Bind(e) => write!(f, "Failed to bind: {}", e),
            NetError::Serve(e) => write!(f, "Server error: {}", e),
        }
    }
}

impl std::error::Error for NetError {}

/// The transport the composed handler set is served over. Variants are
/// mutually exclusive by construction.
#[derive(Debug, PartialEq, Eq)]
pub enum Transport {
    Tcp(SocketAddr),
    Tls {
        addr: SocketAddr,
        cert_path: PathBuf,
        key_path: PathBuf,
    },
    Unix(PathBuf),
}

impl Transport {
    /// Derive the transport from configuration: a Unix socket wins over
    /// TLS, which wins over plain TCP.
    pub fn from_config(config: &ListenerConfig) -> Result<Self, NetError> {
        if config.unix_socket {
            return Ok(Transport::Unix(config.unix_socket_path.clone()));
        }

        let addr = format!("{}:{}", config.host, config.port);
        let addr: SocketAddr = addr.parse().map_err(|_| NetError::BadAddress(addr))?;

        if let Some(tls) = &config.tls {
            return Ok(Transport::Tls {
                addr,
                cert_path: tls.cert_path.clone(),
                key_path: tls.key_path.clone(),
            });
        }

        Ok(Transport::Tcp(addr))
    }
}

/// Serve the router over the selected transport. Runs until the server
/// stops or fails.
pub async fn serve(transport: Transport, router: Router) -> Result<(), NetError> {
    match transport {
        Transport::Tcp(addr) => {
            let listener = TcpListener::bind(addr).await.map_err(NetError::Bind)?;
            let local_addr = listener.local_addr().map_err(NetError::Bind)?;
            tracing::info!(address = %local_addr, "Listening on socket");
            axum::serve(listener, router).await.map_err(NetError::Serve)
        }
        Transport::Unix(path) => {
            let listener = bind_unix_socket(&path)?;
            tracing::info!(path = %path.display(), "Listening on Unix socket");
            axum::serve(listener, router).await.map_err(NetError::Serve)
        }
        Transport::Tls {
            addr,
            cert_path,
            key_path,
        } => {
            let tls_config = load_tls_config(&cert_path, &key_path)
                .await
                .map_err(NetError::Bind)?;
            tracing::info!(address = %addr, "Listening on socket (TLS)");
            axum_server::bind_rustls(addr, tls_config)
                .serve(router.into_make_service())
                .await
                .map_err(NetError::Serve)
        }
    }
}

/// Bind a Unix-domain socket, unlinking a leftover socket file first.
fn bind_unix_socket(path: &std::path::Path) -> Result<UnixListener, NetError> {
    if path.exists() {
        std::fs::remove_file(path).map_err(NetError::Bind)?;
    }
    UnixListener::bind(path).map_err(NetError::Bind)
}
