//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the daemon.
//! All types derive Serde traits for deserialization from config files;
//! command-line flags override whatever the file provides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the daemon.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory tree served as static files.
    pub root_dir: PathBuf,

    /// Directory uploads are written into. Defaults to the working
    /// directory the daemon was started from.
    pub upload_dir: PathBuf,

    /// Listener configuration (bind address, TLS, Unix socket).
    pub listener: ListenerConfig,

    /// HTTP Basic Authentication settings.
    pub auth: AuthConfig,

    /// Request/response capture logging settings.
    pub capture: CaptureConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            upload_dir: PathBuf::from("."),
            listener: ListenerConfig::default(),
            auth: AuthConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Listening host IP.
    pub host: String,

    /// Listening port.
    pub port: u16,

    /// Optional TLS configuration. When set, the TCP listener is wrapped
    /// in TLS.
    pub tls: Option<TlsConfig>,

    /// Listen on a Unix-domain socket instead of TCP. Takes precedence
    /// over TLS and plain TCP.
    pub unix_socket: bool,

    /// Path of the Unix-domain socket.
    pub unix_socket_path: PathBuf,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            tls: None,
            unix_socket: false,
            unix_socket_path: PathBuf::from("/tmp/quickserve.sock"),
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// HTTP Basic Authentication configuration.
///
/// Exactly one shared credential pair gates the whole server; there is no
/// per-user or per-path authorization.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enforce authentication on every request.
    pub enabled: bool,

    /// Accepted user name.
    pub username: String,

    /// Accepted password. Left empty, a random password is generated at
    /// startup and printed to the log.
    pub password: String,

    /// Realm sent in the `WWW-Authenticate` challenge.
    pub realm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            username: "operator".to_string(),
            password: String::new(),
            realm: "Please provide login credentials".to_string(),
        }
    }
}

/// Request/response capture logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CaptureConfig {
    /// Log every request and its recorded response.
    pub enabled: bool,

    /// Include response bodies in the log. Off by default since bodies may
    /// be arbitrarily large or binary.
    pub log_response_body: bool,
}
