//! Command-line interface.
//!
//! Flags mirror the daemon's historical interface. An optional TOML
//! config file provides base values; any flag given on the command line
//! overrides it.

use std::path::PathBuf;

use clap::Parser;
use rand::Rng;

use crate::config::{self, ConfigError, ServerConfig, TlsConfig};

const PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz\
ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PASSWORD_LEN: usize = 8;

#[derive(Debug, Parser)]
#[command(name = "quickserve")]
#[command(about = "Serve and upload files over HTTP(S) or a Unix socket", long_about = None)]
pub struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Root directory served as static files
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Listening host IP
    #[arg(long)]
    pub host: Option<String>,

    /// Listening port
    #[arg(long)]
    pub port: Option<u16>,

    /// SSL/TLS certificate (PEM)
    #[arg(long = "ssl-cert", requires = "ssl_key")]
    pub ssl_cert: Option<PathBuf>,

    /// SSL/TLS private key (PEM)
    #[arg(long = "ssl-key", requires = "ssl_cert")]
    pub ssl_key: Option<PathBuf>,

    /// HTTP Basic Authentication user name
    #[arg(long = "auth-user")]
    pub auth_user: Option<String>,

    /// HTTP Basic Authentication password (default: randomly generated)
    #[arg(long = "auth-pass")]
    pub auth_pass: Option<String>,

    /// Do not enforce authentication
    #[arg(long = "no-auth")]
    pub no_auth: bool,

    /// Use a Unix socket instead of TCP
    #[arg(long)]
    pub unix: bool,

    /// Log requests and responses
    #[arg(long)]
    pub log: bool,

    /// Log response bodies as well (could contain binary data)
    #[arg(long = "log-resp-body")]
    pub log_resp_body: bool,

    /// Relay one raw connection to local stdio instead of serving HTTP
    #[arg(long)]
    pub pipe: bool,
}

impl Cli {
    /// Resolve the effective configuration: config file first, then flag
    /// overrides, then a generated password if auth needs one.
    ///
    /// Returns the configuration and whether the password was generated
    /// (a generated password is printed at startup so the operator can
    /// actually log in).
    pub fn resolve(&self) -> Result<(ServerConfig, bool), ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(root) = &self.root {
            config.root_dir = root.clone();
        }
        if let Some(host) = &self.host {
            config.listener.host = host.clone();
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let (Some(cert), Some(key)) = (&self.ssl_cert, &self.ssl_key) {
            config.listener.tls = Some(TlsConfig {
                cert_path: cert.clone(),
                key_path: key.clone(),
            });
        }
        if self.unix {
            config.listener.unix_socket = true;
        }
        if let Some(user) = &self.auth_user {
            config.auth.username = user.clone();
        }
        if let Some(pass) = &self.auth_pass {
            config.auth.password = pass.clone();
        }
        if self.no_auth {
            config.auth.enabled = false;
        }
        if self.log {
            config.capture.enabled = true;
        }
        if self.log_resp_body {
            config.capture.log_response_body = true;
        }

        let mut generated = false;
        if config.auth.enabled && config.auth.password.is_empty() {
            config.auth.password = random_password();
            generated = true;
        }

        config::loader::check_config(&config)?;
        Ok((config, generated))
    }
}

fn random_password() -> String {
    let mut rng = rand::thread_rng();
    (0..PASSWORD_LEN)
        .map(|_| PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}
