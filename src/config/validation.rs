//! Configuration validation.
//!
//! Every violation found here is fatal at startup; the daemon never tries
//! to repair or guess around a bad configuration.

use std::path::PathBuf;

use crate::config::schema::ServerConfig;

/// A single configuration violation.
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Listening port is zero.
    InvalidPort,
    /// Root directory is missing or not a directory.
    BadRootDir(PathBuf),
    /// Upload directory is missing or not a directory.
    BadUploadDir(PathBuf),
    /// TLS certificate file does not exist.
    MissingCert(PathBuf),
    /// TLS private key file does not exist.
    MissingKey(PathBuf),
    /// Authentication enabled without a user name.
    EmptyUsername,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidPort => write!(f, "listening port must be nonzero"),
            ValidationError::BadRootDir(p) => {
                write!(f, "root directory {} is not a directory", p.display())
            }
            ValidationError::BadUploadDir(p) => {
                write!(f, "upload directory {} is not a directory", p.display())
            }
            ValidationError::MissingCert(p) => {
                write!(f, "certificate file not found: {}", p.display())
            }
            ValidationError::MissingKey(p) => {
                write!(f, "private key file not found: {}", p.display())
            }
            ValidationError::EmptyUsername => {
                write!(f, "authentication requires a nonempty user name")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate the effective configuration, collecting all violations.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.listener.unix_socket && config.listener.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    if !config.root_dir.is_dir() {
        errors.push(ValidationError::BadRootDir(config.root_dir.clone()));
    }

    if !config.upload_dir.is_dir() {
        errors.push(ValidationError::BadUploadDir(config.upload_dir.clone()));
    }

    if let Some(tls) = &config.listener.tls {
        if !tls.cert_path.exists() {
            errors.push(ValidationError::MissingCert(tls.cert_path.clone()));
        }
        if !tls.key_path.exists() {
            errors.push(ValidationError::MissingKey(tls.key_path.clone()));
        }
    }

    if config.auth.enabled && config.auth.username.is_empty() {
        errors.push(ValidationError::EmptyUsername);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
