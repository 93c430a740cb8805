//! HTTP Basic Authentication.
//!
//! # Responsibilities
//! - Constant-time verification of the shared credential pair
//! - Challenge and reject unauthenticated requests before any inner
//!   handler (including the capture logger) runs
//!
//! # Design Decisions
//! - One credential pair for the whole server; no per-user accounts
//! - Comparison timing must not depend on where the first mismatching
//!   byte sits, for the user name and the password alike

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;

/// The shared credential pair, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Verify a provided pair against the configured one.
    ///
    /// Both fields are compared in constant time and both comparisons
    /// always run, so a username mismatch does not short-circuit the
    /// password check. Matching requires equal length and content.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

/// State for [`require_basic_auth`].
#[derive(Debug, Clone)]
pub struct AuthGate {
    credentials: Credentials,
    realm: String,
}

impl AuthGate {
    pub fn new(credentials: Credentials, realm: impl Into<String>) -> Self {
        Self {
            credentials,
            realm: realm.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            Credentials::new(config.username.clone(), config.password.clone()),
            config.realm.clone(),
        )
    }
}

/// Middleware gating every request behind Basic authentication.
///
/// Requests without credentials, or with credentials that fail
/// verification, get a 401 challenge and never reach the inner handler.
/// Successful requests pass through untouched. Layer this outermost so
/// rejected traffic is not logged as a served exchange.
pub async fn require_basic_auth(
    State(gate): State<Arc<AuthGate>>,
    request: Request,
    next: Next,
) -> Response {
    // Decoded here rather than via an extractor: a wrong scheme or
    // undecodable header must get the same challenge as an absent one,
    // not an extractor rejection.
    let provided = request.headers().typed_get::<Authorization<Basic>>();
    if let Some(provided) = provided {
        if gate.credentials.verify(provided.username(), provided.password()) {
            return next.run(request).await;
        }
    }

    tracing::debug!(realm = %gate.realm, "rejecting unauthenticated request");
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            format!(r#"Basic realm="{}""#, gate.realm),
        )],
        "Unauthorized.\n",
    )
        .into_response()
}
