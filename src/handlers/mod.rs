//! Terminal handlers and middleware composition.
//!
//! # Responsibilities
//! - Route `/upload` to the upload handler and everything else to the
//!   static file service
//! - Fold the enabled middleware over both chains in a fixed order:
//!   capture logging innermost, authentication outermost
//!
//! Auth sits outside the capture logger so rejected requests are never
//! logged as served exchanges.

pub mod static_files;
pub mod upload;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::any, Router};
use tower_http::trace::TraceLayer;

use crate::auth::{self, AuthGate};
use crate::capture;
use crate::config::ServerConfig;
use self::upload::{UploadContext, MAX_UPLOAD_BYTES};

/// Build the complete router for the given configuration.
pub fn build_router(config: &ServerConfig) -> Router {
    let upload_ctx = UploadContext {
        dir: config.upload_dir.clone(),
    };

    let mut router = Router::new()
        .route(
            "/upload",
            any(upload::handle_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(upload_ctx)
        .fallback_service(static_files::serve_root(&config.root_dir))
        .layer(TraceLayer::new_for_http());

    // Later layers wrap earlier ones, so capture goes on before auth.
    if config.capture.enabled {
        router = router.layer(middleware::from_fn_with_state(
            config.capture.clone(),
            capture::capture_exchange,
        ));
    }
    if config.auth.enabled {
        let gate = Arc::new(AuthGate::from_config(&config.auth));
        router = router.layer(middleware::from_fn_with_state(
            gate,
            auth::require_basic_auth,
        ));
    }

    router
}
