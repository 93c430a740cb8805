//! Static file serving.
//!
//! Delegates entirely to `tower-http`'s `ServeDir`: path resolution,
//! traversal defense, MIME detection, and error responses are its
//! concern, not ours.

use std::path::Path;

use tower_http::services::ServeDir;

/// Directory-backed file service rooted at `root`.
pub fn serve_root(root: &Path) -> ServeDir {
    ServeDir::new(root)
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::Request, http::StatusCode, Router};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn serves_files_from_the_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), b"hi there").unwrap();

        let app = Router::new().fallback_service(serve_root(dir.path()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/hello.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"hi there");
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = Router::new().fallback_service(serve_root(dir.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
