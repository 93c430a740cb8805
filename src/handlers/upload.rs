//! Multipart file upload handling.
//!
//! `GET /upload` serves a static upload form. Every other method is
//! treated as an upload attempt: the request is parsed as multipart form
//! data, the single `uploadfile` field is extracted, and its bytes are
//! written under the base name of the client-supplied filename. The
//! non-GET fall-through (PUT, DELETE, ... all land in the upload branch)
//! is intentional.
//!
//! Upload failures are logged and answered with an empty default response
//! instead of an error status; only the success path writes a real body.

use std::path::{Path, PathBuf};

use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Total multipart body cap: 32 MiB.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Name of the file field the upload form submits.
const UPLOAD_FIELD: &str = "uploadfile";

const UPLOAD_FORM: &str = r#"<html>
    <head>
    <title></title>
    </head>
    <body>
		<form method="post" enctype="multipart/form-data">
			<input name="uploadfile" type="file" size="50">
			</label>
			<button>Upload</button>
		</form>
    </body>
</html>"#;

/// State for the upload handler: where uploaded files land.
#[derive(Debug, Clone)]
pub struct UploadContext {
    pub dir: PathBuf,
}

#[derive(Debug, Error)]
enum UploadError {
    #[error("request is not valid multipart form data")]
    NotMultipart,
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error("no `uploadfile` field in request")]
    MissingField,
    #[error("field `uploadfile` carries no filename")]
    MissingFilename,
    #[error("unusable filename {0:?}")]
    BadFilename(String),
    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal handler for the `/upload` route.
pub async fn handle_upload(State(ctx): State<UploadContext>, request: Request) -> Response {
    if request.method() == Method::GET {
        return (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            UPLOAD_FORM,
        )
            .into_response();
    }

    match store_upload(&ctx, request).await {
        Ok(response) => response,
        Err(err) => {
            // Failures are logged only; the client gets the empty default
            // response rather than an error status.
            tracing::warn!(error = %err, "upload failed");
            StatusCode::OK.into_response()
        }
    }
}

async fn store_upload(ctx: &UploadContext, request: Request) -> Result<Response, UploadError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|_| UploadError::NotMultipart)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let field_headers = field.headers().clone();
        let client_name = field
            .file_name()
            .ok_or(UploadError::MissingFilename)?
            .to_owned();
        let file_name = sanitize_file_name(&client_name)
            .ok_or_else(|| UploadError::BadFilename(client_name.clone()))?;

        // Buffered in full before the file is created, so a parse error or
        // an oversized body never leaves a partial file behind.
        let data = field.bytes().await?;
        let destination = ctx.dir.join(&file_name);
        tokio::fs::write(&destination, &data).await?;

        tracing::info!(file = %file_name, bytes = data.len(), "uploaded file");
        return Ok(format!(
            "Successfully uploaded file {} ({})",
            file_name,
            render_field_headers(&field_headers)
        )
        .into_response());
    }

    Err(UploadError::MissingField)
}

/// Reduce a client-supplied filename to its final path segment.
///
/// Directory components are stripped and names that reduce to nothing
/// (empty, `.`, `..`, trailing separator) are rejected, so the write
/// target is always a single segment inside the upload directory.
fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?;
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    // file_name() also rejects oddities like names ending in "..".
    Path::new(base).file_name()?;
    Some(base.to_string())
}

fn render_field_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::DefaultBodyLimit, routing::any, Router};
    use tower::ServiceExt;

    use super::*;

    const BOUNDARY: &str = "X-QUICKSERVE-TEST-BOUNDARY";

    fn upload_router(dir: &Path) -> Router {
        Router::new()
            .route(
                "/upload",
                any(handle_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
            )
            .with_state(UploadContext {
                dir: dir.to_path_buf(),
            })
    }

    fn multipart_request(field: &str, filename: &str, contents: &[u8]) -> Request {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn get_serves_the_form() {
        let dir = tempfile::tempdir().unwrap();
        let app = upload_router(dir.path());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/upload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(std::str::from_utf8(&body)
            .unwrap()
            .contains(r#"input name="uploadfile""#));
    }

    #[tokio::test]
    async fn post_stores_file_and_names_it_in_the_response() {
        let dir = tempfile::tempdir().unwrap();
        let app = upload_router(dir.path());

        let response = app
            .oneshot(multipart_request("uploadfile", "a.txt", b"ten bytes!"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("Successfully uploaded file a.txt"));

        let stored = std::fs::read(dir.path().join("a.txt")).unwrap();
        assert_eq!(stored, b"ten bytes!");
    }

    #[tokio::test]
    async fn traversal_filenames_are_reduced_to_their_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let app = upload_router(dir.path());

        let response = app
            .oneshot(multipart_request("uploadfile", "../../etc/evil", b"payload"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let stored = std::fs::read(dir.path().join("evil")).unwrap();
        assert_eq!(stored, b"payload");
        assert!(!dir.path().join("etc").exists());
    }

    #[tokio::test]
    async fn missing_field_yields_empty_default_response() {
        let dir = tempfile::tempdir().unwrap();
        let app = upload_router(dir.path());

        let response = app
            .oneshot(multipart_request("wrongfield", "a.txt", b"data"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn non_multipart_body_takes_the_degraded_path() {
        let dir = tempfile::tempdir().unwrap();
        let app = upload_router(dir.path());

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/upload")
                    .body(Body::from("not multipart at all"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // Shrink the limit so the test does not allocate 32 MiB.
        let app = Router::new()
            .route(
                "/upload",
                any(handle_upload).layer(DefaultBodyLimit::max(1024)),
            )
            .with_state(UploadContext {
                dir: dir.path().to_path_buf(),
            });

        let response = app
            .oneshot(multipart_request("uploadfile", "big.bin", &[0u8; 4096]))
            .await
            .unwrap();

        // Degraded path: no partial file, no success message.
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(!String::from_utf8_lossy(&body).contains("Successfully"));
        assert!(!dir.path().join("big.bin").exists());
    }

    #[test]
    fn sanitize_strips_directories_and_rejects_dot_names() {
        assert_eq!(sanitize_file_name("a.txt").as_deref(), Some("a.txt"));
        assert_eq!(
            sanitize_file_name("../../etc/evil").as_deref(),
            Some("evil")
        );
        assert_eq!(
            sanitize_file_name("/absolute/path/f.bin").as_deref(),
            Some("f.bin")
        );
        assert_eq!(
            sanitize_file_name(r"windows\style\name.txt").as_deref(),
            Some("name.txt")
        );
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name("."), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("dir/"), None);
    }
}
