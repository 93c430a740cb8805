//! Request/response capture logging.
//!
//! # Responsibilities
//! - Log the full inbound request before the inner handler runs
//! - Execute the inner handler against an in-memory recording of its
//!   response instead of the live connection
//! - Log the recording, then replay it verbatim to the client
//!
//! Logging is purely observational: the client must receive exactly the
//! status, headers, and body the inner handler produced. If either side of
//! the exchange cannot be buffered, the request fails with a 500 rather
//! than replaying a possibly corrupt capture.

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{request, HeaderMap, StatusCode, Version},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CaptureConfig;

/// An in-memory recording of one handler response.
///
/// Created fresh per request, owned by that request's handling, discarded
/// after replay.
#[derive(Debug)]
pub struct RecordedResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

impl RecordedResponse {
    /// Capture a live response by collecting its body into memory.
    pub async fn record(response: Response) -> Result<Self, axum::Error> {
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await?;
        Ok(Self {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Render the recording as a framed `===RESPONSE===` text block. The
    /// body is included only when `with_body` is set.
    pub fn render(&self, with_body: bool) -> String {
        let mut out = format!("===RESPONSE===\n{:?} {}\r\n", self.version, self.status);
        render_headers(&mut out, &self.headers);
        out.push_str("\r\n");
        if with_body {
            out.push_str(&String::from_utf8_lossy(&self.body));
        }
        out
    }

    /// Replay the recording: headers, status, and body are copied to the
    /// live response exactly as captured.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.headers_mut() = self.headers;
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        response
    }
}

/// Middleware logging every exchange under `===REQUEST===` /
/// `===RESPONSE===` framing while keeping the client-visible response
/// identical to what the inner handler produced.
pub async fn capture_exchange(
    State(config): State<CaptureConfig>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "failed to buffer request for logging");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!("{}", render_request(&parts, &body));

    let request = Request::from_parts(parts, Body::from(body));
    let response = next.run(request).await;

    let recorded = match RecordedResponse::record(response).await {
        Ok(recorded) => recorded,
        Err(err) => {
            tracing::error!(error = %err, "failed to record response for logging");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!("{}", recorded.render(config.log_response_body));

    recorded.into_response()
}

/// Render a buffered request as a framed `===REQUEST===` text block:
/// request line, headers, and body.
fn render_request(parts: &request::Parts, body: &[u8]) -> String {
    let mut out = format!(
        "===REQUEST===\n{} {} {:?}\r\n",
        parts.method, parts.uri, parts.version
    );
    render_headers(&mut out, &parts.headers);
    out.push_str("\r\n");
    out.push_str(&String::from_utf8_lossy(body));
    out
}

fn render_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        out.push_str(name.as_str());
        out.push_str(": ");
        out.push_str(&String::from_utf8_lossy(value.as_bytes()));
        out.push_str("\r\n");
    }
}
