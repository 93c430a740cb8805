//! Quickserve: a small file-sharing daemon.
//!
//! Serves a directory tree over HTTP(S) or a Unix socket, accepts multipart
//! file uploads, optionally gates everything behind HTTP Basic
//! Authentication, and optionally logs every request/response exchange in
//! full. A separate `--pipe` mode relays raw bytes between one accepted
//! connection and the local stdio streams instead of speaking HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ net (TCP / TLS / Unix socket)
//!                 │
//!                 ▼
//!          auth (Basic, outermost)
//!                 │
//!                 ▼
//!          capture (request/response logging)
//!                 │
//!        ┌────────┴─────────┐
//!        ▼                  ▼
//!   /upload handler    static files (ServeDir)
//!
//!   --pipe mode: socket ◀──▶ relay ◀──▶ stdin/stdout (no HTTP layer)
//! ```

// Core subsystems
pub mod config;
pub mod handlers;
pub mod net;

// Request interception
pub mod auth;
pub mod capture;

// Raw byte piping
pub mod relay;

// Startup
pub mod cli;

pub use config::schema::ServerConfig;
pub use handlers::build_router;
