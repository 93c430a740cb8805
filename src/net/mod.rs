//! Transport selection and serving.

pub mod listener;
pub mod tls;

pub use listener::{serve, NetError, Transport};
