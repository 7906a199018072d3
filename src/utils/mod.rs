//! Shared utilities

pub mod cancel;
pub mod http;
pub mod mime;
pub mod streaming;
