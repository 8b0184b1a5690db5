//! coi-serve
//!
//! Serves a directory over HTTP/1.1 with the cross-origin isolation headers
//! (`Cross-Origin-Opener-Policy`, `Cross-Origin-Embedder-Policy`) and
//! `Cache-Control: no-store` attached to every response, so pages that need
//! `SharedArrayBuffer` or threaded WebAssembly work from a local checkout.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::ServeError;
