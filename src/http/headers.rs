//! Cross-origin isolation header set
//!
//! Browsers only expose `SharedArrayBuffer` (and with it threaded WASM) to
//! documents served with COOP `same-origin` and COEP `require-corp`.
//! `Cache-Control: no-store` keeps stale builds out of the browser cache.

use hyper::header::{HeaderMap, HeaderName, HeaderValue, SERVER};

/// Headers attached to every response, in the order they are written.
///
/// Names are lowercase here; connections are configured with
/// title-cased header output, so they go on the wire as
/// `Cross-Origin-Opener-Policy` etc.
pub const ISOLATION_HEADERS: [(&str, &str); 3] = [
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-embedder-policy", "require-corp"),
    ("cache-control", "no-store"),
];

/// Add the isolation header set, replacing any value the base response set
/// for the same names.
pub fn apply_isolation_headers(headers: &mut HeaderMap) {
    for (name, value) in ISOLATION_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
}

/// Set the `Server` header; invalid names are skipped
pub fn apply_server_header(headers: &mut HeaderMap, server_name: &str) {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, value);
    }
}
