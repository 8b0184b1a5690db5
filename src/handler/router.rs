//! Request dispatch module
//!
//! Entry point for HTTP request processing: method check, path resolution,
//! response building and the final header injection step.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::resolve::{resolve, Resolved};
use crate::http::{self, cache, headers, mime};
use crate::logger::{self, AccessLogEntry};
use crate::http::body::{self, ResponseBody};
use hyper::header::{
    HeaderMap, HeaderName, CONTENT_LENGTH, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, USER_AGENT,
};
use hyper::{Method, Request, Response};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
    /// Entity tags are never issued, but their presence disables date validation
    pub has_if_none_match: bool,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();
    let method = &parts.method;

    let ctx = RequestContext {
        path: parts.uri.path(),
        query: parts.uri.query(),
        is_head: *method == Method::HEAD,
        if_modified_since: parts
            .headers
            .get(IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok()),
        has_if_none_match: parts.headers.contains_key(IF_NONE_MATCH),
    };

    let mut response = match method {
        &Method::GET | &Method::HEAD => route_request(&ctx, &state).await,
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            http::build_501_response(method.as_str(), false)
        }
    };

    finalize_response(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            ctx.path.to_string(),
        );
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = logger::format_version(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = if ctx.is_head { 0 } else { body_bytes(&response) };
        entry.referer = header_string(&parts.headers, &REFERER);
        entry.user_agent = header_string(&parts.headers, &USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Last step before a response leaves the server: every status gets the
/// isolation headers
pub fn finalize_response(response: &mut Response<ResponseBody>, server_name: &str) {
    let map = response.headers_mut();
    headers::apply_server_header(map, server_name);
    headers::apply_isolation_headers(map);
}

/// Resolve the path and build the matching response
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let http_config = &state.config.http;

    match resolve(&state.root, ctx.path, ctx.query, &http_config.index_files).await {
        Resolved::File { path, metadata } => serve_file(ctx, &path, &metadata).await,
        Resolved::Directory { path } if http_config.directory_listing => {
            serve_listing(ctx, &path).await
        }
        Resolved::Directory { .. } | Resolved::NotFound => {
            http::build_404_response("File not found", ctx.is_head)
        }
        Resolved::Redirect { location } => http::build_redirect_response(&location),
        Resolved::Forbidden => http::build_403_response(ctx.is_head),
    }
}

/// Serve a regular file
async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    metadata: &std::fs::Metadata,
) -> Response<ResponseBody> {
    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let Some(modified) = modified {
        if !ctx.has_if_none_match && cache::is_not_modified(ctx.if_modified_since, modified) {
            return http::build_304_response(last_modified.as_deref());
        }
    }

    let content_type = mime::content_type_for(path);

    if ctx.is_head {
        return http::build_file_response(
            body::empty(),
            metadata.len(),
            content_type,
            last_modified.as_deref(),
        );
    }

    // Open first so permission errors still become a 404
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_404_response("File not found", ctx.is_head);
        }
    };
    let len = file
        .metadata()
        .await
        .map_or(metadata.len(), |opened| opened.len());

    http::build_file_response(
        body::file_body(file),
        len,
        content_type,
        last_modified.as_deref(),
    )
}

/// Serve an HTML listing of a directory
async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<ResponseBody> {
    match listing::read_listing(dir).await {
        Ok(entries) => {
            let display_path = percent_decode_str(ctx.path).decode_utf8_lossy();
            let html = listing::render_listing(&display_path, &entries);
            http::response::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to list directory '{}': {e}", dir.display()));
            http::build_404_response("No permission to list directory", ctx.is_head)
        }
    }
}

/// Streamed bodies have no exact size hint, so the announced length is used
fn body_bytes(response: &Response<ResponseBody>) -> u64 {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
