//! Path resolution module
//!
//! Turns a request path into a location under the document root without
//! ever leaving it.

use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::logger;

/// Outcome of resolving a request path against the document root
#[derive(Debug)]
pub enum Resolved {
    /// Regular file (possibly a directory's index file)
    File { path: PathBuf, metadata: Metadata },
    /// Directory without an index file; rendered as a listing
    Directory { path: PathBuf },
    /// Directory requested without the trailing slash
    Redirect { location: String },
    NotFound,
    /// Path would escape the root
    Forbidden,
}

/// Resolve `request_path` (the raw, still percent-encoded URI path) under
/// `root`, which must already be canonical.
///
/// `query` is only used to carry the query string over to a redirect.
pub async fn resolve(
    root: &Path,
    request_path: &str,
    query: Option<&str>,
    index_files: &[String],
) -> Resolved {
    let segments = match decode_segments(request_path) {
        Ok(segments) => segments,
        Err(outcome) => return outcome,
    };

    let candidate = segments
        .iter()
        .fold(root.to_path_buf(), |path, segment| path.join(segment));

    let Ok(metadata) = fs::metadata(&candidate).await else {
        return Resolved::NotFound;
    };

    // Symlinks may point anywhere; only the canonical target counts
    if !is_within_root(root, &candidate, request_path).await {
        return Resolved::Forbidden;
    }

    if metadata.is_dir() {
        if !request_path.ends_with('/') {
            // A leading `//` would make the Location protocol-relative
            let path = request_path.trim_start_matches('/');
            let location = match query {
                Some(q) => format!("/{path}/?{q}"),
                None => format!("/{path}/"),
            };
            return Resolved::Redirect { location };
        }

        for index_file in index_files {
            let index_path = candidate.join(index_file);
            let Ok(index_metadata) = fs::metadata(&index_path).await else {
                continue;
            };
            if !index_metadata.is_file() {
                continue;
            }
            if !is_within_root(root, &index_path, request_path).await {
                return Resolved::Forbidden;
            }
            return Resolved::File {
                path: index_path,
                metadata: index_metadata,
            };
        }

        return Resolved::Directory { path: candidate };
    }

    if metadata.is_file() {
        Resolved::File {
            path: candidate,
            metadata,
        }
    } else {
        // Sockets, FIFOs, devices
        Resolved::NotFound
    }
}

/// Split and percent-decode the path, rejecting anything that could step
/// outside the root
fn decode_segments(request_path: &str) -> Result<Vec<String>, Resolved> {
    let mut segments = Vec::new();

    for raw in request_path.split('/') {
        let Ok(segment) = percent_decode_str(raw).decode_utf8() else {
            return Err(Resolved::NotFound);
        };

        match &*segment {
            "" | "." => {}
            ".." => return Err(Resolved::Forbidden),
            s if s.contains(&['/', '\\', '\0'][..]) => return Err(Resolved::Forbidden),
            s => segments.push(s.to_string()),
        }
    }

    Ok(segments)
}

async fn is_within_root(root: &Path, path: &Path, request_path: &str) -> bool {
    let Ok(canonical) = fs::canonicalize(path).await else {
        return false;
    };

    if canonical.starts_with(root) {
        true
    } else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        false
    }
}
