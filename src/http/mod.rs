//! HTTP protocol layer module
//!
//! Header set, content types, conditional requests and response builders,
//! decoupled from how paths are resolved on disk.

pub mod body;
pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use body::ResponseBody;
pub use headers::{apply_isolation_headers, ISOLATION_HEADERS};
pub use response::{
    build_304_response, build_403_response, build_404_response, build_501_response,
    build_file_response, build_html_response, build_redirect_response,
};
