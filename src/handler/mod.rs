//! Request handler module
//!
//! Maps request paths onto the document root and turns the outcome into a
//! response carrying the isolation headers.

pub mod listing;
pub mod resolve;
pub mod router;

// Re-export main entry point
pub use resolve::{resolve, Resolved};
pub use router::handle_request;
