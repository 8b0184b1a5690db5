//! Logger module
//!
//! Console banner, access log lines and error/warning reporting, written
//! to stdout/stderr unless log files are configured.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use hyper::Version;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Startup banner. Always goes to the console, even with log files set.
pub fn log_banner(addr: &SocketAddr) {
    println!("🚀 Server running on http://localhost:{}", addr.port());
    println!("📡 COOP/COEP headers enabled for multi-threading");
    println!("🧵 4-thread CPU support enabled (~4x faster)");
    println!("🎮 WebGPU API enabled (experimental)");
    println!("🤖 Qwen2.5-0.5B-Instruct ready to load");
    println!("\nPress Ctrl+C to stop...\n");
}

/// Details that only matter when the defaults were changed
pub fn log_server_config(addr: &SocketAddr, config: &Config, root: &std::path::Path) {
    write_info(&format!("[CONFIG] Listening on {addr}, serving {}", root.display()));
    if let Some(workers) = config.server.workers {
        write_info(&format!("[CONFIG] Using {workers} worker threads"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("[CONFIG] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("[CONFIG] Error log: {path}"));
    }
}

pub fn log_shutdown() {
    println!("\n👋 Server stopped");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

/// HTTP version as written in a request line
pub fn format_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
