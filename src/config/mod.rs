// Configuration module entry point
// Built-in defaults, overridable through an optional `coi-serve.toml`

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServeError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Config file looked up in the working directory (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "coi-serve";

impl Config {
    /// Load configuration from `coi-serve.toml` in the working directory.
    /// A missing file yields the built-in defaults.
    pub fn load() -> Result<Self, ServeError> {
        Self::load_from(DEFAULT_CONFIG_PATH).map_err(ServeError::from)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.root", ".")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 30)?
            .set_default(
                "http.server_name",
                concat!("coi-serve/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.directory_listing", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServeError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServeError::InvalidAddress { addr, source })
    }
}
