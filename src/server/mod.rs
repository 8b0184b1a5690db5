//! Server module
//!
//! Owns the listening socket and runs the accept loop until shutdown.

pub mod connection;
pub mod listener;
pub mod signal;

// Rust 不允许 loop 作为模块名（关键字），改用 server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use signal::shutdown_signal;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::ServeError;

/// A bound, not yet running, file server
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    local_addr: SocketAddr,
}

impl Server {
    /// Resolve the document root and bind the listener.
    ///
    /// Fails fast with [`ServeError::Bind`] when the port is taken. Must be
    /// called from within a tokio runtime.
    pub fn bind(config: Config) -> Result<Self, ServeError> {
        let addr = config.get_socket_addr()?;
        let state = AppState::new(config)?;
        let listener = create_listener(addr).map_err(|source| ServeError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            state: Arc::new(state),
            local_addr,
        })
    }

    /// Address actually bound (differs from the configured one for port 0)
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until `shutdown` resolves, then stop accepting and return
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        server_loop::start_server_loop(self.listener, self.state, shutdown).await;
    }
}
