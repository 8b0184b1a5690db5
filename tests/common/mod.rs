//! Shared helpers for the integration tests.

use std::net::SocketAddr;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use coi_serve::config::Config;
use coi_serve::server::Server;

/// A server running on an ephemeral loopback port
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(root: &Path) -> Self {
        let server = Server::bind(test_config(root)).unwrap();
        let addr = server.local_addr();
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(server.run(async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    /// Trigger shutdown and wait for the accept loop to return
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap();
    }
}

pub fn test_config(root: &Path) -> Config {
    let mut config = Config::load_from("tests/no-such-config").unwrap();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.root = root.to_path_buf();
    config.logging.access_log = false;
    config
}

/// Raw HTTP/1.1 response as read off the socket
#[allow(dead_code)]
pub struct RawResponse {
    pub status: u16,
    /// Header block exactly as sent, without the status line
    pub head: String,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().find_map(|line| {
            let (n, v) = line.split_once(':')?;
            n.eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }

    /// The isolation headers must appear verbatim, once each
    pub fn assert_isolated(&self) {
        for line in [
            "Cross-Origin-Opener-Policy: same-origin",
            "Cross-Origin-Embedder-Policy: require-corp",
            "Cache-Control: no-store",
        ] {
            assert_eq!(
                self.head.lines().filter(|l| *l == line).count(),
                1,
                "missing or duplicated `{line}` in:\n{}",
                self.head
            );
        }
        assert_eq!(
            self.head
                .lines()
                .filter(|l| l.to_ascii_lowercase().starts_with("cache-control:"))
                .count(),
            1
        );
    }
}

/// Send one request (with `Connection: close`) and read the whole response
pub async fn request(addr: SocketAddr, method: &str, path: &str, extra_headers: &[(&str, &str)]) -> RawResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in extra_headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    req.push_str("\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();

    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response without header terminator");
    let head = String::from_utf8(raw[..split].to_vec()).unwrap();
    let body = raw[split + 4..].to_vec();

    let (status_line, headers) = head.split_once("\r\n").unwrap_or((head.as_str(), ""));
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("malformed status line");

    RawResponse {
        status,
        head: headers.replace("\r\n", "\n"),
        body,
    }
}
