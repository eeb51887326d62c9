//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use sdc_demo_server::{HttpServer, ServerConfig, Shutdown};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const TOBACCO_FORM: &str = r#"{
  "resourceType": "Questionnaire",
  "id": "history-of-tobacco-use",
  "status": "active",
  "item": [{"linkId": "1", "text": "Tobacco use", "type": "choice"}]
}
"#;

pub const INDEX_HTML: &str = "<!doctype html><html><body>SDC demo</body></html>";

/// A request as seen by the mock upstream.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// What the mock upstream answers with.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl MockReply {
    pub fn fhir(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("application/fhir+json; charset=utf-8"),
            body: body.to_string(),
        }
    }
}

pub type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

/// Start a mock upstream on an ephemeral port that records every request
/// and answers each one with `reply`.
pub async fn start_recording_backend(reply: MockReply) -> (SocketAddr, Recorded) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let log = recorded.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let reply = reply.clone();
            let log = log.clone();
            tokio::spawn(async move {
                if let Some(request) = read_request(&mut socket).await {
                    log.lock().unwrap().push(request);
                }
                let _ = socket.write_all(render_reply(&reply).as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, recorded)
}

/// Start an upstream that reads the request and never answers.
pub async fn start_stalled_backend(stall: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_request(&mut socket).await;
                tokio::time::sleep(stall).await;
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn render_reply(reply: &MockReply) -> String {
    let reason = StatusCode::from_u16(reply.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    let content_type = reply
        .content_type
        .map(|ct| format!("Content-Type: {}\r\n", ct))
        .unwrap_or_default();

    format!(
        "HTTP/1.1 {} {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason,
        content_type,
        reply.body.len(),
        reply.body
    )
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

/// Deployment root with `static/` and `forms/` populated, plus a config
/// pointing at it.
pub struct Fixture {
    pub dir: TempDir,
    pub config: ServerConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        write(root, "static/index.html", INDEX_HTML);
        write(root, "static/js/app.js", "console.log('sdc');\n");
        write(root, "forms/History-of-Tobacco-use.R4.json", TOBACCO_FORM);
        write(root, "forms/patient.json", r#"{"resourceType":"Patient","id":"p1"}"#);
        write(root, "forms/broken.json", r#"{"resourceType": "Questionnaire", "#);
        write(root, "secret.json", TOBACCO_FORM);

        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.assets.directory = root.join("static");
        config.forms.directory = root.join("forms");

        Self { dir, config }
    }

    pub fn path(&self, relative: &str) -> std::path::PathBuf {
        self.dir.path().join(relative)
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Start the server on an ephemeral port.
pub async fn start_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
