//! Stub explorer backend for tests
//!
//! A raw TCP listener that answers each HTTP/1.1 request with a programmable
//! response and records what it received.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by the stub
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    /// Target path with the query string removed
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }

    pub fn query(&self) -> HashMap<String, String> {
        self.target
            .split_once('?')
            .map(|(_, q)| {
                q.split('&')
                    .filter_map(|pair| pair.split_once('='))
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Canned response
#[derive(Clone, Debug)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
    pub delay_ms: u64,
    /// Content-Length to advertise instead of the real body length
    pub declared_length: Option<usize>,
}

impl StubResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "application/json",
            delay_ms: 0,
            declared_length: None,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "text/plain",
            delay_ms: 0,
            declared_length: None,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Advertise `length` bytes but send only the body, then close
    pub fn with_declared_length(mut self, length: usize) -> Self {
        self.declared_length = Some(length);
        self
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> StubResponse + Send + Sync>;

/// Running stub server; stops accepting when dropped with the runtime
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Start a server whose responses come from `handler`
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let handler = handler.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let _ = serve(socket, handler, recorded).await;
                });
            }
        });

        Self { addr, requests }
    }

    /// Start a server that answers every request the same way
    pub async fn fixed(response: StubResponse) -> Self {
        Self::start(move |_| response.clone()).await
    }

    /// Start a server that mimics the explorer backend
    pub async fn explorer() -> Self {
        Self::start(explorer_routes).await
    }

    /// Base URL with a trailing slash
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Base URL of a port nothing listens on
    pub async fn unreachable_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/")
    }
}

async fn serve(
    mut socket: TcpStream,
    handler: Handler,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("").to_string();
    let target = request_line.next().unwrap_or("").to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    let request = RecordedRequest {
        method,
        target,
        headers,
        body,
    };
    let response = handler(&request);
    recorded.lock().unwrap().push(request);

    if response.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(response.delay_ms)).await;
    }

    let raw = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason(response.status),
        response.content_type,
        response.declared_length.unwrap_or(response.body.len()),
        response.body
    );
    socket.write_all(raw.as_bytes()).await?;
    socket.shutdown().await
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

const RESOLUTIONS: &[&str] = &["1", "5", "15", "60", "240", "1D", "1W"];

/// Route table of a healthy explorer backend
fn explorer_routes(request: &RecordedRequest) -> StubResponse {
    let path = request.path().trim_start_matches('/');
    let path = path.strip_prefix("api/v1/").unwrap_or(path);

    match (request.method.as_str(), path) {
        ("GET", "history") => history_route(request),
        ("GET", "tokens") => StubResponse::json(
            200,
            json!({
                "tokens": [
                    {"id": "btc", "symbol": "BTC", "name": "Bitcoin", "decimals": 8},
                    {"id": "eth", "symbol": "ETH", "name": "Ether", "decimals": 18}
                ],
                "success": "ok"
            }),
        ),
        ("GET", "token-pairs") => StubResponse::json(
            200,
            json!({
                "pairs": [
                    {"id": "btc-usdt", "base": "BTC", "quote": "USDT", "price": "64000"},
                    {"id": "eth-usdt", "base": "ETH", "quote": "USDT"}
                ],
                "success": "ok"
            }),
        ),
        ("GET", "token-pairs/btc-usdt") => StubResponse::json(
            200,
            json!({
                "pair": {"id": "btc-usdt", "base": "BTC", "quote": "USDT"},
                "success": "ok"
            }),
        ),
        ("GET", p) if p.starts_with("token-pairs/") => {
            StubResponse::json(404, json!({"error": "Pair not found"}))
        }
        (_, "tokens") | (_, "token-pairs") => {
            StubResponse::json(405, json!({"error": "Method not allowed"}))
        }
        _ => StubResponse::json(404, json!({"error": "Not found"})),
    }
}

fn history_route(request: &RecordedRequest) -> StubResponse {
    let query = request.query();
    let bad_request = |msg: &str| StubResponse::json(400, json!({ "error": msg }));

    let Some(_symbol) = query.get("symbol").filter(|s| !s.is_empty()) else {
        return bad_request("Missing symbol");
    };
    let resolution = query.get("resolution").map(String::as_str).unwrap_or("");
    if !RESOLUTIONS.contains(&resolution) {
        return bad_request("Invalid resolution");
    }
    let from = query.get("from").and_then(|v| v.parse::<i64>().ok());
    let to = query.get("to").and_then(|v| v.parse::<i64>().ok());
    match (from, to) {
        (Some(from), Some(to)) if from <= to => {}
        _ => return bad_request("Invalid time range"),
    }

    StubResponse::json(
        200,
        json!({
            "t": [1700000000, 1700086400],
            "o": [1.0, 1.1],
            "h": [1.2, 1.3],
            "l": [0.9, 1.0],
            "c": [1.1, 1.2],
            "v": [100.0, 120.0],
            "s": "ok"
        }),
    )
}
