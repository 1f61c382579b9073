//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lorry_routes::sdk::routing::provider::types::DirectionsSummary;
use lorry_routes::sdk::routing::{Coord, RoutingError, RoutingProvider};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const DEPOT: Coord = Coord::new(3.0738, 101.5183);

type Script = dyn Fn(Coord) -> Result<DirectionsSummary, RoutingError> + Send + Sync;

#[derive(Debug, Clone, Copy)]
pub struct Call {
    pub at: Instant,
    pub start: Coord,
    pub end: Coord,
}

/// Scripted provider: answers from a closure of the destination coordinate
/// and records every call with its (virtual) time.
pub struct StubProvider {
    keyed: bool,
    script: Box<Script>,
    calls: Mutex<Vec<Call>>,
    cancel_after: Mutex<Option<(usize, CancellationToken)>>,
}

impl StubProvider {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(Coord) -> Result<DirectionsSummary, RoutingError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            keyed: true,
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(None),
        })
    }

    /// Distance in meters derived from the destination, so results are
    /// deterministic and distinct per row.
    pub fn by_latitude() -> Arc<Self> {
        Self::new(|end| Ok(meters(end.latitude * 1000.0)))
    }

    pub fn without_key() -> Arc<Self> {
        Arc::new(Self {
            keyed: false,
            script: Box::new(|_| Ok(meters(1000.0))),
            calls: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(None),
        })
    }

    /// Cancels `token` while answering call number `n` (1-based).
    pub fn cancel_on_call(&self, n: usize, token: CancellationToken) {
        *self.cancel_after.lock().unwrap() = Some((n, token));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RoutingProvider for StubProvider {
    fn has_credentials(&self) -> bool {
        self.keyed
    }

    async fn get_directions(
        &self,
        start: Coord,
        end: Coord,
    ) -> Result<DirectionsSummary, RoutingError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                at: Instant::now(),
                start,
                end,
            });
            calls.len()
        };
        if let Some((at, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if *at == n {
                token.cancel();
            }
        }
        (self.script)(end)
    }
}

pub fn meters(distance: f64) -> DirectionsSummary {
    DirectionsSummary {
        distance,
        duration: distance / 20.0,
    }
}

// --- Minimal HTTP endpoint standing in for ORS ---

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serves every connection with the same canned response and keeps the
/// requests it saw.
pub struct MockOrs {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockOrs {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = requests.clone();
        let body = body.to_string();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let seen = seen.clone();
                let body = body.clone();
                tokio::spawn(async move {
                    let mut stream = stream;
                    if let Some(request) = read_request(&mut stream).await {
                        seen.lock().unwrap().push(request);
                        respond(&mut stream, status, &body).await;
                    }
                });
            }
        });

        Self { base_url, requests }
    }

    /// Accepts connections but never answers.
    pub async fn start_silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        Self {
            base_url,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut payload = buf[head_end + 4..].to_vec();
    while payload.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        payload.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&payload).to_string(),
    })
}

async fn respond(stream: &mut TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).await.is_ok() {
        let _ = stream.shutdown().await;
    }
}
