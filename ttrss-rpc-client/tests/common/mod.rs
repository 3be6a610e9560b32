//! In-process stand-ins for a Tiny Tiny RSS server.
//!
//! [`MockServer`] is an axum app that speaks the JSON API for a handful of
//! operations. [`raw_server`] is a bare TCP peer that writes a scripted HTTP
//! response, for exercising broken or slow connections.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use ttrss_rpc_client::RpcClient;

pub const USER: &str = "admin";
/// Contains every character that would break a hand-assembled JSON string.
pub const PASSWORD: &str = r#"p"a\s:s,{w}o'r d"#;
/// A user whose account has API access switched off.
pub const DISABLED_USER: &str = "reader";
pub const API_LEVEL: u32 = 18;

/// One request as the server saw it.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub body: Value,
    pub user_agent: Option<String>,
}

#[derive(Clone, Default)]
struct MockState {
    sessions: Arc<Mutex<HashSet<String>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
    issued: Arc<AtomicUsize>,
}

pub struct MockServer {
    pub addr: SocketAddr,
    state: MockState,
}

impl MockServer {
    pub async fn start() -> Self {
        init_tracing();

        let state = MockState::default();
        let app = Router::new()
            .route("/api/", post(api))
            .route("/fault/", post(fault))
            .route("/slow/", post(slow))
            .route("/garbage/", post(garbage))
            .route("/array/", post(array))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn client(&self) -> RpcClient {
        self.client_at("/api/")
    }

    pub fn client_at(&self, path: &str) -> RpcClient {
        RpcClient::builder(self.url(path))
            .timeout(Duration::from_secs(5))
            .user_agent("ttrss-rpc-tests/1.0")
            .build()
            .unwrap()
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    pub fn live_sessions(&self) -> usize {
        self.state.sessions.lock().unwrap().len()
    }
}

async fn api(State(state): State<MockState>, headers: HeaderMap, body: Bytes) -> Response {
    let parsed = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(Recorded {
        body: parsed.clone(),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    });

    let Value::Object(request) = parsed else {
        return reply(json!({"error": "INCORRECT_USAGE"}));
    };
    let op = request.get("op").and_then(Value::as_str).unwrap_or_default();
    let text = |field: &str| request.get(field).and_then(Value::as_str).unwrap_or_default();

    if op == "login" {
        if text("user") == DISABLED_USER {
            return reply(json!({"error": "API_DISABLED"}));
        }
        if text("user") != USER || text("password") != PASSWORD {
            return reply(json!({"error": "LOGIN_ERROR"}));
        }
        let n = state.issued.fetch_add(1, Ordering::SeqCst);
        let sid = format!("sess-{n}");
        state.sessions.lock().unwrap().insert(sid.clone());
        return reply(json!({"session_id": sid, "api_level": API_LEVEL}));
    }

    let sid = text("sid").to_owned();
    if !state.sessions.lock().unwrap().contains(&sid) {
        return reply(json!({"error": "NOT_LOGGED_IN"}));
    }

    match op {
        "getApiLevel" => reply(json!({"level": API_LEVEL})),
        "isLoggedIn" => reply(json!({"status": true})),
        "logout" => {
            state.sessions.lock().unwrap().remove(&sid);
            reply(json!({"status": "OK"}))
        }
        "echo" => reply(json!({"received": Value::Object(request.clone())})),
        other => reply(json!({
            "error": "UNKNOWN_METHOD",
            "message": format!("method `{other}` not found"),
        })),
    }
}

fn reply(value: Value) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        value.to_string(),
    )
        .into_response()
}

async fn fault() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "<html><body>Fatal error in api/index.php</body></html>",
    )
        .into_response()
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(10)).await;
    reply(json!({"status": "OK"}))
}

async fn garbage() -> Response {
    (StatusCode::OK, "<html>maintenance</html>").into_response()
}

async fn array() -> Response {
    reply(json!([1, 2, 3]))
}

/// What a [`raw_server`] does after writing its last chunk.
#[derive(Clone, Copy, Debug)]
pub enum AfterReply {
    Close,
    Hang,
}

/// Accept one connection, read the request, then write `chunks` with `pause`
/// between them.
pub async fn raw_server(chunks: Vec<Vec<u8>>, pause: Duration, after: AfterReply) -> SocketAddr {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_request(&mut stream).await;
        for chunk in chunks {
            if stream.write_all(&chunk).await.is_err() {
                return;
            }
            let _ = stream.flush().await;
            tokio::time::sleep(pause).await;
        }
        if let AfterReply::Hang = after {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    });
    addr
}

/// Consume the request head and its `Content-Length` body so closing the
/// socket does not reset the connection.
async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut expected = None;

    loop {
        if let Some(total) = expected {
            if buf.len() >= total {
                return;
            }
        } else if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            expected = Some(end + 4 + length);
            continue;
        }

        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Address with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn client_for(addr: SocketAddr, timeout: Duration) -> RpcClient {
    RpcClient::builder(format!("http://{addr}/api/"))
        .timeout(timeout)
        .build()
        .unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
