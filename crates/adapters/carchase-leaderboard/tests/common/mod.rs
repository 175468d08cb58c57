use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::Value;

use carchase_leaderboard::{LeaderboardClient, LeaderboardConfig};

/// How the mock service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ok,
    ServerError,
    Malformed,
}

#[derive(Clone)]
struct MockState {
    mode: Mode,
    posts: Arc<Mutex<Vec<Value>>>,
    entries: Value,
}

/// In-process leaderboard service bound to an ephemeral port.
pub struct MockLeaderboard {
    pub addr: SocketAddr,
    posts: Arc<Mutex<Vec<Value>>>,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl MockLeaderboard {
    pub async fn new() -> Self {
        Self::start(Mode::Ok, Value::Array(Vec::new())).await
    }

    pub async fn failing() -> Self {
        Self::start(Mode::ServerError, Value::Array(Vec::new())).await
    }

    pub async fn malformed() -> Self {
        Self::start(Mode::Malformed, Value::Array(Vec::new())).await
    }

    pub async fn with_entries(entries: Value) -> Self {
        Self::start(Mode::Ok, entries).await
    }

    async fn start(mode: Mode, entries: Value) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let posts = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            mode,
            posts: Arc::clone(&posts),
            entries,
        };
        let app = Router::new()
            .route("/log", post(log_score))
            .route("/leaderboard", get(list_scores))
            .with_state(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            posts,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> LeaderboardClient {
        client_for(self.base_url(), true)
    }

    pub fn posts(&self) -> Vec<Value> {
        self.posts.lock().unwrap().clone()
    }
}

pub fn client_for(base_url: String, allow_anonymous: bool) -> LeaderboardClient {
    LeaderboardClient::new(LeaderboardConfig {
        base_url,
        allow_anonymous,
        request_timeout_secs: 2,
        ..LeaderboardConfig::default()
    })
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn log_score(State(state): State<MockState>, Json(body): Json<Value>) -> StatusCode {
    if state.mode == Mode::ServerError {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.posts.lock().unwrap().push(body);
    StatusCode::CREATED
}

async fn list_scores(State(state): State<MockState>) -> Response {
    match state.mode {
        Mode::Ok => Json(state.entries.clone()).into_response(),
        Mode::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Mode::Malformed => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}
