use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::Value;

use carchase_host::config::HostConfig;

#[derive(Clone)]
struct MockState {
    fail: bool,
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
    pub async fn new(entries: Value) -> Self {
        Self::start(false, entries).await
    }

    pub async fn failing() -> Self {
        Self::start(true, Value::Array(Vec::new())).await
    }

    async fn start(fail: bool, entries: Value) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let posts = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            fail,
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

    pub fn posts(&self) -> Vec<Value> {
        self.posts.lock().unwrap().clone()
    }
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Fast, deterministic host config: no wall-clock pacing, seeded runs, and
/// an autopilot that never jumps so every run ends at the first obstacle.
pub fn batch_config(max_runs: u32) -> HostConfig {
    let mut config = HostConfig {
        max_runs,
        realtime: false,
        ..HostConfig::default()
    };
    config.runner.seed = Some(2024);
    config.autopilot.jumps = false;
    config.leaderboard.request_timeout_secs = 2;
    config
}

async fn log_score(State(state): State<MockState>, Json(body): Json<Value>) -> StatusCode {
    if state.fail {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.posts.lock().unwrap().push(body);
    StatusCode::CREATED
}

async fn list_scores(State(state): State<MockState>) -> Result<Json<Value>, StatusCode> {
    if state.fail {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(state.entries.clone()))
}
