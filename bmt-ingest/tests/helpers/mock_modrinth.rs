//! In-process Modrinth API double
//!
//! Serves `GET /v2/project/:id` on an ephemeral port. The identifier picks
//! the response:
//! - `missing` -> 404
//! - `broken` -> 500
//! - `garbled` -> 200 with a non-JSON body
//! - `slow` -> 200 after [`MockModrinth::SLOW_DELAY`]
//! - anything else -> 200 describing a project with that ID

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

#[derive(Default)]
struct MockState {
    hits: AtomicUsize,
    seen_ids: Mutex<Vec<String>>,
    user_agents: Mutex<Vec<String>>,
}

pub struct MockModrinth {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockModrinth {
    pub const SLOW_DELAY: Duration = Duration::from_secs(3);

    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/v2/project/:id", get(project))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Base URL in the shape of the `[modrinth] base_url` setting
    pub fn base_url(&self) -> String {
        format!("http://{}/v2", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Identifiers as decoded by the server
    pub fn seen_ids(&self) -> Vec<String> {
        self.state.seen_ids.lock().unwrap().clone()
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.state.user_agents.lock().unwrap().clone()
    }
}

/// Base URL of a port with nothing listening
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v2", addr)
}

async fn project(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.seen_ids.lock().unwrap().push(id.clone());
    if let Some(agent) = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
        state.user_agents.lock().unwrap().push(agent.to_string());
    }

    match id.as_str() {
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "slow" => {
            tokio::time::sleep(MockModrinth::SLOW_DELAY).await;
            Json(project_body(&id)).into_response()
        }
        _ => Json(project_body(&id)).into_response(),
    }
}

fn project_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "slug": id.to_lowercase(),
        "title": format!("Project {}", id),
        "client_side": "required",
        "server_side": "unsupported",
        "downloads": 1000,
        "categories": ["optimization"]
    })
}
