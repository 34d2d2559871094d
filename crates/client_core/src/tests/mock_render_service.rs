//! In-process stand-in for the render service, bound to an ephemeral port.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use shared::protocol::ServiceErrorBody;
use tokio::{
    net::TcpListener,
    sync::{Mutex, Notify},
};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone)]
pub(crate) struct CannedResponse {
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
}

impl CannedResponse {
    pub fn video(body: &[u8]) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "video/mp4",
            body: body.to_vec(),
        }
    }

    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string().into_bytes(),
        }
    }

    /// Failure reply shaped the way the render service sends it.
    pub fn service_error(status: StatusCode, message: &str) -> Self {
        let body = serde_json::to_value(ServiceErrorBody::new(message)).expect("serialize");
        Self::json(status, body)
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.as_bytes().to_vec(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    response: CannedResponse,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    arrived: Arc<Notify>,
    gate: Option<Arc<Notify>>,
}

pub(crate) struct MockRenderService {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    arrived: Arc<Notify>,
    gate: Option<Arc<Notify>>,
}

impl MockRenderService {
    pub async fn spawn(response: CannedResponse) -> Self {
        Self::spawn_inner(response, None).await
    }

    /// Like [`MockRenderService::spawn`], but each response is held back
    /// until [`MockRenderService::release`] is called.
    pub async fn spawn_gated(response: CannedResponse) -> Self {
        Self::spawn_inner(response, Some(Arc::new(Notify::new()))).await
    }

    async fn spawn_inner(response: CannedResponse, gate: Option<Arc<Notify>>) -> Self {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let arrived = Arc::new(Notify::new());
        let state = MockState {
            response,
            requests: Arc::clone(&requests),
            arrived: Arc::clone(&arrived),
            gate: gate.clone(),
        };
        let app = Router::new()
            .route("/create_video", post(handle_create_video))
            .with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{addr}"),
            requests,
            arrived,
            gate,
        }
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn wait_for_request(&self) {
        self.arrived.notified().await;
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

async fn handle_create_video(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state
        .requests
        .lock()
        .await
        .push(RecordedRequest { content_type, body });
    state.arrived.notify_one();

    if let Some(gate) = &state.gate {
        gate.notified().await;
    }

    let CannedResponse {
        status,
        content_type,
        body,
    } = state.response;
    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// Base URL of a port nothing listens on.
pub(crate) fn unreachable_server_url() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
