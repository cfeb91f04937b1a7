//! Axum web server with WebSocket streaming of scene frames.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use wealthpile_growth::{Comparison, AVERAGE_HOUSEHOLD_ID, BILLIONAIRE_ID};

use crate::error::Result;
use crate::frame::SceneFrame;
use crate::instances::UnitInstance;

/// Latest frame of one scene.
pub type FrameFeed = watch::Receiver<Option<SceneFrame>>;

/// Shared application state.
pub struct AppState {
    billionaire: FrameFeed,
    household: FrameFeed,
}

impl AppState {
    fn feed(&self, id: &str) -> Option<&FrameFeed> {
        match id {
            BILLIONAIRE_ID => Some(&self.billionaire),
            AVERAGE_HOUSEHOLD_ID => Some(&self.household),
            _ => None,
        }
    }

    fn latest(&self, id: &str) -> Option<SceneFrame> {
        self.feed(id).and_then(|feed| feed.borrow().clone())
    }

    fn scene(&self) -> SceneResponse {
        let billionaire = self.latest(BILLIONAIRE_ID);
        let household = self.latest(AVERAGE_HOUSEHOLD_ID);
        let comparison = match (&billionaire, &household) {
            (Some(b), Some(h)) => Comparison::between(&b.profile, &h.profile),
            _ => None,
        };
        SceneResponse {
            billionaire,
            household,
            comparison,
        }
    }
}

/// Scene server.
pub struct SceneServer {
    state: Arc<AppState>,
}

impl SceneServer {
    /// Serve frames published by the billionaire and household drivers.
    pub fn new(billionaire: FrameFeed, household: FrameFeed) -> Self {
        Self {
            state: Arc::new(AppState {
                billionaire,
                household,
            }),
        }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/api/scene", get(scene_handler))
            .route("/api/scene/:id", get(frame_handler))
            .route("/api/scene/:id/instances", get(instances_handler))
            .route("/api/scene/:id/instances/raw", get(raw_instances_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Scene server running on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("Scene server stopped");
        Ok(())
    }
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Both scenes side by side.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneResponse {
    pub billionaire: Option<SceneFrame>,
    pub household: Option<SceneFrame>,
    pub comparison: Option<Comparison>,
}

async fn scene_handler(State(state): State<Arc<AppState>>) -> Json<SceneResponse> {
    Json(state.scene())
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("no scene for {}", id),
        }),
    )
        .into_response()
}

async fn frame_handler(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.latest(&id) {
        Some(frame) => Json(frame).into_response(),
        None => not_found(&id),
    }
}

/// Optional `?from=N`: skip the first `N` units a client already holds.
#[derive(Debug, Default, Deserialize)]
struct InstanceRange {
    #[serde(default)]
    from: u64,
}

fn instances_for(
    state: &AppState,
    id: &str,
    range: &InstanceRange,
) -> std::result::Result<Vec<UnitInstance>, Response> {
    let frame = state.latest(id).ok_or_else(|| not_found(id))?;
    frame.instances_from(range.from).map_err(|e| {
        tracing::error!("Instance table for {} failed: {}", id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response()
    })
}

async fn instances_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(range): Query<InstanceRange>,
) -> Response {
    match instances_for(&state, &id, &range) {
        Ok(instances) => Json(instances).into_response(),
        Err(response) => response,
    }
}

/// Instance table as packed little-endian `[x, y, z, arriving]` records.
async fn raw_instances_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(range): Query<InstanceRange>,
) -> Response {
    match instances_for(&state, &id, &range) {
        Ok(instances) => {
            let bytes = bytemuck::cast_slice::<UnitInstance, u8>(&instances).to_vec();
            ([(header::CONTENT_TYPE, "application/octet-stream")], bytes).into_response()
        }
        Err(response) => response,
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum WsCommand {
    #[serde(rename = "get_scene")]
    GetScene,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum WsResponse {
    #[serde(rename = "scene")]
    Scene(SceneResponse),
    #[serde(rename = "frame")]
    Frame(SceneFrame),
}

async fn send(socket: &mut WebSocket, response: &WsResponse) -> bool {
    match serde_json::to_string(response) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::warn!("Failed to encode frame: {}", e);
            true
        }
    }
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    if !send(&mut socket, &WsResponse::Scene(state.scene())).await {
        return;
    }

    let mut billionaire = state.billionaire.clone();
    let mut household = state.household.clone();
    billionaire.borrow_and_update();
    household.borrow_and_update();

    loop {
        let update = tokio::select! {
            changed = billionaire.changed() => match changed {
                Ok(()) => billionaire.borrow_and_update().clone(),
                Err(_) => break,
            },
            changed = household.changed() => match changed {
                Ok(()) => household.borrow_and_update().clone(),
                Err(_) => break,
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<WsCommand>(&text) {
                        Ok(WsCommand::GetScene) => {
                            if !send(&mut socket, &WsResponse::Scene(state.scene())).await {
                                break;
                            }
                        }
                        Err(e) => tracing::debug!("Ignoring websocket message: {}", e),
                    }
                    None
                }
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => None,
            },
        };

        if let Some(frame) = update {
            if !send(&mut socket, &WsResponse::Frame(frame)).await {
                break;
            }
        }
    }

    tracing::debug!("WebSocket client disconnected");
}
