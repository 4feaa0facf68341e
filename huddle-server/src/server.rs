use crate::config::ServerConfig;
use crate::room::{MembershipEvent, MembershipService};
use crate::signaling::{SignalingRouter, ws_default_room, ws_named_room};
use crate::transport::ConnectionHub;
use anyhow::Context;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use huddle_core::{ConnectionId, RoomId};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<SignalingRouter>,
    pub hub: ConnectionHub,
    pub default_room: RoomId,
}

#[derive(Debug, Serialize)]
pub struct RoomSnapshot {
    pub room: RoomId,
    pub members: Vec<ConnectionId>,
}

pub struct SignalingServer {
    config: ServerConfig,
    state: AppState,
}

impl SignalingServer {
    pub fn new(config: ServerConfig) -> Self {
        let membership = Arc::new(MembershipService::new(config.event_capacity));
        let hub = ConnectionHub::new();
        let router = SignalingRouter::new(membership, Arc::new(hub.clone()))
            .with_delivery_receipts(config.delivery_receipts);

        let state = AppState {
            router: Arc::new(router),
            hub,
            default_room: config.default_room.clone(),
        };

        Self { config, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn app(&self) -> Router {
        Router::new()
            .route("/ws", get(ws_default_room))
            .route("/ws/{room}", get(ws_named_room))
            .route("/rooms/{room}", get(room_snapshot))
            .route("/health", get(health))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.bind)
            .await
            .with_context(|| format!("Failed to bind {}", self.config.bind))?;

        self.serve(listener, shutdown_signal()).await
    }

    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!("Signaling server listening on {}", addr);

        tokio::spawn(log_occupancy(self.state.router.membership().subscribe()));

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;

        info!("Signaling server stopped");
        Ok(())
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn room_snapshot(
    Path(room): Path<String>,
    State(state): State<AppState>,
) -> Json<RoomSnapshot> {
    let room = RoomId::from(room);
    let members = state.router.membership().members(&room).await;

    Json(RoomSnapshot { room, members })
}

async fn log_occupancy(mut events: broadcast::Receiver<MembershipEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                let (verb, connection, members) = match &event {
                    MembershipEvent::Joined {
                        connection,
                        members,
                        ..
                    } => ("joined", connection, members),
                    MembershipEvent::Left {
                        connection,
                        members,
                        ..
                    } => ("left", connection, members),
                };
                info!(
                    "Room '{}': {} {}, occupancy {}",
                    event.room(),
                    connection,
                    verb,
                    members
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Occupancy log skipped {} membership event(s)", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
