use std::sync::Arc;

use teleport_client::TeleportConnection;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (feed id, timezone).
    pub config: Arc<ServerConfig>,
    /// Pooled connection to teleport.io shared by all requests.
    pub teleport: Arc<TeleportConnection>,
}
