pub mod api;
pub mod bridge;
pub mod config;
pub mod content;
pub mod flows;
pub mod pages;
pub mod simulation;

use std::sync::Arc;

use axum::Router;
use log::info;

use bridge::{BridgeConfig, CompletionBackend, GeminiBridge};
use config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn CompletionBackend>,
    pub model_name: String,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> Self {
        let bridge_cfg = BridgeConfig::from_app_config(cfg);
        let model_name = bridge_cfg.model().to_string();
        Self {
            backend: Arc::new(GeminiBridge::new(bridge_cfg)),
            model_name,
        }
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}
