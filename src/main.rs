use std::sync::Arc;

use log::warn;
use pitwall::{build_app, config::AppConfig, run_server, AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = AppConfig::from_env();
    if cfg.api_key.is_empty() {
        warn!("no model credential configured; flow requests will fail until GEMINI_API_KEY is set");
    }

    let app = build_app(Arc::new(AppState::from_config(&cfg)));
    run_server(app, cfg.port).await
}
