use std::env;

pub const DEFAULT_BACKEND_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub api_key: String,
    pub backend_url: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .unwrap_or_default();

        let backend_url =
            env::var("MODEL_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());

        let model = env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_ms = env::var("MODEL_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(20_000);

        Self {
            port,
            api_key,
            backend_url,
            model,
            timeout_ms,
        }
    }
}
