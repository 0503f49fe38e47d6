use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::time::{timeout, Duration};

use crate::config::AppConfig;

/// One prompt submission: the rendered text plus the JSON shape the reply must take.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub flow: &'static str,
    pub prompt: String,
    pub output_schema: Value,
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("model credential is missing: set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingCredential,
    #[error("model request timed out after {0}ms")]
    Timeout(u64),
    #[error("failed to reach model backend: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model backend produced an empty reply")]
    EmptyReply,
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Returns the raw reply text for `request`.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BridgeError>;
}

pub struct BridgeConfig {
    api_key: String,
    backend_url: String,
    model: String,
    timeout_ms: u64,
}

impl BridgeConfig {
    pub fn new(
        api_key: impl Into<String>,
        backend_url: impl Into<String>,
        model: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            backend_url: backend_url.into(),
            model: model.into(),
            timeout_ms,
        }
    }

    pub fn from_app_config(cfg: &AppConfig) -> Self {
        Self::new(&cfg.api_key, &cfg.backend_url, &cfg.model, cfg.timeout_ms)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.backend_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Hosted Gemini `generateContent` client.
pub struct GeminiBridge {
    cfg: BridgeConfig,
    client: reqwest::Client,
}

impl GeminiBridge {
    pub fn new(cfg: BridgeConfig) -> Self {
        Self {
            cfg,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl CompletionBackend for GeminiBridge {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BridgeError> {
        if self.cfg.api_key.trim().is_empty() {
            return Err(BridgeError::MissingCredential);
        }

        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.output_schema,
            },
        };

        debug!("submitting {} prompt to {}", request.flow, self.cfg.model);
        // The limit covers the whole exchange, body included.
        timeout(
            Duration::from_millis(self.cfg.timeout_ms),
            self.exchange(request.flow, &body),
        )
        .await
        .map_err(|_| BridgeError::Timeout(self.cfg.timeout_ms))?
    }
}

impl GeminiBridge {
    async fn exchange(
        &self,
        flow: &str,
        body: &GenerateContentRequest<'_>,
    ) -> Result<String, BridgeError> {
        let response = self
            .client
            .post(self.cfg.endpoint())
            .header("x-goog-api-key", &self.cfg.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response body>".to_string());
            warn!("{flow} request rejected with {status}");
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateContentResponse = response.json().await?;
        reply_text(reply).ok_or(BridgeError::EmptyReply)
    }
}

fn reply_text(reply: GenerateContentResponse) -> Option<String> {
    let content = reply.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().map(|part| part.text).collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
