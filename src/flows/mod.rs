//! Prompt flows: validate an input record, render it into a fixed template,
//! ask the completion backend, and parse the reply into a typed record.

mod prediction;
mod strategy;
mod telemetry;
pub mod template;
pub mod validate;

use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::bridge::{BridgeError, CompletionBackend, CompletionRequest};

pub use prediction::{PredictRaceOutcome, PredictionInput, PredictionOutput};
pub use strategy::{GenerateStartingStrategy, RiskLevel, StrategyInput, StrategyOutput};
pub use telemetry::{SummarizeRaceTelemetry, TelemetryInput, TelemetryOutput};
pub use template::TemplateError;
pub use validate::{FieldError, MIN_FIELD_LEN};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid input: {}", describe(.0))]
    InvalidInput(Vec<FieldError>),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("completion failed: {0}")]
    Backend(#[from] BridgeError),
    #[error("model reply did not match the expected shape: {0}")]
    MalformedReply(String),
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub trait PromptFlow: Send + Sync + 'static {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
    /// Text of the notification shown when the flow fails after validation.
    const FAILURE_MESSAGE: &'static str;

    type Input: DeserializeOwned + Serialize + Clone + Send + Sync;
    type Output: DeserializeOwned + Serialize + Clone + Send + Sync;

    fn validate(input: &Self::Input) -> Result<(), Vec<FieldError>>;

    /// Placeholder values, in template order.
    fn bindings(input: &Self::Input) -> Vec<(&'static str, &str)>;

    /// Shape of the reply, in the backend's schema dialect.
    fn output_schema() -> Value;

    fn default_input() -> Self::Input;
}

/// Renders the prompt for an already validated input.
pub fn render_prompt<F: PromptFlow>(input: &F::Input) -> Result<String, FlowError> {
    Ok(template::render(F::TEMPLATE, &F::bindings(input))?)
}

pub async fn run<F: PromptFlow>(
    backend: &dyn CompletionBackend,
    input: &F::Input,
) -> Result<F::Output, FlowError> {
    F::validate(input).map_err(FlowError::InvalidInput)?;
    let prompt = render_prompt::<F>(input)?;

    info!("running {} ({} prompt bytes)", F::NAME, prompt.len());
    let request = CompletionRequest {
        flow: F::NAME,
        prompt,
        output_schema: F::output_schema(),
    };
    let reply = backend.complete(&request).await?;

    parse_reply::<F::Output>(&reply).map_err(|err| {
        warn!("{} reply rejected: {err}", F::NAME);
        err
    })
}

/// Deserializes the JSON object embedded in a model reply.
pub fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T, FlowError> {
    let json = extract_json(reply)
        .ok_or_else(|| FlowError::MalformedReply("reply contains no JSON object".to_string()))?;
    serde_json::from_str(json).map_err(|e| FlowError::MalformedReply(e.to_string()))
}

fn extract_json(reply: &str) -> Option<&str> {
    let mut text = reply.trim();
    if let Some(fenced) = text.strip_prefix("```") {
        let body = fenced.split_once('\n').map_or("", |(_, body)| body);
        text = body.trim_end().strip_suffix("```").unwrap_or(body).trim();
    }
    if text.starts_with('{') && text.ends_with('}') {
        return Some(text);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

pub(crate) fn string_field(description: &str) -> Value {
    serde_json::json!({ "type": "STRING", "description": description })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::bridge::{BridgeError, CompletionBackend, CompletionRequest};

    /// Backend that replays canned replies and records prompts.
    pub struct ScriptedBackend {
        replies: Mutex<Vec<Result<String, BridgeError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn new(replies: Vec<Result<String, BridgeError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(reply: &str) -> Self {
            Self::new(vec![Ok(reply.to_string())])
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, BridgeError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(BridgeError::EmptyReply))
        }
    }
}
