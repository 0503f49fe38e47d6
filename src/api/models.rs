use serde::{Deserialize, Serialize};

use crate::content::BlogPost;
use crate::flows::FieldError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogPostDetail {
    #[serde(flatten)]
    pub post: &'static BlogPost,
    pub paragraphs: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SceneQuery {
    pub seed: Option<u64>,
    pub frames: Option<u32>,
    pub particles: Option<usize>,
    pub deflect: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
}
