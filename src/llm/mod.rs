//! External reasoning-model boundary.
//!
//! Stages that consult a model go through [`ReasoningModel`], so tests and
//! offline runs can swap in stubs. Every call returns `Result<String, ModelError>`;
//! callers route any error to their deterministic fallback.

pub mod openai;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use openai::{ModelConfig, OpenAiClient};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed (status: {status:?}): {message}")]
    Transport { status: Option<u16>, message: String },
    #[error("model response could not be parsed: {0}")]
    Parse(String),
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
}

impl ModelError {
    pub fn transport(message: impl Into<String>) -> Self {
        ModelError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Short label for suggestions and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            ModelError::Transport { status: Some(_), .. } => "model returned an error status",
            ModelError::Transport { status: None, .. } => "model request failed",
            ModelError::Parse(_) => "model response was not valid JSON",
            ModelError::Timeout(_) => "model call timed out",
        }
    }
}

/// Image reference attached to a vision request: a remote URL or a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub image: Option<ImagePayload>,
    pub max_tokens: u32,
}

impl ModelRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            image: None,
            max_tokens: 4096,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A text (optionally vision) completion endpoint returning raw response text.
#[async_trait]
pub trait ReasoningModel: Send + Sync {
    async fn complete(&self, request: ModelRequest) -> Result<String, ModelError>;

    fn name(&self) -> &str {
        "model"
    }
}

/// Await a model future, turning an elapsed deadline into [`ModelError::Timeout`].
pub async fn call_with_timeout<F>(limit: Duration, call: F) -> Result<String, ModelError>
where
    F: Future<Output = Result<String, ModelError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ModelError::Timeout(limit)),
    }
}

/// Strip an optional markdown code fence (```json ... ```) around a payload.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") up to the first newline
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse a model response as JSON, tolerating code fences and leading prose.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, ModelError> {
    let body = strip_code_fence(raw);
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            // fall back to the outermost {...} span
            let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
                return Err(ModelError::Parse(first_err.to_string()));
            };
            if end <= start {
                return Err(ModelError::Parse(first_err.to_string()));
            }
            serde_json::from_str(&body[start..=end]).map_err(|e| ModelError::Parse(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(raw), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn parses_fenced_and_prose_wrapped_json() {
        let fenced: Value = parse_model_json("```\n{\"groups\": []}\n```").expect("fenced");
        assert!(fenced["groups"].is_array());

        let prose: Value =
            parse_model_json("Here you go: {\"confidence\": 0.8} hope it helps").expect("prose");
        assert_eq!(prose["confidence"], 0.8);
    }

    #[test]
    fn parse_failure_is_reported_as_parse_error() {
        let result: Result<Value, _> = parse_model_json("I cannot help with that");
        assert!(matches!(result, Err(ModelError::Parse(_))));
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let result = call_with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".to_string())
        })
        .await;
        assert!(matches!(result, Err(ModelError::Timeout(_))));
    }
}
