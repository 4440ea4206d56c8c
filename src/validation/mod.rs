//! Visual validation: reconcile semantic groups against the rendered screen.
//!
//! One vision-model call per run. Without a model, without an image, or on any
//! model failure the analysis is derived from the groups alone.

pub mod defaults;
pub mod fallback;
pub mod prompt;
pub mod response;


use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::grouping::elapsed_ms;
use crate::llm::{
    call_with_timeout, parse_model_json, ImagePayload, ModelError, ModelRequest, ReasoningModel,
};
use crate::types::{AnalysisResult, ComponentDescriptor, GroupingResult, SemanticGroup};

use response::RawAnalysis;

pub struct VisualValidator {
    model: Option<Arc<dyn ReasoningModel>>,
    timeout: Duration,
    max_tokens: u32,
}

impl VisualValidator {
    pub fn new(model: Option<Arc<dyn ReasoningModel>>) -> Self {
        Self {
            model,
            timeout: Duration::from_secs(60),
            max_tokens: 4096,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub async fn validate(
        &self,
        grouping: &GroupingResult,
        descriptors: &[ComponentDescriptor],
        image: Option<&ImagePayload>,
    ) -> AnalysisResult {
        let started = Instant::now();
        let groups: Vec<&SemanticGroup> = grouping
            .groups
            .iter()
            .filter(|g| !g.children.is_empty())
            .collect();

        let result = match self.request_analysis(grouping, image).await {
            Ok(raw) => {
                debug!(components = raw.components.len(), "validation reply parsed");
                response::reconcile(raw, &groups, elapsed_ms(started))
            }
            Err(err) => {
                warn!(reason = err.reason(), error = %err, "validation falling back to groups");
                fallback::derive_analysis(
                    grouping,
                    &groups,
                    descriptors,
                    &failure_reason(&err),
                    elapsed_ms(started),
                )
            }
        };

        info!(
            components = result.components.len(),
            confidence = result.confidence,
            source = ?result.source,
            "validation finished"
        );
        result
    }

    async fn request_analysis(
        &self,
        grouping: &GroupingResult,
        image: Option<&ImagePayload>,
    ) -> Result<RawAnalysis, ModelError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ModelError::transport("no vision model configured"))?;
        let image = image.ok_or_else(|| ModelError::transport("no rendered image supplied"))?;

        let request = ModelRequest::new(prompt::build_prompt(grouping))
            .with_system(prompt::SYSTEM_PROMPT)
            .with_image(image.clone())
            .with_max_tokens(self.max_tokens);
        debug!(model = model.name(), groups = grouping.groups.len(), "requesting validation");

        let raw = call_with_timeout(self.timeout, model.complete(request)).await?;
        parse_model_json(&raw)
    }
}

/// Human-readable failure cause for the suggestion list.
fn failure_reason(err: &ModelError) -> String {
    match err {
        ModelError::Transport {
            status: None,
            message,
        } => message.clone(),
        ModelError::Transport {
            status: Some(status),
            ..
        } => format!("model returned status {status}"),
        ModelError::Parse(_) => "model response was not valid JSON".to_string(),
        ModelError::Timeout(limit) => format!("model call timed out after {}s", limit.as_secs()),
    }
}
