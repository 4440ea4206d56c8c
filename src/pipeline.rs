//! End-to-end orchestration: extraction, spatial analysis, grouping, validation, mapping.
//!
//! Stages run sequentially; only unusable input is fatal
//! ([`DcaError::NoExtractableStructure`]). Model failures degrade inside their stage.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{Config, SpatialSettings};
use crate::extract::{extract, Extraction};
use crate::figma::{
    fetch_design, map_figma_error, parse_design_json, DesignDocument, FigmaAuth, FigmaClient,
    FigmaFetchOptions,
};
use crate::grouping::GroupingEngine;
use crate::image_loader::{to_image_payload, ImageInput};
use crate::llm::{ImagePayload, ModelConfig, OpenAiClient, ReasoningModel};
use crate::mapping::StyleMapper;
use crate::resource::DesignSource;
use crate::spatial::SpatialAnalysis;
use crate::types::{AnalysisResult, GroupingResult, MappedComponent};
use crate::{DcaError, Result};

/// Everything one pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub document_name: String,
    pub extraction: Extraction,
    pub spatial: SpatialAnalysis,
    pub grouping: GroupingResult,
    pub analysis: AnalysisResult,
    pub components: Vec<MappedComponent>,
}

pub struct AnalysisPipeline {
    grouping: GroupingEngine,
    validator: crate::validation::VisualValidator,
    mapper: StyleMapper,
    spatial: SpatialSettings,
}

impl AnalysisPipeline {
    pub fn new(
        grouping: GroupingEngine,
        validator: crate::validation::VisualValidator,
        mapper: StyleMapper,
        spatial: SpatialSettings,
    ) -> Self {
        Self {
            grouping,
            validator,
            mapper,
            spatial,
        }
    }

    /// Build the stages from config. `offline` skips model clients entirely.
    pub fn from_config(config: &Config, offline: bool) -> Result<Self> {
        let (text_model, vision_model) = if offline {
            (None, None)
        } else {
            build_models(config)?
        };

        let grouping = GroupingEngine::new(text_model)
            .with_timeout(config.timeouts.grouping)
            .with_max_tokens(config.model.max_tokens)
            .with_settings(config.grouping.clone(), config.spatial);
        let validator = crate::validation::VisualValidator::new(vision_model)
            .with_timeout(config.timeouts.validation)
            .with_max_tokens(config.model.max_tokens);

        Ok(Self::new(grouping, validator, StyleMapper::new(), config.spatial))
    }

    pub fn with_mapper(mut self, mapper: StyleMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub async fn run(
        &self,
        document: &DesignDocument,
        image: Option<&ImagePayload>,
    ) -> Result<PipelineOutput> {
        let extraction = extract_document(document)?;
        let descriptors = &extraction.descriptors;
        let spatial = SpatialAnalysis::analyze(descriptors, &self.spatial);

        let grouping = self
            .grouping
            .group_with_spatial(&document.root, descriptors, &spatial)
            .await;
        let analysis = self.validator.validate(&grouping, descriptors, image).await;
        let components = self.mapper.map(
            &analysis.components,
            descriptors,
            &extraction.tokens,
            &document.asset_urls,
        );

        info!(
            descriptors = descriptors.len(),
            groups = grouping.groups.len(),
            components = components.len(),
            confidence = analysis.confidence,
            "analysis pipeline finished"
        );

        Ok(PipelineOutput {
            document_name: document.name.clone(),
            extraction,
            spatial,
            grouping,
            analysis,
            components,
        })
    }
}

fn build_models(
    config: &Config,
) -> Result<(Option<Arc<dyn ReasoningModel>>, Option<Arc<dyn ReasoningModel>>)> {
    let text = ModelConfig::from_settings(&config.model).ok_or_else(|| {
        DcaError::Config(
            "Model API key missing; set model.api_key in the config file or DCA_MODEL_API_KEY"
                .to_string(),
        )
    })?;
    let vision = ModelConfig::vision_from_settings(&config.model);

    let to_client = |cfg: ModelConfig| -> Result<Arc<dyn ReasoningModel>> {
        let client = OpenAiClient::new(cfg, config.timeouts.http)
            .map_err(|e| DcaError::Unknown(format!("model client setup failed: {e}")))?;
        Ok(Arc::new(client))
    };

    let text_model = to_client(text)?;
    let vision_model = vision.map(to_client).transpose()?;
    Ok((Some(text_model), vision_model))
}

/// Structural extraction; fatal when nothing in the tree can be described.
pub fn extract_document(document: &DesignDocument) -> Result<Extraction> {
    let extraction = extract(&document.root);
    if extraction.descriptors.is_empty() {
        return Err(DcaError::no_structure(format!(
            "no node in '{}' carries usable bounds",
            document.name
        )));
    }
    debug!(
        descriptors = extraction.descriptors.len(),
        colors = extraction.tokens.colors.len(),
        "extraction finished"
    );
    Ok(extraction)
}

/// Load the design tree from Figma or from disk.
pub async fn load_design(
    source: &DesignSource,
    http_timeout: Duration,
    export_render: bool,
) -> Result<DesignDocument> {
    match source {
        DesignSource::File(path) => {
            let bytes = std::fs::read(path)?;
            parse_design_json(&bytes, None)
        }
        DesignSource::Figma(info) => {
            let auth = FigmaAuth::from_env().ok_or_else(|| {
                DcaError::Config(
                    "Figma token missing; set FIGMA_TOKEN or FIGMA_OAUTH_TOKEN".to_string(),
                )
            })?;
            let client =
                FigmaClient::with_timeout(auth, http_timeout).map_err(map_figma_error)?;
            let options = FigmaFetchOptions {
                file_key: info.file_key.clone(),
                node_id: info.node_id.clone(),
                export_render,
                ..Default::default()
            };
            fetch_design(&client, &options).await
        }
    }
}

/// The image sent to validation: an explicit one wins over the exported render.
pub fn resolve_image(
    explicit: Option<&ImageInput>,
    document: &DesignDocument,
) -> Result<Option<ImagePayload>> {
    if let Some(input) = explicit {
        return Ok(Some(to_image_payload(input)?));
    }
    match &document.render_url {
        Some(url) => Ok(Some(ImagePayload { url: url.clone() })),
        None => {
            warn!("no rendered image available; visual validation will fall back");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResultSource;

    fn document(json: serde_json::Value) -> DesignDocument {
        parse_design_json(json.to_string().as_bytes(), None).expect("valid design json")
    }

    fn checkout() -> DesignDocument {
        document(serde_json::json!({
            "id": "1:1",
            "name": "Checkout",
            "type": "FRAME",
            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 375, "height": 812},
            "children": [
                {
                    "id": "1:2", "name": "Title", "type": "TEXT", "characters": "Checkout",
                    "absoluteBoundingBox": {"x": 16, "y": 40, "width": 200, "height": 32},
                    "style": {"fontFamily": "Inter", "fontSize": 24, "fontWeight": 700}
                },
                {
                    "id": "1:3", "name": "Pay button", "type": "RECTANGLE",
                    "absoluteBoundingBox": {"x": 16, "y": 720, "width": 343, "height": 56},
                    "fills": [{"type": "SOLID", "color": {"r": 1.0, "g": 0.50196, "b": 0.0, "a": 1.0}}]
                }
            ]
        }))
    }

    #[tokio::test]
    async fn offline_run_produces_traceable_components() {
        let pipeline =
            AnalysisPipeline::from_config(&Config::default(), true).expect("offline pipeline");
        let output = pipeline.run(&checkout(), None).await.expect("pipeline run");

        assert_eq!(output.extraction.descriptors.len(), 3);
        assert_eq!(output.grouping.source, ResultSource::Heuristic);
        assert!(output.grouping.counts_consistent());
        assert_eq!(output.analysis.source, ResultSource::Heuristic);
        assert_eq!(output.components.len(), output.analysis.components.len());

        // every descriptor is traceable to at most one component
        for descriptor in &output.extraction.descriptors {
            let owners = output
                .analysis
                .components
                .iter()
                .filter(|c| c.member_ids.contains(&descriptor.id))
                .count();
            assert!(owners <= 1);
        }
        let pay = output
            .components
            .iter()
            .find(|c| c.source_node_id.as_deref() == Some("1:3"))
            .expect("pay button mapped");
        assert_eq!(pay.target_component, "Button");
        assert_eq!(pay.style_attributes.background_color.as_deref(), Some("#ff8000"));
    }

    #[tokio::test]
    async fn tree_without_bounds_is_fatal() {
        let pipeline =
            AnalysisPipeline::from_config(&Config::default(), true).expect("offline pipeline");
        let doc = document(serde_json::json!({
            "document": {"id": "0:0", "name": "Doc", "type": "DOCUMENT", "children": [
                {"id": "0:1", "name": "Page", "type": "CANVAS", "children": []}
            ]},
            "name": "Empty file"
        }));
        let err = pipeline.run(&doc, None).await.expect_err("no structure");
        assert!(matches!(err, DcaError::NoExtractableStructure(_)));
    }

    #[test]
    fn explicit_image_wins_over_render() {
        let mut doc = checkout();
        doc.render_url = Some("https://render/screen.png".into());
        let explicit = ImageInput::Url("https://cdn/override.png".into());

        let picked = resolve_image(Some(&explicit), &doc).expect("image");
        assert_eq!(picked.map(|p| p.url).as_deref(), Some("https://cdn/override.png"));
        let fallback = resolve_image(None, &doc).expect("image");
        assert_eq!(fallback.map(|p| p.url).as_deref(), Some("https://render/screen.png"));
    }
}
