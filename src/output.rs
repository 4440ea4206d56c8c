use serde::{Deserialize, Serialize};

use crate::comparison::ComparisonReport;
use crate::error::ErrorPayload;
use crate::pipeline::PipelineOutput;
use crate::spatial::SpatialAnalysis;
use crate::types::{
    ComponentDescriptor, DesignSystemSummary, DesignTokenSet, LayoutStructure, LayoutSummary,
    MappedComponent, ResultSource,
};

/// Schema version for output payloads.
pub const DCA_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DcaOutput {
    Analyze(AnalyzeOutput),
    Extract(ExtractOutput),
    Compare(CompareOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    /// `figma` or `file`
    pub kind: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
}

/// Grouping stage in brief; the groups themselves are folded into `components`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingSummary {
    pub groups: usize,
    pub total_nodes: usize,
    pub grouped_nodes: usize,
    pub ungrouped_nodes: usize,
    pub confidence: f32,
    pub source: ResultSource,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_structure: Option<LayoutStructure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOutput {
    pub version: String,
    pub input: InputDescriptor,
    pub components: Vec<MappedComponent>,
    pub design_system: DesignSystemSummary,
    pub layout: LayoutSummary,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub validation_source: ResultSource,
    pub processing_time_ms: u64,
    pub grouping: GroupingSummary,
}

impl AnalyzeOutput {
    pub fn from_pipeline(input: InputDescriptor, output: &PipelineOutput) -> Self {
        let grouping = &output.grouping;
        let analysis = &output.analysis;
        Self {
            version: DCA_OUTPUT_VERSION.to_string(),
            input,
            components: output.components.clone(),
            design_system: analysis.design_system.clone(),
            layout: analysis.layout.clone(),
            confidence: analysis.confidence,
            suggestions: analysis.suggestions.clone(),
            validation_source: analysis.source,
            processing_time_ms: grouping
                .processing_time_ms
                .saturating_add(analysis.processing_time_ms),
            grouping: GroupingSummary {
                groups: grouping.groups.len(),
                total_nodes: grouping.total_nodes,
                grouped_nodes: grouping.grouped_nodes,
                ungrouped_nodes: grouping.ungrouped_nodes.len(),
                confidence: grouping.confidence,
                source: grouping.source,
                processing_time_ms: grouping.processing_time_ms,
                layout_structure: grouping.layout_structure.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOutput {
    pub version: String,
    pub input: InputDescriptor,
    pub descriptors: Vec<ComponentDescriptor>,
    pub tokens: DesignTokenSet,
    pub spatial: SpatialAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOutput {
    pub version: String,
    pub input: InputDescriptor,
    pub report: ComparisonReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    pub error: ErrorPayload,
}

impl ErrorOutput {
    pub fn new(error: ErrorPayload) -> Self {
        Self {
            version: DCA_OUTPUT_VERSION.to_string(),
            error,
        }
    }
}
