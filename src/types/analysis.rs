//! Visual validation and style mapping output types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::core::{Bounds, ResultSource, SemanticType};

/// Target UI-library component name plus props chosen during validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetMapping {
    pub component_name: String,
    #[serde(default)]
    pub props: BTreeMap<String, Value>,
}

/// A semantic group confirmed (or derived) against the rendered screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: SemanticType,
    pub name: String,
    pub description: String,
    pub bounds: Bounds,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    pub target_mapping: TargetMapping,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_group_id: Option<String>,
    /// First member descriptor of the originating group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_node_id: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

impl ValidatedComponent {
    pub fn property_bool(&self, key: &str) -> Option<bool> {
        self.properties.get(key).and_then(Value::as_bool)
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub structure: String,
    pub responsive: bool,
    pub spacing_units: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaletteSummary {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypographySummary {
    pub font_family: String,
    pub sizes: Vec<f32>,
    pub weights: Vec<f32>,
}

/// Screen-level design system summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DesignSystemSummary {
    pub colors: PaletteSummary,
    pub typography: TypographySummary,
    pub spacing: Vec<f32>,
    pub border_radius: Vec<f32>,
}

/// Terminal artifact of grouping + validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub components: Vec<ValidatedComponent>,
    pub layout: LayoutSummary,
    pub design_system: DesignSystemSummary,
    pub confidence: f32,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub source: ResultSource,
    pub processing_time_ms: u64,
}

/// Final style-mapper output, one per validated component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MappedComponent {
    pub id: String,
    pub name: String,
    pub target_component: String,
    #[serde(default)]
    pub props: BTreeMap<String, Value>,
    pub style_attributes: StyleAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// True when `content` was guessed from the name rather than read from the design
    #[serde(default)]
    pub content_inferred: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_node_id: Option<String>,
}

/// CSS-like style attributes for the target component.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyleAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub box_shadow: Vec<String>,
}
