//! Grouping prompt context: design purpose, spatial summary and node listing.

use crate::figma::FigmaNodeData;
use crate::llm::ModelRequest;
use crate::spatial::{mentions, tokenize, SpatialAnalysis, VerticalBand};
use crate::types::ComponentDescriptor;

/// Design-purpose categories in declaration order; ties resolve to the earlier one.
pub const PURPOSE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "payment",
        &[
            "payment", "pay", "card", "checkout", "billing", "total", "visa", "mastercard",
            "paypal",
        ],
    ),
    (
        "navigation",
        &["nav", "menu", "tab", "home", "back", "header", "breadcrumb"],
    ),
    (
        "form",
        &["input", "field", "email", "password", "form", "submit", "username"],
    ),
    (
        "modal",
        &["modal", "dialog", "popup", "close", "overlay", "cancel"],
    ),
    (
        "ecommerce",
        &["cart", "product", "price", "shop", "buy", "order", "item"],
    ),
];

pub const GENERAL_PURPOSE: &str = "general";

const MAX_TEXT_PREVIEW: usize = 60;

pub const SYSTEM_PROMPT: &str = "You are a senior UI engineer. You group low-level design nodes \
into logical UI components and answer with a single JSON object only.";

/// Highest-scoring purpose category, `general` when nothing matches.
pub fn infer_design_purpose(descriptors: &[ComponentDescriptor]) -> &'static str {
    let texts: Vec<Vec<String>> = descriptors
        .iter()
        .map(|d| tokenize(&d.search_text()))
        .collect();
    let mut best: Option<(&'static str, usize)> = None;
    for (category, keywords) in PURPOSE_CATEGORIES {
        let score: usize = texts
            .iter()
            .map(|tokens| keywords.iter().filter(|k| mentions(tokens, k)).count())
            .sum();
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((*category, score));
        }
    }
    best.map(|(category, _)| category).unwrap_or(GENERAL_PURPOSE)
}

/// Everything the grouping model is told about the screen.
#[derive(Debug, Clone)]
pub struct GroupingContext {
    pub screen_name: String,
    pub purpose: &'static str,
    pub total_nodes: usize,
    pub band_counts: Vec<(VerticalBand, usize)>,
    pub row_count: usize,
    pub column_count: usize,
    pub cluster_count: usize,
    pub cluster_threshold_px: f32,
    pub interaction_count: usize,
    pub node_listing: Vec<String>,
}

impl GroupingContext {
    pub fn build(
        tree: &FigmaNodeData,
        descriptors: &[ComponentDescriptor],
        spatial: &SpatialAnalysis,
        max_listed_nodes: usize,
    ) -> Self {
        let screen_name = descriptors
            .first()
            .map(|d| d.name.clone())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| tree.name.clone());

        let mut node_listing: Vec<String> = descriptors
            .iter()
            .take(max_listed_nodes)
            .map(|d| describe_node(d, spatial))
            .collect();
        if descriptors.len() > max_listed_nodes {
            node_listing.push(format!(
                "... {} more",
                descriptors.len() - max_listed_nodes
            ));
        }

        Self {
            screen_name,
            purpose: infer_design_purpose(descriptors),
            total_nodes: descriptors.len(),
            band_counts: [VerticalBand::Top, VerticalBand::Middle, VerticalBand::Bottom]
                .into_iter()
                .map(|band| (band, spatial.band_count(band)))
                .collect(),
            row_count: spatial.rows.len(),
            column_count: spatial.columns.len(),
            cluster_count: spatial.clusters.len(),
            cluster_threshold_px: spatial.cluster_threshold_px,
            interaction_count: spatial.interaction_candidates.len(),
            node_listing,
        }
    }

    pub fn to_prompt(&self) -> String {
        let bands = self
            .band_counts
            .iter()
            .map(|(band, count)| format!("{}: {}", band.as_str(), count))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"Screen: "{screen}"
Inferred purpose: {purpose}
Total nodes: {total}
Components per vertical band: {bands}
Aligned rows: {rows}, aligned columns: {columns}
Spatial clusters ({threshold:.0}px): {clusters}
Interaction candidates: {interactions}

Nodes (id | type | name | text | bounds | band):
{listing}

Group these nodes into logical UI components. Every node id may appear in at most one group.
Respond in JSON:
{{
  "layoutStructure": {{ "screenType": "...", "mainSections": ["header", "content", "footer"], "userFlow": "..." }},
  "groups": [
    {{
      "id": "group-1",
      "name": "Human readable name",
      "type": "button|text|card|navigation|input|list|image|container|other",
      "description": "What this component is",
      "bounds": {{ "x": 0, "y": 0, "width": 0, "height": 0 }},
      "children": ["node ids"],
      "properties": {{ "interactive": true, "text": "...", "section": "top|middle|bottom", "priority": 1 }},
      "confidence": 0.0 to 1.0
    }}
  ],
  "confidence": 0.0 to 1.0
}}"#,
            screen = self.screen_name,
            purpose = self.purpose,
            total = self.total_nodes,
            bands = bands,
            rows = self.row_count,
            columns = self.column_count,
            clusters = self.cluster_count,
            threshold = self.cluster_threshold_px,
            interactions = self.interaction_count,
            listing = self.node_listing.join("\n"),
        )
    }

    pub fn to_request(&self, max_tokens: u32) -> ModelRequest {
        ModelRequest::new(self.to_prompt())
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(max_tokens)
    }
}

fn describe_node(d: &ComponentDescriptor, spatial: &SpatialAnalysis) -> String {
    let text = d
        .characters()
        .map(|t| {
            let preview: String = t.chars().take(MAX_TEXT_PREVIEW).collect();
            format!("\"{}\"", preview.replace('\n', " "))
        })
        .unwrap_or_else(|| "-".to_string());
    let band = spatial
        .band_of(&d.id)
        .map(|b| b.as_str())
        .unwrap_or("-");
    format!(
        "- {} | {} | \"{}\" | {} | ({:.0},{:.0}) {:.0}x{:.0} | {}",
        d.id, d.kind, d.name, text, d.bounds.x, d.bounds.y, d.bounds.width, d.bounds.height, band
    )
}
