//! Deterministic grouping used whenever the model path fails.

use crate::spatial::{SpatialAnalysis, VerticalBand};
use crate::types::{
    ComponentDescriptor, GroupProperties, GroupingResult, LayoutStructure, NodeKind,
    ResultSource, SemanticGroup, SemanticType,
};

use super::context::infer_design_purpose;

pub const FALLBACK_CONFIDENCE: f32 = 0.5;

fn semantic_type_for(kind: NodeKind) -> SemanticType {
    match kind {
        NodeKind::Text => SemanticType::Text,
        NodeKind::Rectangle | NodeKind::Frame | NodeKind::Group => SemanticType::Container,
        _ => SemanticType::Other,
    }
}

/// Wrap each of the first `limit` descriptors in its own group.
pub fn heuristic_grouping(
    descriptors: &[ComponentDescriptor],
    spatial: &SpatialAnalysis,
    limit: usize,
    processing_time_ms: u64,
) -> GroupingResult {
    let groups: Vec<SemanticGroup> = descriptors
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, d)| SemanticGroup {
            id: format!("group-{}", i + 1),
            name: if d.name.trim().is_empty() {
                d.id.clone()
            } else {
                d.name.clone()
            },
            group_type: semantic_type_for(d.kind),
            description: format!("Single {} node", d.kind),
            bounds: d.bounds,
            children: vec![d.id.clone()],
            properties: GroupProperties {
                interactive: Some(spatial.is_interaction_candidate(&d.id)),
                text: d.characters().map(str::to_string),
                section: spatial.band_of(&d.id).map(|b| b.as_str().to_string()),
                ..Default::default()
            },
            confidence: FALLBACK_CONFIDENCE,
        })
        .collect();

    let ungrouped_nodes: Vec<ComponentDescriptor> =
        descriptors.iter().skip(limit).cloned().collect();

    let main_sections = [VerticalBand::Top, VerticalBand::Middle, VerticalBand::Bottom]
        .into_iter()
        .filter(|band| spatial.band_count(*band) > 0)
        .map(|band| band.as_str().to_string())
        .collect();

    GroupingResult {
        layout_structure: Some(LayoutStructure {
            screen_type: infer_design_purpose(descriptors).to_string(),
            main_sections,
            user_flow: String::new(),
        }),
        total_nodes: descriptors.len(),
        grouped_nodes: groups.len(),
        groups,
        ungrouped_nodes,
        confidence: FALLBACK_CONFIDENCE,
        processing_time_ms,
        source: ResultSource::Heuristic,
    }
}
