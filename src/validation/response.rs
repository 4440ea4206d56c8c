//! Lenient schema for the vision model's JSON and its reconciliation with the groups.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::grouping::response::{confidence_from_value, RawBounds};
use crate::types::{
    AnalysisResult, Bounds, DesignSystemSummary, LayoutSummary, PaletteSummary, ResultSource,
    SemanticGroup, SemanticType, TargetMapping, TypographySummary, ValidatedComponent,
};

use super::defaults::{self, default_target};

/// A model box whose center is closer than this to a group's center matches it.
pub const CENTER_MATCH_PX: f32 = 50.0;
/// Model bounds further than this from the group's on any edge are replaced.
pub const BOUNDS_TOLERANCE_PX: f32 = 8.0;

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAnalysis {
    pub components: Vec<RawComponent>,
    pub layout: Option<RawLayout>,
    pub design_system: Option<RawDesignSystem>,
    pub confidence: Option<Value>,
    pub suggestions: Vec<Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawComponent {
    pub id: Option<String>,
    pub source_group_id: Option<String>,
    #[serde(rename = "type")]
    pub component_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub bounds: Option<RawBounds>,
    pub properties: Option<Map<String, Value>>,
    pub target_mapping: Option<RawTargetMapping>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTargetMapping {
    pub component_name: Option<String>,
    pub props: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLayout {
    pub structure: Option<String>,
    pub responsive: Option<bool>,
    pub spacing_units: Option<Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawDesignSystem {
    pub colors: Option<RawPalette>,
    pub typography: Option<RawTypography>,
    pub spacing: Option<Value>,
    pub border_radius: Option<Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RawPalette {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub background: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTypography {
    pub font_family: Option<String>,
    pub sizes: Option<Value>,
    pub weights: Option<Value>,
}

/// Number from a JSON number or a string like `"8px"`.
fn lenient_number(value: &Value) -> Option<f32> {
    let number = match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().trim_end_matches("px").trim().parse().ok(),
        _ => None,
    };
    number.filter(|v: &f32| v.is_finite())
}

fn number_list(value: Option<&Value>) -> Option<Vec<f32>> {
    let items = value?.as_array()?;
    let numbers: Vec<f32> = items.iter().filter_map(lenient_number).collect();
    (!numbers.is_empty()).then_some(numbers)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn layout_with_defaults(raw: Option<RawLayout>) -> LayoutSummary {
    let fallback = defaults::default_layout();
    let Some(raw) = raw else {
        return fallback;
    };
    LayoutSummary {
        structure: non_empty(raw.structure).unwrap_or(fallback.structure),
        responsive: raw.responsive.unwrap_or(fallback.responsive),
        spacing_units: raw
            .spacing_units
            .as_ref()
            .and_then(lenient_number)
            .unwrap_or(fallback.spacing_units),
    }
}

pub fn design_system_with_defaults(raw: Option<RawDesignSystem>) -> DesignSystemSummary {
    let fallback = defaults::default_design_system();
    let Some(raw) = raw else {
        return fallback;
    };
    let colors = match raw.colors {
        Some(c) => PaletteSummary {
            primary: non_empty(c.primary).unwrap_or(fallback.colors.primary),
            secondary: non_empty(c.secondary).unwrap_or(fallback.colors.secondary),
            background: non_empty(c.background).unwrap_or(fallback.colors.background),
            text: non_empty(c.text).unwrap_or(fallback.colors.text),
        },
        None => fallback.colors,
    };
    let typography = match raw.typography {
        Some(t) => TypographySummary {
            font_family: non_empty(t.font_family).unwrap_or(fallback.typography.font_family),
            sizes: number_list(t.sizes.as_ref()).unwrap_or(fallback.typography.sizes),
            weights: number_list(t.weights.as_ref()).unwrap_or(fallback.typography.weights),
        },
        None => fallback.typography,
    };
    DesignSystemSummary {
        colors,
        typography,
        spacing: number_list(raw.spacing.as_ref()).unwrap_or(fallback.spacing),
        border_radius: number_list(raw.border_radius.as_ref()).unwrap_or(fallback.border_radius),
    }
}

/// A component built purely from its group, with the fixed target table.
pub fn component_from_group(group: &SemanticGroup) -> ValidatedComponent {
    ValidatedComponent {
        id: group.id.clone(),
        component_type: group.group_type,
        name: group.name.clone(),
        description: group.description.clone(),
        bounds: group.bounds,
        properties: group.properties.to_json_map(),
        target_mapping: TargetMapping {
            component_name: default_target(group.group_type).to_string(),
            props: BTreeMap::new(),
        },
        source_group_id: Some(group.id.clone()),
        source_node_id: group.children.first().cloned(),
        member_ids: group.children.clone(),
    }
}

fn declared_bounds(raw: &RawComponent) -> Option<Bounds> {
    raw.bounds
        .map(|b| Bounds::new(b.x, b.y, b.width, b.height))
        .filter(|b| [b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite()))
}

fn find_group(
    raw: &RawComponent,
    groups: &[&SemanticGroup],
    matched: &[bool],
) -> Option<usize> {
    let wanted: Vec<&str> = [raw.id.as_deref(), raw.source_group_id.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .collect();
    let by_id = groups
        .iter()
        .enumerate()
        .find(|(i, g)| !matched[*i] && wanted.contains(&g.id.as_str()))
        .map(|(i, _)| i);
    if by_id.is_some() {
        return by_id;
    }

    let bounds = declared_bounds(raw)?;
    groups
        .iter()
        .enumerate()
        .filter(|(i, _)| !matched[*i])
        .map(|(i, g)| (i, g.bounds.center_distance(&bounds)))
        .filter(|(_, distance)| *distance < CENTER_MATCH_PX)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn merge_component(
    raw: RawComponent,
    group: &SemanticGroup,
    used_ids: &HashSet<String>,
) -> ValidatedComponent {
    let bounds = match declared_bounds(&raw) {
        Some(b) if b.max_edge_delta(&group.bounds) <= BOUNDS_TOLERANCE_PX => b,
        _ => group.bounds,
    };

    let mut properties = group.properties.to_json_map();
    if let Some(extra) = raw.properties {
        properties.extend(extra);
    }

    let component_type = raw
        .component_type
        .as_deref()
        .map(SemanticType::parse_lenient)
        .unwrap_or(group.group_type);

    let (component_name, props) = match raw.target_mapping {
        Some(mapping) => (
            non_empty(mapping.component_name),
            mapping.props.map(|p| p.into_iter().collect()).unwrap_or_default(),
        ),
        None => (None, BTreeMap::new()),
    };

    let id = non_empty(raw.id)
        .filter(|id| !used_ids.contains(id))
        .unwrap_or_else(|| group.id.clone());

    ValidatedComponent {
        id,
        component_type,
        name: non_empty(raw.name).unwrap_or_else(|| group.name.clone()),
        description: non_empty(raw.description).unwrap_or_else(|| group.description.clone()),
        bounds,
        properties,
        target_mapping: TargetMapping {
            component_name: component_name
                .unwrap_or_else(|| default_target(component_type).to_string()),
            props,
        },
        source_group_id: Some(group.id.clone()),
        source_node_id: group.children.first().cloned(),
        member_ids: group.children.clone(),
    }
}

/// Turn a parsed model reply into an analysis, reconciling against the groups.
pub fn reconcile(
    raw: RawAnalysis,
    groups: &[&SemanticGroup],
    processing_time_ms: u64,
) -> AnalysisResult {
    let mut matched = vec![false; groups.len()];
    let mut used_ids: HashSet<String> = HashSet::new();
    let mut components = Vec::with_capacity(groups.len());
    let mut dropped = 0usize;

    for component in raw.components {
        match find_group(&component, groups, &matched) {
            Some(index) => {
                matched[index] = true;
                let validated = merge_component(component, groups[index], &used_ids);
                used_ids.insert(validated.id.clone());
                components.push(validated);
            }
            None => dropped += 1,
        }
    }

    let mut carried = 0usize;
    for (index, group) in groups.iter().enumerate() {
        if !matched[index] {
            let mut component = component_from_group(group);
            if used_ids.contains(&component.id) {
                component.id = format!("{}-carried", component.id);
            }
            used_ids.insert(component.id.clone());
            components.push(component);
            carried += 1;
        }
    }

    let mut suggestions: Vec<String> = raw
        .suggestions
        .iter()
        .filter_map(|s| match s {
            Value::String(text) => Some(text.clone()),
            Value::Object(obj) => obj
                .get("message")
                .or_else(|| obj.get("text"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect();
    if dropped > 0 {
        suggestions.push(format!(
            "{dropped} validated component(s) matched no semantic group and were dropped"
        ));
    }
    if carried > 0 {
        suggestions.push(format!(
            "{carried} semantic group(s) were not confirmed visually and were kept as-is"
        ));
    }

    AnalysisResult {
        components,
        layout: layout_with_defaults(raw.layout),
        design_system: design_system_with_defaults(raw.design_system),
        confidence: confidence_from_value(raw.confidence.as_ref()),
        suggestions,
        source: ResultSource::Model,
        processing_time_ms,
    }
}
