//! Lenient schema for the grouping model's JSON and its resolution against descriptors.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::{
    clamp_confidence, Bounds, ComponentDescriptor, GroupProperties, LayoutStructure, SemanticType,
};

use super::repair::AvailablePool;

/// Confidence assumed when the model omits one.
pub const DEFAULT_MODEL_CONFIDENCE: f32 = 0.7;

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawGroupingResponse {
    pub layout_structure: Option<RawLayoutStructure>,
    pub groups: Vec<RawGroup>,
    pub confidence: Option<Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLayoutStructure {
    pub screen_type: Option<String>,
    pub main_sections: Vec<String>,
    pub user_flow: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RawGroup {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub group_type: Option<String>,
    pub description: Option<String>,
    pub bounds: Option<RawBounds>,
    #[serde(alias = "nodeIds", alias = "members")]
    pub children: Vec<Value>,
    pub properties: Option<Map<String, Value>>,
    pub confidence: Option<Value>,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
#[serde(default)]
pub struct RawBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A group after id resolution, before repair and bounds computation.
#[derive(Debug, Clone)]
pub struct DraftGroup {
    pub id: String,
    pub name: String,
    pub group_type: SemanticType,
    pub description: String,
    /// Bounds as declared by the model, only used for proximity repair
    pub declared_bounds: Option<Bounds>,
    pub children: Vec<String>,
    pub properties: GroupProperties,
    pub confidence: f32,
}

/// Confidence from a loosely typed JSON value: missing -> 0.7, then clamped.
pub fn confidence_from_value(value: Option<&Value>) -> f32 {
    let raw = match value {
        None | Some(Value::Null) => return DEFAULT_MODEL_CONFIDENCE,
        Some(Value::Number(n)) => n.as_f64().map(|v| v as f32).unwrap_or(f32::NAN),
        Some(Value::String(s)) => s.trim().parse::<f32>().unwrap_or(f32::NAN),
        Some(_) => f32::NAN,
    };
    clamp_confidence(raw)
}

fn child_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj.get("id").and_then(child_id),
        _ => None,
    }
}

pub fn layout_from_raw(raw: Option<RawLayoutStructure>) -> Option<LayoutStructure> {
    raw.map(|l| LayoutStructure {
        screen_type: l.screen_type.unwrap_or_else(|| "unknown".to_string()),
        main_sections: l.main_sections,
        user_flow: l.user_flow.unwrap_or_default(),
    })
}

/// Resolve model groups against the descriptor list.
///
/// Unknown child ids are dropped, a descriptor claimed by an earlier group is
/// dropped from later ones, and missing or duplicate group ids become `group-<n>`.
/// Returns the drafts plus the pool of descriptors no group claimed.
pub fn resolve_groups(
    raw_groups: Vec<RawGroup>,
    descriptors: &[ComponentDescriptor],
) -> (Vec<DraftGroup>, AvailablePool) {
    let known: HashSet<&str> = descriptors.iter().map(|d| d.id.as_str()).collect();
    let mut claimed: HashSet<String> = HashSet::new();
    let mut used_ids: HashMap<String, usize> = HashMap::new();
    let mut drafts = Vec::with_capacity(raw_groups.len());

    for (index, raw) in raw_groups.into_iter().enumerate() {
        let id = match raw.id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            Some(id) if !used_ids.contains_key(&id) => id,
            _ => generated_id(index + 1, &used_ids),
        };
        used_ids.insert(id.clone(), index);

        let mut children = Vec::new();
        for child in raw.children.iter().filter_map(child_id) {
            if known.contains(child.as_str()) && claimed.insert(child.clone()) {
                children.push(child);
            }
        }

        let declared_bounds = raw
            .bounds
            .map(|b| Bounds::new(b.x, b.y, b.width, b.height))
            .filter(|b| {
                [b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite())
                    && (b.width > 0.0 || b.height > 0.0)
            });

        drafts.push(DraftGroup {
            name: raw
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| id.clone()),
            id,
            group_type: raw
                .group_type
                .as_deref()
                .map(SemanticType::parse_lenient)
                .unwrap_or(SemanticType::Other),
            description: raw.description.unwrap_or_default(),
            declared_bounds,
            children,
            properties: raw
                .properties
                .as_ref()
                .map(GroupProperties::from_json_map)
                .unwrap_or_default(),
            confidence: confidence_from_value(raw.confidence.as_ref()),
        });
    }

    let pool = AvailablePool::from_unclaimed(descriptors, &claimed);
    (drafts, pool)
}

fn generated_id(n: usize, used: &HashMap<String, usize>) -> String {
    let mut candidate = n;
    loop {
        let id = format!("group-{}", candidate);
        if !used.contains_key(&id) {
            return id;
        }
        candidate += 1;
    }
}
