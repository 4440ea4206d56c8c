//! Semantic grouping result types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::core::{Bounds, ResultSource, SemanticType};
use super::descriptor::ComponentDescriptor;

/// A named, typed cluster of descriptors forming one logical UI component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticGroup {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: SemanticType,
    pub description: String,
    pub bounds: Bounds,
    /// Descriptor ids, never empty once the group is surfaced
    pub children: Vec<String>,
    #[serde(default)]
    pub properties: GroupProperties,
    pub confidence: f32,
}

/// Known group properties plus any extra keys the model attached.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// 1 is the highest priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GroupProperties {
    /// Build from an arbitrary JSON object, pulling out the known keys leniently.
    pub fn from_json_map(map: &serde_json::Map<String, Value>) -> Self {
        let mut props = GroupProperties::default();
        for (key, value) in map {
            match key.as_str() {
                "interactive" => props.interactive = value_as_bool(value),
                "text" => props.text = value.as_str().map(str::to_string),
                "section" => props.section = value.as_str().map(str::to_string),
                "priority" => props.priority = value_as_priority(value),
                _ => {
                    props.extra.insert(key.clone(), value.clone());
                }
            }
        }
        props
    }

    /// Flatten into a JSON map (known keys first, then extras).
    pub fn to_json_map(&self) -> BTreeMap<String, Value> {
        let mut map = self.extra.clone();
        if let Some(interactive) = self.interactive {
            map.insert("interactive".into(), Value::Bool(interactive));
        }
        if let Some(text) = &self.text {
            map.insert("text".into(), Value::String(text.clone()));
        }
        if let Some(section) = &self.section {
            map.insert("section".into(), Value::String(section.clone()));
        }
        if let Some(priority) = self.priority {
            map.insert("priority".into(), Value::from(priority));
        }
        map
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn value_as_priority(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n.as_u64().map(|v| v.min(u8::MAX as u64) as u8),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "high" | "primary" => Some(1),
            "medium" | "secondary" => Some(2),
            "low" | "tertiary" => Some(3),
            other => other.parse().ok(),
        },
        _ => None,
    }
}

/// Coarse screen classification produced alongside the groups.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStructure {
    pub screen_type: String,
    #[serde(default)]
    pub main_sections: Vec<String>,
    #[serde(default)]
    pub user_flow: String,
}

/// Output of the semantic grouping stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_structure: Option<LayoutStructure>,
    pub groups: Vec<SemanticGroup>,
    pub total_nodes: usize,
    pub grouped_nodes: usize,
    pub ungrouped_nodes: Vec<ComponentDescriptor>,
    pub confidence: f32,
    pub processing_time_ms: u64,
    pub source: ResultSource,
}

impl GroupingResult {
    /// The invariant every grouping result must satisfy.
    pub fn counts_consistent(&self) -> bool {
        self.grouped_nodes + self.ungrouped_nodes.len() == self.total_nodes
    }

    pub fn group(&self, id: &str) -> Option<&SemanticGroup> {
        self.groups.iter().find(|g| g.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn properties_extract_known_keys_leniently() {
        let raw = json!({
            "interactive": "yes",
            "priority": "high",
            "section": "footer",
            "variant": "primary"
        });
        let props = GroupProperties::from_json_map(raw.as_object().unwrap());
        assert_eq!(props.interactive, Some(true));
        assert_eq!(props.priority, Some(1));
        assert_eq!(props.section.as_deref(), Some("footer"));
        assert_eq!(props.extra.get("variant"), Some(&json!("primary")));

        let map = props.to_json_map();
        assert_eq!(map.get("interactive"), Some(&json!(true)));
        assert_eq!(map.get("variant"), Some(&json!("primary")));
    }
}
