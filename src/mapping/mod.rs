//! Style mapping: validated components to target-library components with styles.
//!
//! Pure and deterministic. Each component's `sourceNodeId` descriptor supplies
//! its styling; text styling comes from the first text member when the source
//! node is not text.

pub mod rules;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::spatial::tokenize;
use crate::types::{
    fmt_px, ComponentDescriptor, DesignTokenSet, MappedComponent, NodeKind, StyleAttributes,
    ValidatedComponent,
};
use crate::validation::defaults::DEFAULT_PRIMARY;

use rules::{select_target, TargetInput, TargetKind};

const PRIMARY_ACTION_WORDS: &[&str] = &[
    "primary", "confirm", "pay", "submit", "continue", "checkout", "buy", "place", "next",
];
const LARGE_BUTTON_HEIGHT: f32 = 60.0;
const INFERRED_TOTAL: &str = "$0.00";

/// Font size thresholds for typography variants, largest first.
const TYPOGRAPHY_VARIANTS: &[(f32, &str)] = &[
    (34.0, "h4"),
    (24.0, "h5"),
    (20.0, "h6"),
    (16.0, "body1"),
    (14.0, "body2"),
];

#[derive(Debug, Clone, Default)]
pub struct StyleMapper {
    /// Content overrides keyed by component id or source node id
    content_overrides: HashMap<String, String>,
}

impl StyleMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.content_overrides = overrides;
        self
    }

    pub fn map(
        &self,
        components: &[ValidatedComponent],
        descriptors: &[ComponentDescriptor],
        tokens: &DesignTokenSet,
        asset_urls: &HashMap<String, String>,
    ) -> Vec<MappedComponent> {
        let by_id: HashMap<&str, &ComponentDescriptor> =
            descriptors.iter().map(|d| (d.id.as_str(), d)).collect();

        let mapped: Vec<MappedComponent> = components
            .iter()
            .map(|component| self.map_one(component, &by_id, tokens, asset_urls))
            .collect();
        debug!(components = mapped.len(), "style mapping finished");
        mapped
    }

    fn map_one(
        &self,
        component: &ValidatedComponent,
        by_id: &HashMap<&str, &ComponentDescriptor>,
        tokens: &DesignTokenSet,
        asset_urls: &HashMap<String, String>,
    ) -> MappedComponent {
        let node = component
            .source_node_id
            .as_deref()
            .and_then(|id| by_id.get(id).copied());
        let members: Vec<&ComponentDescriptor> = component
            .member_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .collect();
        let text_node = node
            .filter(|n| n.kind == NodeKind::Text)
            .or_else(|| members.iter().copied().find(|m| m.kind == NodeKind::Text));

        let input = TargetInput::new(component, node);
        let target = select_target(&input);

        let mut props = component.target_mapping.props.clone();
        let mut style = style_attributes(component, node, text_node, target, tokens);
        let (content, content_inferred) = self.content_for(component, &members, target);

        match target {
            TargetKind::Button => {
                let wording = format!(
                    "{} {}",
                    component.name,
                    content.as_deref().unwrap_or_default()
                );
                let primary = tokenize(&wording)
                    .iter()
                    .any(|t| PRIMARY_ACTION_WORDS.contains(&t.as_str()));
                props.insert(
                    "variant".into(),
                    Value::from(if primary { "contained" } else { "outlined" }),
                );
                let size = if component.bounds.height > LARGE_BUTTON_HEIGHT {
                    "large"
                } else {
                    "medium"
                };
                props.insert("size".into(), Value::from(size));
            }
            TargetKind::Card if is_selected(component, &input) => {
                props.insert("selected".into(), Value::Bool(true));
                style.border_width = Some("2px".into());
                style.border_style = Some("solid".into());
                style.border_color = Some(
                    tokens
                        .primary_color()
                        .unwrap_or(DEFAULT_PRIMARY)
                        .to_string(),
                );
            }
            TargetKind::Typography => {
                let size = text_node
                    .and_then(|n| n.styling.typography.as_ref())
                    .and_then(|t| t.font_size);
                props.insert("variant".into(), Value::from(typography_variant(size)));
            }
            TargetKind::Image => {
                props.insert("component".into(), Value::from("img"));
            }
            _ => {}
        }

        let image_url = if target == TargetKind::Image || members.iter().any(|m| m.has_image_fill())
        {
            image_url_for(node, &members, asset_urls)
        } else {
            None
        };

        MappedComponent {
            id: component.id.clone(),
            name: component.name.clone(),
            target_component: target.component_name().to_string(),
            props,
            style_attributes: style,
            content,
            content_inferred,
            image_url,
            source_node_id: component.source_node_id.clone(),
        }
    }

    /// Overrides, then literal text, then `properties.text`, then name inference.
    fn content_for(
        &self,
        component: &ValidatedComponent,
        members: &[&ComponentDescriptor],
        target: TargetKind,
    ) -> (Option<String>, bool) {
        let override_value = [Some(component.id.as_str()), component.source_node_id.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|key| self.content_overrides.get(key));
        if let Some(value) = override_value {
            return (Some(value.clone()), false);
        }

        let literal = members
            .iter()
            .filter_map(|m| m.characters())
            .find(|text| !text.trim().is_empty());
        if let Some(text) = literal {
            return (Some(text.to_string()), false);
        }

        if let Some(text) = component.property_str("text").filter(|t| !t.trim().is_empty()) {
            return (Some(text.to_string()), false);
        }

        let name_tokens = tokenize(&component.name);
        if name_tokens.iter().any(|t| t == "total") {
            return (Some(INFERRED_TOTAL.to_string()), true);
        }
        if target == TargetKind::Button {
            let label = title_case(&name_tokens);
            if !label.is_empty() {
                return (Some(label), true);
            }
        }
        (None, false)
    }
}

fn is_selected(component: &ValidatedComponent, input: &TargetInput<'_>) -> bool {
    input.name_has(&["selected", "active"]) || component.property_bool("selected") == Some(true)
}

fn typography_variant(font_size: Option<f32>) -> &'static str {
    let Some(size) = font_size else {
        return "body1";
    };
    TYPOGRAPHY_VARIANTS
        .iter()
        .find(|(min, _)| size >= *min)
        .map(|(_, variant)| *variant)
        .unwrap_or("caption")
}

fn title_case(tokens: &[String]) -> String {
    tokens
        .iter()
        .filter(|t| t.as_str() != "button" && t.as_str() != "btn")
        .map(|t| {
            let mut chars = t.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn px(value: f32) -> String {
    format!("{}px", fmt_px(value))
}

fn style_attributes(
    component: &ValidatedComponent,
    node: Option<&ComponentDescriptor>,
    text_node: Option<&ComponentDescriptor>,
    target: TargetKind,
    tokens: &DesignTokenSet,
) -> StyleAttributes {
    let mut style = StyleAttributes::default();
    let bounds = component.bounds;
    if target == TargetKind::Button {
        style.min_width = Some(px(bounds.width));
        style.min_height = Some(px(bounds.height));
    } else {
        style.width = Some(px(bounds.width));
        style.height = Some(px(bounds.height));
    }

    if let Some(node) = node {
        let styling = &node.styling;
        if node.kind != NodeKind::Text {
            style.background_color = styling.colors.background.clone();
        }
        style.background_image = styling.colors.gradient.clone();

        if let Some(spacing) = &styling.spacing {
            if spacing.has_padding() {
                let side = |v: Option<f32>| px(v.unwrap_or(0.0));
                style.padding = Some(format!(
                    "{} {} {} {}",
                    side(spacing.padding_top),
                    side(spacing.padding_right),
                    side(spacing.padding_bottom),
                    side(spacing.padding_left)
                ));
            }
            style.gap = spacing.item_spacing.map(px);
        }

        if let Some(borders) = &styling.borders {
            style.border_width = borders.width.map(px);
            if borders.width.is_some() {
                style.border_style = Some("solid".into());
            }
            style.border_color = borders.color.clone();
            style.border_radius = match borders.corner_radii {
                Some(radii) => Some(radii.map(px).join(" ")),
                None => borders.radius.map(px),
            };
        }

        style.box_shadow = styling.shadows.iter().map(|s| s.to_css()).collect();
    }

    if let Some(text) = text_node {
        style.color = text.styling.colors.text.clone();
        if let Some(typography) = &text.styling.typography {
            style.font_family = typography.font_family.clone();
            style.font_size = typography.font_size.map(px);
            style.font_weight = typography.font_weight.map(fmt_px);
            style.line_height = typography.line_height.map(px);
            style.text_align = typography.text_align.clone();
        }
    }
    if target == TargetKind::Typography && style.font_family.is_none() {
        style.font_family = tokens.font_families.first().cloned();
    }

    style
}

/// Asset URL by node id first, then by image reference; source node before other members.
fn image_url_for(
    node: Option<&ComponentDescriptor>,
    members: &[&ComponentDescriptor],
    asset_urls: &HashMap<String, String>,
) -> Option<String> {
    let candidates: Vec<&ComponentDescriptor> = node
        .into_iter()
        .chain(members.iter().copied())
        .collect();
    candidates
        .iter()
        .find_map(|d| asset_urls.get(&d.id))
        .or_else(|| {
            candidates
                .iter()
                .find_map(|d| d.styling.image_refs.first().and_then(|r| asset_urls.get(r)))
        })
        .cloned()
}
