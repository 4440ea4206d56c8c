//! Descriptor and design-token types produced by structural extraction.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::core::{Bounds, NodeKind};

/// Flattened representation of one design-tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub bounds: Bounds,
    pub styling: Styling,
    pub raw_properties: RawProperties,
}

impl ComponentDescriptor {
    /// Text content for text nodes.
    pub fn characters(&self) -> Option<&str> {
        self.raw_properties.characters.as_deref()
    }

    /// Lowercased name plus characters, used by keyword heuristics.
    pub fn search_text(&self) -> String {
        match self.characters() {
            Some(text) => format!("{} {}", self.name, text).to_lowercase(),
            None => self.name.to_lowercase(),
        }
    }

    pub fn has_image_fill(&self) -> bool {
        !self.styling.image_refs.is_empty()
    }
}

/// The closed set of source properties kept past the extraction boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawProperties {
    /// Node type string as it appeared in the design file (e.g. `"VECTOR"`)
    pub source_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    /// Definition reference for components and instances
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    pub visible: bool,
}

/// Resolved styling, split into optional per-concern sub-structures.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Styling {
    pub colors: ColorStyling,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borders: Option<Borders>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shadows: Vec<Shadow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_refs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorStyling {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    /// CSS `linear-gradient(...)` string for the first gradient fill
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<f32>,
    pub line_height: Option<f32>,
    pub letter_spacing: Option<f32>,
    pub text_align: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    pub layout_mode: Option<String>,
    pub padding_top: Option<f32>,
    pub padding_right: Option<f32>,
    pub padding_bottom: Option<f32>,
    pub padding_left: Option<f32>,
    pub item_spacing: Option<f32>,
}

impl Spacing {
    pub fn has_padding(&self) -> bool {
        self.padding_top.is_some()
            || self.padding_right.is_some()
            || self.padding_bottom.is_some()
            || self.padding_left.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Borders {
    pub width: Option<f32>,
    pub color: Option<String>,
    pub radius: Option<f32>,
    /// Per-corner radii: top-left, top-right, bottom-right, bottom-left
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radii: Option<[f32; 4]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowKind {
    Drop,
    Inner,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub kind: ShadowKind,
    pub color: String,
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub spread: f32,
}

impl Shadow {
    /// CSS `box-shadow` value.
    pub fn to_css(&self) -> String {
        let inset = match self.kind {
            ShadowKind::Inner => "inset ",
            ShadowKind::Drop => "",
        };
        format!(
            "{inset}{}px {}px {}px {}px {}",
            fmt_px(self.offset_x),
            fmt_px(self.offset_y),
            fmt_px(self.blur),
            fmt_px(self.spread),
            self.color
        )
    }
}

/// Format a pixel value without a trailing `.0` for whole numbers.
pub fn fmt_px(value: f32) -> String {
    if (value - value.round()).abs() < f32::EPSILON {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Canonicalized, de-duplicated design values mined from a whole tree.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokenSet {
    /// Hex colors in discovery order
    pub colors: IndexSet<String>,
    /// CSS gradient strings in discovery order
    pub gradients: IndexSet<String>,
    /// Font families in discovery order
    pub font_families: IndexSet<String>,
    pub font_sizes: Vec<f32>,
    pub font_weights: Vec<f32>,
    pub spacing_values: Vec<f32>,
}

impl DesignTokenSet {
    pub fn add_font_size(&mut self, value: f32) {
        insert_sorted(&mut self.font_sizes, value);
    }

    pub fn add_font_weight(&mut self, value: f32) {
        insert_sorted(&mut self.font_weights, value);
    }

    pub fn add_spacing(&mut self, value: f32) {
        insert_sorted(&mut self.spacing_values, value);
    }

    /// First discovered color, conventionally the dominant brand color.
    pub fn primary_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }
}

/// Insert into an ascending, de-duplicated list; non-finite values are ignored.
pub fn insert_sorted(values: &mut Vec<f32>, value: f32) {
    if !value.is_finite() {
        return;
    }
    match values.binary_search_by(|probe| probe.total_cmp(&value)) {
        Ok(_) => {}
        Err(pos) => values.insert(pos, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_sorted_dedups_and_orders() {
        let mut values = Vec::new();
        for v in [16.0, 8.0, 16.0, 4.0, f32::NAN, 24.0] {
            insert_sorted(&mut values, v);
        }
        assert_eq!(values, vec![4.0, 8.0, 16.0, 24.0]);
    }

    #[test]
    fn shadow_renders_css() {
        let shadow = Shadow {
            kind: ShadowKind::Drop,
            color: "rgba(0, 0, 0, 0.25)".into(),
            offset_x: 0.0,
            offset_y: 4.0,
            blur: 8.5,
            spread: 0.0,
        };
        assert_eq!(shadow.to_css(), "0px 4px 8.5px 0px rgba(0, 0, 0, 0.25)");

        let inner = Shadow {
            kind: ShadowKind::Inner,
            ..shadow
        };
        assert!(inner.to_css().starts_with("inset "));
    }
}
