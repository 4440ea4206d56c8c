//! Figma API response types for parsing JSON from the Figma REST API.
//!
//! Only the fields the extractor understands are declared; everything else in
//! the payload is discarded by serde at this boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Supported image export formats.
#[derive(Debug, Clone, Copy)]
pub enum ImageFormat {
    Png,
    Jpg,
    Svg,
    Pdf,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

/// A Figma file response from the files endpoint.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub document: FigmaNodeData,
}

/// Raw Figma node data from the API.
///
/// Only `id` and `type` are required. Every other field is parsed on its own,
/// so a malformed paint or style drops that value and keeps the node.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FigmaNodeData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub visible: Option<bool>,
    /// Unparseable children are skipped; their own parseable descendants take their place
    #[serde(default, deserialize_with = "deserialize_lenient_children")]
    pub children: Vec<FigmaNodeData>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub absolute_bounding_box: Option<FigmaBoundingBox>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub characters: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub style: Option<FigmaTypeStyle>,
    #[serde(default, deserialize_with = "deserialize_lenient_vec")]
    pub fills: Vec<FigmaPaintData>,
    #[serde(default, deserialize_with = "deserialize_lenient_vec")]
    pub strokes: Vec<FigmaPaintData>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub stroke_weight: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub corner_radius: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub rectangle_corner_radii: Option<[f32; 4]>,
    #[serde(default, deserialize_with = "deserialize_lenient_vec")]
    pub effects: Vec<FigmaEffect>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub layout_mode: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub padding_left: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub padding_right: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub padding_top: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub padding_bottom: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub item_spacing: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_lenient_option")]
    pub component_id: Option<String>,
}

fn deserialize_lenient_children<'de, D>(deserializer: D) -> Result<Vec<FigmaNodeData>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    let mut nodes = Vec::new();
    if let Some(Value::Array(values)) = raw {
        collect_nodes(&values, &mut nodes);
    }
    Ok(nodes)
}

fn collect_nodes(values: &[Value], out: &mut Vec<FigmaNodeData>) {
    for value in values {
        match FigmaNodeData::deserialize(value) {
            Ok(node) => out.push(node),
            Err(_) => {
                if let Some(Value::Array(children)) = value.get("children") {
                    collect_nodes(children, out);
                }
            }
        }
    }
}

/// Keep the elements that parse; a non-array value yields an empty list.
fn deserialize_lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn deserialize_lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Bounding box coordinates from Figma.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaBoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Typography style from Figma.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FigmaTypeStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<f32>,
    pub line_height_px: Option<f32>,
    pub letter_spacing: Option<f32>,
    pub text_align_horizontal: Option<String>,
}

/// Paint/fill data from Figma.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaPaintData {
    #[serde(rename = "type")]
    pub paint_type: String,
    #[serde(default)]
    pub visible: Option<bool>,
    pub color: Option<FigmaColor>,
    pub opacity: Option<f32>,
    pub image_ref: Option<String>,
    #[serde(default)]
    pub gradient_stops: Vec<FigmaColorStop>,
    #[serde(default)]
    pub gradient_handle_positions: Vec<FigmaVector>,
    /// 2x3 affine transform mapping the gradient into node space
    pub gradient_transform: Option<[[f32; 3]; 2]>,
}

impl FigmaPaintData {
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

/// RGBA color from Figma (0.0-1.0 range).
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl FigmaColor {
    /// Convert to hex color string (e.g., "#ff8000"), rounding to the nearest byte.
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b)
        )
    }

    /// CSS `rgba()` string, used where alpha matters (shadows).
    pub fn to_rgba(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
            (self.a.clamp(0.0, 1.0) * 100.0).round() / 100.0
        )
    }
}

fn channel_to_byte(channel: f32) -> u8 {
    if channel.is_nan() {
        return 0;
    }
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaColorStop {
    pub color: FigmaColor,
    pub position: f32,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FigmaVector {
    pub x: f32,
    pub y: f32,
}

/// Visual effect (shadow, blur) attached to a node.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaEffect {
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(default)]
    pub visible: Option<bool>,
    pub color: Option<FigmaColor>,
    pub offset: Option<FigmaVector>,
    #[serde(default)]
    pub radius: f32,
    pub spread: Option<f32>,
}

/// Response from the nodes endpoint.
#[derive(Debug, Deserialize)]
pub struct FigmaNodesResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub nodes: HashMap<String, FigmaNodeWrapper>,
}

/// Wrapper containing the document for a node.
#[derive(Debug, Deserialize)]
pub struct FigmaNodeWrapper {
    pub document: FigmaNodeData,
}

/// Response from the images export endpoint.
#[derive(Debug, Deserialize)]
pub struct FigmaImageExport {
    #[serde(default)]
    pub err: Option<String>,
    pub images: HashMap<String, Option<String>>,
}

/// Response from the image-fills endpoint (`/files/:key/images`).
#[derive(Debug, Deserialize)]
pub struct FigmaImageFills {
    pub meta: FigmaImageFillsMeta,
}

#[derive(Debug, Deserialize)]
pub struct FigmaImageFillsMeta {
    #[serde(default)]
    pub images: HashMap<String, String>,
}
