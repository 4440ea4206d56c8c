//! Figma integration for loading design trees.
//!
//! This module provides:
//! - [`FigmaClient`] - HTTP client for the Figma REST API
//! - [`fetch_design`] - Fetch a file (or a single node) plus its render and image fills
//! - [`parse_design_json`] - Accept a saved API response or a bare node from disk
//! - API types for parsing Figma JSON responses

pub mod api_types;
pub mod client;

#[cfg(test)]
mod tests;

// Re-export primary public API
pub use client::{map_figma_error, FigmaAuth, FigmaClient, FigmaError};

// Re-export API types that may be needed externally
pub use api_types::{
    FigmaBoundingBox, FigmaColor, FigmaColorStop, FigmaEffect, FigmaFile, FigmaImageExport,
    FigmaNodeData, FigmaNodeWrapper, FigmaNodesResponse, FigmaPaintData, FigmaTypeStyle,
    FigmaVector, ImageFormat,
};

use crate::{DcaError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A design tree ready for extraction, plus what the API could tell us about it.
#[derive(Debug, Clone)]
pub struct DesignDocument {
    pub name: String,
    pub root: FigmaNodeData,
    /// Rendered image URL of the analysed screen, when exported
    pub render_url: Option<String>,
    /// Image-fill reference -> download URL
    pub asset_urls: HashMap<String, String>,
}

/// Options for loading a design from the Figma API.
#[derive(Debug, Clone)]
pub struct FigmaFetchOptions {
    pub file_key: String,
    pub node_id: Option<String>,
    /// Export a PNG render of the node for visual validation
    pub export_render: bool,
    pub scale: f32,
}

impl Default for FigmaFetchOptions {
    fn default() -> Self {
        Self {
            file_key: String::new(),
            node_id: None,
            export_render: true,
            scale: 1.0,
        }
    }
}

/// Fetch a design tree from Figma.
///
/// This function:
/// 1. Fetches the node (or whole file) from the Figma API
/// 2. Optionally exports the node as a PNG and records the render URL
/// 3. Resolves image-fill references to asset URLs (best effort)
pub async fn fetch_design(client: &FigmaClient, options: &FigmaFetchOptions) -> Result<DesignDocument> {
    if options.file_key.trim().is_empty() {
        return Err(DcaError::Config(
            "Figma file key is required for export".to_string(),
        ));
    }
    if options.scale <= 0.0 {
        return Err(DcaError::Config(
            "Figma export scale must be greater than zero".to_string(),
        ));
    }

    let (name, root) = match options.node_id.as_deref() {
        Some(node_id) => {
            let response = client
                .get_file_nodes(&options.file_key, &[node_id])
                .await
                .map_err(map_figma_error)?;
            let name = response.name.clone().unwrap_or_default();
            let node = response
                .nodes
                .into_iter()
                .find(|(id, _)| id == node_id)
                .map(|(_, wrapper)| wrapper.document)
                .ok_or_else(|| DcaError::FigmaApi {
                    status: None,
                    message: format!("Node {} not found in Figma response", node_id),
                })?;
            (name, node)
        }
        None => {
            let file = client
                .get_file(&options.file_key)
                .await
                .map_err(map_figma_error)?;
            (file.name, file.document)
        }
    };

    let render_url = match (options.export_render, options.node_id.as_deref()) {
        (true, Some(node_id)) => match client
            .export_image(&options.file_key, node_id, ImageFormat::Png, options.scale)
            .await
        {
            Ok(url) => Some(url),
            Err(err) => {
                warn!(error = %err, "render export failed; visual validation will fall back");
                None
            }
        },
        _ => None,
    };

    let asset_urls = match client.get_image_fills(&options.file_key).await {
        Ok(map) => map,
        Err(err) => {
            warn!(error = %err, "image fill lookup failed; continuing without asset URLs");
            HashMap::new()
        }
    };
    debug!(assets = asset_urls.len(), "resolved image fills");

    Ok(DesignDocument {
        name,
        root,
        render_url,
        asset_urls,
    })
}

/// Parse a design tree saved on disk.
///
/// Accepts a files-endpoint response, a nodes-endpoint response (the first node
/// in id order is used unless `node_id` is given) or a bare node object.
pub fn parse_design_json(bytes: &[u8], node_id: Option<&str>) -> Result<DesignDocument> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| DcaError::NoExtractableStructure(format!("design JSON is unreadable: {e}")))?;

    let (name, root) = if value.get("document").is_some() {
        let file: FigmaFile = serde_json::from_value(value).map_err(|e| {
            DcaError::NoExtractableStructure(format!("file document cannot be traversed: {e}"))
        })?;
        (file.name, file.document)
    } else if value.get("nodes").is_some() {
        let response: FigmaNodesResponse = serde_json::from_value(value).map_err(|e| {
            DcaError::NoExtractableStructure(format!("nodes response cannot be traversed: {e}"))
        })?;
        let mut nodes: Vec<(String, FigmaNodeWrapper)> = response.nodes.into_iter().collect();
        nodes.sort_by(|a, b| a.0.cmp(&b.0));
        let picked = match node_id {
            Some(wanted) => nodes.into_iter().find(|(id, _)| id == wanted),
            None => nodes.into_iter().next(),
        };
        let (_, wrapper) = picked.ok_or_else(|| {
            DcaError::NoExtractableStructure("nodes response contains no usable node".to_string())
        })?;
        (response.name.unwrap_or_default(), wrapper.document)
    } else {
        let node: FigmaNodeData = serde_json::from_value(value).map_err(|e| {
            DcaError::NoExtractableStructure(format!("root node cannot be traversed: {e}"))
        })?;
        (node.name.clone(), node)
    };

    Ok(DesignDocument {
        name,
        root,
        render_url: None,
        asset_urls: HashMap::new(),
    })
}
