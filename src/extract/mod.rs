//! Structural extraction: flatten a design tree into component descriptors
//! and mine design tokens in the same pass.
//!
//! - [`extract`] - Depth-first, pre-order walk producing an [`Extraction`]
//! - [`styling`] - Per-node style resolution (colors, typography, spacing, borders, shadows)
//! - [`tokens`] - Token mining and sibling-gap inference

pub mod styling;
pub mod tokens;


use tracing::debug;

use crate::figma::FigmaNodeData;
use crate::types::{Bounds, ComponentDescriptor, DesignTokenSet, NodeKind, RawProperties};

pub use styling::{gradient_angle, gradient_to_css, resolve_styling};
pub use tokens::{sibling_gap, TokenMiner};

/// Source node types that are traversed but never described.
const TRANSPARENT_TYPES: &[&str] = &["DOCUMENT", "CANVAS", "SLICE"];

/// Source node type to node kind; types not listed here map to `Frame`.
const NODE_KIND_TABLE: &[(&[&str], NodeKind)] = &[
    (&["TEXT"], NodeKind::Text),
    (
        &[
            "RECTANGLE",
            "VECTOR",
            "LINE",
            "STAR",
            "REGULAR_POLYGON",
            "BOOLEAN_OPERATION",
        ],
        NodeKind::Rectangle,
    ),
    (&["ELLIPSE"], NodeKind::Ellipse),
    (&["FRAME", "SECTION"], NodeKind::Frame),
    (&["GROUP"], NodeKind::Group),
    (&["COMPONENT", "COMPONENT_SET"], NodeKind::Component),
    (&["INSTANCE"], NodeKind::Instance),
];

/// Output of structural extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Descriptors in traversal order
    pub descriptors: Vec<ComponentDescriptor>,
    pub tokens: DesignTokenSet,
}

pub fn node_kind_for(source_type: &str) -> NodeKind {
    let upper = source_type.to_ascii_uppercase();
    NODE_KIND_TABLE
        .iter()
        .find(|(types, _)| types.contains(&upper.as_str()))
        .map(|(_, kind)| *kind)
        .unwrap_or(NodeKind::Frame)
}

pub fn is_transparent(node: &FigmaNodeData) -> bool {
    TRANSPARENT_TYPES.contains(&node.node_type.to_ascii_uppercase().as_str())
}

/// Walk the tree and produce descriptors plus the mined token set.
pub fn extract(root: &FigmaNodeData) -> Extraction {
    let mut descriptors = Vec::new();
    let mut miner = TokenMiner::default();
    visit(root, &mut descriptors, &mut miner);

    let tokens = miner.finish();
    debug!(
        descriptors = descriptors.len(),
        colors = tokens.colors.len(),
        gradients = tokens.gradients.len(),
        spacing = tokens.spacing_values.len(),
        "structural extraction finished"
    );
    Extraction {
        descriptors,
        tokens,
    }
}

fn visit(node: &FigmaNodeData, out: &mut Vec<ComponentDescriptor>, miner: &mut TokenMiner) {
    miner.observe(node);
    if !is_transparent(node) {
        if let Some(descriptor) = describe(node) {
            out.push(descriptor);
        }
    }
    miner.observe_sibling_gaps(node);

    for child in &node.children {
        visit(child, out, miner);
    }
}

/// Build the descriptor for a single node, `None` when it has no usable geometry.
pub fn describe(node: &FigmaNodeData) -> Option<ComponentDescriptor> {
    if node.id.trim().is_empty() {
        return None;
    }
    let bbox = node.absolute_bounding_box?;
    let bounds = Bounds::new(bbox.x, bbox.y, bbox.width, bbox.height);
    if ![bounds.x, bounds.y, bounds.width, bounds.height]
        .iter()
        .all(|v| v.is_finite())
    {
        return None;
    }

    let kind = node_kind_for(&node.node_type);
    let component_id = match kind {
        NodeKind::Component | NodeKind::Instance => node.component_id.clone(),
        _ => None,
    };

    Some(ComponentDescriptor {
        id: node.id.clone(),
        name: node.name.clone(),
        kind,
        bounds,
        styling: resolve_styling(node, kind),
        raw_properties: RawProperties {
            source_type: node.node_type.clone(),
            characters: node.characters.clone(),
            component_id,
            visible: node.visible.unwrap_or(true),
        },
    })
}
