//! Design-token mining over every traversed node.

use crate::figma::{FigmaBoundingBox, FigmaNodeData};
use crate::types::DesignTokenSet;

use super::styling::gradient_to_css;

/// Gaps at or beyond this are treated as section breaks, not spacing.
const MAX_SIBLING_GAP: f32 = 100.0;

/// Accumulates tokens while the extractor walks the tree.
#[derive(Debug, Default)]
pub struct TokenMiner {
    tokens: DesignTokenSet,
}

impl TokenMiner {
    /// Record colors, gradients, typography and explicit spacing of one node.
    pub fn observe(&mut self, node: &FigmaNodeData) {
        for paint in node.fills.iter().filter(|p| p.is_visible()) {
            if paint.paint_type.eq_ignore_ascii_case("SOLID") {
                if let Some(color) = paint.color {
                    self.tokens.colors.insert(color.to_hex());
                }
            } else if let Some(css) = gradient_to_css(paint) {
                self.tokens.gradients.insert(css);
            }
        }
        for paint in node.strokes.iter().filter(|p| p.is_visible()) {
            if paint.paint_type.eq_ignore_ascii_case("SOLID") {
                if let Some(color) = paint.color {
                    self.tokens.colors.insert(color.to_hex());
                }
            }
        }

        if node.node_type.eq_ignore_ascii_case("TEXT") {
            if let Some(style) = &node.style {
                if let Some(family) = style.font_family.as_ref().filter(|f| !f.trim().is_empty()) {
                    self.tokens.font_families.insert(family.clone());
                }
                if let Some(weight) = style.font_weight {
                    self.tokens.add_font_weight(weight);
                }
                if let Some(size) = style.font_size {
                    self.tokens.add_font_size(size);
                }
            }
        }

        let explicit = [
            node.padding_top,
            node.padding_right,
            node.padding_bottom,
            node.padding_left,
            node.item_spacing,
        ];
        for value in explicit.into_iter().flatten() {
            if value > 0.0 {
                self.tokens.add_spacing(value);
            }
        }
    }

    /// Infer spacing from gaps between consecutive children of `parent`.
    pub fn observe_sibling_gaps(&mut self, parent: &FigmaNodeData) {
        let layout_mode = parent.layout_mode.as_deref();
        for pair in parent.children.windows(2) {
            let (Some(prev), Some(next)) = (
                pair[0].absolute_bounding_box,
                pair[1].absolute_bounding_box,
            ) else {
                continue;
            };
            if let Some(gap) = sibling_gap(&prev, &next, layout_mode) {
                self.tokens.add_spacing(gap);
            }
        }
    }

    pub fn finish(self) -> DesignTokenSet {
        self.tokens
    }
}

/// Gap between two consecutive siblings along the parent's layout axis.
///
/// Without a layout mode the vertical gap is tried first, then the horizontal one.
/// Only gaps in `(0, 100)` after rounding to one decimal are accepted.
pub fn sibling_gap(
    prev: &FigmaBoundingBox,
    next: &FigmaBoundingBox,
    layout_mode: Option<&str>,
) -> Option<f32> {
    let horizontal = next.x - (prev.x + prev.width);
    let vertical = next.y - (prev.y + prev.height);

    let candidates = match layout_mode.map(|m| m.to_ascii_uppercase()).as_deref() {
        Some("HORIZONTAL") => [Some(horizontal), None],
        Some("VERTICAL") => [Some(vertical), None],
        _ => [Some(vertical), Some(horizontal)],
    };

    candidates
        .into_iter()
        .flatten()
        .map(|gap| (gap * 10.0).round() / 10.0)
        .find(|gap| gap.is_finite() && *gap > 0.0 && *gap < MAX_SIBLING_GAP)
}
