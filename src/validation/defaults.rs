//! Fixed values used whenever validation output omits a field.

use crate::types::{
    DesignSystemSummary, LayoutSummary, PaletteSummary, SemanticType, TypographySummary,
};

pub const DEFAULT_STRUCTURE: &str = "mixed";
pub const DEFAULT_SPACING_UNIT: f32 = 8.0;

pub const DEFAULT_PRIMARY: &str = "#1976d2";
pub const DEFAULT_SECONDARY: &str = "#dc004e";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_TEXT: &str = "#212121";
pub const DEFAULT_FONT_FAMILY: &str = "Roboto, sans-serif";

pub const DEFAULT_FONT_SIZES: &[f32] = &[12.0, 14.0, 16.0, 20.0, 24.0, 34.0];
pub const DEFAULT_FONT_WEIGHTS: &[f32] = &[400.0, 500.0, 700.0];
pub const DEFAULT_SPACING: &[f32] = &[4.0, 8.0, 16.0, 24.0, 32.0];
pub const DEFAULT_BORDER_RADIUS: &[f32] = &[4.0, 8.0];

/// Semantic type to target-library component name.
pub const TARGET_TABLE: &[(SemanticType, &str)] = &[
    (SemanticType::Button, "Button"),
    (SemanticType::Text, "Typography"),
    (SemanticType::Card, "Card"),
    (SemanticType::Navigation, "AppBar"),
    (SemanticType::Input, "TextField"),
    (SemanticType::List, "List"),
    (SemanticType::Image, "Avatar"),
    (SemanticType::Container, "Box"),
    (SemanticType::Other, "Box"),
];

pub fn default_target(semantic_type: SemanticType) -> &'static str {
    TARGET_TABLE
        .iter()
        .find(|(t, _)| *t == semantic_type)
        .map(|(_, name)| *name)
        .unwrap_or("Box")
}

pub fn default_layout() -> LayoutSummary {
    LayoutSummary {
        structure: DEFAULT_STRUCTURE.to_string(),
        responsive: true,
        spacing_units: DEFAULT_SPACING_UNIT,
    }
}

pub fn default_palette() -> PaletteSummary {
    PaletteSummary {
        primary: DEFAULT_PRIMARY.to_string(),
        secondary: DEFAULT_SECONDARY.to_string(),
        background: DEFAULT_BACKGROUND.to_string(),
        text: DEFAULT_TEXT.to_string(),
    }
}

pub fn default_typography() -> TypographySummary {
    TypographySummary {
        font_family: DEFAULT_FONT_FAMILY.to_string(),
        sizes: DEFAULT_FONT_SIZES.to_vec(),
        weights: DEFAULT_FONT_WEIGHTS.to_vec(),
    }
}

pub fn default_design_system() -> DesignSystemSummary {
    DesignSystemSummary {
        colors: default_palette(),
        typography: default_typography(),
        spacing: DEFAULT_SPACING.to_vec(),
        border_radius: DEFAULT_BORDER_RADIUS.to_vec(),
    }
}
