//! Data model shared by every pipeline stage.
//!
//! - [`core`] - Geometry, node/semantic classifications, confidence bounds
//! - [`descriptor`] - Component descriptors and design tokens
//! - [`grouping`] - Semantic groups and grouping results
//! - [`analysis`] - Validated components, analysis results, mapped components

pub mod analysis;
pub mod core;
pub mod descriptor;
pub mod grouping;

pub use self::analysis::{
    AnalysisResult, DesignSystemSummary, LayoutSummary, MappedComponent, PaletteSummary,
    StyleAttributes, TargetMapping, TypographySummary, ValidatedComponent,
};
pub use self::core::{
    clamp_confidence, Bounds, NodeKind, ResultSource, SemanticType, MAX_CONFIDENCE,
    MIN_CONFIDENCE,
};
pub use self::descriptor::{
    fmt_px, insert_sorted, Borders, ColorStyling, ComponentDescriptor, DesignTokenSet,
    RawProperties, Shadow, ShadowKind, Spacing, Styling, Typography,
};
pub use self::grouping::{GroupProperties, GroupingResult, LayoutStructure, SemanticGroup};
