//! Analysis derived purely from the semantic groups and their member descriptors.

use std::collections::{HashMap, HashSet};

use palette::{convert::FromColorUnclamped, Lab, Srgb};

use crate::types::{
    clamp_confidence, insert_sorted, AnalysisResult, ComponentDescriptor, DesignSystemSummary,
    GroupingResult, NodeKind, PaletteSummary, ResultSource, SemanticGroup, TypographySummary,
};

use super::defaults;
use super::response::component_from_group;

/// Floor for the confidence of a derived analysis.
pub const FALLBACK_MIN_CONFIDENCE: f32 = 0.6;
/// Lab chroma above which a color counts as chromatic.
const CHROMA_THRESHOLD: f32 = 12.0;
const MAX_GAP_PX: f32 = 100.0;

fn hex_to_lab(hex: &str) -> Option<Lab> {
    let digits = hex.trim().strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    let srgb = Srgb::new(
        channel(0)? as f32 / 255.0,
        channel(2)? as f32 / 255.0,
        channel(4)? as f32 / 255.0,
    );
    Some(Lab::from_color_unclamped(srgb))
}

fn chroma(lab: &Lab) -> f32 {
    (lab.a * lab.a + lab.b * lab.b).sqrt()
}

/// Values ordered by descending frequency, ties by first appearance.
fn by_frequency<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    // stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(v, _)| v).collect()
}

fn derive_palette(members: &[&ComponentDescriptor]) -> PaletteSummary {
    let fallback = defaults::default_palette();
    let backgrounds = by_frequency(
        members
            .iter()
            .filter_map(|d| d.styling.colors.background.as_deref()),
    );
    let labs: Vec<(&str, Lab)> = backgrounds
        .iter()
        .filter_map(|hex| hex_to_lab(hex).map(|lab| (*hex, lab)))
        .collect();

    let mut chromatic = labs
        .iter()
        .filter(|(_, lab)| chroma(lab) > CHROMA_THRESHOLD)
        .map(|(hex, _)| hex.to_string());
    let primary = chromatic.next().unwrap_or(fallback.primary);
    let secondary = chromatic.next().unwrap_or(fallback.secondary);

    let background = labs
        .iter()
        .max_by(|a, b| a.1.l.total_cmp(&b.1.l))
        .map(|(hex, _)| hex.to_string())
        .unwrap_or(fallback.background);

    let text = by_frequency(
        members
            .iter()
            .filter_map(|d| d.styling.colors.text.as_deref()),
    )
    .first()
    .map(|s| s.to_string())
    .unwrap_or(fallback.text);

    PaletteSummary {
        primary,
        secondary,
        background,
        text,
    }
}

fn derive_typography(members: &[&ComponentDescriptor]) -> TypographySummary {
    let fallback = defaults::default_typography();
    let styles: Vec<_> = members
        .iter()
        .filter(|d| d.kind == NodeKind::Text)
        .filter_map(|d| d.styling.typography.as_ref())
        .collect();

    let font_family = by_frequency(styles.iter().filter_map(|t| t.font_family.as_deref()))
        .first()
        .map(|s| s.to_string())
        .unwrap_or(fallback.font_family);

    let mut sizes = Vec::new();
    let mut weights = Vec::new();
    for style in &styles {
        if let Some(size) = style.font_size {
            insert_sorted(&mut sizes, size);
        }
        if let Some(weight) = style.font_weight {
            insert_sorted(&mut weights, weight);
        }
    }

    TypographySummary {
        font_family,
        sizes: if sizes.is_empty() { fallback.sizes } else { sizes },
        weights: if weights.is_empty() {
            fallback.weights
        } else {
            weights
        },
    }
}

fn derive_spacing(members: &[&ComponentDescriptor]) -> Vec<f32> {
    let mut sorted: Vec<_> = members.iter().map(|d| d.bounds).collect();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut spacing = Vec::new();
    for pair in sorted.windows(2) {
        let gap = ((pair[1].y - pair[0].bottom()) * 10.0).round() / 10.0;
        if gap > 0.0 && gap < MAX_GAP_PX {
            insert_sorted(&mut spacing, gap);
        }
    }
    if spacing.is_empty() {
        defaults::DEFAULT_SPACING.to_vec()
    } else {
        spacing
    }
}

fn derive_radius(members: &[&ComponentDescriptor]) -> Vec<f32> {
    let mut radii = Vec::new();
    for borders in members.iter().filter_map(|d| d.styling.borders.as_ref()) {
        let corners = borders.corner_radii.unwrap_or_default();
        for value in borders.radius.into_iter().chain(corners) {
            if value > 0.0 {
                insert_sorted(&mut radii, value);
            }
        }
    }
    if radii.is_empty() {
        defaults::DEFAULT_BORDER_RADIUS.to_vec()
    } else {
        radii
    }
}

pub fn derive_design_system(
    groups: &[&SemanticGroup],
    descriptors: &[ComponentDescriptor],
) -> DesignSystemSummary {
    let member_ids: HashSet<&str> = groups
        .iter()
        .flat_map(|g| g.children.iter().map(String::as_str))
        .collect();
    let members: Vec<&ComponentDescriptor> = descriptors
        .iter()
        .filter(|d| member_ids.contains(d.id.as_str()))
        .collect();

    DesignSystemSummary {
        colors: derive_palette(&members),
        typography: derive_typography(&members),
        spacing: derive_spacing(&members),
        border_radius: derive_radius(&members),
    }
}

/// One component per group, design system derived from member descriptors.
pub fn derive_analysis(
    grouping: &GroupingResult,
    groups: &[&SemanticGroup],
    descriptors: &[ComponentDescriptor],
    reason: &str,
    processing_time_ms: u64,
) -> AnalysisResult {
    let mut suggestions = vec![format!(
        "Visual validation unavailable ({reason}); components were derived from semantic groups"
    )];
    let ungrouped = grouping.ungrouped_nodes.len();
    if ungrouped > 0 {
        suggestions.push(format!(
            "{ungrouped} design node(s) were not assigned to any component"
        ));
    }

    AnalysisResult {
        components: groups.iter().map(|g| component_from_group(g)).collect(),
        layout: defaults::default_layout(),
        design_system: derive_design_system(groups, descriptors),
        confidence: clamp_confidence(grouping.confidence.max(FALLBACK_MIN_CONFIDENCE)),
        suggestions,
        source: ResultSource::Heuristic,
        processing_time_ms,
    }
}
