//! Geometric and text heuristics over a descriptor list.
//!
//! Every function here is pure and deterministic: the same descriptors in the
//! same order always produce the same output.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::SpatialSettings;
use crate::types::{Bounds, ComponentDescriptor, NodeKind};

/// Keywords that mark a node as a likely interaction target.
pub const INTERACTION_KEYWORDS: &[&str] = &["button", "pay", "confirm", "back"];

const MIN_INTERACTIVE_TEXT_HEIGHT: f32 = 20.0;
const MIN_INTERACTIVE_WIDTH: f32 = 50.0;
const MIN_INTERACTIVE_HEIGHT: f32 = 30.0;
const MAX_HEADER_CHARS: usize = 30;
const HEADER_FONT_SIZE: f32 = 20.0;
const HEADER_TOP_FRACTION: f32 = 0.15;

/// Role of a text node within its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Interactive,
    Value,
    Header,
    Body,
}

/// Ordered classification rules; the first matching predicate wins.
pub const TEXT_RULES: &[(fn(&ComponentDescriptor, &Bounds) -> bool, TextRole)] = &[
    (text_is_interactive, TextRole::Interactive),
    (text_is_value, TextRole::Value),
    (text_is_header, TextRole::Header),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalBand {
    Top,
    Middle,
    Bottom,
}

impl VerticalBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalBand::Top => "top",
            VerticalBand::Middle => "middle",
            VerticalBand::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Shared top edge
    Row,
    /// Shared left edge
    Column,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpatialCluster {
    pub members: Vec<String>,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    /// `round(coordinate / tolerance)`
    pub key: i64,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerticalSection {
    pub members: Vec<String>,
    pub bounds: Bounds,
}

pub fn type_distribution(descriptors: &[ComponentDescriptor]) -> BTreeMap<NodeKind, usize> {
    let mut counts = BTreeMap::new();
    for d in descriptors {
        *counts.entry(d.kind).or_insert(0) += 1;
    }
    counts
}

/// Direct parent -> children nesting by geometric containment.
///
/// A descriptor's parent is the smallest other descriptor whose bounds fully
/// contain it. Identical bounds nest in input order.
pub fn find_containment(descriptors: &[ComponentDescriptor]) -> BTreeMap<String, Vec<String>> {
    let mut nesting: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (i, child) in descriptors.iter().enumerate() {
        let child_area = child.bounds.area();
        let parent = descriptors
            .iter()
            .enumerate()
            .filter(|(j, candidate)| {
                *j != i && candidate.bounds.contains(&child.bounds) && {
                    let area = candidate.bounds.area();
                    area > child_area || (area == child_area && *j < i)
                }
            })
            // smallest area; on ties the later (closer) candidate
            .min_by(|(ja, a), (jb, b)| {
                a.bounds
                    .area()
                    .total_cmp(&b.bounds.area())
                    .then_with(|| jb.cmp(ja))
            })
            .map(|(_, p)| p);

        if let Some(parent) = parent {
            nesting
                .entry(parent.id.clone())
                .or_default()
                .push(child.id.clone());
        }
    }
    nesting
}

/// Connected components of the "centers within `threshold` px" graph.
///
/// Every descriptor lands in exactly one cluster; clusters are ordered by the
/// input index of their first member.
pub fn find_spatial_clusters(
    descriptors: &[ComponentDescriptor],
    threshold: f32,
) -> Vec<SpatialCluster> {
    let n = descriptors.len();
    let mut parent: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = vec![0; n];

    fn find(parent: &mut [usize], i: usize) -> usize {
        if parent[i] != i {
            parent[i] = find(parent, parent[i]);
        }
        parent[i]
    }

    fn union(parent: &mut [usize], rank: &mut [usize], i: usize, j: usize) {
        let pi = find(parent, i);
        let pj = find(parent, j);
        if pi == pj {
            return;
        }
        if rank[pi] < rank[pj] {
            parent[pi] = pj;
        } else if rank[pi] > rank[pj] {
            parent[pj] = pi;
        } else {
            parent[pj] = pi;
            rank[pi] += 1;
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if descriptors[i].bounds.center_distance(&descriptors[j].bounds) <= threshold {
                union(&mut parent, &mut rank, i, j);
            }
        }
    }

    // root -> position in output, assigned on first sighting to keep input order
    let mut slot_of_root: BTreeMap<usize, usize> = BTreeMap::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            members.push(Vec::new());
            members.len() - 1
        });
        members[slot].push(i);
    }

    members
        .into_iter()
        .filter_map(|idxs| {
            let bounds = Bounds::union_all(idxs.iter().map(|&i| &descriptors[i].bounds))?;
            Some(SpatialCluster {
                members: idxs.iter().map(|&i| descriptors[i].id.clone()).collect(),
                bounds,
            })
        })
        .collect()
}

/// Rows (shared top edge) or columns (shared left edge) within `tolerance` px.
pub fn find_axis_alignments(
    descriptors: &[ComponentDescriptor],
    axis: Axis,
    tolerance: f32,
) -> Vec<Alignment> {
    let mut buckets: BTreeMap<i64, Vec<&ComponentDescriptor>> = BTreeMap::new();
    for d in descriptors {
        let coord = match axis {
            Axis::Row => d.bounds.y,
            Axis::Column => d.bounds.x,
        };
        let key = (coord / tolerance).round() as i64;
        buckets.entry(key).or_default().push(d);
    }

    buckets
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(key, mut members)| {
            members.sort_by(|a, b| match axis {
                Axis::Row => a.bounds.x.total_cmp(&b.bounds.x),
                Axis::Column => a.bounds.y.total_cmp(&b.bounds.y),
            });
            Alignment {
                key,
                members: members.into_iter().map(|d| d.id.clone()).collect(),
            }
        })
        .collect()
}

/// Lowercased words of `text`; a camel-case hump starts a new word
/// (`"PayButton"` gives `pay`, `button`).
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut after_lower = false;
    for c in text.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            after_lower = false;
            continue;
        }
        if c.is_uppercase() && after_lower {
            tokens.push(std::mem::take(&mut current));
        }
        after_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn word_matches(token: &str, keyword: &str) -> bool {
    token == keyword
        || token
            .strip_prefix(keyword)
            .is_some_and(|rest| rest == "s" || rest == "es")
}

/// Whole-word keyword match over `tokens`. A plural `s`/`es` suffix is accepted
/// and a multi-word keyword must appear as consecutive words, so `"back"` never
/// matches `"background"`.
pub fn mentions(tokens: &[String], keyword: &str) -> bool {
    let words: Vec<&str> = keyword.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }
    tokens
        .windows(words.len())
        .any(|window| window.iter().zip(&words).all(|(t, k)| word_matches(t, k)))
}

pub fn mentions_any(tokens: &[String], keywords: &[&str]) -> bool {
    keywords.iter().any(|k| mentions(tokens, k))
}

pub fn has_interaction_keyword(descriptor: &ComponentDescriptor) -> bool {
    mentions_any(&tokenize(&descriptor.search_text()), INTERACTION_KEYWORDS)
}

pub fn is_interaction_candidate(descriptor: &ComponentDescriptor) -> bool {
    if has_interaction_keyword(descriptor) {
        return true;
    }
    match descriptor.kind {
        NodeKind::Text => descriptor.bounds.height > MIN_INTERACTIVE_TEXT_HEIGHT,
        kind if kind.is_rectangle_like() => {
            descriptor.bounds.width >= MIN_INTERACTIVE_WIDTH
                && descriptor.bounds.height >= MIN_INTERACTIVE_HEIGHT
        }
        _ => false,
    }
}

/// Ids of likely interaction targets, in input order.
pub fn find_interaction_candidates(descriptors: &[ComponentDescriptor]) -> Vec<String> {
    descriptors
        .iter()
        .filter(|d| is_interaction_candidate(d))
        .map(|d| d.id.clone())
        .collect()
}

fn value_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\s*[$€£¥₹\d]").ok())
        .as_ref()
}

/// Leading currency symbol or digit (`"$96"`, `"12 items"`).
pub fn looks_like_value(text: &str) -> bool {
    value_pattern().is_some_and(|re| re.is_match(text))
}

fn display_text(descriptor: &ComponentDescriptor) -> &str {
    descriptor.characters().unwrap_or(&descriptor.name)
}

fn text_is_interactive(descriptor: &ComponentDescriptor, _frame: &Bounds) -> bool {
    has_interaction_keyword(descriptor)
}

fn text_is_value(descriptor: &ComponentDescriptor, _frame: &Bounds) -> bool {
    looks_like_value(display_text(descriptor))
}

fn text_is_header(descriptor: &ComponentDescriptor, frame: &Bounds) -> bool {
    let text = display_text(descriptor).trim();
    if text.chars().count() > MAX_HEADER_CHARS {
        return false;
    }
    let all_caps = text.chars().any(|c| c.is_alphabetic()) && !text.chars().any(|c| c.is_lowercase());
    let large = descriptor
        .styling
        .typography
        .as_ref()
        .and_then(|t| t.font_size)
        .is_some_and(|size| size >= HEADER_FONT_SIZE);
    let near_top = descriptor.bounds.y <= frame.y + frame.height * HEADER_TOP_FRACTION;
    all_caps || large || near_top
}

pub fn classify_text(descriptor: &ComponentDescriptor, frame: &Bounds) -> TextRole {
    TEXT_RULES
        .iter()
        .find(|(predicate, _)| predicate(descriptor, frame))
        .map(|(_, role)| *role)
        .unwrap_or(TextRole::Body)
}

pub fn overall_bounds(descriptors: &[ComponentDescriptor]) -> Option<Bounds> {
    Bounds::union_all(descriptors.iter().map(|d| &d.bounds))
}

/// Band of a rectangle's center within the thirds of `overall`.
pub fn band_for(bounds: &Bounds, overall: &Bounds) -> VerticalBand {
    if overall.height <= 0.0 {
        return VerticalBand::Top;
    }
    let (_, cy) = bounds.center();
    let third = overall.height / 3.0;
    if cy < overall.y + third {
        VerticalBand::Top
    } else if cy < overall.y + 2.0 * third {
        VerticalBand::Middle
    } else {
        VerticalBand::Bottom
    }
}

pub fn section_by_vertical_band(
    descriptors: &[ComponentDescriptor],
) -> BTreeMap<VerticalBand, Vec<String>> {
    let mut bands: BTreeMap<VerticalBand, Vec<String>> = BTreeMap::new();
    let Some(overall) = overall_bounds(descriptors) else {
        return bands;
    };
    for d in descriptors {
        bands
            .entry(band_for(&d.bounds, &overall))
            .or_default()
            .push(d.id.clone());
    }
    bands
}

/// Split into vertical sections separated by gaps larger than `gap` px.
pub fn merge_vertical_sections(
    descriptors: &[ComponentDescriptor],
    gap: f32,
) -> Vec<VerticalSection> {
    let mut sorted: Vec<&ComponentDescriptor> = descriptors.iter().collect();
    sorted.sort_by(|a, b| a.bounds.y.total_cmp(&b.bounds.y));

    let mut sections: Vec<VerticalSection> = Vec::new();
    for d in sorted {
        match sections.last_mut() {
            Some(current) if d.bounds.y <= current.bounds.bottom() + gap => {
                current.members.push(d.id.clone());
                current.bounds = current.bounds.union(&d.bounds);
            }
            _ => sections.push(VerticalSection {
                members: vec![d.id.clone()],
                bounds: d.bounds,
            }),
        }
    }
    sections
}

/// Bundle of every spatial signal, used for the grouping context and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpatialAnalysis {
    pub type_distribution: BTreeMap<NodeKind, usize>,
    pub containment: BTreeMap<String, Vec<String>>,
    pub clusters: Vec<SpatialCluster>,
    pub rows: Vec<Alignment>,
    pub columns: Vec<Alignment>,
    pub interaction_candidates: Vec<String>,
    pub bands: BTreeMap<VerticalBand, Vec<String>>,
    pub sections: Vec<VerticalSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_bounds: Option<Bounds>,
    pub cluster_threshold_px: f32,
}

impl SpatialAnalysis {
    pub fn analyze(descriptors: &[ComponentDescriptor], settings: &SpatialSettings) -> Self {
        Self {
            type_distribution: type_distribution(descriptors),
            containment: find_containment(descriptors),
            clusters: find_spatial_clusters(descriptors, settings.cluster_threshold_px),
            rows: find_axis_alignments(descriptors, Axis::Row, settings.alignment_tolerance_px),
            columns: find_axis_alignments(
                descriptors,
                Axis::Column,
                settings.alignment_tolerance_px,
            ),
            interaction_candidates: find_interaction_candidates(descriptors),
            bands: section_by_vertical_band(descriptors),
            sections: merge_vertical_sections(descriptors, settings.section_gap_px),
            overall_bounds: overall_bounds(descriptors),
            cluster_threshold_px: settings.cluster_threshold_px,
        }
    }

    pub fn band_of(&self, id: &str) -> Option<VerticalBand> {
        self.bands
            .iter()
            .find(|(_, ids)| ids.iter().any(|m| m == id))
            .map(|(band, _)| *band)
    }

    pub fn band_count(&self, band: VerticalBand) -> usize {
        self.bands.get(&band).map(Vec::len).unwrap_or(0)
    }

    pub fn is_interaction_candidate(&self, id: &str) -> bool {
        self.interaction_candidates.iter().any(|c| c == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawProperties, Styling, Typography};

    fn descriptor(id: &str, kind: NodeKind, x: f32, y: f32, w: f32, h: f32) -> ComponentDescriptor {
        ComponentDescriptor {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            bounds: Bounds::new(x, y, w, h),
            styling: Styling::default(),
            raw_properties: RawProperties {
                source_type: kind.as_str().to_ascii_uppercase(),
                visible: true,
                ..Default::default()
            },
        }
    }

    fn text(id: &str, chars: &str, x: f32, y: f32, font_size: Option<f32>) -> ComponentDescriptor {
        let mut d = descriptor(id, NodeKind::Text, x, y, 80.0, 16.0);
        d.name = "Label".into();
        d.raw_properties.characters = Some(chars.to_string());
        d.styling.typography = Some(Typography {
            font_size,
            ..Default::default()
        });
        d
    }

    #[test]
    fn clusters_by_center_distance() {
        let ds = vec![
            descriptor("a", NodeKind::Rectangle, 10.0, 10.0, 0.0, 0.0),
            descriptor("b", NodeKind::Rectangle, 20.0, 15.0, 0.0, 0.0),
            descriptor("c", NodeKind::Rectangle, 500.0, 500.0, 0.0, 0.0),
        ];
        let clusters = find_spatial_clusters(&ds, 100.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec!["a", "b"]);
        assert_eq!(clusters[1].members, vec!["c"]);
    }

    #[test]
    fn clusters_are_transitive_and_ordered_by_first_member() {
        let ds = vec![
            descriptor("far", NodeKind::Rectangle, 1000.0, 0.0, 0.0, 0.0),
            descriptor("a", NodeKind::Rectangle, 0.0, 0.0, 0.0, 0.0),
            descriptor("b", NodeKind::Rectangle, 90.0, 0.0, 0.0, 0.0),
            descriptor("c", NodeKind::Rectangle, 180.0, 0.0, 0.0, 0.0),
        ];
        let clusters = find_spatial_clusters(&ds, 100.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec!["far"]);
        assert_eq!(clusters[1].members, vec!["a", "b", "c"]);
    }

    #[test]
    fn vertical_sections_split_on_large_gaps() {
        let ds = vec![
            descriptor("a", NodeKind::Rectangle, 0.0, 0.0, 100.0, 10.0),
            descriptor("b", NodeKind::Rectangle, 0.0, 20.0, 100.0, 10.0),
            descriptor("c", NodeKind::Rectangle, 0.0, 40.0, 100.0, 10.0),
            descriptor("d", NodeKind::Rectangle, 0.0, 300.0, 100.0, 10.0),
        ];
        let sections = merge_vertical_sections(&ds, 50.0);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].members, vec!["a", "b", "c"]);
        assert_eq!(sections[1].members, vec!["d"]);
    }

    #[test]
    fn containment_picks_smallest_enclosing_parent() {
        let ds = vec![
            descriptor("screen", NodeKind::Frame, 0.0, 0.0, 400.0, 800.0),
            descriptor("card", NodeKind::Frame, 10.0, 10.0, 200.0, 100.0),
            descriptor("label", NodeKind::Text, 20.0, 20.0, 50.0, 10.0),
            descriptor("footer", NodeKind::Frame, 0.0, 700.0, 400.0, 100.0),
        ];
        let nesting = find_containment(&ds);
        assert_eq!(nesting["screen"], vec!["card", "footer"]);
        assert_eq!(nesting["card"], vec!["label"]);
        assert!(!nesting.contains_key("label"));
    }

    #[test]
    fn identical_bounds_nest_in_input_order() {
        let ds = vec![
            descriptor("outer", NodeKind::Frame, 0.0, 0.0, 100.0, 100.0),
            descriptor("inner", NodeKind::Group, 0.0, 0.0, 100.0, 100.0),
        ];
        let nesting = find_containment(&ds);
        assert_eq!(nesting.len(), 1);
        assert_eq!(nesting["outer"], vec!["inner"]);
    }

    #[test]
    fn row_alignment_buckets_by_tolerance() {
        let ds = vec![
            descriptor("right", NodeKind::Rectangle, 200.0, 101.0, 10.0, 10.0),
            descriptor("left", NodeKind::Rectangle, 10.0, 99.0, 10.0, 10.0),
            descriptor("alone", NodeKind::Rectangle, 10.0, 400.0, 10.0, 10.0),
        ];
        let rows = find_axis_alignments(&ds, Axis::Row, 10.0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, 10);
        assert_eq!(rows[0].members, vec!["left", "right"]);
    }

    #[test]
    fn interaction_candidates_use_keywords_and_size() {
        let mut pay = descriptor("pay", NodeKind::Ellipse, 0.0, 0.0, 5.0, 5.0);
        pay.name = "Pay now".into();
        let ds = vec![
            pay,
            descriptor("big", NodeKind::Rectangle, 0.0, 0.0, 50.0, 30.0),
            descriptor("small", NodeKind::Rectangle, 0.0, 0.0, 49.0, 30.0),
            descriptor("tall-text", NodeKind::Text, 0.0, 0.0, 40.0, 24.0),
            descriptor("dot", NodeKind::Ellipse, 0.0, 0.0, 80.0, 80.0),
        ];
        assert_eq!(find_interaction_candidates(&ds), vec!["pay", "big", "tall-text"]);
    }

    #[test]
    fn keywords_match_whole_words_only() {
        let mut background = descriptor("bg", NodeKind::Ellipse, 0.0, 0.0, 5.0, 5.0);
        background.name = "Background".into();
        let mut back = descriptor("back", NodeKind::Ellipse, 0.0, 0.0, 5.0, 5.0);
        back.name = "BackArrow".into();
        assert!(!has_interaction_keyword(&background));
        assert!(has_interaction_keyword(&back));

        let tokens = tokenize("Order table / PayButtons");
        assert_eq!(tokens, vec!["order", "table", "pay", "buttons"]);
        assert!(!mentions(&tokens, "tab"));
        assert!(mentions(&tokens, "button"));
        assert!(mentions(&tokens, "order table"));
        assert!(!mentions(&tokens, "place order"));
        assert!(!mentions(&tokens, ""));
    }

    #[test]
    fn text_classification_follows_rule_order() {
        let frame = Bounds::new(0.0, 0.0, 375.0, 800.0);
        assert_eq!(
            classify_text(&text("t1", "Confirm order", 0.0, 500.0, None), &frame),
            TextRole::Interactive
        );
        assert_eq!(
            classify_text(&text("t2", "$96.00", 0.0, 10.0, None), &frame),
            TextRole::Value
        );
        assert_eq!(
            classify_text(&text("t3", "ORDER SUMMARY", 0.0, 500.0, None), &frame),
            TextRole::Header
        );
        assert_eq!(
            classify_text(&text("t4", "Shipping", 0.0, 500.0, Some(22.0)), &frame),
            TextRole::Header
        );
        assert_eq!(
            classify_text(&text("t5", "Shipping", 0.0, 100.0, None), &frame),
            TextRole::Header
        );
        assert_eq!(
            classify_text(&text("t6", "Delivered in two days", 0.0, 500.0, Some(14.0)), &frame),
            TextRole::Body
        );
    }

    #[test]
    fn bands_split_overall_bounds_in_thirds() {
        let ds = vec![
            descriptor("top", NodeKind::Rectangle, 0.0, 0.0, 10.0, 10.0),
            descriptor("mid", NodeKind::Rectangle, 0.0, 440.0, 10.0, 10.0),
            descriptor("bottom", NodeKind::Rectangle, 0.0, 890.0, 10.0, 10.0),
        ];
        let bands = section_by_vertical_band(&ds);
        assert_eq!(bands[&VerticalBand::Top], vec!["top"]);
        assert_eq!(bands[&VerticalBand::Middle], vec!["mid"]);
        assert_eq!(bands[&VerticalBand::Bottom], vec!["bottom"]);
    }

    #[test]
    fn analyze_is_deterministic() {
        let ds = vec![
            descriptor("a", NodeKind::Frame, 0.0, 0.0, 375.0, 800.0),
            text("b", "Total", 20.0, 700.0, Some(16.0)),
            descriptor("c", NodeKind::Rectangle, 20.0, 740.0, 335.0, 48.0),
        ];
        let settings = SpatialSettings::default();
        let first = serde_json::to_string(&SpatialAnalysis::analyze(&ds, &settings)).unwrap();
        let second = serde_json::to_string(&SpatialAnalysis::analyze(&ds, &settings)).unwrap();
        assert_eq!(first, second);
        let analysis = SpatialAnalysis::analyze(&ds, &settings);
        assert_eq!(analysis.band_of("c"), Some(VerticalBand::Bottom));
        assert!(analysis.is_interaction_candidate("c"));
    }
}
