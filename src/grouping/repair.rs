//! Auto-repair of model groups whose children did not resolve.
//!
//! Empty groups are refilled from an owned [`AvailablePool`] by an ordered,
//! name-keyed rule table. A keyed rule that finds nothing (or a name no rule
//! covers) falls through to proximity around the group's declared bounds.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::spatial::{
    looks_like_value, mentions, mentions_any, tokenize, SpatialAnalysis, VerticalBand,
};
use crate::types::{ComponentDescriptor, NodeKind};

use super::response::DraftGroup;

/// Maximum members claimed by proximity repair.
pub const PROXIMITY_CAP: usize = 3;

const NAVIGATION_NAMES: &[&str] = &["nav", "navigation", "header", "menu", "tab", "appbar"];
const ACTION_WORDS: &[&str] = &[
    "button", "pay", "confirm", "submit", "continue", "checkout", "buy", "next", "back", "cta",
    "action", "place order",
];
const PAYMENT_NAMES: &[&str] = &["card", "visa", "mastercard", "paypal", "method", "option"];
const FORM_NAMES: &[&str] = &["input", "field", "email", "password"];
const IMAGE_NAMES: &[&str] = &["image", "logo", "avatar", "icon"];

/// Descriptors not yet claimed by any group, in traversal order.
#[derive(Debug, Clone, Default)]
pub struct AvailablePool {
    ids: Vec<String>,
}

impl AvailablePool {
    pub fn from_unclaimed(descriptors: &[ComponentDescriptor], claimed: &HashSet<String>) -> Self {
        Self {
            ids: descriptors
                .iter()
                .filter(|d| !claimed.contains(&d.id))
                .map(|d| d.id.clone())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Remove the given ids from the pool, returning those that were present.
    pub fn take(&mut self, wanted: &[String]) -> Vec<String> {
        let wanted_set: HashSet<&str> = wanted.iter().map(String::as_str).collect();
        let taken: Vec<String> = wanted
            .iter()
            .filter(|id| self.contains(id))
            .cloned()
            .collect();
        self.ids.retain(|id| !wanted_set.contains(id.as_str()));
        taken
    }
}

/// Read-only lookups a repair rule may consult.
pub struct RepairContext<'a> {
    by_id: HashMap<&'a str, &'a ComponentDescriptor>,
    spatial: &'a SpatialAnalysis,
    radius: f32,
}

impl<'a> RepairContext<'a> {
    pub fn new(
        descriptors: &'a [ComponentDescriptor],
        spatial: &'a SpatialAnalysis,
        radius: f32,
    ) -> Self {
        Self {
            by_id: descriptors.iter().map(|d| (d.id.as_str(), d)).collect(),
            spatial,
            radius,
        }
    }

    fn descriptor(&self, id: &str) -> Option<&'a ComponentDescriptor> {
        self.by_id.get(id).copied()
    }
}

/// One keyed repair rule.
pub struct RepairRule {
    pub label: &'static str,
    /// Matched against the lowercased group name and type
    pub group_keywords: &'static [&'static str],
    pub claims: fn(&ComponentDescriptor, &RepairContext<'_>) -> bool,
    pub cap: usize,
}

pub const REPAIR_RULES: &[RepairRule] = &[
    RepairRule {
        label: "header",
        group_keywords: &["header", "title", "navigation", "nav", "appbar"],
        claims: claims_header,
        cap: 5,
    },
    RepairRule {
        label: "total",
        group_keywords: &["total", "amount", "price", "summary", "balance"],
        claims: claims_total,
        cap: 3,
    },
    RepairRule {
        label: "action",
        group_keywords: &["button", "action", "pay", "confirm", "submit", "cta"],
        claims: claims_action,
        cap: 3,
    },
    RepairRule {
        label: "payment",
        group_keywords: &["payment", "card", "method", "option"],
        claims: claims_payment,
        cap: 6,
    },
    RepairRule {
        label: "form",
        group_keywords: &["form", "input", "field"],
        claims: claims_form,
        cap: 6,
    },
    RepairRule {
        label: "image",
        group_keywords: &["image", "logo", "avatar", "icon"],
        claims: claims_image,
        cap: 3,
    },
];

fn name_has(descriptor: &ComponentDescriptor, words: &[&str]) -> bool {
    mentions_any(&tokenize(&descriptor.name), words)
}

fn claims_header(d: &ComponentDescriptor, ctx: &RepairContext<'_>) -> bool {
    (d.kind == NodeKind::Text && ctx.spatial.band_of(&d.id) == Some(VerticalBand::Top))
        || name_has(d, NAVIGATION_NAMES)
}

fn claims_total(d: &ComponentDescriptor, ctx: &RepairContext<'_>) -> bool {
    if d.kind != NodeKind::Text {
        return false;
    }
    let lower_band = matches!(
        ctx.spatial.band_of(&d.id),
        Some(VerticalBand::Middle | VerticalBand::Bottom)
    );
    let text = d.characters().unwrap_or_default();
    lower_band && (looks_like_value(text) || mentions(&tokenize(text), "total"))
}

fn claims_action(d: &ComponentDescriptor, ctx: &RepairContext<'_>) -> bool {
    ctx.spatial.is_interaction_candidate(&d.id)
        && mentions_any(&tokenize(&d.search_text()), ACTION_WORDS)
}

fn claims_payment(d: &ComponentDescriptor, _ctx: &RepairContext<'_>) -> bool {
    name_has(d, PAYMENT_NAMES)
}

fn claims_form(d: &ComponentDescriptor, _ctx: &RepairContext<'_>) -> bool {
    name_has(d, FORM_NAMES)
}

fn claims_image(d: &ComponentDescriptor, _ctx: &RepairContext<'_>) -> bool {
    d.has_image_fill() || name_has(d, IMAGE_NAMES)
}

/// First keyed rule whose keywords appear in the group's name or type.
pub fn rule_for(group: &DraftGroup) -> Option<&'static RepairRule> {
    let tokens = tokenize(&format!("{} {}", group.name, group.group_type.as_str()));
    REPAIR_RULES
        .iter()
        .find(|rule| mentions_any(&tokens, rule.group_keywords))
}

/// Refill empty groups from the pool and drop any that stay empty.
pub fn repair_groups(
    groups: Vec<DraftGroup>,
    mut pool: AvailablePool,
    ctx: &RepairContext<'_>,
) -> (Vec<DraftGroup>, AvailablePool) {
    let mut repaired = Vec::with_capacity(groups.len());
    for mut group in groups {
        if group.children.is_empty() {
            if let Some(rule) = rule_for(&group) {
                let wanted: Vec<String> = pool
                    .ids()
                    .iter()
                    .filter(|id| {
                        ctx.descriptor(id)
                            .map(|d| (rule.claims)(d, ctx))
                            .unwrap_or(false)
                    })
                    .take(rule.cap)
                    .cloned()
                    .collect();
                group.children = pool.take(&wanted);
                if !group.children.is_empty() {
                    debug!(group = %group.id, rule = rule.label, claimed = group.children.len(), "repaired group");
                }
            }
        }

        if group.children.is_empty() {
            if let Some(bounds) = group.declared_bounds {
                let mut nearby: Vec<(f32, &String)> = pool
                    .ids()
                    .iter()
                    .filter_map(|id| {
                        let d = ctx.descriptor(id)?;
                        let (px, py) = d.bounds.center();
                        let distance = bounds.distance_to_point(px, py);
                        (distance <= ctx.radius).then_some((distance, id))
                    })
                    .collect();
                nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
                let wanted: Vec<String> = nearby
                    .into_iter()
                    .take(PROXIMITY_CAP)
                    .map(|(_, id)| id.clone())
                    .collect();
                group.children = pool.take(&wanted);
                if !group.children.is_empty() {
                    debug!(group = %group.id, claimed = group.children.len(), "repaired group by proximity");
                }
            }
        }

        if group.children.is_empty() {
            debug!(group = %group.id, "dropping group with no resolvable members");
        } else {
            repaired.push(group);
        }
    }
    (repaired, pool)
}
