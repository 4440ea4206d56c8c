//! Semantic grouping: cluster low-level descriptors into logical UI components.
//!
//! One reasoning-model call per run, validated and repaired; any failure on the
//! way falls back to [`fallback::heuristic_grouping`]. Grouping never fails.

pub mod context;
pub mod fallback;
pub mod repair;
pub mod response;


use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{GroupingSettings, SpatialSettings};
use crate::figma::FigmaNodeData;
use crate::llm::{call_with_timeout, parse_model_json, ModelError, ReasoningModel};
use crate::spatial::SpatialAnalysis;
use crate::types::{
    Bounds, ComponentDescriptor, GroupingResult, ResultSource, SemanticGroup,
};

use context::GroupingContext;
use repair::{repair_groups, RepairContext};
use response::{confidence_from_value, layout_from_raw, resolve_groups, RawGroupingResponse};

/// Per-run progress, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingState {
    BuildingContext,
    AwaitingModel,
    ParsingOk,
    ParsingFailed,
    Repairing,
    Done,
}

fn transition(state: &mut GroupingState, next: GroupingState) {
    debug!(from = ?*state, to = ?next, "grouping state");
    *state = next;
}

pub struct GroupingEngine {
    model: Option<Arc<dyn ReasoningModel>>,
    timeout: Duration,
    max_tokens: u32,
    settings: GroupingSettings,
    spatial: SpatialSettings,
}

impl GroupingEngine {
    pub fn new(model: Option<Arc<dyn ReasoningModel>>) -> Self {
        Self {
            model,
            timeout: Duration::from_secs(60),
            max_tokens: 4096,
            settings: GroupingSettings::default(),
            spatial: SpatialSettings::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_settings(mut self, settings: GroupingSettings, spatial: SpatialSettings) -> Self {
        self.settings = settings;
        self.spatial = spatial;
        self
    }

    /// Group descriptors into semantic components.
    pub async fn group(
        &self,
        tree: &FigmaNodeData,
        descriptors: &[ComponentDescriptor],
    ) -> GroupingResult {
        let spatial = SpatialAnalysis::analyze(descriptors, &self.spatial);
        self.group_with_spatial(tree, descriptors, &spatial).await
    }

    /// Same as [`GroupingEngine::group`], reusing a spatial analysis the caller already has.
    pub async fn group_with_spatial(
        &self,
        tree: &FigmaNodeData,
        descriptors: &[ComponentDescriptor],
        spatial: &SpatialAnalysis,
    ) -> GroupingResult {
        let started = Instant::now();
        let mut state = GroupingState::BuildingContext;
        debug!(nodes = descriptors.len(), "grouping started");

        let context =
            GroupingContext::build(tree, descriptors, spatial, self.settings.max_listed_nodes);

        transition(&mut state, GroupingState::AwaitingModel);
        let outcome = match &self.model {
            None => Err(ModelError::transport("no reasoning model configured")),
            Some(model) => {
                let request = context.to_request(self.max_tokens);
                call_with_timeout(self.timeout, model.complete(request))
                    .await
                    .and_then(|raw| parse_model_json::<RawGroupingResponse>(&raw))
            }
        };

        let result = match outcome.and_then(|raw| {
            transition(&mut state, GroupingState::ParsingOk);
            self.assemble(raw, descriptors, spatial, &mut state, started)
        }) {
            Ok(result) => result,
            Err(err) => {
                transition(&mut state, GroupingState::ParsingFailed);
                warn!(reason = err.reason(), error = %err, "grouping falling back to heuristics");
                fallback::heuristic_grouping(
                    descriptors,
                    spatial,
                    self.settings.fallback_group_limit,
                    elapsed_ms(started),
                )
            }
        };

        transition(&mut state, GroupingState::Done);
        info!(
            groups = result.groups.len(),
            grouped = result.grouped_nodes,
            ungrouped = result.ungrouped_nodes.len(),
            confidence = result.confidence,
            source = ?result.source,
            "grouping finished"
        );
        result
    }

    fn assemble(
        &self,
        raw: RawGroupingResponse,
        descriptors: &[ComponentDescriptor],
        spatial: &SpatialAnalysis,
        state: &mut GroupingState,
        started: Instant,
    ) -> Result<GroupingResult, ModelError> {
        let confidence = confidence_from_value(raw.confidence.as_ref());
        let layout_structure = layout_from_raw(raw.layout_structure);
        let (drafts, pool) = resolve_groups(raw.groups, descriptors);

        transition(state, GroupingState::Repairing);
        let repair_ctx = RepairContext::new(descriptors, spatial, self.settings.repair_radius_px);
        let (drafts, _pool) = repair_groups(drafts, pool, &repair_ctx);

        if drafts.is_empty() && !descriptors.is_empty() {
            return Err(ModelError::Parse(
                "model response contained no usable groups".to_string(),
            ));
        }

        let groups: Vec<SemanticGroup> = drafts
            .into_iter()
            .filter_map(|draft| {
                let bounds = Bounds::union_all(
                    descriptors
                        .iter()
                        .filter(|d| draft.children.contains(&d.id))
                        .map(|d| &d.bounds),
                )?;
                Some(SemanticGroup {
                    id: draft.id,
                    name: draft.name,
                    group_type: draft.group_type,
                    description: draft.description,
                    bounds,
                    children: draft.children,
                    properties: draft.properties,
                    confidence: draft.confidence,
                })
            })
            .collect();

        let grouped: HashSet<&str> = groups
            .iter()
            .flat_map(|g| g.children.iter().map(String::as_str))
            .collect();
        let ungrouped_nodes: Vec<ComponentDescriptor> = descriptors
            .iter()
            .filter(|d| !grouped.contains(d.id.as_str()))
            .cloned()
            .collect();

        Ok(GroupingResult {
            layout_structure,
            total_nodes: descriptors.len(),
            grouped_nodes: descriptors.len() - ungrouped_nodes.len(),
            ungrouped_nodes,
            groups,
            confidence,
            processing_time_ms: elapsed_ms(started),
            source: ResultSource::Model,
        })
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u64::MAX as u128) as u64
}
