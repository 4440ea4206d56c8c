//! Comparison of two pipeline stage outputs (e.g. grouping alone vs grouping + validation).

use serde::{Deserialize, Serialize};

use crate::types::{AnalysisResult, GroupingResult, SemanticType};

pub const MIN_IMPROVEMENT_POINTS: f64 = 5.0;
pub const MIN_TEXT_ELEMENTS: usize = 2;
pub const MIN_INTERACTIVE_ELEMENTS: usize = 3;
pub const MAX_COMBINED_TIME_MS: u64 = 45_000;

/// Component counts per coverage category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub text: usize,
    pub interactive: usize,
    pub structural: usize,
}

impl Coverage {
    fn record(&mut self, semantic_type: SemanticType, interactive_flag: bool) {
        if semantic_type == SemanticType::Text {
            self.text += 1;
        }
        if semantic_type.is_interactive() || interactive_flag {
            self.interactive += 1;
        }
        if matches!(
            semantic_type,
            SemanticType::Card | SemanticType::Container | SemanticType::List
        ) {
            self.structural += 1;
        }
    }
}

/// The comparable shape of one stage's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub component_count: usize,
    pub confidence: f32,
    pub coverage: Coverage,
    pub processing_time_ms: u64,
}

impl From<&GroupingResult> for StageSummary {
    fn from(result: &GroupingResult) -> Self {
        let mut coverage = Coverage::default();
        for group in &result.groups {
            coverage.record(
                group.group_type,
                group.properties.interactive.unwrap_or(false),
            );
        }
        Self {
            component_count: result.groups.len(),
            confidence: result.confidence,
            coverage,
            processing_time_ms: result.processing_time_ms,
        }
    }
}

impl From<&AnalysisResult> for StageSummary {
    fn from(result: &AnalysisResult) -> Self {
        let mut coverage = Coverage::default();
        for component in &result.components {
            coverage.record(
                component.component_type,
                component.property_bool("interactive").unwrap_or(false),
            );
        }
        Self {
            component_count: result.components.len(),
            confidence: result.confidence,
            coverage,
            processing_time_ms: result.processing_time_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Major,
    Moderate,
    Minor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonIssue {
    pub severity: IssueSeverity,
    pub message: String,
}

impl ComparisonIssue {
    fn new(severity: IssueSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub baseline: StageSummary,
    pub candidate: StageSummary,
    /// candidate minus baseline
    pub component_count: i64,
    /// Percentage points, two decimals
    pub confidence_change: f64,
    pub combined_processing_time_ms: u64,
    pub issues: Vec<ComparisonIssue>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn compare(baseline: &StageSummary, candidate: &StageSummary) -> ComparisonReport {
    let component_count = candidate.component_count as i64 - baseline.component_count as i64;
    let confidence_change =
        round2((f64::from(candidate.confidence) - f64::from(baseline.confidence)) * 100.0);
    let combined = baseline
        .processing_time_ms
        .saturating_add(candidate.processing_time_ms);

    let mut issues = Vec::new();
    if confidence_change < 0.0 {
        issues.push(ComparisonIssue::new(
            IssueSeverity::Major,
            format!("Confidence dropped by {:.2} points", -confidence_change),
        ));
    } else if confidence_change < MIN_IMPROVEMENT_POINTS {
        issues.push(ComparisonIssue::new(
            IssueSeverity::Moderate,
            format!(
                "Confidence improved by only {confidence_change:.2} points (< {MIN_IMPROVEMENT_POINTS})"
            ),
        ));
    }
    if candidate.coverage.text < MIN_TEXT_ELEMENTS {
        issues.push(ComparisonIssue::new(
            IssueSeverity::Moderate,
            format!(
                "Only {} text element(s) identified (expected at least {MIN_TEXT_ELEMENTS})",
                candidate.coverage.text
            ),
        ));
    }
    if candidate.coverage.interactive < MIN_INTERACTIVE_ELEMENTS {
        issues.push(ComparisonIssue::new(
            IssueSeverity::Moderate,
            format!(
                "Only {} interactive element(s) identified (expected at least {MIN_INTERACTIVE_ELEMENTS})",
                candidate.coverage.interactive
            ),
        ));
    }
    if combined > MAX_COMBINED_TIME_MS {
        issues.push(ComparisonIssue::new(
            IssueSeverity::Minor,
            format!("Combined processing took {combined}ms (over {MAX_COMBINED_TIME_MS}ms)"),
        ));
    }
    issues.sort_by(|a, b| a.severity.cmp(&b.severity));

    ComparisonReport {
        baseline: baseline.clone(),
        candidate: candidate.clone(),
        component_count,
        confidence_change,
        combined_processing_time_ms: combined,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(count: usize, confidence: f32, coverage: Coverage, ms: u64) -> StageSummary {
        StageSummary {
            component_count: count,
            confidence,
            coverage,
            processing_time_ms: ms,
        }
    }

    #[test]
    fn reports_count_and_confidence_deltas() {
        let baseline = summary(5, 0.7, Coverage::default(), 1_200);
        let candidate = summary(
            8,
            0.85,
            Coverage {
                text: 3,
                interactive: 4,
                structural: 1,
            },
            2_300,
        );
        let report = compare(&baseline, &candidate);
        assert_eq!(report.component_count, 3);
        assert_eq!(report.confidence_change, 15.0);
        assert_eq!(report.combined_processing_time_ms, 3_500);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn flags_regressions_and_thin_coverage() {
        let baseline = summary(6, 0.8, Coverage::default(), 30_000);
        let candidate = summary(4, 0.75, Coverage::default(), 20_000);
        let report = compare(&baseline, &candidate);

        assert_eq!(report.component_count, -2);
        assert_eq!(report.confidence_change, -5.0);
        assert_eq!(report.issues.len(), 4);
        assert_eq!(report.issues[0].severity, IssueSeverity::Major);
        assert!(report.issues[0].message.contains("dropped"));
        assert_eq!(report.issues[3].severity, IssueSeverity::Minor);
        assert!(report.issues[3].message.contains("50000ms"));
    }

    #[test]
    fn small_improvement_is_flagged() {
        let coverage = Coverage {
            text: 2,
            interactive: 3,
            structural: 0,
        };
        let report = compare(&summary(3, 0.6, coverage, 0), &summary(3, 0.62, coverage, 0));
        assert_eq!(report.confidence_change, 2.0);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, IssueSeverity::Moderate);
    }
}
