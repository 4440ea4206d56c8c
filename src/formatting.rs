use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dca_lib::comparison::IssueSeverity;
use dca_lib::output::ErrorOutput;
use dca_lib::types::ResultSource;
use dca_lib::{DcaError, DcaOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &DcaOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the fatal exit code.
pub fn render_error(err: DcaError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::error!(error = %err, "run failed");
    let payload = DcaOutput::Error(ErrorOutput::new(err.to_payload()));

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

fn write_json_output(body: &DcaOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn write_pretty_output(body: &DcaOutput, output: Option<&Path>) -> io::Result<()> {
    let use_human = output.is_none() && std::io::stdout().is_terminal();

    if use_human {
        println!("{}", format_pretty(body, true));
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &DcaOutput, colorize: bool) -> String {
    let mut buf = String::new();
    match body {
        DcaOutput::Analyze(out) => {
            let header = color("[ANALYZE]", "36", colorize);
            let confidence = color(
                &format!("{:.2}", out.confidence),
                confidence_color_code(out.confidence),
                colorize,
            );
            writeln!(buf, "{header} {} component(s), confidence {confidence}", out.components.len()).ok();
            writeln!(buf, "Input: {} ({})", out.input.value, out.input.kind).ok();
            writeln!(
                buf,
                "Grouping: {} group(s), {}/{} node(s) grouped [{}]",
                out.grouping.groups,
                out.grouping.grouped_nodes,
                out.grouping.total_nodes,
                source_label(out.grouping.source)
            )
            .ok();
            writeln!(buf, "Validation: {}", source_label(out.validation_source)).ok();

            if !out.components.is_empty() {
                writeln!(buf, "Components:").ok();
                for component in &out.components {
                    let content = component
                        .content
                        .as_deref()
                        .map(|c| format!(" \"{c}\""))
                        .unwrap_or_default();
                    writeln!(
                        buf,
                        "- {:24} {:12}{}",
                        component.name, component.target_component, content
                    )
                    .ok();
                }
            }

            let palette = &out.design_system.colors;
            writeln!(
                buf,
                "Palette: primary {} / secondary {} / background {} / text {}",
                palette.primary, palette.secondary, palette.background, palette.text
            )
            .ok();
            writeln!(buf, "Font: {}", out.design_system.typography.font_family).ok();

            if !out.suggestions.is_empty() {
                writeln!(buf, "Suggestions:").ok();
                for suggestion in &out.suggestions {
                    writeln!(buf, "- {suggestion}").ok();
                }
            }
        }
        DcaOutput::Extract(out) => {
            let header = color("[EXTRACT]", "34", colorize);
            writeln!(buf, "{header} {} descriptor(s)", out.descriptors.len()).ok();
            writeln!(buf, "Input: {} ({})", out.input.value, out.input.kind).ok();
            writeln!(
                buf,
                "Tokens: {} color(s), {} font(s), {} spacing value(s)",
                out.tokens.colors.len(),
                out.tokens.font_families.len(),
                out.tokens.spacing_values.len()
            )
            .ok();
            writeln!(
                buf,
                "Spatial: {} cluster(s), {} section(s), {} interaction candidate(s)",
                out.spatial.clusters.len(),
                out.spatial.sections.len(),
                out.spatial.interaction_candidates.len()
            )
            .ok();
        }
        DcaOutput::Compare(out) => {
            let report = &out.report;
            let passed = report.issues.is_empty();
            let status = color(
                if passed { "PASS" } else { "REVIEW" },
                if passed { "32" } else { "33" },
                colorize,
            );
            writeln!(buf, "{status} Grouping vs validation").ok();
            writeln!(
                buf,
                "Components: {} -> {} ({:+})",
                report.baseline.component_count,
                report.candidate.component_count,
                report.component_count
            )
            .ok();
            writeln!(buf, "Confidence change: {:+.2} points", report.confidence_change).ok();
            writeln!(
                buf,
                "Coverage: text {}, interactive {}, structural {}",
                report.candidate.coverage.text,
                report.candidate.coverage.interactive,
                report.candidate.coverage.structural
            )
            .ok();
            writeln!(buf, "Combined time: {}ms", report.combined_processing_time_ms).ok();
            if !report.issues.is_empty() {
                writeln!(buf, "Issues:").ok();
                for issue in &report.issues {
                    let code = match issue.severity {
                        IssueSeverity::Major => "31",
                        IssueSeverity::Moderate => "33",
                        IssueSeverity::Minor => "36",
                    };
                    let label = color(&format!("{:?}", issue.severity), code, colorize);
                    writeln!(buf, "- [{label}] {}", issue.message).ok();
                }
            }
        }
        DcaOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            writeln!(buf, "{} {}", header, out.error.message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

fn source_label(source: ResultSource) -> &'static str {
    match source {
        ResultSource::Model => "model",
        ResultSource::Heuristic => "heuristic fallback",
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

fn confidence_color_code(confidence: f32) -> &'static str {
    if confidence >= 0.8 {
        "32" // green
    } else if confidence >= 0.6 {
        "33" // yellow
    } else {
        "31" // red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dca_lib::comparison::{compare, Coverage, StageSummary};
    use dca_lib::error::{ErrorCategory, ErrorPayload};
    use dca_lib::output::{CompareOutput, InputDescriptor, DCA_OUTPUT_VERSION};

    fn input() -> InputDescriptor {
        InputDescriptor {
            kind: "file".into(),
            value: "checkout.json".into(),
            document_name: None,
        }
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(DcaError::Config("boom".to_string()), OutputFormat::Json, None);
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_lists_comparison_issues() {
        let summary = |count, confidence, text| StageSummary {
            component_count: count,
            confidence,
            coverage: Coverage {
                text,
                interactive: 1,
                structural: 0,
            },
            processing_time_ms: 100,
        };
        let output = DcaOutput::Compare(CompareOutput {
            version: DCA_OUTPUT_VERSION.to_string(),
            input: input(),
            report: compare(&summary(4, 0.7, 0), &summary(5, 0.72, 3)),
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("REVIEW Grouping vs validation"));
        assert!(pretty.contains("Components: 4 -> 5 (+1)"));
        assert!(pretty.contains("Confidence change: +2.00 points"));
        assert!(pretty.contains("[Moderate] Only 1 interactive element(s)"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = DcaOutput::Error(ErrorOutput::new(ErrorPayload {
            category: ErrorCategory::Config,
            message: "bad input".to_string(),
            remediation: Some("check flags".to_string()),
        }));

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
