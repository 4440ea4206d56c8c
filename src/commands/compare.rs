use std::path::PathBuf;
use std::process::ExitCode;

use dca_lib::output::{CompareOutput, DCA_OUTPUT_VERSION};
use dca_lib::{compare, DcaError, DcaOutput, StageSummary};
use tracing::info;

use crate::cli::{InputArgs, PipelineArgs};
use crate::formatting::{render_error, write_output};

/// Run the compare command: grouping alone is the baseline, validation the candidate.
pub async fn run_compare(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    input: InputArgs,
    pipeline: PipelineArgs,
) -> ExitCode {
    let (descriptor, output) =
        match super::run_pipeline(raw_args, config_path.as_deref(), &input.input, &pipeline).await {
            Ok(run) => run,
            Err(err) => return render_error(err, input.format, input.output),
        };

    let baseline = StageSummary::from(&output.grouping);
    let candidate = StageSummary::from(&output.analysis);
    let report = compare(&baseline, &candidate);
    info!(
        component_delta = report.component_count,
        confidence_change = report.confidence_change,
        issues = report.issues.len(),
        "comparison finished"
    );

    let body = DcaOutput::Compare(CompareOutput {
        version: DCA_OUTPUT_VERSION.to_string(),
        input: descriptor,
        report,
    });
    if let Err(err) = write_output(&body, input.format, input.output.clone()) {
        return render_error(DcaError::Config(err.to_string()), input.format, input.output);
    }
    ExitCode::SUCCESS
}
