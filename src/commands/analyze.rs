use std::path::PathBuf;
use std::process::ExitCode;

use dca_lib::output::AnalyzeOutput;
use dca_lib::{DcaError, DcaOutput};

use crate::cli::{InputArgs, PipelineArgs};
use crate::formatting::{render_error, write_output};

/// Run the analyze command.
pub async fn run_analyze(
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

    let body = DcaOutput::Analyze(AnalyzeOutput::from_pipeline(descriptor, &output));
    if let Err(err) = write_output(&body, input.format, input.output.clone()) {
        return render_error(DcaError::Config(err.to_string()), input.format, input.output);
    }
    ExitCode::SUCCESS
}
