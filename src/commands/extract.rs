use std::path::PathBuf;
use std::process::ExitCode;

use dca_lib::output::{ExtractOutput, DCA_OUTPUT_VERSION};
use dca_lib::pipeline::extract_document;
use dca_lib::{DcaError, DcaOutput, SpatialAnalysis};

use crate::cli::InputArgs;
use crate::formatting::{render_error, write_output};
use crate::settings::load_config;

/// Run the extract command; never calls a model.
pub async fn run_extract(config_path: Option<PathBuf>, input: InputArgs) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, input.format, input.output),
    };
    let loaded = match super::load_input(&input.input, &config, false).await {
        Ok(loaded) => loaded,
        Err(err) => return render_error(err, input.format, input.output),
    };
    let extraction = match extract_document(&loaded.document) {
        Ok(extraction) => extraction,
        Err(err) => return render_error(err, input.format, input.output),
    };
    let spatial = SpatialAnalysis::analyze(&extraction.descriptors, &config.spatial);

    let body = DcaOutput::Extract(ExtractOutput {
        version: DCA_OUTPUT_VERSION.to_string(),
        input: loaded.input,
        descriptors: extraction.descriptors,
        tokens: extraction.tokens,
        spatial,
    });
    if let Err(err) = write_output(&body, input.format, input.output.clone()) {
        return render_error(DcaError::Config(err.to_string()), input.format, input.output);
    }
    ExitCode::SUCCESS
}
