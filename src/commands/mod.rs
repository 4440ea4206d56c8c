mod analyze;
mod compare;
mod extract;

pub use analyze::run_analyze;
pub use compare::run_compare;
pub use extract::run_extract;

use std::path::Path;

use dca_lib::output::InputDescriptor;
use dca_lib::pipeline::{load_design, resolve_image, AnalysisPipeline, PipelineOutput};
use dca_lib::{parse_design_source, parse_image_source, Config, DcaError, DesignDocument};
use tracing::{debug, info};

use crate::cli::PipelineArgs;
use crate::settings::{
    apply_pipeline_overrides, format_effective_config, load_config, PipelineFlagSources,
};

/// A loaded design plus the descriptor echoed back in the output.
pub(crate) struct LoadedInput {
    pub input: InputDescriptor,
    pub document: DesignDocument,
}

/// Parse `--input` and fetch or read the design tree.
pub(crate) async fn load_input(
    value: &str,
    config: &Config,
    export_render: bool,
) -> Result<LoadedInput, DcaError> {
    let source = parse_design_source(value)?;
    debug!(kind = source.kind(), "loading design input");
    let document = load_design(&source, config.timeouts.http, export_render).await?;
    info!(name = %document.name, "design loaded");
    Ok(LoadedInput {
        input: InputDescriptor {
            kind: source.kind().to_string(),
            value: value.to_string(),
            document_name: Some(document.name.clone()),
        },
        document,
    })
}

/// Shared path of `analyze` and `compare`: config, input, image, pipeline run.
pub(crate) async fn run_pipeline(
    raw_args: &[String],
    config_path: Option<&Path>,
    input: &str,
    args: &PipelineArgs,
) -> Result<(InputDescriptor, PipelineOutput), DcaError> {
    let config = load_config(config_path)?;
    let config = apply_pipeline_overrides(config, args, &PipelineFlagSources::from_args(raw_args))?;
    debug!("{}", format_effective_config(&config, args.offline, config_path));

    let image = args
        .image
        .as_deref()
        .map(parse_image_source)
        .transpose()?;
    let pipeline = AnalysisPipeline::from_config(&config, args.offline)?;

    // The render export only feeds the vision call.
    let export_render = !args.offline && image.is_none();
    let loaded = load_input(input, &config, export_render).await?;

    let payload = if args.offline {
        None
    } else {
        resolve_image(image.as_ref(), &loaded.document)?
    };
    let output = pipeline.run(&loaded.document, payload.as_ref()).await?;
    Ok((loaded.input, output))
}
