use std::path::Path;
use std::time::Duration;

use dca_lib::{Config, DcaError};

use crate::cli::PipelineArgs;

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct PipelineFlagSources {
    pub grouping_timeout: bool,
    pub validation_timeout: bool,
}

impl PipelineFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            grouping_timeout: flag_present(args, "--grouping-timeout"),
            validation_timeout: flag_present(args, "--validation-timeout"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Merge CLI timeouts into the config, preferring CLI when flags are present.
pub fn apply_pipeline_overrides(
    mut config: Config,
    args: &PipelineArgs,
    flags: &PipelineFlagSources,
) -> Result<Config, DcaError> {
    if flags.grouping_timeout {
        config.timeouts.grouping = positive_secs("--grouping-timeout", args.grouping_timeout)?;
    }
    if flags.validation_timeout {
        config.timeouts.validation =
            positive_secs("--validation-timeout", args.validation_timeout)?;
    }
    Ok(config)
}

fn positive_secs(flag: &str, secs: u64) -> Result<Duration, DcaError> {
    if secs == 0 {
        return Err(DcaError::Config(format!(
            "{flag} timeout must be greater than zero"
        )));
    }
    Ok(Duration::from_secs(secs))
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/dca/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, DcaError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        DcaError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        DcaError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, offline: bool, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: model={} vision={} offline={}, timeouts: grouping={}s, validation={}s, http={}s, grouping: fallback_limit={} listed={} repair_radius={}px, spatial: cluster={}px align={}px section_gap={}px",
        config.model.model,
        config.model.vision_model,
        offline,
        config.timeouts.grouping.as_secs(),
        config.timeouts.validation.as_secs(),
        config.timeouts.http.as_secs(),
        config.grouping.fallback_group_limit,
        config.grouping.max_listed_nodes,
        config.grouping.repair_radius_px,
        config.spatial.cluster_threshold_px,
        config.spatial.alignment_tolerance_px,
        config.spatial.section_gap_px,
    )
}
