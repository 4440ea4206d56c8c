use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_VISION_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelSettings,
    pub timeouts: Timeouts,
    pub grouping: GroupingSettings,
    pub spatial: SpatialSettings,
}

/// Settings for the OpenAI-compatible reasoning/vision endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub api_endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub vision_model: String,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            max_tokens: 4096,
        }
    }
}

impl ModelSettings {
    /// Apply `DCA_*` / `OPENAI_API_KEY` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env_non_empty("DCA_MODEL_API_KEY").or_else(|| env_non_empty("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(endpoint) = env_non_empty("DCA_MODEL_API_ENDPOINT") {
            self.api_endpoint = endpoint;
        }
        if let Some(model) = env_non_empty("DCA_MODEL") {
            self.model = model;
        }
        if let Some(model) = env_non_empty("DCA_VISION_MODEL") {
            self.vision_model = model;
        }
        self
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub grouping: Duration,
    #[serde(with = "humantime_serde")]
    pub validation: Duration,
    #[serde(with = "humantime_serde")]
    pub http: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            grouping: Duration::from_secs(60),
            validation: Duration::from_secs(60),
            http: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingSettings {
    /// Descriptors wrapped into single-member groups on the fallback path
    pub fallback_group_limit: usize,
    /// Nodes listed individually in the grouping prompt
    pub max_listed_nodes: usize,
    /// Search radius for proximity repair of empty groups
    pub repair_radius_px: f32,
}

impl Default for GroupingSettings {
    fn default() -> Self {
        Self {
            fallback_group_limit: 15,
            max_listed_nodes: 50,
            repair_radius_px: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialSettings {
    pub cluster_threshold_px: f32,
    pub alignment_tolerance_px: f32,
    pub section_gap_px: f32,
}

impl Default for SpatialSettings {
    fn default() -> Self {
        Self {
            cluster_threshold_px: 100.0,
            alignment_tolerance_px: 10.0,
            section_gap_px: 50.0,
        }
    }
}

impl Config {
    /// `~/.config/dca/config.toml`, when a home directory is known.
    pub fn central_config_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME").filter(|h| !h.is_empty())?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("dca")
                .join("config.toml"),
        )
    }

    /// Load config from an explicit path, the central config, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let source = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::central_config_path().filter(|p| p.is_file()),
        };
        match source {
            Some(p) => {
                let raw = std::fs::read_to_string(&p).map_err(|e| e.to_string())?;
                Self::from_toml_str(&raw)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeouts.grouping.is_zero() {
            return Err("timeouts.grouping timeout must be greater than zero".to_string());
        }
        if self.timeouts.validation.is_zero() {
            return Err("timeouts.validation timeout must be greater than zero".to_string());
        }
        if self.timeouts.http.is_zero() {
            return Err("timeouts.http timeout must be greater than zero".to_string());
        }
        let thresholds = [
            ("grouping.repair_radius_px", self.grouping.repair_radius_px),
            ("spatial.cluster_threshold_px", self.spatial.cluster_threshold_px),
            ("spatial.alignment_tolerance_px", self.spatial.alignment_tolerance_px),
            ("spatial.section_gap_px", self.spatial.section_gap_px),
        ];
        for (name, value) in thresholds {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be a positive number (got {value})"));
            }
        }
        if self.model.max_tokens == 0 {
            return Err("model.max_tokens must be greater than zero".to_string());
        }
        Ok(())
    }
}
