//! Design Component Analyzer (DCA) Library
//!
//! Turns a Figma node tree plus a rendered screenshot into validated semantic UI
//! components with design-system metadata, ready for code generation.
//!
//! # Module Overview
//!
//! - [`figma`] - Figma REST API access and design-tree parsing
//! - [`extract`] - Component descriptors and design-token mining
//! - [`spatial`] - Geometric/text heuristics over descriptors
//! - [`grouping`] - Semantic grouping via a reasoning model, with heuristic fallback
//! - [`validation`] - Visual cross-validation against the rendered image
//! - [`mapping`] - Target UI-library components with style attributes
//! - [`pipeline`] - End-to-end orchestration of the stages above
//! - [`comparison`] - Stage-to-stage comparison metrics
//! - [`config`] - Configuration file support
//! - [`types`] - Core data types and structures
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use dca_lib::{parse_design_json, AnalysisPipeline, Config};
//!
//! # async fn example() -> dca_lib::Result<()> {
//! let bytes = std::fs::read("checkout.json")?;
//! let document = parse_design_json(&bytes, None)?;
//!
//! // Heuristics only; no model calls
//! let pipeline = AnalysisPipeline::from_config(&Config::default(), true)?;
//! let output = pipeline.run(&document, None).await?;
//! for component in &output.components {
//!     println!("{} -> {}", component.name, component.target_component);
//! }
//! # Ok(())
//! # }
//! ```

pub mod comparison;
pub mod config;
pub mod error;
pub mod extract;
pub mod figma;
pub mod grouping;
pub mod image_loader;
pub mod llm;
pub mod mapping;
pub mod output;
pub mod pipeline;
pub mod resource;
pub mod spatial;
pub mod types;
pub mod validation;

pub use comparison::{compare, ComparisonReport, StageSummary};
pub use config::Config;
pub use error::{DcaError, ErrorPayload, Result};
pub use extract::{extract, Extraction};
pub use figma::{
    fetch_design, parse_design_json, DesignDocument, FigmaAuth, FigmaClient, FigmaError,
    FigmaFetchOptions,
};
pub use grouping::GroupingEngine;
pub use image_loader::{to_image_payload, ImageInput};
pub use llm::{ModelError, ModelRequest, ReasoningModel};
pub use mapping::StyleMapper;
pub use output::{DcaOutput, DCA_OUTPUT_VERSION};
pub use pipeline::{AnalysisPipeline, PipelineOutput};
pub use resource::{parse_design_source, parse_image_source, DesignSource, FigmaInfo};
pub use spatial::SpatialAnalysis;
pub use validation::VisualValidator;
