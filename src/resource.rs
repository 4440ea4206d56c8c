use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::error::DcaError;
use crate::image_loader::ImageInput;

/// Where the design tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignSource {
    Figma(FigmaInfo),
    /// Saved files/nodes response or bare node JSON
    File(PathBuf),
}

impl DesignSource {
    pub fn kind(&self) -> &'static str {
        match self {
            DesignSource::Figma(_) => "figma",
            DesignSource::File(_) => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigmaInfo {
    pub file_key: String,
    pub node_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum ResourceParseError {
    #[error("Invalid URL '{value}': {message}. Hint: include http(s):// and ensure the URL is well-formed.")]
    InvalidUrl { value: String, message: String },
    #[error("Figma URL missing file key in '{url}'. Hint: use https://www.figma.com/file/<FILE_KEY>/... and node-id if needed.")]
    FigmaMissingFileKey { url: String },
    #[error("Local file not found: {path}. Hint: check the path relative to the current working directory or use an absolute path.")]
    FileNotFound { path: String },
    #[error("Unsupported file extension '{extension}'. Supported extensions: {supported}.")]
    UnsupportedExtension {
        extension: String,
        supported: String,
    },
}

impl From<ResourceParseError> for DcaError {
    fn from(err: ResourceParseError) -> Self {
        match err {
            ResourceParseError::FigmaMissingFileKey { .. } => {
                DcaError::Config(format!("Figma file key missing: {err}"))
            }
            other => DcaError::Config(other.to_string()),
        }
    }
}

const DESIGN_EXTENSIONS: &[&str] = &["json"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

fn is_remote(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Parse `--input`: a Figma file/design URL or a local `.json` tree.
pub fn parse_design_source(value: &str) -> Result<DesignSource, ResourceParseError> {
    if is_remote(value) {
        let url = Url::parse(value).map_err(|e| ResourceParseError::InvalidUrl {
            value: value.to_string(),
            message: e.to_string(),
        })?;
        if !url.host_str().unwrap_or("").contains("figma.com") {
            return Err(ResourceParseError::InvalidUrl {
                value: value.to_string(),
                message: "only figma.com design URLs can be analysed".to_string(),
            });
        }
        return parse_figma_url(value).map(DesignSource::Figma);
    }
    check_local_file(value, DESIGN_EXTENSIONS).map(DesignSource::File)
}

/// Parse `--image`: a remote or `data:` URL, or a local raster.
pub fn parse_image_source(value: &str) -> Result<ImageInput, ResourceParseError> {
    if is_remote(value) {
        Url::parse(value).map_err(|e| ResourceParseError::InvalidUrl {
            value: value.to_string(),
            message: e.to_string(),
        })?;
        return Ok(ImageInput::Url(value.to_string()));
    }
    if value.starts_with("data:") {
        return Ok(ImageInput::Url(value.to_string()));
    }
    check_local_file(value, IMAGE_EXTENSIONS).map(ImageInput::Path)
}

pub fn parse_figma_url(value: &str) -> Result<FigmaInfo, ResourceParseError> {
    let url = Url::parse(value).map_err(|e| ResourceParseError::InvalidUrl {
        value: value.to_string(),
        message: e.to_string(),
    })?;

    let path_segments: Vec<&str> = url.path_segments().map(|c| c.collect()).unwrap_or_default();

    let file_key = path_segments
        .iter()
        .position(|&s| s == "file" || s == "design" || s == "proto")
        .and_then(|i| path_segments.get(i + 1))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| ResourceParseError::FigmaMissingFileKey {
            url: value.to_string(),
        })?;

    let node_id = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| v.replace('-', ":"));

    Ok(FigmaInfo { file_key, node_id })
}

fn check_local_file(value: &str, supported: &[&str]) -> Result<PathBuf, ResourceParseError> {
    let path = Path::new(value);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !supported.contains(&extension.as_str()) {
        return Err(ResourceParseError::UnsupportedExtension {
            extension: if extension.is_empty() {
                "no extension".to_string()
            } else {
                extension
            },
            supported: supported.join(", "),
        });
    }

    let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        return Err(ResourceParseError::FileNotFound {
            path: path.to_string_lossy().into_owned(),
        });
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    fn temp_file_with_extension(ext: &str) -> tempfile::NamedTempFile {
        Builder::new()
            .suffix(&format!(".{}", ext))
            .tempfile()
            .expect("create temp file")
    }

    #[test]
    fn test_parse_figma_file_url() {
        let url = "https://www.figma.com/file/ABC123/My-Design?node-id=12-34";
        let source = parse_design_source(url).unwrap();
        assert_eq!(
            source,
            DesignSource::Figma(FigmaInfo {
                file_key: "ABC123".into(),
                node_id: Some("12:34".into()),
            })
        );
        assert_eq!(source.kind(), "figma");
    }

    #[test]
    fn test_parse_figma_design_url_without_node() {
        let url = "https://www.figma.com/design/XYZ789/Another-Design";
        let info = parse_figma_url(url).unwrap();
        assert_eq!(info.file_key, "XYZ789");
        assert!(info.node_id.is_none());
    }

    #[test]
    fn test_non_figma_url_is_rejected() {
        let res = parse_design_source("https://example.com/page");
        assert!(matches!(res, Err(ResourceParseError::InvalidUrl { .. })));
    }

    #[test]
    fn test_figma_url_without_key() {
        let res = parse_design_source("https://www.figma.com/files/recent");
        assert!(matches!(
            res,
            Err(ResourceParseError::FigmaMissingFileKey { .. })
        ));
    }

    #[test]
    fn test_parse_local_json() {
        let file = temp_file_with_extension("json");
        let res = parse_design_source(file.path().to_str().unwrap()).unwrap();
        assert_eq!(res, DesignSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_design_rejects_images() {
        let file = temp_file_with_extension("png");
        let res = parse_design_source(file.path().to_str().unwrap());
        assert!(matches!(
            res,
            Err(ResourceParseError::UnsupportedExtension { extension, .. })
                if extension == "png"
        ));
    }

    #[test]
    fn test_parse_image_sources() {
        let file = temp_file_with_extension("webp");
        let local = parse_image_source(file.path().to_str().unwrap()).unwrap();
        assert_eq!(local, ImageInput::Path(file.path().to_path_buf()));

        let remote = parse_image_source("https://cdn.example.com/render.png").unwrap();
        assert!(matches!(remote, ImageInput::Url(_)));

        let inline = parse_image_source("data:image/png;base64,AAAA").unwrap();
        assert!(matches!(inline, ImageInput::Url(_)));
    }

    #[test]
    fn test_missing_local_image_errors() {
        let res = parse_image_source("/tmp/does-not-exist.png");
        assert!(matches!(res, Err(ResourceParseError::FileNotFound { .. })));
    }

    #[test]
    fn test_errors_map_to_config() {
        let err: DcaError = ResourceParseError::FileNotFound {
            path: "x.json".into(),
        }
        .into();
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("Verify the file exists"));
    }
}
