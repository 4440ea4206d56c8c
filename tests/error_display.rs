use dca_lib::error::ErrorCategory;
use dca_lib::DcaError;

#[test]
fn config_error_display_includes_message() {
    let err = DcaError::Config("missing file key".to_string());

    assert_eq!(format!("{}", err), "Configuration error: missing file key");
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: DcaError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn figma_api_helper_includes_status_and_message() {
    let err = DcaError::figma_api(Some(reqwest::StatusCode::NOT_FOUND), "not found");

    assert_eq!(
        format!("{}", err),
        "Figma API error (status: Some(404)): not found"
    );
}

#[test]
fn figma_api_helper_handles_missing_status() {
    let err = DcaError::figma_api(None, "missing token");

    assert_eq!(
        format!("{}", err),
        "Figma API error (status: None): missing token"
    );
}

#[test]
fn no_structure_helper_uses_message_and_input_category() {
    let err = DcaError::no_structure("tree has no geometry");

    assert_eq!(
        format!("{}", err),
        "No extractable structure: tree has no geometry"
    );
    let payload = err.to_payload();
    assert_eq!(payload.category, ErrorCategory::Input);
    assert!(payload
        .remediation
        .unwrap_or_default()
        .contains("absoluteBoundingBox"));
}

#[test]
fn missing_api_key_points_at_offline_mode() {
    let payload = DcaError::Config("Model API key missing".to_string()).to_payload();

    assert_eq!(payload.category, ErrorCategory::Config);
    assert!(payload.remediation.unwrap_or_default().contains("--offline"));
}
