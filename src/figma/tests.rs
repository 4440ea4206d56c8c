//! Tests for the Figma client and design-tree loading.

#[cfg(test)]
mod tests {
    use crate::figma::api_types::{FigmaColor, ImageFormat};
    use crate::figma::client::{FigmaAuth, FigmaClient, FigmaError};
    use crate::figma::{map_figma_error, parse_design_json};
    use crate::DcaError;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_figma_client_missing_token() {
        let result = FigmaClient::new("");
        assert!(matches!(result.unwrap_err(), FigmaError::MissingToken));
    }

    #[test]
    fn test_image_format_as_str() {
        assert_eq!(ImageFormat::Png.as_str(), "png");
        assert_eq!(ImageFormat::Jpg.as_str(), "jpg");
        assert_eq!(ImageFormat::Svg.as_str(), "svg");
    }

    #[test]
    fn test_figma_color_to_hex_rounds_to_nearest_byte() {
        let color = FigmaColor {
            r: 1.0,
            g: 0.50196,
            b: 0.0,
            a: 1.0,
        };
        assert_eq!(color.to_hex(), "#ff8000");

        let half = FigmaColor {
            r: 0.5,
            g: 0.5,
            b: 0.5,
            a: 1.0,
        };
        assert_eq!(half.to_hex(), "#808080");
    }

    #[test]
    fn test_figma_color_clamps_out_of_range_channels() {
        let color = FigmaColor {
            r: 1.4,
            g: -0.2,
            b: 0.0,
            a: 1.0,
        };
        assert_eq!(color.to_hex(), "#ff0000");
        assert_eq!(color.to_rgba(), "rgba(255, 0, 0, 1)");
    }

    #[tokio::test]
    async fn download_image_propagates_request_error() {
        let client = FigmaClient::new("token").expect("client");

        let result = client
            .download_image("http://127.0.0.1:1/nonexistent")
            .await;

        assert!(
            matches!(result, Err(FigmaError::Request(_))),
            "expected request error, got {:?}",
            result
        );
    }

    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn rate_limit_response_reports_retry_after() {
        let base = serve_once(
            "HTTP/1.1 429 Too Many Requests\r\nretry-after: 7\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;
        let client = FigmaClient::with_base_url(
            FigmaAuth::PersonalAccessToken("token".into()),
            base,
            Duration::from_secs(5),
        )
        .expect("client");

        let result = client.get_file("FILE").await;
        assert!(
            matches!(result, Err(FigmaError::RateLimited(7))),
            "expected rate limit, got {:?}",
            result
        );
    }

    #[tokio::test]
    async fn api_error_status_is_mapped_into_figma_api_error() {
        let base = serve_once(
            "HTTP/1.1 403 Forbidden\r\ncontent-length: 9\r\nconnection: close\r\n\r\nforbidden",
        )
        .await;
        let client = FigmaClient::with_base_url(
            FigmaAuth::OAuthToken("token".into()),
            base,
            Duration::from_secs(5),
        )
        .expect("client");

        let err = client.get_file("FILE").await.expect_err("should fail");
        match map_figma_error(err) {
            DcaError::FigmaApi { status, message } => {
                assert_eq!(status.map(|s| s.as_u16()), Some(403));
                assert_eq!(message, "forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_design_json_accepts_file_response() {
        let raw = br#"{
            "name": "Checkout",
            "document": {
                "id": "0:0",
                "type": "DOCUMENT",
                "children": [{"id": "1:1", "type": "CANVAS", "name": "Page", "children": []}]
            }
        }"#;
        let doc = parse_design_json(raw, None).expect("file response");
        assert_eq!(doc.name, "Checkout");
        assert_eq!(doc.root.node_type, "DOCUMENT");
        assert_eq!(doc.root.children.len(), 1);
    }

    #[test]
    fn parse_design_json_accepts_nodes_response_and_picks_requested_node() {
        let raw = br#"{
            "name": "Checkout",
            "nodes": {
                "2:2": {"document": {"id": "2:2", "type": "FRAME", "name": "B"}},
                "1:1": {"document": {"id": "1:1", "type": "FRAME", "name": "A"}}
            }
        }"#;
        let first = parse_design_json(raw, None).expect("nodes response");
        assert_eq!(first.root.id, "1:1");

        let picked = parse_design_json(raw, Some("2:2")).expect("requested node");
        assert_eq!(picked.root.name, "B");

        let missing = parse_design_json(raw, Some("9:9"));
        assert!(matches!(missing, Err(DcaError::NoExtractableStructure(_))));
    }

    #[test]
    fn parse_design_json_accepts_bare_node() {
        let raw = br#"{
            "id": "5:1",
            "name": "Card",
            "type": "FRAME",
            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 320, "height": 200},
            "someUnknownField": {"ignored": true}
        }"#;
        let doc = parse_design_json(raw, None).expect("bare node");
        assert_eq!(doc.name, "Card");
        let bb = doc.root.absolute_bounding_box.expect("bounds");
        assert!((bb.width - 320.0).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_paint_keeps_node_and_descendants() {
        let raw = br#"{
            "id": "1:1",
            "type": "FRAME",
            "name": "Card",
            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 320, "height": 200},
            "fills": [
                {"type": "SOLID", "color": {"r": "bad", "g": 0, "b": 0}},
                {"type": "SOLID", "color": {"r": 0, "g": 0, "b": 1}}
            ],
            "style": {"fontSize": "huge"},
            "children": [{
                "id": "1:2",
                "type": "GROUP",
                "strokeWeight": "thick",
                "children": [{
                    "id": "1:3",
                    "type": "TEXT",
                    "characters": "Total",
                    "absoluteBoundingBox": {"x": 16, "y": 16, "width": 80, "height": 20}
                }]
            }]
        }"#;
        let doc = parse_design_json(raw, None).expect("lenient node");
        assert_eq!(doc.root.fills.len(), 1);
        assert!(doc.root.style.is_none());
        let group = &doc.root.children[0];
        assert_eq!(group.stroke_weight, None);

        let ids: Vec<String> = crate::extract::extract(&doc.root)
            .descriptors
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["1:1", "1:3"]);
    }

    #[test]
    fn unparseable_child_is_replaced_by_its_descendants() {
        let raw = br#"{
            "id": "2:1",
            "type": "FRAME",
            "children": [
                {"name": "no id or type", "children": [
                    {"id": "2:3", "type": "RECTANGLE"}
                ]},
                {"id": "2:4", "type": "ELLIPSE"}
            ]
        }"#;
        let doc = parse_design_json(raw, None).expect("lenient children");
        let ids: Vec<&str> = doc.root.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2:3", "2:4"]);
    }

    #[test]
    fn parse_design_json_rejects_garbage() {
        let result = parse_design_json(b"not json at all", None);
        assert!(matches!(result, Err(DcaError::NoExtractableStructure(_))));

        let result = parse_design_json(br#"{"document": 42}"#, None);
        assert!(matches!(result, Err(DcaError::NoExtractableStructure(_))));
    }
}
