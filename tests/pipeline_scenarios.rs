use std::sync::Arc;

use async_trait::async_trait;
use dca_lib::config::SpatialSettings;
use dca_lib::llm::ImagePayload;
use dca_lib::types::{ResultSource, SemanticType, MAX_CONFIDENCE, MIN_CONFIDENCE};
use dca_lib::{
    compare, extract, parse_design_json, AnalysisPipeline, DesignDocument, GroupingEngine,
    ModelError, ModelRequest, ReasoningModel, SpatialAnalysis, StageSummary, StyleMapper,
    VisualValidator,
};
use serde_json::{json, Value};

/// Answers grouping requests (no image) and validation requests (with image) separately.
struct ScriptedModel {
    grouping: Result<String, u16>,
    validation: Result<String, u16>,
}

#[async_trait]
impl ReasoningModel for ScriptedModel {
    async fn complete(&self, request: ModelRequest) -> Result<String, ModelError> {
        let script = if request.image.is_some() {
            &self.validation
        } else {
            &self.grouping
        };
        script.clone().map_err(|status| ModelError::Transport {
            status: Some(status),
            message: "scripted failure".into(),
        })
    }
}

fn pipeline(model: ScriptedModel) -> AnalysisPipeline {
    let model: Arc<dyn ReasoningModel> = Arc::new(model);
    AnalysisPipeline::new(
        GroupingEngine::new(Some(model.clone())),
        VisualValidator::new(Some(model)),
        StyleMapper::new(),
        SpatialSettings::default(),
    )
}

fn screenshot() -> ImagePayload {
    ImagePayload {
        url: "https://example.com/checkout.png".into(),
    }
}

fn document(tree: Value) -> DesignDocument {
    parse_design_json(tree.to_string().as_bytes(), None).expect("fixture parses")
}

fn node(id: &str, name: &str, kind: &str, x: f32, y: f32, w: f32, h: f32) -> Value {
    json!({
        "id": id, "name": name, "type": kind,
        "absoluteBoundingBox": {"x": x, "y": y, "width": w, "height": h}
    })
}

fn text(id: &str, chars: &str, x: f32, y: f32) -> Value {
    let mut value = node(id, chars, "TEXT", x, y, 120.0, 20.0);
    value["characters"] = json!(chars);
    value["style"] = json!({"fontFamily": "Inter", "fontSize": 16, "fontWeight": 400});
    value
}

fn checkout() -> DesignDocument {
    let mut pay = node("1:5", "Pay button", "RECTANGLE", 16.0, 740.0, 343.0, 56.0);
    pay["fills"] = json!([{"type": "SOLID", "color": {"r": 1.0, "g": 0.50196, "b": 0.0, "a": 1.0}}]);
    let mut root = node("1:1", "Checkout", "FRAME", 0.0, 0.0, 375.0, 812.0);
    root["children"] = json!([
        text("1:2", "Checkout", 16.0, 40.0),
        text("1:3", "Order summary", 16.0, 300.0),
        text("1:4", "$96", 16.0, 700.0),
        pay
    ]);
    document(root)
}

#[tokio::test]
async fn failing_model_yields_single_node_groups() {
    // 20 leaf nodes under a frame without geometry
    let children: Vec<Value> = (0..20)
        .map(|i| text(&format!("2:{i}"), &format!("Row {i}"), 16.0, i as f32 * 40.0))
        .collect();
    let doc = document(json!({
        "id": "2:root", "name": "List", "type": "GROUP", "children": children
    }));
    let model = ScriptedModel {
        grouping: Err(503),
        validation: Err(503),
    };

    let output = pipeline(model)
        .run(&doc, Some(&screenshot()))
        .await
        .expect("pipeline run");

    let grouping = &output.grouping;
    assert_eq!(grouping.total_nodes, 20);
    assert_eq!(grouping.source, ResultSource::Heuristic);
    assert_eq!(grouping.confidence, 0.5);
    assert_eq!(grouping.groups.len(), 15);
    assert!(grouping.groups.iter().all(|g| g.children.len() == 1));
    assert_eq!(grouping.ungrouped_nodes.len(), 5);
    assert!(grouping.counts_consistent());
    assert_eq!(output.analysis.source, ResultSource::Heuristic);
}

#[tokio::test]
async fn empty_total_group_is_repaired_and_mapped() {
    let grouping = json!({
        "layoutStructure": {"screenType": "checkout", "mainSections": ["header", "summary", "actions"]},
        "groups": [
            {"id": "header", "name": "Header", "type": "text", "children": ["1:2"]},
            {"id": "total", "name": "Total Display", "type": "text", "children": []},
            {"id": "pay", "name": "Pay Button", "type": "button", "children": ["1:5"]}
        ],
        "confidence": 0.7
    });
    let validation = json!({
        "components": [
            {"id": "header", "type": "text", "name": "Header",
             "bounds": {"x": 16, "y": 40, "width": 120, "height": 20}},
            {"id": "total", "type": "text", "name": "Total Display",
             "bounds": {"x": 16, "y": 700, "width": 120, "height": 20}},
            {"id": "pay", "type": "button", "name": "Pay Button",
             "bounds": {"x": 16, "y": 740, "width": 343, "height": 56}}
        ],
        "layout": {"structure": "single-column", "responsive": true, "spacingUnits": 8},
        "confidence": 0.85
    });
    let model = ScriptedModel {
        grouping: Ok(grouping.to_string()),
        validation: Ok(validation.to_string()),
    };

    let output = pipeline(model)
        .run(&checkout(), Some(&screenshot()))
        .await
        .expect("pipeline run");

    assert_eq!(output.grouping.source, ResultSource::Model);
    let total = output.grouping.group("total").expect("total group kept");
    assert!(total.children.contains(&"1:4".to_string()));
    assert!(output.grouping.counts_consistent());

    assert_eq!(output.analysis.source, ResultSource::Model);
    assert_eq!(output.analysis.layout.structure, "single-column");
    let total_component = output
        .components
        .iter()
        .find(|c| c.id == "total")
        .expect("total component");
    assert_eq!(total_component.content.as_deref(), Some("$96"));
    assert!(!total_component.content_inferred);

    let pay = output
        .components
        .iter()
        .find(|c| c.id == "pay")
        .expect("pay component");
    assert_eq!(pay.target_component, "Button");
    assert_eq!(pay.style_attributes.background_color.as_deref(), Some("#ff8000"));

    // stage comparison over the same run
    let report = compare(
        &StageSummary::from(&output.grouping),
        &StageSummary::from(&output.analysis),
    );
    assert_eq!(report.confidence_change, 15.0);
}

#[tokio::test]
async fn confidences_stay_in_bounds_and_components_are_traceable() {
    let grouping = json!({
        "groups": [
            {"id": "a", "name": "Everything", "type": "container", "children": ["1:2", "1:3"], "confidence": 3.5},
            {"id": "b", "name": "Also everything", "type": "container", "children": ["1:3", "1:4"], "confidence": -2}
        ],
        "confidence": 42
    });
    let model = ScriptedModel {
        grouping: Ok(grouping.to_string()),
        validation: Ok("not json".into()),
    };
    let output = pipeline(model)
        .run(&checkout(), Some(&screenshot()))
        .await
        .expect("pipeline run");

    let in_bounds = |c: f32| (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&c);
    assert!(in_bounds(output.grouping.confidence));
    assert!(output.grouping.groups.iter().all(|g| in_bounds(g.confidence)));
    assert!(in_bounds(output.analysis.confidence));
    assert!(output.analysis.components.iter().all(|c| !c.member_ids.is_empty()));

    for descriptor in &output.extraction.descriptors {
        let owners = output
            .analysis
            .components
            .iter()
            .filter(|c| c.member_ids.contains(&descriptor.id))
            .count();
        assert!(owners <= 1, "{} claimed {owners} times", descriptor.id);
    }
    assert_eq!(output.components.len(), output.analysis.components.len());
    assert!(output
        .analysis
        .components
        .iter()
        .all(|c| c.component_type == SemanticType::Container || c.component_type == SemanticType::Other));
}

#[test]
fn clusters_and_sections_from_extracted_tree() {
    let root = json!({"id": "3:0", "name": "Screen", "type": "GROUP", "children": [
        node("3:1", "a", "RECTANGLE", 10.0, 10.0, 10.0, 10.0),
        node("3:2", "b", "RECTANGLE", 20.0, 15.0, 10.0, 10.0),
        node("3:3", "c", "RECTANGLE", 500.0, 500.0, 10.0, 10.0)
    ]});
    let extraction = extract(&document(root).root);
    let spatial = SpatialAnalysis::analyze(&extraction.descriptors, &SpatialSettings::default());
    let mut sizes: Vec<usize> = spatial.clusters.iter().map(|c| c.members.len()).collect();
    sizes.sort();
    assert_eq!(sizes, vec![1, 2]);

    let stacked = json!({"id": "4:0", "name": "Stack", "type": "GROUP", "children": [
        node("4:1", "a", "RECTANGLE", 0.0, 0.0, 100.0, 10.0),
        node("4:2", "b", "RECTANGLE", 0.0, 20.0, 100.0, 10.0),
        node("4:3", "c", "RECTANGLE", 0.0, 40.0, 100.0, 10.0),
        node("4:4", "d", "RECTANGLE", 0.0, 300.0, 100.0, 10.0)
    ]});
    let extraction = extract(&document(stacked).root);
    let spatial = SpatialAnalysis::analyze(&extraction.descriptors, &SpatialSettings::default());
    assert_eq!(spatial.sections.len(), 2);
}
