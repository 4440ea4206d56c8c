#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use serde_json::{json, Value};

    use crate::mapping::rules::{select_target, TargetInput, TargetKind};
    use crate::mapping::StyleMapper;
    use crate::types::{
        Borders, Bounds, ColorStyling, ComponentDescriptor, DesignTokenSet, NodeKind,
        RawProperties, SemanticType, Shadow, ShadowKind, Spacing, Styling, TargetMapping,
        Typography, ValidatedComponent,
    };

    fn node(id: &str, kind: NodeKind, styling: Styling) -> ComponentDescriptor {
        ComponentDescriptor {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            bounds: Bounds::new(0.0, 0.0, 100.0, 40.0),
            styling,
            raw_properties: RawProperties {
                source_type: kind.as_str().to_ascii_uppercase(),
                visible: true,
                ..Default::default()
            },
        }
    }

    fn label(id: &str, chars: &str, size: f32) -> ComponentDescriptor {
        let mut d = node(
            id,
            NodeKind::Text,
            Styling {
                colors: ColorStyling {
                    text: Some("#ffffff".into()),
                    ..Default::default()
                },
                typography: Some(Typography {
                    font_family: Some("Inter".into()),
                    font_size: Some(size),
                    font_weight: Some(700.0),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        d.raw_properties.characters = Some(chars.to_string());
        d
    }

    fn component(
        id: &str,
        name: &str,
        component_type: SemanticType,
        height: f32,
        members: &[&str],
    ) -> ValidatedComponent {
        ValidatedComponent {
            id: id.to_string(),
            component_type,
            name: name.to_string(),
            description: String::new(),
            bounds: Bounds::new(16.0, 700.0, 343.0, height),
            properties: BTreeMap::new(),
            target_mapping: TargetMapping {
                component_name: "Box".into(),
                props: BTreeMap::new(),
            },
            source_group_id: Some(id.to_string()),
            source_node_id: members.first().map(|m| m.to_string()),
            member_ids: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn descriptors() -> Vec<ComponentDescriptor> {
        vec![
            node(
                "btn-bg",
                NodeKind::Rectangle,
                Styling {
                    colors: ColorStyling {
                        background: Some("#ff8000".into()),
                        ..Default::default()
                    },
                    borders: Some(Borders {
                        radius: Some(8.0),
                        ..Default::default()
                    }),
                    shadows: vec![Shadow {
                        kind: ShadowKind::Drop,
                        color: "rgba(0, 0, 0, 0.25)".into(),
                        offset_x: 0.0,
                        offset_y: 2.0,
                        blur: 4.0,
                        spread: 0.0,
                    }],
                    ..Default::default()
                },
            ),
            label("btn-label", "Pay $96", 16.0),
            node(
                "card",
                NodeKind::Frame,
                Styling {
                    spacing: Some(Spacing {
                        layout_mode: Some("VERTICAL".into()),
                        padding_top: Some(16.0),
                        padding_left: Some(12.0),
                        item_spacing: Some(8.0),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            ),
            label("heading", "Checkout", 24.0),
            node(
                "photo",
                NodeKind::Ellipse,
                Styling {
                    image_refs: vec!["ref-1".into()],
                    ..Default::default()
                },
            ),
            node("wrapper", NodeKind::Group, Styling::default()),
        ]
    }

    fn tokens() -> DesignTokenSet {
        let mut tokens = DesignTokenSet::default();
        tokens.colors.insert("#00aa55".into());
        tokens.font_families.insert("Inter".into());
        tokens
    }

    fn target_of(component: &ValidatedComponent, node: Option<&ComponentDescriptor>) -> TargetKind {
        select_target(&TargetInput::new(component, node))
    }

    #[test]
    fn target_rules_apply_in_order() {
        let ds = descriptors();
        let button = component("b", "Pay Button", SemanticType::Other, 48.0, &["btn-bg"]);
        assert_eq!(target_of(&button, Some(&ds[0])), TargetKind::Button);

        let card = component("c", "Visa", SemanticType::Container, 80.0, &["card"]);
        assert_eq!(target_of(&card, Some(&ds[2])), TargetKind::Card);

        let heading = component("h", "Screen", SemanticType::Other, 30.0, &["heading"]);
        assert_eq!(target_of(&heading, Some(&ds[3])), TargetKind::Typography);

        let photo = component("p", "Avatar", SemanticType::Other, 40.0, &["photo"]);
        assert_eq!(target_of(&photo, Some(&ds[4])), TargetKind::Image);

        let nav = component("n", "Top", SemanticType::Navigation, 56.0, &["wrapper"]);
        assert_eq!(target_of(&nav, Some(&ds[5])), TargetKind::AppBar);

        let field = component("f", "Email", SemanticType::Input, 56.0, &[]);
        assert_eq!(target_of(&field, None), TargetKind::TextField);

        let wrapper = component("w", "Wrapper", SemanticType::Other, 56.0, &["wrapper"]);
        assert_eq!(target_of(&wrapper, Some(&ds[5])), TargetKind::Box);
        assert_eq!(target_of(&wrapper, None), TargetKind::Box);
    }

    #[test]
    fn button_styles_and_props() {
        let ds = descriptors();
        let components = vec![component(
            "pay",
            "Pay Button",
            SemanticType::Button,
            64.0,
            &["btn-bg", "btn-label"],
        )];
        let mapped = StyleMapper::new().map(&components, &ds, &tokens(), &HashMap::new());
        let pay = &mapped[0];

        assert_eq!(pay.target_component, "Button");
        assert_eq!(pay.props.get("variant"), Some(&json!("contained")));
        assert_eq!(pay.props.get("size"), Some(&json!("large")));
        assert_eq!(pay.content.as_deref(), Some("Pay $96"));
        assert!(!pay.content_inferred);
        assert_eq!(pay.source_node_id.as_deref(), Some("btn-bg"));

        let style = &pay.style_attributes;
        assert_eq!(style.min_width.as_deref(), Some("343px"));
        assert_eq!(style.min_height.as_deref(), Some("64px"));
        assert!(style.width.is_none());
        assert_eq!(style.background_color.as_deref(), Some("#ff8000"));
        assert_eq!(style.color.as_deref(), Some("#ffffff"));
        assert_eq!(style.font_size.as_deref(), Some("16px"));
        assert_eq!(style.font_weight.as_deref(), Some("700"));
        assert_eq!(style.border_radius.as_deref(), Some("8px"));
        assert_eq!(style.box_shadow, vec!["0px 2px 4px 0px rgba(0, 0, 0, 0.25)"]);
    }

    #[test]
    fn selected_card_gets_primary_border_and_padding() {
        let ds = descriptors();
        let mut card = component("card-1", "Selected card", SemanticType::Card, 80.0, &["card"]);
        card.properties.insert("section".into(), Value::from("middle"));
        let mapped = StyleMapper::new().map(&[card], &ds, &tokens(), &HashMap::new());
        let card = &mapped[0];

        assert_eq!(card.target_component, "Card");
        assert_eq!(card.props.get("selected"), Some(&json!(true)));
        let style = &card.style_attributes;
        assert_eq!(style.border_width.as_deref(), Some("2px"));
        assert_eq!(style.border_style.as_deref(), Some("solid"));
        assert_eq!(style.border_color.as_deref(), Some("#00aa55"));
        assert_eq!(style.padding.as_deref(), Some("16px 0px 0px 12px"));
        assert_eq!(style.gap.as_deref(), Some("8px"));

        let plain = component("card-2", "Visa", SemanticType::Card, 80.0, &["card"]);
        let mapped = StyleMapper::new().map(&[plain], &ds, &DesignTokenSet::default(), &HashMap::new());
        assert!(mapped[0].props.get("selected").is_none());
    }

    #[test]
    fn content_priority_and_inference() {
        let ds = descriptors();
        let total = component("total", "Total Amount", SemanticType::Other, 30.0, &["wrapper"]);
        let cta = component("cta", "place order button", SemanticType::Button, 48.0, &[]);
        let mut described = component("d", "Note", SemanticType::Text, 20.0, &[]);
        described
            .properties
            .insert("text".into(), Value::from("Free shipping"));
        let heading = component("h", "Heading", SemanticType::Text, 30.0, &["heading"]);

        let overrides = HashMap::from([("heading".to_string(), "Review order".to_string())]);
        let mapped = StyleMapper::new()
            .with_content_overrides(overrides)
            .map(
                &[total, cta, described, heading],
                &ds,
                &tokens(),
                &HashMap::new(),
            );

        assert_eq!(mapped[0].content.as_deref(), Some("$0.00"));
        assert!(mapped[0].content_inferred);
        assert_eq!(mapped[1].content.as_deref(), Some("Place Order"));
        assert!(mapped[1].content_inferred);
        assert_eq!(mapped[1].props.get("variant"), Some(&json!("contained")));
        assert_eq!(mapped[1].props.get("size"), Some(&json!("medium")));
        assert_eq!(mapped[2].content.as_deref(), Some("Free shipping"));
        assert_eq!(mapped[2].style_attributes.font_family.as_deref(), Some("Inter"));
        assert_eq!(mapped[3].content.as_deref(), Some("Review order"));
        assert!(!mapped[3].content_inferred);
        assert_eq!(mapped[3].props.get("variant"), Some(&json!("h5")));
    }

    #[test]
    fn typography_without_text_node_takes_first_discovered_family() {
        let mut tokens = DesignTokenSet::default();
        tokens.font_families.insert("Roboto".into());
        tokens.font_families.insert("Inter".into());
        let note = component("n", "Note", SemanticType::Text, 20.0, &[]);

        let mapped = StyleMapper::new().map(&[note], &descriptors(), &tokens, &HashMap::new());
        assert_eq!(mapped[0].target_component, "Typography");
        assert_eq!(mapped[0].style_attributes.font_family.as_deref(), Some("Roboto"));
    }

    #[test]
    fn image_url_resolves_by_node_then_reference() {
        let ds = descriptors();
        let photo = component("p", "Profile", SemanticType::Image, 40.0, &["photo"]);

        let by_ref = HashMap::from([("ref-1".to_string(), "https://cdn/a.png".to_string())]);
        let mapped = StyleMapper::new().map(std::slice::from_ref(&photo), &ds, &tokens(), &by_ref);
        assert_eq!(mapped[0].target_component, "Box");
        assert_eq!(mapped[0].props.get("component"), Some(&json!("img")));
        assert_eq!(mapped[0].image_url.as_deref(), Some("https://cdn/a.png"));

        let mut both = by_ref.clone();
        both.insert("photo".into(), "https://cdn/node.png".into());
        let mapped = StyleMapper::new().map(&[photo], &ds, &tokens(), &both);
        assert_eq!(mapped[0].image_url.as_deref(), Some("https://cdn/node.png"));
    }

    #[test]
    fn mapping_is_idempotent() {
        let ds = descriptors();
        let components = vec![
            component("pay", "Pay", SemanticType::Button, 48.0, &["btn-bg", "btn-label"]),
            component("card", "Card", SemanticType::Card, 80.0, &["card"]),
            component("h", "Title", SemanticType::Text, 30.0, &["heading"]),
        ];
        let mapper = StyleMapper::new();
        let first = mapper.map(&components, &ds, &tokens(), &HashMap::new());
        let second = mapper.map(&components, &ds, &tokens(), &HashMap::new());
        assert_eq!(first, second);
        assert_eq!(first.len(), components.len());
    }
}
