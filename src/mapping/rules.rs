//! Ordered target-component rules; the first matching predicate wins.

use crate::spatial::tokenize;
use crate::types::{ComponentDescriptor, NodeKind, SemanticType, ValidatedComponent};

const BUTTON_WORDS: &[&str] = &[
    "button", "btn", "cta", "action", "submit", "confirm", "pay", "continue", "checkout", "buy",
];
const CARD_WORDS: &[&str] = &["card", "visa", "mastercard", "paypal", "payment", "method"];
const TYPOGRAPHY_WORDS: &[&str] = &[
    "label", "title", "total", "heading", "subtitle", "caption", "text",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Button,
    Card,
    Typography,
    Image,
    AppBar,
    TextField,
    List,
    Box,
}

impl TargetKind {
    pub fn component_name(&self) -> &'static str {
        match self {
            TargetKind::Button => "Button",
            TargetKind::Card => "Card",
            TargetKind::Typography => "Typography",
            // rendered as a Box with `component: "img"`
            TargetKind::Image | TargetKind::Box => "Box",
            TargetKind::AppBar => "AppBar",
            TargetKind::TextField => "TextField",
            TargetKind::List => "List",
        }
    }
}

/// What a rule may look at.
pub struct TargetInput<'a> {
    pub component: &'a ValidatedComponent,
    /// Descriptor for the component's `sourceNodeId`
    pub node: Option<&'a ComponentDescriptor>,
    name_tokens: Vec<String>,
}

impl<'a> TargetInput<'a> {
    pub fn new(component: &'a ValidatedComponent, node: Option<&'a ComponentDescriptor>) -> Self {
        Self {
            component,
            node,
            name_tokens: tokenize(&component.name),
        }
    }

    pub fn name_has(&self, words: &[&str]) -> bool {
        self.name_tokens
            .iter()
            .any(|token| words.contains(&token.as_str()))
    }

    fn is_type(&self, semantic_type: SemanticType) -> bool {
        self.component.component_type == semantic_type
    }

    fn node_kind(&self) -> Option<NodeKind> {
        self.node.map(|n| n.kind)
    }
}

pub type TargetRule = (fn(&TargetInput<'_>) -> bool, TargetKind);

pub const TARGET_RULES: &[TargetRule] = &[
    (is_button, TargetKind::Button),
    (is_card, TargetKind::Card),
    (is_typography, TargetKind::Typography),
    (is_image, TargetKind::Image),
    (is_navigation, TargetKind::AppBar),
    (is_input, TargetKind::TextField),
    (is_list, TargetKind::List),
    (is_layout_node, TargetKind::Box),
];

fn is_button(input: &TargetInput<'_>) -> bool {
    input.is_type(SemanticType::Button) || input.name_has(BUTTON_WORDS)
}

fn is_card(input: &TargetInput<'_>) -> bool {
    input.is_type(SemanticType::Card) || input.name_has(CARD_WORDS)
}

fn is_typography(input: &TargetInput<'_>) -> bool {
    input.is_type(SemanticType::Text)
        || input.node_kind() == Some(NodeKind::Text)
        || input.name_has(TYPOGRAPHY_WORDS)
}

fn is_image(input: &TargetInput<'_>) -> bool {
    let image_shape = input.node.is_some_and(|n| {
        matches!(n.kind, NodeKind::Rectangle | NodeKind::Ellipse) && n.has_image_fill()
    });
    image_shape || input.is_type(SemanticType::Image)
}

fn is_navigation(input: &TargetInput<'_>) -> bool {
    input.is_type(SemanticType::Navigation)
}

fn is_input(input: &TargetInput<'_>) -> bool {
    input.is_type(SemanticType::Input)
}

fn is_list(input: &TargetInput<'_>) -> bool {
    input.is_type(SemanticType::List)
}

fn is_layout_node(input: &TargetInput<'_>) -> bool {
    matches!(input.node_kind(), Some(NodeKind::Frame | NodeKind::Group))
}

pub fn select_target(input: &TargetInput<'_>) -> TargetKind {
    TARGET_RULES
        .iter()
        .find(|(predicate, _)| predicate(input))
        .map(|(_, kind)| *kind)
        .unwrap_or(TargetKind::Box)
}
