//! Core types used throughout the DCA library.
//!
//! This module contains the fundamental building blocks shared by every stage:
//! - [`Bounds`] - Absolute element geometry
//! - [`NodeKind`] - Structural node classification
//! - [`SemanticType`] - Semantic component classification
//! - [`ResultSource`] - Whether a stage result came from a model or a heuristic

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rectangle bounds for an element, in absolute design coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Euclidean distance between the centers of two rectangles.
    pub fn center_distance(&self, other: &Bounds) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }

    /// Distance from a point to this rectangle; zero when the point is inside.
    pub fn distance_to_point(&self, px: f32, py: f32) -> f32 {
        let dx = (self.x - px).max(0.0).max(px - self.right());
        let dy = (self.y - py).max(0.0).max(py - self.bottom());
        (dx * dx + dy * dy).sqrt()
    }

    /// True when `other` lies entirely within `self` (edges may touch).
    pub fn contains(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Bounds::new(x, y, right - x, bottom - y)
    }

    /// Union of an iterator of bounds, `None` when empty.
    pub fn union_all<'a>(mut iter: impl Iterator<Item = &'a Bounds>) -> Option<Bounds> {
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, b| acc.union(b)))
    }

    /// Largest absolute difference between corresponding edges.
    pub fn max_edge_delta(&self, other: &Bounds) -> f32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.right() - other.right()).abs())
            .max((self.bottom() - other.bottom()).abs())
    }
}

/// Structural classification of a design node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Text,
    Rectangle,
    Ellipse,
    Frame,
    Group,
    Component,
    Instance,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Rectangle => "rectangle",
            NodeKind::Ellipse => "ellipse",
            NodeKind::Frame => "frame",
            NodeKind::Group => "group",
            NodeKind::Component => "component",
            NodeKind::Instance => "instance",
        }
    }

    /// Containers that can carry auto-layout and padding.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Frame | NodeKind::Group | NodeKind::Component | NodeKind::Instance
        )
    }

    /// Box-shaped nodes that commonly render interactive surfaces.
    pub fn is_rectangle_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Rectangle | NodeKind::Frame | NodeKind::Component | NodeKind::Instance
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic classification of a group of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Button,
    Text,
    Card,
    Navigation,
    Input,
    List,
    Image,
    Container,
    Other,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Button => "button",
            SemanticType::Text => "text",
            SemanticType::Card => "card",
            SemanticType::Navigation => "navigation",
            SemanticType::Input => "input",
            SemanticType::List => "list",
            SemanticType::Image => "image",
            SemanticType::Container => "container",
            SemanticType::Other => "other",
        }
    }

    /// Lenient parse used on model output; unknown labels become `Other`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "button" | "cta" | "action" => SemanticType::Button,
            "text" | "label" | "heading" | "typography" => SemanticType::Text,
            "card" => SemanticType::Card,
            "navigation" | "nav" | "navbar" | "header" | "appbar" | "tabbar" => {
                SemanticType::Navigation
            }
            "input" | "textfield" | "field" | "form" => SemanticType::Input,
            "list" => SemanticType::List,
            "image" | "icon" | "avatar" | "logo" => SemanticType::Image,
            "container" | "section" | "box" => SemanticType::Container,
            _ => SemanticType::Other,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            SemanticType::Button | SemanticType::Input | SemanticType::Navigation
        )
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a stage result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Parsed from an external reasoning-model response
    Model,
    /// Derived by the deterministic fallback path
    Heuristic,
}

/// Lower bound applied to every produced confidence value.
pub const MIN_CONFIDENCE: f32 = 0.1;
/// Upper bound applied to every produced confidence value.
pub const MAX_CONFIDENCE: f32 = 1.0;

/// Clamp a confidence into `[0.1, 1.0]`; NaN maps to the lower bound.
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        return MIN_CONFIDENCE;
    }
    value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}
