//! Resolve per-node styling from raw Figma paints, styles and effects.

use crate::figma::{FigmaEffect, FigmaNodeData, FigmaPaintData, FigmaTypeStyle};
use crate::types::{
    Borders, ColorStyling, NodeKind, Shadow, ShadowKind, Spacing, Styling, Typography,
};

const DEFAULT_SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.25)";
/// CSS default direction (top to bottom) when a gradient carries no geometry.
const DEFAULT_GRADIENT_ANGLE: f32 = 180.0;

pub fn resolve_styling(node: &FigmaNodeData, kind: NodeKind) -> Styling {
    let fill_color = first_solid_color(&node.fills);

    let colors = ColorStyling {
        background: if kind == NodeKind::Text {
            None
        } else {
            fill_color.clone()
        },
        text: if kind == NodeKind::Text {
            fill_color
        } else {
            None
        },
        border: first_solid_color(&node.strokes),
        gradient: node
            .fills
            .iter()
            .filter(|p| p.is_visible())
            .find_map(gradient_to_css),
    };

    let typography = match kind {
        NodeKind::Text => node.style.as_ref().map(resolve_typography),
        _ => None,
    };

    let spacing = if kind.is_container() {
        resolve_spacing(node)
    } else {
        None
    };

    let borders = match kind {
        NodeKind::Text => None,
        _ => resolve_borders(node),
    };

    Styling {
        colors,
        typography,
        spacing,
        borders,
        shadows: node.effects.iter().filter_map(resolve_shadow).collect(),
        image_refs: image_refs(&node.fills),
    }
}

/// First visible solid paint as `#rrggbb`.
pub fn first_solid_color(paints: &[FigmaPaintData]) -> Option<String> {
    paints
        .iter()
        .filter(|p| p.is_visible() && p.paint_type.eq_ignore_ascii_case("SOLID"))
        .find_map(|p| p.color.map(|c| c.to_hex()))
}

fn image_refs(paints: &[FigmaPaintData]) -> Vec<String> {
    paints
        .iter()
        .filter(|p| p.is_visible() && p.paint_type.eq_ignore_ascii_case("IMAGE"))
        .filter_map(|p| p.image_ref.clone())
        .collect()
}

fn resolve_typography(style: &FigmaTypeStyle) -> Typography {
    Typography {
        font_family: style.font_family.clone(),
        font_size: style.font_size,
        font_weight: style.font_weight,
        line_height: style.line_height_px,
        letter_spacing: style.letter_spacing,
        text_align: style
            .text_align_horizontal
            .as_ref()
            .map(|a| a.to_ascii_lowercase()),
    }
}

fn resolve_spacing(node: &FigmaNodeData) -> Option<Spacing> {
    let spacing = Spacing {
        layout_mode: node
            .layout_mode
            .clone()
            .filter(|m| !m.eq_ignore_ascii_case("NONE")),
        padding_top: node.padding_top,
        padding_right: node.padding_right,
        padding_bottom: node.padding_bottom,
        padding_left: node.padding_left,
        item_spacing: node.item_spacing,
    };
    if spacing.layout_mode.is_none() && !spacing.has_padding() && spacing.item_spacing.is_none() {
        None
    } else {
        Some(spacing)
    }
}

fn resolve_borders(node: &FigmaNodeData) -> Option<Borders> {
    let color = first_solid_color(&node.strokes);
    let width = color.as_ref().and(node.stroke_weight);
    let borders = Borders {
        width,
        color,
        radius: node.corner_radius.filter(|r| *r > 0.0),
        corner_radii: node
            .rectangle_corner_radii
            .filter(|radii| radii.iter().any(|r| *r > 0.0)),
    };
    if borders == Borders::default() {
        None
    } else {
        Some(borders)
    }
}

fn resolve_shadow(effect: &FigmaEffect) -> Option<Shadow> {
    if !effect.visible.unwrap_or(true) {
        return None;
    }
    let kind = match effect.effect_type.to_ascii_uppercase().as_str() {
        "DROP_SHADOW" => ShadowKind::Drop,
        "INNER_SHADOW" => ShadowKind::Inner,
        _ => return None,
    };
    let (offset_x, offset_y) = effect.offset.map(|o| (o.x, o.y)).unwrap_or((0.0, 0.0));
    Some(Shadow {
        kind,
        color: effect
            .color
            .map(|c| c.to_rgba())
            .unwrap_or_else(|| DEFAULT_SHADOW_COLOR.to_string()),
        offset_x,
        offset_y,
        blur: effect.radius,
        spread: effect.spread.unwrap_or(0.0),
    })
}

/// CSS angle for a linear gradient, snapped to the nearest 45 degrees.
pub fn gradient_angle(paint: &FigmaPaintData) -> f32 {
    let raw = if let Some(m) = paint.gradient_transform {
        Some(m[1][0].atan2(m[0][0]).to_degrees() + 90.0)
    } else if let [start, end, ..] = paint.gradient_handle_positions.as_slice() {
        let (dx, dy) = (end.x - start.x, end.y - start.y);
        if dx == 0.0 && dy == 0.0 {
            None
        } else {
            Some(dy.atan2(dx).to_degrees() + 90.0)
        }
    } else {
        None
    };

    match raw.filter(|a| a.is_finite()) {
        Some(angle) => {
            let normalized = angle.rem_euclid(360.0);
            ((normalized / 45.0).round() * 45.0).rem_euclid(360.0)
        }
        None => DEFAULT_GRADIENT_ANGLE,
    }
}

/// `linear-gradient(<angle>deg, <hex> <pct>%, ...)` for a linear gradient paint.
pub fn gradient_to_css(paint: &FigmaPaintData) -> Option<String> {
    if !paint.paint_type.eq_ignore_ascii_case("GRADIENT_LINEAR") || paint.gradient_stops.is_empty()
    {
        return None;
    }
    let stops: Vec<String> = paint
        .gradient_stops
        .iter()
        .map(|stop| {
            format!(
                "{} {}%",
                stop.color.to_hex(),
                (stop.position.clamp(0.0, 1.0) * 100.0).round() as i32
            )
        })
        .collect();
    Some(format!(
        "linear-gradient({}deg, {})",
        gradient_angle(paint) as i32,
        stops.join(", ")
    ))
}
