use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::util::stable_unit;

pub(super) const CANVAS_COLOR: Color32 = Color32::from_rgb(15, 23, 42);
pub(super) const NODE_COLOR: Color32 = Color32::from_rgb(30, 41, 59);
pub(super) const NODE_HOVER_COLOR: Color32 = Color32::from_rgb(51, 65, 85);
pub(super) const NODE_BORDER_COLOR: Color32 = Color32::from_rgb(71, 85, 105);
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(244, 63, 94);
pub(super) const SELECTED_BORDER_COLOR: Color32 = Color32::from_rgb(253, 164, 175);
pub(super) const SEARCH_MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * amount) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Muted hue per category so clusters read at a glance.
pub(super) fn category_color(category: &str) -> Color32 {
    let hue = stable_unit(category) * 6.0;
    let sector = hue.floor() as i32;
    let fraction = hue - hue.floor();
    let (high, low) = (225.0, 95.0);
    let rising = low + (high - low) * fraction;
    let falling = high - (high - low) * fraction;

    let (r, g, b) = match sector.rem_euclid(6) {
        0 => (high, rising, low),
        1 => (falling, high, low),
        2 => (low, high, rising),
        3 => (low, falling, high),
        4 => (rising, low, high),
        _ => (high, low, falling),
    };
    Color32::from_rgb(r as u8, g as u8, b as u8)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, offset: Vec2, scale: f32) {
    painter.rect_filled(rect, 0.0, CANVAS_COLOR);

    let step = (48.0 * scale.clamp(0.5, 2.0)).max(16.0);
    let origin = rect.center() + offset;
    let dot = Color32::from_rgba_unmultiplied(100, 116, 139, 60);

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
        while x < rect.right() {
            painter.circle_filled(Pos2::new(x, y), 1.1, dot);
            x += step;
        }
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, center: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(center)
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    Rect::from_two_pos(start, end)
        .expand(padding)
        .intersects(rect)
}

pub(super) fn link_stroke(scale: f32) -> Stroke {
    Stroke::new(
        (1.5 * scale).clamp(0.5, 4.5),
        Color32::from_rgba_unmultiplied(255, 255, 255, 102),
    )
}
