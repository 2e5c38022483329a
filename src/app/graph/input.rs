use eframe::egui::{self, Rect, Ui};

use crate::graph::PointerEvent;

/// Translates this frame's egui pointer state into graph pointer events.
/// Touch input arrives here already emulated as the primary pointer.
pub(in crate::app) fn collect_pointer_events(
    ui: &Ui,
    canvas: Rect,
    hud: Rect,
    response: &egui::Response,
    dragging: bool,
) -> Vec<PointerEvent> {
    let over_canvas = response.contains_pointer() || response.hovered();

    ui.input(|input| {
        let pointer = &input.pointer;
        let mut events = Vec::new();

        if pointer.primary_pressed()
            && let Some(origin) = pointer.press_origin()
            && canvas.contains(origin)
            && !hud.contains(origin)
            && over_canvas
        {
            events.push(PointerEvent::Down(origin));
        }

        match pointer.latest_pos() {
            Some(position) if dragging || pointer.is_moving() => {
                events.push(PointerEvent::Move(position));
            }
            None if dragging => events.push(PointerEvent::Leave),
            _ => {}
        }

        if pointer.primary_released() {
            events.push(PointerEvent::Up);
        }

        if pointer.button_double_clicked(egui::PointerButton::Primary)
            && let Some(position) = pointer.interact_pos()
            && canvas.contains(position)
            && !hud.contains(position)
        {
            events.push(PointerEvent::DoubleClick(position));
        }

        let scroll = input.raw_scroll_delta.y;
        if over_canvas && scroll.abs() > f32::EPSILON {
            events.push(PointerEvent::Wheel { delta_y: -scroll });
        }

        events
    })
}
