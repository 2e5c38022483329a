use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, vec2};

use crate::graph::{BUTTON_ZOOM_STEP, DragState, GraphIntent, hit_test};
use crate::util::truncate_chars;

use super::super::render_utils::{
    NODE_BORDER_COLOR, NODE_COLOR, NODE_HOVER_COLOR, SEARCH_MATCH_COLOR, SELECTED_BORDER_COLOR,
    SELECTED_COLOR, blend_color, category_color, circle_visible, draw_background, link_stroke,
    segment_visible, with_alpha,
};
use super::super::{ActiveView, ViewModel};
use super::input::collect_pointer_events;

const HUD_BUTTON_SIZE: f32 = 28.0;
const HUD_GAP: f32 = 6.0;
const HUD_MARGIN: f32 = 10.0;
const HUD_BUTTON_COUNT: usize = 3;

fn hud_rect(canvas: Rect) -> Rect {
    let width = HUD_BUTTON_SIZE * HUD_BUTTON_COUNT as f32 + HUD_GAP * (HUD_BUTTON_COUNT - 1) as f32;
    Rect::from_min_size(
        canvas.right_top() + vec2(-(width + HUD_MARGIN), HUD_MARGIN),
        vec2(width, HUD_BUTTON_SIZE),
    )
}

fn hud_button_rect(hud: Rect, slot: usize) -> Rect {
    Rect::from_min_size(
        hud.left_top() + vec2((HUD_BUTTON_SIZE + HUD_GAP) * slot as f32, 0.0),
        vec2(HUD_BUTTON_SIZE, HUD_BUTTON_SIZE),
    )
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let search_matches = self.cached_search_matches();
        let live_physics = self.live_physics;

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let hud = hud_rect(rect);

        let ActiveView::Graph(session) = &mut self.view else {
            return;
        };

        let painter = ui.painter_at(rect);
        draw_background(
            &painter,
            rect,
            session.viewport().offset(),
            session.viewport().scale(),
        );

        let mut intent = None;
        let events =
            collect_pointer_events(ui, rect, hud, &response, session.router().is_dragging());
        for event in events {
            if let Some(next) = session.handle(event, rect) {
                intent = Some(next);
            }
        }

        let draw_list = session.frame(rect, live_physics);
        let simulation = session.simulation();
        let viewport = session.viewport();
        let scale = viewport.scale();

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| response.contains_pointer() && !hud.contains(*pointer))
            .and_then(|pointer| hit_test(simulation, viewport, rect, pointer));
        let hovered_index = hovered.as_ref().and_then(|id| simulation.index_of(id));

        let search_active = search_matches.is_some();
        let matched = search_matches
            .iter()
            .flat_map(|matches| matches.iter())
            .filter_map(|id| simulation.index_of(id))
            .collect::<HashSet<_>>();

        if simulation.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No notes in this collection yet.",
                FontId::proportional(15.0),
                Color32::from_gray(180),
            );
        }

        let stroke = link_stroke(scale);
        for line in &draw_list.links {
            if !segment_visible(rect, line.start, line.end, stroke.width) {
                continue;
            }
            let line_stroke = if search_active
                && !matched.contains(&line.from)
                && !matched.contains(&line.to)
            {
                Stroke::new(stroke.width, with_alpha(stroke.color, 36))
            } else {
                stroke
            };
            painter.line_segment([line.start, line.end], line_stroke);
        }

        for shape in &draw_list.nodes {
            if !circle_visible(rect, shape.center, shape.radius + 4.0) {
                continue;
            }

            let node = &simulation.nodes()[shape.index];
            let is_hovered = hovered_index == Some(shape.index);
            let is_match = matched.contains(&shape.index);

            let mut fill = if shape.selected {
                SELECTED_COLOR
            } else if is_hovered {
                NODE_HOVER_COLOR
            } else {
                NODE_COLOR
            };
            if is_match && !shape.selected {
                fill = blend_color(fill, SEARCH_MATCH_COLOR, 0.55);
            } else if search_active && !shape.selected {
                fill = with_alpha(fill, 140);
            }

            let border = if shape.selected {
                SELECTED_BORDER_COLOR
            } else {
                blend_color(NODE_BORDER_COLOR, category_color(&node.category), 0.7)
            };

            painter.circle_filled(shape.center, shape.radius, fill);
            painter.circle_stroke(
                shape.center,
                shape.radius,
                Stroke::new((2.0 * scale).clamp(1.0, 3.0), border),
            );
            if shape.selected {
                painter.circle_stroke(
                    shape.center,
                    shape.radius + 4.0,
                    Stroke::new(2.0, with_alpha(SELECTED_COLOR, 140)),
                );
            }

            let show_label =
                shape.selected || is_hovered || is_match || shape.radius > 14.0 || scale > 1.2;
            if show_label {
                painter.text(
                    shape.center + vec2(0.0, shape.radius + 4.0),
                    Align2::CENTER_TOP,
                    truncate_chars(&node.title, 28),
                    FontId::proportional(12.0 * scale.clamp(0.8, 1.3)),
                    Color32::from_gray(226),
                );
            }
        }

        if let Some(index) = hovered_index {
            let node = &simulation.nodes()[index];
            painter.text(
                rect.left_top() + vec2(HUD_MARGIN, HUD_MARGIN),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  links {}",
                    node.title,
                    node.category,
                    node.links.len()
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        match session.router().drag_state() {
            DragState::DraggingCanvas { .. } | DragState::DraggingNode { .. } => {
                ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
            }
            DragState::Idle if hovered.is_some() => {
                ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
            }
            DragState::Idle => {}
        }

        let zoom_in = ui
            .put(hud_button_rect(hud, 0), egui::Button::new("+"))
            .on_hover_text("Zoom in");
        let zoom_out = ui
            .put(hud_button_rect(hud, 1), egui::Button::new("-"))
            .on_hover_text("Zoom out");
        let reset = ui
            .put(hud_button_rect(hud, 2), egui::Button::new("R"))
            .on_hover_text("Reset pan and zoom");
        if zoom_in.clicked() {
            session.viewport_mut().zoom_by(BUTTON_ZOOM_STEP);
        }
        if zoom_out.clicked() {
            session.viewport_mut().zoom_by(-BUTTON_ZOOM_STEP);
        }
        if reset.clicked() {
            session.reset_view();
        }

        // The frame loop runs for as long as the graph is mounted.
        ui.ctx().request_repaint();

        self.hovered = hovered;
        if let Some(GraphIntent::OpenNote(id)) = intent {
            self.open_note(id);
        }
    }
}
