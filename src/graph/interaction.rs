use eframe::egui::{Pos2, Rect, TouchPhase, Vec2};
use log::debug;

use super::physics::Simulation;
use super::viewport::Viewport;
use crate::notes::NoteId;

/// Pointer travel in screen pixels below which a node press counts as a click.
pub const CLICK_SLOP: f32 = 3.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    DraggingCanvas {
        start_pointer: Pos2,
        start_offset: Vec2,
    },
    DraggingNode {
        id: NoteId,
        start_pointer: Pos2,
        travelled: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up,
    Leave,
    Wheel { delta_y: f32 },
    DoubleClick(Pos2),
}

/// How a drag ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gesture {
    None,
    Panned,
    NodeClicked(NoteId),
    NodeDragged(NoteId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphIntent {
    OpenNote(NoteId),
}

/// Maps single-touch input onto pointer events using the first touch point.
pub fn touch_to_pointer(phase: TouchPhase, touches: &[Pos2]) -> Option<PointerEvent> {
    match phase {
        TouchPhase::Start => touches.first().copied().map(PointerEvent::Down),
        TouchPhase::Move => touches.first().copied().map(PointerEvent::Move),
        TouchPhase::End => Some(PointerEvent::Up),
        TouchPhase::Cancel => Some(PointerEvent::Leave),
    }
}

/// Nearest node whose rendered circle contains `pointer`.
pub fn hit_test(
    simulation: &Simulation,
    viewport: &Viewport,
    container: Rect,
    pointer: Pos2,
) -> Option<NoteId> {
    let point = viewport.screen_to_simulation(pointer, container);
    simulation
        .nodes()
        .iter()
        .filter_map(|node| {
            let distance = (node.position - point).length();
            (distance <= node.radius()).then_some((node, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(node, _)| node.id.clone())
}

#[derive(Debug, Default)]
pub struct InteractionRouter {
    drag: DragState,
    selected: Option<NoteId>,
}

impl InteractionRouter {
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    /// Node currently held by the pointer; the layout engine must skip it.
    pub fn pinned_node(&self) -> Option<&NoteId> {
        match &self.drag {
            DragState::DraggingNode { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&NoteId> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, id: Option<NoteId>) {
        self.selected = id;
    }

    /// Drops the selection and any node drag that refer to notes no longer in
    /// the simulation. Returns `true` when the selection was cleared.
    pub fn forget_missing(&mut self, simulation: &Simulation) -> bool {
        if let DragState::DraggingNode { id, .. } = &self.drag
            && simulation.index_of(id).is_none()
        {
            self.drag = DragState::Idle;
        }

        match &self.selected {
            Some(id) if simulation.index_of(id).is_none() => {
                debug!("selected note {id} disappeared; clearing selection");
                self.selected = None;
                true
            }
            _ => false,
        }
    }

    pub fn pointer_down(
        &mut self,
        pointer: Pos2,
        container: Rect,
        viewport: &Viewport,
        simulation: &Simulation,
    ) {
        if self.is_dragging() {
            self.pointer_up();
        }

        self.drag = match hit_test(simulation, viewport, container, pointer) {
            Some(id) => {
                self.selected = Some(id.clone());
                DragState::DraggingNode {
                    id,
                    start_pointer: pointer,
                    travelled: 0.0,
                }
            }
            None => DragState::DraggingCanvas {
                start_pointer: pointer,
                start_offset: viewport.offset(),
            },
        };
    }

    pub fn pointer_move(
        &mut self,
        pointer: Pos2,
        container: Rect,
        viewport: &mut Viewport,
        simulation: &mut Simulation,
    ) {
        match &mut self.drag {
            DragState::Idle => {}
            DragState::DraggingCanvas {
                start_pointer,
                start_offset,
            } => {
                viewport.set_offset(*start_offset + (pointer - *start_pointer));
            }
            DragState::DraggingNode {
                id,
                start_pointer,
                travelled,
            } => {
                *travelled = travelled.max(pointer.distance(*start_pointer));
                let target = viewport.screen_to_simulation(pointer, container);
                if !simulation.place_node(id, target) {
                    self.drag = DragState::Idle;
                }
            }
        }
    }

    /// Ends any drag. Pointer leave is handled the same way.
    pub fn pointer_up(&mut self) -> Gesture {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => Gesture::None,
            DragState::DraggingCanvas { .. } => Gesture::Panned,
            DragState::DraggingNode { id, travelled, .. } => {
                if travelled <= CLICK_SLOP {
                    Gesture::NodeClicked(id)
                } else {
                    Gesture::NodeDragged(id)
                }
            }
        }
    }

    pub fn double_click(
        &mut self,
        pointer: Pos2,
        container: Rect,
        viewport: &Viewport,
        simulation: &Simulation,
    ) -> Option<GraphIntent> {
        let id = hit_test(simulation, viewport, container, pointer)?;
        self.selected = Some(id.clone());
        Some(GraphIntent::OpenNote(id))
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::graph::physics::PhysicsConfig;
    use crate::notes::Note;

    fn container() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(1000.0, 800.0))
    }

    fn setup() -> (InteractionRouter, Viewport, Simulation) {
        let notes = vec![
            Note::new(1, "a", "x").with_links([2]),
            Note::new(2, "b", "x").with_links([1]),
        ];
        let mut simulation = Simulation::new(PhysicsConfig::default());
        simulation.synchronize(&notes, &mut StdRng::seed_from_u64(3));
        simulation.place_node(&NoteId::Int(1), vec2(0.0, 0.0));
        simulation.place_node(&NoteId::Int(2), vec2(200.0, 0.0));
        (InteractionRouter::default(), Viewport::default(), simulation)
    }

    #[test]
    fn press_on_empty_canvas_pans() {
        let (mut router, mut viewport, mut simulation) = setup();
        let start = container().center() + vec2(0.0, 300.0);

        router.pointer_down(start, container(), &viewport, &simulation);
        assert!(matches!(router.drag_state(), DragState::DraggingCanvas { .. }));
        router.pointer_move(start + vec2(30.0, -10.0), container(), &mut viewport, &mut simulation);
        router.pointer_move(start + vec2(50.0, 20.0), container(), &mut viewport, &mut simulation);

        assert_eq!(viewport.offset(), vec2(50.0, 20.0));
        assert_eq!(router.pointer_up(), Gesture::Panned);
        assert_eq!(router.selected(), None);
    }

    #[test]
    fn press_on_node_selects_and_pins_it() {
        let (mut router, mut viewport, mut simulation) = setup();
        let on_node = container().center() + vec2(200.0, 5.0);

        router.pointer_down(on_node, container(), &viewport, &simulation);

        assert_eq!(router.selected(), Some(&NoteId::Int(2)));
        assert_eq!(router.pinned_node(), Some(&NoteId::Int(2)));

        router.pointer_move(on_node + vec2(1.0, 1.0), container(), &mut viewport, &mut simulation);
        assert_eq!(router.pointer_up(), Gesture::NodeClicked(NoteId::Int(2)));
        assert_eq!(router.pinned_node(), None);
        assert_eq!(router.selected(), Some(&NoteId::Int(2)));
    }

    #[test]
    fn dragged_node_ignores_physics_until_release() {
        let (mut router, mut viewport, mut simulation) = setup();
        viewport.zoom_by(0.5);
        viewport.pan_by(vec2(40.0, -30.0));
        let id = NoteId::Int(1);
        let grab = viewport.simulation_to_screen(Vec2::ZERO, container());

        router.pointer_down(grab, container(), &viewport, &simulation);
        let pointer = grab + vec2(120.0, 60.0);
        router.pointer_move(pointer, container(), &mut viewport, &mut simulation);
        let expected = viewport.screen_to_simulation(pointer, container());

        for _ in 0..100 {
            simulation.tick(router.pinned_node());
        }

        let node = simulation.node(&id).expect("node");
        assert_eq!(node.position, expected);
        assert_eq!(node.velocity, Vec2::ZERO);
        assert_eq!(router.pointer_up(), Gesture::NodeDragged(id.clone()));

        simulation.tick(router.pinned_node());
        assert_ne!(simulation.node(&id).expect("node").position, expected);
    }

    #[test]
    fn overlapping_nodes_resolve_to_nearest() {
        let (_, viewport, mut simulation) = setup();
        simulation.place_node(&NoteId::Int(2), vec2(10.0, 0.0));

        let near_second = container().center() + vec2(8.0, 0.0);
        assert_eq!(
            hit_test(&simulation, &viewport, container(), near_second),
            Some(NoteId::Int(2))
        );
        let far_away = container().center() + vec2(0.0, 300.0);
        assert_eq!(hit_test(&simulation, &viewport, container(), far_away), None);
    }

    #[test]
    fn double_click_on_node_requests_open() {
        let (mut router, viewport, simulation) = setup();
        let center = container().center();

        assert_eq!(
            router.double_click(center, container(), &viewport, &simulation),
            Some(GraphIntent::OpenNote(NoteId::Int(1)))
        );
        assert_eq!(
            router.double_click(center + vec2(0.0, 300.0), container(), &viewport, &simulation),
            None
        );
    }

    #[test]
    fn removed_selection_and_drag_are_forgotten() {
        let (mut router, _viewport, mut simulation) = setup();
        router.pointer_down(container().center(), container(), &Viewport::default(), &simulation);

        simulation.synchronize(&[Note::new(2, "b", "x")], &mut StdRng::seed_from_u64(1));

        assert!(router.forget_missing(&simulation));
        assert_eq!(router.selected(), None);
        assert_eq!(router.drag_state(), &DragState::Idle);
    }

    #[test]
    fn touch_follows_first_point() {
        let first = pos2(10.0, 20.0);
        let second = pos2(500.0, 500.0);

        assert_eq!(
            touch_to_pointer(TouchPhase::Start, &[first, second]),
            Some(PointerEvent::Down(first))
        );
        assert_eq!(
            touch_to_pointer(TouchPhase::Move, &[first]),
            Some(PointerEvent::Move(first))
        );
        assert_eq!(touch_to_pointer(TouchPhase::Move, &[]), None);
        assert_eq!(touch_to_pointer(TouchPhase::End, &[]), Some(PointerEvent::Up));
        assert_eq!(touch_to_pointer(TouchPhase::Cancel, &[]), Some(PointerEvent::Leave));
    }
}
