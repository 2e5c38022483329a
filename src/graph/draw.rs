use eframe::egui::{Pos2, Rect};

use super::physics::Simulation;
use super::viewport::Viewport;
use crate::notes::NoteId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeShape {
    /// Index into `Simulation::nodes`.
    pub index: usize,
    pub center: Pos2,
    pub radius: f32,
    pub selected: bool,
    pub pinned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkLine {
    pub from: usize,
    pub to: usize,
    pub start: Pos2,
    pub end: Pos2,
}

/// Screen-space draw commands for one frame. Lines come first so nodes
/// are painted over them, and the selected node is painted last.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    pub links: Vec<LinkLine>,
    pub nodes: Vec<NodeShape>,
}

pub fn build_draw_list(
    simulation: &Simulation,
    viewport: &Viewport,
    container: Rect,
    selected: Option<&NoteId>,
    pinned: Option<&NoteId>,
) -> DrawList {
    let mut list = DrawList::default();
    if simulation.is_empty() {
        return list;
    }

    let nodes = simulation.nodes();
    let screen = nodes
        .iter()
        .map(|node| viewport.simulation_to_screen(node.position, container))
        .collect::<Vec<_>>();

    list.links.reserve(simulation.edges().len());
    for &(from, to) in simulation.edges() {
        list.links.push(LinkLine {
            from,
            to,
            start: screen[from],
            end: screen[to],
        });
    }

    let selected_index = selected.and_then(|id| simulation.index_of(id));
    let pinned_index = pinned.and_then(|id| simulation.index_of(id));
    list.nodes.reserve(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        list.nodes.push(NodeShape {
            index,
            center: screen[index],
            radius: node.radius() * viewport.scale(),
            selected: Some(index) == selected_index,
            pinned: Some(index) == pinned_index,
        });
    }

    if let Some(selected_index) = selected_index {
        list.nodes.swap(selected_index, nodes.len() - 1);
    }

    list
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use eframe::egui::{pos2, vec2};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::notes::Note;

    fn container() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(600.0, 400.0))
    }

    fn simulation(notes: &[Note]) -> Simulation {
        let mut sim = Simulation::default();
        sim.synchronize(notes, &mut StdRng::seed_from_u64(5));
        sim
    }

    fn pairs(list: &DrawList) -> Vec<(usize, usize)> {
        list.links.iter().map(|line| (line.from, line.to)).collect()
    }

    #[test]
    fn every_link_is_drawn_once_whichever_side_owns_it() {
        let sim = simulation(&[
            Note::new(1, "a", "x").with_links([2, 3]),
            Note::new(2, "b", "x").with_links([1]),
            Note::new(3, "c", "x"),
            Note::new(4, "d", "x").with_links([1, 77]),
        ]);

        let list = build_draw_list(&sim, &Viewport::default(), container(), None, None);
        let drawn = pairs(&list);
        let unique = drawn.iter().copied().collect::<HashSet<_>>();

        assert_eq!(drawn.len(), unique.len());
        assert_eq!(unique, HashSet::from([(0, 1), (0, 2), (0, 3)]));
    }

    #[test]
    fn shapes_follow_viewport_transform() {
        let sim = simulation(&[Note::new(1, "a", "x").with_links([1, 2, 3])]);
        let mut viewport = Viewport::default();
        viewport.zoom_by(1.0);
        viewport.pan_by(vec2(10.0, 0.0));

        let list = build_draw_list(&sim, &viewport, container(), None, None);
        let shape = list.nodes[0];
        let node = &sim.nodes()[0];

        assert_eq!(shape.center, viewport.simulation_to_screen(node.position, container()));
        assert_eq!(shape.radius, node.radius() * 2.0);
        assert!(list.links.is_empty());
    }

    #[test]
    fn selected_node_is_painted_last() {
        let sim = simulation(&[
            Note::new(1, "a", "x"),
            Note::new(2, "b", "x"),
            Note::new(3, "c", "x"),
        ]);
        let selected = NoteId::Int(1);

        let list = build_draw_list(
            &sim,
            &Viewport::default(),
            container(),
            Some(&selected),
            Some(&selected),
        );

        let last = list.nodes.last().expect("nodes");
        assert_eq!(last.index, 0);
        assert!(last.selected && last.pinned);
        assert_eq!(list.nodes.iter().filter(|shape| shape.selected).count(), 1);
    }

    #[test]
    fn empty_simulation_draws_nothing() {
        let list = build_draw_list(
            &Simulation::default(),
            &Viewport::default(),
            container(),
            None,
            None,
        );
        assert_eq!(list, DrawList::default());
    }
}
