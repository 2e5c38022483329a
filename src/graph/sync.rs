use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use log::{debug, warn};
use rand::Rng;

use super::physics::{SimNode, Simulation};
use crate::notes::{Note, NoteId};

/// Half extent of the square new nodes spawn in, centred on the origin.
pub const SPAWN_HALF_EXTENT: f32 = 100.0;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub retained: usize,
    pub removed: usize,
    pub duplicates: usize,
    pub dangling_links: usize,
}

fn spawn_position<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    vec2(
        rng.gen_range(-SPAWN_HALF_EXTENT..=SPAWN_HALF_EXTENT),
        rng.gen_range(-SPAWN_HALF_EXTENT..=SPAWN_HALF_EXTENT),
    )
}

impl Simulation {
    /// Reconciles the simulation with a full snapshot of the note collection.
    ///
    /// Nodes whose id survives keep position and velocity; only their
    /// display fields and links are refreshed. New ids spawn at rest at a
    /// random point of the spawn square, and ids missing from `notes` are
    /// dropped. The first occurrence of a duplicated id wins.
    pub fn synchronize<R: Rng + ?Sized>(&mut self, notes: &[Note], rng: &mut R) -> SyncReport {
        let mut previous = self
            .nodes
            .drain(..)
            .map(|node| (node.id.clone(), node))
            .collect::<HashMap<_, _>>();

        let mut report = SyncReport::default();
        let mut nodes = Vec::with_capacity(notes.len());
        let mut index_by_id: HashMap<NoteId, usize> = HashMap::with_capacity(notes.len());

        for note in notes {
            if index_by_id.contains_key(&note.id) {
                report.duplicates += 1;
                warn!("ignoring duplicate note id {} in collection", note.id);
                continue;
            }

            let title = note.display_title().to_owned();
            let node = match previous.remove(&note.id) {
                Some(mut existing) => {
                    existing.title = title;
                    existing.category.clone_from(&note.category);
                    existing.links.clone_from(&note.links);
                    report.retained += 1;
                    existing
                }
                None => {
                    report.added += 1;
                    SimNode {
                        id: note.id.clone(),
                        title,
                        category: note.category.clone(),
                        links: note.links.clone(),
                        position: spawn_position(rng),
                        velocity: Vec2::ZERO,
                    }
                }
            };

            index_by_id.insert(note.id.clone(), nodes.len());
            nodes.push(node);
        }
        report.removed = previous.len();

        let mut edges = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            for target in &node.links {
                match index_by_id.get(target) {
                    Some(&target_index) if target_index != index => {
                        edges.push((index.min(target_index), index.max(target_index)));
                    }
                    Some(_) => {}
                    None => report.dangling_links += 1,
                }
            }
        }
        edges.sort_unstable();
        edges.dedup();

        self.nodes = nodes;
        self.index_by_id = index_by_id;
        self.edges = edges;

        debug!(
            "synchronized {} notes: added={} retained={} removed={} duplicates={} dangling_links={} edges={}",
            self.nodes.len(),
            report.added,
            report.retained,
            report.removed,
            report.duplicates,
            report.dangling_links,
            self.edges.len()
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::graph::physics::PhysicsConfig;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn sample_notes() -> Vec<Note> {
        vec![
            Note::new(1, "Inbox", "Work").with_links([2]),
            Note::new(2, "Ideas", "Work").with_links([1, 3]),
            Note::new(3, "Books", "Reading").with_links([2]),
        ]
    }

    #[test]
    fn resync_with_same_collection_keeps_state() {
        let notes = sample_notes();
        let mut sim = Simulation::new(PhysicsConfig::default());
        sim.synchronize(&notes, &mut rng());
        for _ in 0..10 {
            sim.tick(None);
        }
        let before = sim.nodes().to_vec();

        let report = sim.synchronize(&notes, &mut rng());

        assert_eq!(sim.nodes(), before.as_slice());
        assert_eq!(report.retained, 3);
        assert_eq!(report.added, 0);
        assert_eq!(report.removed, 0);
    }

    #[test]
    fn title_change_keeps_exact_position() {
        let mut notes = sample_notes();
        let mut sim = Simulation::default();
        sim.synchronize(&notes, &mut rng());
        let id = NoteId::Int(1);
        sim.place_node(&id, vec2(10.0, 10.0));

        notes[0].title = "Renamed inbox".to_owned();
        notes[0].body = "edited body".to_owned();
        sim.synchronize(&notes, &mut rng());

        let node = sim.node(&id).expect("node survives");
        assert_eq!(node.position, vec2(10.0, 10.0));
        assert_eq!(node.title, "Renamed inbox");
    }

    #[test]
    fn removed_notes_are_dropped_and_links_rebuilt() {
        let mut notes = sample_notes();
        let mut sim = Simulation::default();
        sim.synchronize(&notes, &mut rng());
        assert_eq!(sim.edges(), &[(0, 1), (1, 2)]);

        notes.remove(2);
        let report = sim.synchronize(&notes, &mut rng());

        assert_eq!(sim.len(), 2);
        assert!(sim.node(&NoteId::Int(3)).is_none());
        assert_eq!(sim.edges(), &[(0, 1)]);
        assert_eq!(report.removed, 1);
        assert_eq!(report.dangling_links, 1);
    }

    #[test]
    fn one_sided_link_still_produces_an_edge() {
        let notes = vec![
            Note::new("a", "A", "x").with_links(["b"]),
            Note::new("b", "B", "x"),
        ];
        let mut sim = Simulation::default();
        sim.synchronize(&notes, &mut rng());
        assert_eq!(sim.edges(), &[(0, 1)]);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let notes = vec![
            Note::new(1, "first", "x"),
            Note::new(1, "second", "x"),
            Note::new(2, "other", "x").with_links([2]),
        ];
        let mut sim = Simulation::default();
        let report = sim.synchronize(&notes, &mut rng());

        assert_eq!(sim.len(), 2);
        assert_eq!(sim.node(&NoteId::Int(1)).expect("kept").title, "first");
        assert_eq!(report.duplicates, 1);
        assert!(sim.edges().is_empty());
    }

    #[test]
    fn empty_collection_clears_simulation() {
        let mut sim = Simulation::default();
        sim.synchronize(&sample_notes(), &mut rng());
        let report = sim.synchronize(&[], &mut rng());

        assert!(sim.is_empty());
        assert!(sim.edges().is_empty());
        assert_eq!(report.removed, 3);
    }

    proptest! {
        #[test]
        fn new_nodes_spawn_inside_square_at_rest(seed in any::<u64>(), count in 1usize..40) {
            let notes = (0..count as i64)
                .map(|id| Note::new(id, "n", "c"))
                .collect::<Vec<_>>();
            let mut sim = Simulation::default();
            sim.synchronize(&notes, &mut StdRng::seed_from_u64(seed));

            prop_assert_eq!(sim.len(), count);
            for node in sim.nodes() {
                prop_assert!(node.position.x.abs() <= SPAWN_HALF_EXTENT);
                prop_assert!(node.position.y.abs() <= SPAWN_HALF_EXTENT);
                prop_assert_eq!(node.velocity, Vec2::ZERO);
            }
        }
    }
}
