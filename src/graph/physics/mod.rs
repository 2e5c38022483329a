//! Layout engine: one explicit Euler step per frame over every node.
//!
//! Forces are accumulated against pre-tick positions for all nodes, then
//! committed in a second pass, so the outcome does not depend on node order.

mod forces;

use std::collections::HashMap;

use eframe::egui::Vec2;

use crate::notes::NoteId;
use forces::{category_pull, center_gravity, repulsion, separation, spring};

pub const REPULSION: f32 = 6_000.0;
pub const REPULSION_CUTOFF: f32 = 500.0;
pub const MIN_DISTANCE: f32 = 1.0;
pub const SPRING_LEN: f32 = 120.0;
pub const SPRING_K: f32 = 0.005;
pub const CENTER_GRAVITY: f32 = 0.0005;
pub const CATEGORY_ATTRACTION: f32 = 0.0005;
pub const DAMPING: f32 = 0.88;

pub const NODE_BASE_DIAMETER: f32 = 24.0;
pub const NODE_DIAMETER_PER_LINK: f32 = 8.0;
pub const NODE_MAX_DIAMETER: f32 = 80.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub repulsion: f32,
    pub repulsion_cutoff: f32,
    pub min_distance: f32,
    pub spring_length: f32,
    pub spring_stiffness: f32,
    pub center_gravity: f32,
    pub category_attraction: f32,
    pub damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            repulsion: REPULSION,
            repulsion_cutoff: REPULSION_CUTOFF,
            min_distance: MIN_DISTANCE,
            spring_length: SPRING_LEN,
            spring_stiffness: SPRING_K,
            center_gravity: CENTER_GRAVITY,
            category_attraction: CATEGORY_ATTRACTION,
            damping: DAMPING,
        }
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

impl PhysicsConfig {
    /// Replaces non-finite values with defaults and clamps every tunable to
    /// a range where the integration stays stable.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let min_distance = finite_or(self.min_distance, defaults.min_distance).clamp(0.01, 50.0);
        Self {
            repulsion: finite_or(self.repulsion, defaults.repulsion).clamp(0.0, 200_000.0),
            repulsion_cutoff: finite_or(self.repulsion_cutoff, defaults.repulsion_cutoff)
                .clamp(min_distance, 10_000.0),
            min_distance,
            spring_length: finite_or(self.spring_length, defaults.spring_length)
                .clamp(0.0, 2_000.0),
            spring_stiffness: finite_or(self.spring_stiffness, defaults.spring_stiffness)
                .clamp(0.0, 0.5),
            center_gravity: finite_or(self.center_gravity, defaults.center_gravity)
                .clamp(0.0, 0.1),
            category_attraction: finite_or(self.category_attraction, defaults.category_attraction)
                .clamp(0.0, 0.01),
            damping: finite_or(self.damping, defaults.damping).clamp(0.0, 0.999),
        }
    }
}

/// Physics-side copy of a note.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
    pub id: NoteId,
    pub title: String,
    pub category: String,
    pub links: Vec<NoteId>,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl SimNode {
    /// Rendered diameter in simulation units; grows with link count.
    pub fn diameter(&self) -> f32 {
        (NODE_BASE_DIAMETER + self.links.len() as f32 * NODE_DIAMETER_PER_LINK)
            .min(NODE_MAX_DIAMETER)
    }

    pub fn radius(&self) -> f32 {
        self.diameter() * 0.5
    }
}

#[derive(Debug, Default)]
pub struct Simulation {
    pub(in crate::graph) nodes: Vec<SimNode>,
    pub(in crate::graph) index_by_id: HashMap<NoteId, usize>,
    pub(in crate::graph) edges: Vec<(usize, usize)>,
    config: PhysicsConfig,
    forces: Vec<Vec2>,
    ticks: u64,
}

impl Simulation {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config: config.sanitized(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> PhysicsConfig {
        self.config
    }

    pub fn set_config(&mut self, config: PhysicsConfig) {
        self.config = config.sanitized();
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &NoteId) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &NoteId) -> Option<&SimNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    /// Resolved, undirected link pairs as `(lower index, higher index)`.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.nodes.iter().map(|node| node.velocity.length_sq()).sum()
    }

    /// Moves a node directly and stops it. Returns `false` for unknown ids.
    pub fn place_node(&mut self, id: &NoteId, position: Vec2) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if !(position.x.is_finite() && position.y.is_finite()) {
            return false;
        }

        let node = &mut self.nodes[index];
        node.position = position;
        node.velocity = Vec2::ZERO;
        true
    }

    /// Advances the layout by one step. The `pinned` node still exerts force
    /// on its neighbours but is neither accelerated nor moved.
    pub fn tick(&mut self, pinned: Option<&NoteId>) {
        let node_count = self.nodes.len();
        if node_count == 0 {
            return;
        }

        let config = self.config;
        let pinned_index = pinned.and_then(|id| self.index_of(id));

        self.forces.clear();
        self.forces.resize(node_count, Vec2::ZERO);
        let forces = &mut self.forces;
        let nodes = &self.nodes;

        for (force, node) in forces.iter_mut().zip(nodes) {
            *force += center_gravity(node.position, &config);
        }

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let sep = separation(
                    nodes[i].position,
                    nodes[j].position,
                    i,
                    j,
                    config.min_distance,
                );

                let mut push = repulsion(sep, &config);
                if nodes[i].category == nodes[j].category {
                    push += category_pull(sep, &config);
                }

                forces[i] += push;
                forces[j] -= push;
            }
        }

        for &(from, to) in &self.edges {
            if from >= node_count || to >= node_count || from == to {
                continue;
            }

            let sep = separation(
                nodes[from].position,
                nodes[to].position,
                from,
                to,
                config.min_distance,
            );
            let pull = spring(sep, &config);

            forces[from] += pull;
            forces[to] -= pull;
        }

        for (index, node) in self.nodes.iter_mut().enumerate() {
            if Some(index) == pinned_index {
                continue;
            }

            node.velocity += self.forces[index];
            node.position += node.velocity;
            node.velocity *= config.damping;
        }

        self.ticks = self.ticks.wrapping_add(1);
    }
}
