//! Force-directed note graph: layout engine, synchronizer, viewport and
//! pointer interaction, independent of any painter.

pub mod draw;
pub mod interaction;
pub mod physics;
pub mod sync;
pub mod viewport;

use eframe::egui::Rect;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::notes::{Note, NoteId};
pub use draw::{DrawList, LinkLine, NodeShape, build_draw_list};
pub use interaction::{
    DragState, Gesture, GraphIntent, InteractionRouter, PointerEvent, hit_test, touch_to_pointer,
};
pub use physics::{PhysicsConfig, SimNode, Simulation};
pub use sync::{SPAWN_HALF_EXTENT, SyncReport};
pub use viewport::{BUTTON_ZOOM_STEP, Viewport};

/// Everything a mounted graph view owns. Input handling and ticking both go
/// through `&mut self`, so they are serialized by construction; dropping the
/// session ends the frame loop.
#[derive(Debug)]
pub struct GraphSession {
    simulation: Simulation,
    viewport: Viewport,
    router: InteractionRouter,
    rng: StdRng,
}

impl GraphSession {
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: PhysicsConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PhysicsConfig, rng: StdRng) -> Self {
        Self {
            simulation: Simulation::new(config),
            viewport: Viewport::default(),
            router: InteractionRouter::default(),
            rng,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn router(&self) -> &InteractionRouter {
        &self.router
    }

    pub fn selected(&self) -> Option<&NoteId> {
        self.router.selected()
    }

    pub fn select(&mut self, id: Option<NoteId>) {
        let id = id.filter(|id| self.simulation.index_of(id).is_some());
        self.router.select(id);
    }

    pub fn set_config(&mut self, config: PhysicsConfig) {
        self.simulation.set_config(config);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        info!("graph view reset");
    }

    pub fn sync_notes(&mut self, notes: &[Note]) -> SyncReport {
        let report = self.simulation.synchronize(notes, &mut self.rng);
        self.router.forget_missing(&self.simulation);
        report
    }

    pub fn handle(&mut self, event: PointerEvent, container: Rect) -> Option<GraphIntent> {
        match event {
            PointerEvent::Down(pointer) => {
                self.router
                    .pointer_down(pointer, container, &self.viewport, &self.simulation);
                None
            }
            PointerEvent::Move(pointer) => {
                self.router.pointer_move(
                    pointer,
                    container,
                    &mut self.viewport,
                    &mut self.simulation,
                );
                None
            }
            PointerEvent::Up | PointerEvent::Leave => {
                let gesture = self.router.pointer_up();
                if gesture != Gesture::None {
                    debug!("pointer gesture finished: {gesture:?}");
                }
                None
            }
            PointerEvent::Wheel { delta_y } => {
                self.viewport.zoom_at_wheel(delta_y);
                None
            }
            PointerEvent::DoubleClick(pointer) => {
                self.router
                    .double_click(pointer, container, &self.viewport, &self.simulation)
            }
        }
    }

    /// One animation frame: integrate (unless paused) and produce the draw list.
    pub fn frame(&mut self, container: Rect, live_physics: bool) -> DrawList {
        if live_physics {
            self.simulation.tick(self.router.pinned_node());
        }

        build_draw_list(
            &self.simulation,
            &self.viewport,
            container,
            self.router.selected(),
            self.router.pinned_node(),
        )
    }
}
