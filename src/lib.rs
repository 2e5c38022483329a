//! Linked-notes graph viewer: a note store, a force-directed layout engine
//! with pan, zoom and drag, and the egui shell that hosts them.

pub mod app;
pub mod graph;
pub mod logging;
pub mod notes;
mod util;

pub use app::{NoteSource, ZettelGraphApp};
