use std::collections::{HashMap, VecDeque};

use eframe::egui::{self, Align, Context, Layout};
use log::info;

use crate::graph::{GraphSession, PhysicsConfig};
use crate::notes::{Note, NoteId};

use super::super::{ActiveView, NoteSource, ViewModel, count_links};

impl ViewModel {
    pub(in crate::app) fn new(notes: Vec<Note>) -> Self {
        let physics = PhysicsConfig::default();
        let mut model = Self {
            notes: Vec::new(),
            note_index: HashMap::new(),
            notes_revision: 0,
            link_count: 0,
            view: ActiveView::Graph(Box::new(GraphSession::new(physics))),
            physics,
            live_physics: true,
            search: String::new(),
            search_match_cache: None,
            hovered: None,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        };
        info!("graph view mounted");
        model.replace_notes(notes);
        model
    }

    /// Takes a fresh snapshot of the collection. A mounted graph is
    /// resynchronized in place, so surviving notes keep their positions.
    pub(in crate::app) fn replace_notes(&mut self, notes: Vec<Note>) {
        let mut note_index = HashMap::with_capacity(notes.len());
        for (index, note) in notes.iter().enumerate() {
            note_index.entry(note.id.clone()).or_insert(index);
        }

        self.link_count = count_links(&notes, &note_index);
        self.note_index = note_index;
        self.notes = notes;
        self.notes_revision = self.notes_revision.wrapping_add(1);
        self.search_match_cache = None;
        self.hovered = None;

        let missing_open_note = match &mut self.view {
            ActiveView::Graph(session) => {
                let report = session.sync_notes(&self.notes);
                info!(
                    "graph synchronized: {} notes ({} new, {} removed)",
                    self.notes.len(),
                    report.added,
                    report.removed
                );
                false
            }
            ActiveView::Note(id) => !self.note_index.contains_key(id),
        };

        if missing_open_note {
            self.show_graph(None);
        }
    }

    pub(in crate::app) fn note(&self, id: &NoteId) -> Option<&Note> {
        self.note_index.get(id).map(|&index| &self.notes[index])
    }

    pub(in crate::app) fn selected(&self) -> Option<&NoteId> {
        match &self.view {
            ActiveView::Graph(session) => session.selected(),
            ActiveView::Note(_) => None,
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<NoteId>) {
        if let ActiveView::Graph(session) = &mut self.view {
            session.select(selected);
        }
    }

    pub(in crate::app) fn show_graph(&mut self, select: Option<NoteId>) {
        if let ActiveView::Graph(session) = &mut self.view {
            session.select(select);
            return;
        }

        let mut session = GraphSession::new(self.physics);
        session.sync_notes(&self.notes);
        session.select(select);
        self.view = ActiveView::Graph(Box::new(session));
        info!("graph view mounted");
    }

    pub(in crate::app) fn open_note(&mut self, id: NoteId) {
        if !self.note_index.contains_key(&id) {
            return;
        }

        if matches!(self.view, ActiveView::Graph(_)) {
            info!("graph view unmounted");
        }
        info!("opening note {id}");
        self.hovered = None;
        self.view = ActiveView::Note(id);
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &NoteSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("zettel-graph");
                    ui.separator();
                    ui.label(format!("user: {}", source.user));
                    ui.label(format!("collection: {}", source.collection));
                    ui.label(format!("notes: {}", self.notes.len()));
                    ui.label(format!("links: {}", self.link_count));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload notes"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                        if let Some(motion_text) = self.motion_text() {
                            ui.label(motion_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if matches!(self.view, ActiveView::Graph(_)) {
            egui::SidePanel::right("inspector")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.draw_inspector(ui));
        }

        let open_note = match &self.view {
            ActiveView::Graph(_) => None,
            ActiveView::Note(id) => Some(id.clone()),
        };
        egui::CentralPanel::default().show(ctx, |ui| match open_note {
            Some(id) => self.draw_note_page(ui, &id),
            None => self.draw_graph(ui),
        });
    }
}
