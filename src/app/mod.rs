use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use log::{error, info, warn};

use crate::graph::{GraphSession, PhysicsConfig};
use crate::notes::{Note, NoteId, NoteStore, asymmetric_links};

mod graph;
mod render_utils;
mod ui;

const MAX_REPORTED_ASYMMETRIC_LINKS: usize = 20;

/// Where the notes come from.
#[derive(Clone)]
pub struct NoteSource {
    pub store: Arc<dyn NoteStore>,
    pub user: String,
    pub collection: String,
}

pub struct ZettelGraphApp {
    source: NoteSource,
    state: AppState,
    reload_rx: Option<Receiver<Result<Vec<Note>, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Vec<Note>, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// The graph view is mounted only while `Graph` is active; leaving it drops
/// the session and with it the frame loop.
enum ActiveView {
    Graph(Box<GraphSession>),
    Note(NoteId),
}

struct ViewModel {
    notes: Vec<Note>,
    note_index: HashMap<NoteId, usize>,
    notes_revision: u64,
    link_count: usize,
    view: ActiveView,
    physics: PhysicsConfig,
    live_physics: bool,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    hovered: Option<NoteId>,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

struct SearchMatchCache {
    query: String,
    notes_revision: u64,
    matches: Arc<Vec<NoteId>>,
}

fn count_links(notes: &[Note], note_index: &HashMap<NoteId, usize>) -> usize {
    let mut pairs = HashSet::new();
    for (index, note) in notes.iter().enumerate() {
        for target in &note.links {
            if let Some(&target_index) = note_index.get(target)
                && target_index != index
            {
                pairs.insert((index.min(target_index), index.max(target_index)));
            }
        }
    }
    pairs.len()
}

impl ZettelGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: NoteSource) -> Self {
        let state = Self::start_load(&source);
        Self {
            source,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: &NoteSource) -> Receiver<Result<Vec<Note>, String>> {
        let (tx, rx) = mpsc::channel();
        let source = source.clone();

        thread::spawn(move || {
            info!(
                "loading notes for user `{}` from collection `{}`",
                source.user, source.collection
            );
            let result = source
                .store
                .load(&source.user, &source.collection)
                .map_err(|error| format!("{error:#}"));

            if let Ok(notes) = &result {
                let asymmetric = asymmetric_links(notes);
                for (from, to) in asymmetric.iter().take(MAX_REPORTED_ASYMMETRIC_LINKS) {
                    warn!("note {from} links to {to} but {to} does not link back");
                }
                if asymmetric.len() > MAX_REPORTED_ASYMMETRIC_LINKS {
                    warn!(
                        "{} more one-sided links not shown",
                        asymmetric.len() - MAX_REPORTED_ASYMMETRIC_LINKS
                    );
                }
            }

            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: &NoteSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }
}

impl eframe::App for ZettelGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(notes)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(notes))));
                    }
                    Ok(Err(message)) => {
                        error!("failed to load notes: {message}");
                        transition = Some(AppState::Error(message));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading notes...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load notes");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.source));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(&self.source));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(notes)) => model.replace_notes(notes),
                        Ok(Err(message)) => {
                            error!("failed to reload notes: {message}");
                            transition = Some(AppState::Error(message));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
