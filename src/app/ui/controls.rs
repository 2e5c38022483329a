use std::sync::Arc;

use eframe::egui::{self, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::{BUTTON_ZOOM_STEP, PhysicsConfig};
use crate::notes::NoteId;
use crate::util::truncate_chars;

use super::super::{ActiveView, SearchMatchCache, ViewModel};

const MAX_LISTED_MATCHES: usize = 12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// Notes whose title or category fuzzy-matches the search box, best first.
    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<Vec<NoteId>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.notes_revision == self.notes_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .notes
            .iter()
            .filter_map(|note| {
                let title_score = fuzzy_match_score(&matcher, note.display_title(), query);
                let category_score = fuzzy_match_score(&matcher, &note.category, query);
                title_score
                    .max(category_score)
                    .map(|score| (score, note.id.clone()))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let matches = Arc::new(scored.into_iter().map(|(_, id)| id).collect::<Vec<_>>());

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            notes_revision: self.notes_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (title or category)")
            .on_hover_text("Fuzzy-highlight matching notes without changing the graph.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Matching notes are tinted on the canvas; click a result to select it.");

        if let Some(matches) = self.cached_search_matches() {
            if matches.is_empty() {
                ui.label("No matching notes.");
            } else {
                let mut picked = None;
                for id in matches.iter().take(MAX_LISTED_MATCHES) {
                    let Some(note) = self.note(id) else {
                        continue;
                    };
                    let label = format!(
                        "{}  [{}]",
                        truncate_chars(note.display_title(), 36),
                        note.category
                    );
                    if ui.link(label).clicked() {
                        picked = Some(id.clone());
                    }
                }
                if matches.len() > MAX_LISTED_MATCHES {
                    ui.small(format!("{} more", matches.len() - MAX_LISTED_MATCHES));
                }
                if let Some(id) = picked {
                    self.show_graph(Some(id));
                }
            }
        }

        ui.separator();

        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Continuously simulate layout forces while viewing the graph.");
        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show a live FPS readout in the header.");

        if let ActiveView::Graph(session) = &mut self.view {
            ui.horizontal(|ui| {
                if ui.button("Zoom in").clicked() {
                    session.viewport_mut().zoom_by(BUTTON_ZOOM_STEP);
                }
                if ui.button("Zoom out").clicked() {
                    session.viewport_mut().zoom_by(-BUTTON_ZOOM_STEP);
                }
                if ui.button("Reset view").clicked() {
                    session.reset_view();
                }
            });
            ui.label(format!("zoom: {:.0}%", session.viewport().scale() * 100.0));
        }

        ui.collapsing("Physics tuning", |ui| {
            let mut config = self.physics;
            let mut changed = false;

            changed |= ui
                .add(egui::Slider::new(&mut config.repulsion, 0.0..=20_000.0).text("Repulsion"))
                .on_hover_text("Inverse-square push between every pair of nearby notes.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.repulsion_cutoff, 50.0..=1_500.0)
                        .text("Repulsion radius"),
                )
                .on_hover_text("Notes farther apart than this do not repel each other.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.spring_length, 20.0..=400.0)
                        .text("Link length"),
                )
                .on_hover_text("Rest length linked notes settle toward.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.spring_stiffness, 0.0..=0.05)
                        .text("Link stiffness"),
                )
                .on_hover_text("How strongly links pull toward their rest length.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.category_attraction, 0.0..=0.002)
                        .text("Category pull"),
                )
                .on_hover_text("Weak attraction between notes sharing a category.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.center_gravity, 0.0..=0.005)
                        .text("Center gravity"),
                )
                .on_hover_text("Pull toward the canvas origin that keeps the graph from drifting.")
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut config.damping, 0.5..=0.99).text("Damping"))
                .on_hover_text("Fraction of velocity kept each frame.")
                .changed();

            if ui.button("Restore defaults").clicked() {
                config = PhysicsConfig::default();
                changed = true;
            }

            if changed {
                self.physics = config.sanitized();
                if let ActiveView::Graph(session) = &mut self.view {
                    session.set_config(self.physics);
                }
            }
        });
    }
}
