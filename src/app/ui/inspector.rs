use eframe::egui::{self, RichText, Ui};

use crate::notes::Note;
use crate::util::truncate_chars;

use super::super::ViewModel;

const BODY_PREVIEW_CHARS: usize = 280;

impl ViewModel {
    /// Resolves `note.links` to notes that exist, in link order, plus the
    /// number of targets that could not be found.
    pub(in crate::app) fn resolved_links<'a>(&'a self, note: &'a Note) -> (Vec<&'a Note>, usize) {
        let mut missing = 0;
        let mut resolved = Vec::with_capacity(note.links.len());
        for target in &note.links {
            match self.note(target) {
                Some(linked) if linked.id != note.id => {
                    if !resolved.iter().any(|seen: &&Note| seen.id == linked.id) {
                        resolved.push(linked);
                    }
                }
                Some(_) => {}
                None => missing += 1,
            }
        }
        (resolved, missing)
    }

    pub(in crate::app) fn draw_inspector(&mut self, ui: &mut Ui) {
        ui.heading("Inspector");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected().cloned() else {
            ui.label("Select a node to preview it here.");
            if let Some(hovered) = self.hovered.as_ref().and_then(|id| self.note(id)) {
                ui.add_space(6.0);
                ui.small(format!("Hovering: {}", hovered.display_title()));
            }
            ui.add_space(6.0);
            ui.small("Drag empty space to pan, scroll to zoom, double-click a node to open it.");
            return;
        };

        let Some(note) = self.note(&selected_id) else {
            ui.label("Selected note no longer exists.");
            return;
        };

        let mut select = None;
        let mut open = None;

        ui.label(RichText::new(note.category.to_uppercase()).small().strong());
        ui.label(RichText::new(note.display_title()).heading());
        if let Some(updated_at) = &note.updated_at {
            ui.small(format!("Updated {updated_at}"));
        }
        ui.add_space(6.0);

        if note.body.trim().is_empty() {
            ui.label(RichText::new("No additional details for this note.").italics());
        } else {
            ui.label(truncate_chars(note.body.trim(), BODY_PREVIEW_CHARS).into_owned());
        }

        ui.separator();
        let (linked, missing) = self.resolved_links(note);
        ui.label(RichText::new(format!("Linked notes ({})", linked.len())).strong());
        if linked.is_empty() {
            ui.label("This note has no links yet.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("inspector_links_scroll")
                .max_height(260.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for target in &linked {
                        if ui.link(target.display_title()).clicked() {
                            select = Some(target.id.clone());
                        }
                    }
                });
        }
        if missing > 0 {
            ui.small(format!("{missing} link(s) point to notes that do not exist."));
        }

        ui.separator();
        if ui.button("Open full note").clicked() {
            open = Some(selected_id.clone());
        }

        if let Some(id) = select {
            self.set_selected(Some(id));
        }
        if let Some(id) = open {
            self.open_note(id);
        }
    }
}
