use eframe::egui::{self, RichText, Ui};

use crate::notes::NoteId;
use crate::util::truncate_chars;

use super::super::ViewModel;

impl ViewModel {
    /// Read-only page for a single note. Leaving it remounts the graph.
    pub(in crate::app) fn draw_note_page(&mut self, ui: &mut Ui, id: &NoteId) {
        let mut back = false;
        let mut follow = None;

        if ui.button("<- Back to graph").clicked() {
            back = true;
        }
        ui.add_space(8.0);

        match self.note(id) {
            None => {
                ui.label("This note no longer exists.");
            }
            Some(note) => {
                let (linked, missing) = self.resolved_links(note);
                let backlinks = self
                    .notes
                    .iter()
                    .filter(|other| other.id != note.id && other.links.contains(&note.id))
                    .collect::<Vec<_>>();

                egui::ScrollArea::vertical()
                    .id_salt("note_page_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.label(RichText::new(note.category.to_uppercase()).small().strong());
                        ui.label(RichText::new(note.display_title()).heading());
                        ui.small(format!("id {}", note.id));
                        if let Some(updated_at) = &note.updated_at {
                            ui.small(format!("Updated {updated_at}"));
                        }
                        ui.separator();

                        if note.body.trim().is_empty() {
                            ui.label(RichText::new("This note has no body.").italics());
                        } else {
                            ui.label(note.body.as_str());
                        }

                        ui.separator();
                        ui.label(RichText::new(format!("Links ({})", linked.len())).strong());
                        if linked.is_empty() {
                            ui.label("This note has no links yet.");
                        }
                        for target in &linked {
                            let label = format!(
                                "{}  [{}]",
                                truncate_chars(target.display_title(), 48),
                                target.category
                            );
                            if ui.link(label).clicked() {
                                follow = Some(target.id.clone());
                            }
                        }
                        if missing > 0 {
                            ui.small(format!("{missing} link(s) point to notes that do not exist."));
                        }

                        if !backlinks.is_empty() {
                            ui.add_space(6.0);
                            ui.label(
                                RichText::new(format!("Linked from ({})", backlinks.len())).strong(),
                            );
                            for source in &backlinks {
                                if ui.link(source.display_title()).clicked() {
                                    follow = Some(source.id.clone());
                                }
                            }
                        }
                    });
            }
        }

        if let Some(target) = follow {
            self.open_note(target);
        } else if back {
            self.show_graph(Some(id.clone()));
        }
    }
}
