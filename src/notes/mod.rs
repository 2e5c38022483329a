mod model;
mod store;

use std::collections::{HashMap, HashSet};

pub use model::{DEFAULT_CATEGORY, DEFAULT_TITLE, Note, NoteId, note_from_value};
pub use store::{JsonFileStore, NOTES_COLLECTION, NoteStore};

/// Links `(from, to)` where `to` exists but does not link back to `from`.
/// Links to unknown notes are not reported here.
pub fn asymmetric_links(notes: &[Note]) -> Vec<(NoteId, NoteId)> {
    let links_by_id = notes
        .iter()
        .map(|note| (&note.id, note.links.iter().collect::<HashSet<_>>()))
        .collect::<HashMap<_, _>>();

    let mut asymmetric = Vec::new();
    for note in notes {
        for target in &note.links {
            if target == &note.id {
                continue;
            }
            if let Some(back_links) = links_by_id.get(target)
                && !back_links.contains(&note.id)
            {
                asymmetric.push((note.id.clone(), target.clone()));
            }
        }
    }
    asymmetric.sort();
    asymmetric.dedup();
    asymmetric
}
