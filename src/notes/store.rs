use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use serde_json::Value;

use super::model::{Note, note_from_value};

pub const NOTES_COLLECTION: &str = "notes";

/// Key-value note storage keyed by user and logical collection name.
pub trait NoteStore: Send + Sync {
    fn load(&self, user: &str, collection: &str) -> Result<Vec<Note>>;
}

#[derive(Debug)]
pub(crate) struct ParsedCollection {
    pub(crate) notes: Vec<Note>,
    pub(crate) skipped: usize,
}

pub(crate) fn parse_collection(raw: &str) -> Result<ParsedCollection> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in note collection")?;

    let entries = match &parsed {
        Value::Array(entries) => entries,
        Value::Object(object) => object
            .get("notes")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("note collection object has no `notes` array"))?,
        Value::Null => {
            return Ok(ParsedCollection {
                notes: Vec::new(),
                skipped: 0,
            });
        }
        _ => return Err(anyhow!("unexpected JSON type for note collection")),
    };

    let mut notes = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;
    for (position, entry) in entries.iter().enumerate() {
        match note_from_value(entry) {
            Some(note) => notes.push(note),
            None => {
                skipped += 1;
                warn!("skipping note entry #{position}: missing or unusable id");
            }
        }
    }

    Ok(ParsedCollection { notes, skipped })
}

/// Reads `<root>/<user>/<collection>.json`.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, user: &str, collection: &str) -> PathBuf {
        self.root.join(user).join(format!("{collection}.json"))
    }
}

impl NoteStore for JsonFileStore {
    fn load(&self, user: &str, collection: &str) -> Result<Vec<Note>> {
        let path = self.collection_path(user, collection);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!(
                    "no stored collection at {}; starting empty",
                    path.display()
                );
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read note collection {}", path.display()));
            }
        };

        let parsed = parse_collection(&raw)
            .with_context(|| format!("failed to parse note collection {}", path.display()))?;
        info!(
            "loaded {} notes from {} ({} skipped)",
            parsed.notes.len(),
            path.display(),
            parsed.skipped
        );

        Ok(parsed.notes)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notes::NoteId;

    #[test]
    fn parses_array_and_wrapped_collections() {
        let array = parse_collection(r#"[{"id": 1}, {"id": "b", "links": [1]}]"#).expect("array");
        assert_eq!(array.notes.len(), 2);
        assert_eq!(array.notes[1].links, vec![NoteId::Int(1)]);

        let wrapped = parse_collection(r#"{"notes": [{"id": 1}]}"#).expect("wrapped");
        assert_eq!(wrapped.notes.len(), 1);
    }

    #[test]
    fn bad_entries_are_counted_not_fatal() {
        let parsed =
            parse_collection(r#"[{"id": 1}, {"title": "no id"}, 42, {"id": 2}]"#).expect("parsed");
        assert_eq!(parsed.notes.len(), 2);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(parse_collection("{not json").is_err());
        assert!(parse_collection(r#"{"items": []}"#).is_err());
        assert!(parse_collection("\"text\"").is_err());
        assert!(parse_collection("null").expect("null").notes.is_empty());
    }

    #[test]
    fn file_store_reads_user_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path());
        let path = store.collection_path("ada", NOTES_COLLECTION);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, r#"[{"id": 1, "title": "One", "category": "Work"}]"#).expect("write");

        let notes = store.load("ada", NOTES_COLLECTION).expect("load");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "One");
    }

    #[test]
    fn missing_collection_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path());
        assert!(store.load("nobody", NOTES_COLLECTION).expect("load").is_empty());
    }

    #[test]
    fn corrupt_collection_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path());
        let path = store.collection_path("ada", NOTES_COLLECTION);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "[{").expect("write");

        let error = store.load("ada", NOTES_COLLECTION).expect_err("corrupt");
        assert!(format!("{error:#}").contains("notes.json"));
    }
}
