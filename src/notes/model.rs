use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "General";

/// Stable note identifier. Stores hand out either numeric ids (creation
/// timestamps) or opaque strings, and both may appear in one collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteId {
    Int(i64),
    Text(String),
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for NoteId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for NoteId {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub category: String,
    pub body: String,
    pub links: Vec<NoteId>,
    pub updated_at: Option<String>,
}

impl Note {
    pub fn new(id: impl Into<NoteId>, title: &str, category: &str) -> Self {
        Self {
            id: id.into(),
            title: title.to_owned(),
            category: category.to_owned(),
            body: String::new(),
            links: Vec::new(),
            updated_at: None,
        }
    }

    pub fn with_links<I, T>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NoteId>,
    {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_owned();
        self
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawNote {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    links: Option<Vec<Value>>,
    #[serde(default, rename = "updatedAt", alias = "updated_at")]
    updated_at: Option<String>,
}

fn note_id_from_value(value: &Value) -> Option<NoteId> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
            .map(NoteId::Int),
        Value::String(text) if !text.trim().is_empty() => Some(NoteId::Text(text.clone())),
        _ => None,
    }
}

/// Decodes one stored note, substituting defaults for missing display
/// fields. Returns `None` when the entry has no usable id.
pub fn note_from_value(value: &Value) -> Option<Note> {
    let raw = RawNote::deserialize(value).ok()?;
    let id = raw.id.as_ref().and_then(note_id_from_value)?;

    let title = raw
        .title
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_owned());
    let category = raw
        .category
        .filter(|category| !category.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());
    let links = raw
        .links
        .unwrap_or_default()
        .iter()
        .filter_map(note_id_from_value)
        .collect();

    Some(Note {
        id,
        title,
        category,
        body: raw.body.unwrap_or_default(),
        links,
        updated_at: raw.updated_at,
    })
}
