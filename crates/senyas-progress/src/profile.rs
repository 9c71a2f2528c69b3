//! Profile document - what one learner's save file holds
//!
//! ```json
//! {
//!     "name": "ana",
//!     "created_at": "2026-03-01T09:30:00Z",
//!     "progress": {
//!         "completed_lessons": {
//!             "galaxy_explorer": ["Alphabets: A", "Numbers: 3"]
//!         }
//!     }
//! }
//! ```
//!
//! Older files spell the keys `"created at"` and `"completed lessons"` and
//! may hold a list where the map belongs. Both are read; unknown keys survive
//! a rewrite.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use senyas_core::{Category, ProfileId};

/// A learner's persisted profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileProgress {
    pub name: String,
    #[serde(default, alias = "created at")]
    pub created_at: String,
    #[serde(default)]
    pub progress: Progress,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfileProgress {
    pub fn new(name: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: created_at.into(),
            progress: Progress::default(),
            extra: Map::new(),
        }
    }

    pub fn id(&self) -> ProfileId {
        ProfileId::new(self.name.as_str())
    }
}

/// Completed lessons keyed by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(
        default,
        alias = "completed lessons",
        deserialize_with = "lenient_lessons"
    )]
    pub completed_lessons: BTreeMap<String, Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Progress {
    pub fn entries(&self, category: Category) -> &[String] {
        self.completed_lessons
            .get(category.key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: Category, entry: &str) -> bool {
        self.entries(category).iter().any(|e| e == entry)
    }

    /// Insert keeping the list sorted and unique; false if already present
    pub fn insert(&mut self, category: Category, entry: &str) -> bool {
        let list = self
            .completed_lessons
            .entry(category.key().to_string())
            .or_default();
        if !list.windows(2).all(|w| w[0] < w[1]) {
            list.sort();
            list.dedup();
        }
        match list.binary_search_by(|e| e.as_str().cmp(entry)) {
            Ok(_) => false,
            Err(pos) => {
                list.insert(pos, entry.to_string());
                true
            }
        }
    }

    /// Total entries across categories
    pub fn total(&self) -> usize {
        self.completed_lessons.values().map(Vec::len).sum()
    }
}

/// Anything but a map of string lists reads as empty
fn lenient_lessons<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .map(|(category, entries)| {
            let entries = match entries {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            (category, entries)
        })
        .collect())
}
