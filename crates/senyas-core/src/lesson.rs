//! Lesson categories and progress entries
//!
//! Category keys and entry prefixes are part of the save file format and must
//! stay stable across releases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lesson category - top-level key under `completed_lessons`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Guided lessons: alphabet, numbers, phrases
    GalaxyExplorer,
    /// Randomized mixed-category drill
    CosmicCopy,
    /// Multi-step fingerspelling
    StarQuest,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::GalaxyExplorer,
            Category::CosmicCopy,
            Category::StarQuest,
        ]
    }

    /// Stable key used in the profile file
    pub fn key(self) -> &'static str {
        match self {
            Category::GalaxyExplorer => "galaxy_explorer",
            Category::CosmicCopy => "cosmic_copy",
            Category::StarQuest => "star_quest",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Category::all().iter().copied().find(|c| c.key() == key)
    }

    /// Human-readable title for summaries
    pub fn title(self) -> &'static str {
        match self {
            Category::GalaxyExplorer => "Galaxy Explorer",
            Category::CosmicCopy => "Cosmic Copy",
            Category::StarQuest => "Star Quest",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Kind of item a learner completed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonKind {
    Alphabets,
    Numbers,
    Phrase,
    Fingerspelling,
}

impl LessonKind {
    pub fn prefix(self) -> &'static str {
        match self {
            LessonKind::Alphabets => "Alphabets",
            LessonKind::Numbers => "Numbers",
            LessonKind::Phrase => "Phrase",
            LessonKind::Fingerspelling => "Fingerspelling",
        }
    }

    /// Format a progress entry, e.g. `"Alphabets: A"`
    pub fn entry(self, value: &str) -> String {
        format!("{}: {}", self.prefix(), value)
    }

    /// Split an entry back into kind and value
    pub fn parse_entry(entry: &str) -> Option<(LessonKind, &str)> {
        let (prefix, value) = entry.split_once(": ")?;
        let kind = match prefix {
            "Alphabets" => LessonKind::Alphabets,
            "Numbers" => LessonKind::Numbers,
            "Phrase" => LessonKind::Phrase,
            "Fingerspelling" => LessonKind::Fingerspelling,
            _ => return None,
        };
        Some((kind, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys_roundtrip() {
        for category in Category::all() {
            assert_eq!(Category::from_key(category.key()), Some(*category));
        }
        assert_eq!(Category::from_key("moon_walk"), None);
    }

    #[test]
    fn test_entry_format() {
        assert_eq!(LessonKind::Alphabets.entry("A"), "Alphabets: A");
        assert_eq!(
            LessonKind::parse_entry("Fingerspelling: CAT"),
            Some((LessonKind::Fingerspelling, "CAT"))
        );
        assert_eq!(LessonKind::parse_entry("CAT"), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn kind() -> impl Strategy<Value = LessonKind> {
        prop_oneof![
            Just(LessonKind::Alphabets),
            Just(LessonKind::Numbers),
            Just(LessonKind::Phrase),
            Just(LessonKind::Fingerspelling),
        ]
    }

    proptest! {
        #[test]
        fn parse_entry_reads_back_kind_and_value(kind in kind(), value in "[A-Za-z0-9 :]{0,16}") {
            let entry = kind.entry(&value);
            prop_assert_eq!(LessonKind::parse_entry(&entry), Some((kind, value.as_str())));
        }

        #[test]
        fn unknown_prefix_is_rejected(prefix in "[a-z]{1,10}", value in "[A-Z]{1,5}") {
            let entry = format!("{prefix}: {value}");
            prop_assert_eq!(LessonKind::parse_entry(&entry), None);
        }
    }
}
