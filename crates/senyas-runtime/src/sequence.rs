//! Scene sequences - ordered lesson scenes for next/previous navigation
//!
//! Navigation never wraps. Stepping past either end, or from a scene that is
//! not in the sequence, lands on the sequence's landing scene.

use std::collections::BTreeMap;

use senyas_core::SceneId;

/// One ordered list of scenes with its landing scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSequence {
    name: String,
    items: Vec<SceneId>,
    landing: SceneId,
}

impl SceneSequence {
    pub fn new<I, S>(name: impl Into<String>, items: I, landing: impl Into<SceneId>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SceneId>,
    {
        Self {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
            landing: landing.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[SceneId] {
        &self.items
    }

    pub fn landing(&self) -> &SceneId {
        &self.landing
    }

    pub fn contains(&self, id: &SceneId) -> bool {
        self.items.contains(id)
    }

    pub fn position(&self, id: &SceneId) -> Option<usize> {
        self.items.iter().position(|item| item == id)
    }

    pub fn next(&self, current: &SceneId) -> SceneId {
        self.position(current)
            .and_then(|i| self.items.get(i + 1))
            .unwrap_or(&self.landing)
            .clone()
    }

    pub fn previous(&self, current: &SceneId) -> SceneId {
        self.position(current)
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.items.get(i))
            .unwrap_or(&self.landing)
            .clone()
    }
}

/// Named sequences, read-only once the session starts
#[derive(Debug, Clone, Default)]
pub struct SequenceIndex {
    sequences: BTreeMap<String, SceneSequence>,
}

impl SequenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sequence: SceneSequence) -> Self {
        self.insert(sequence);
        self
    }

    pub fn insert(&mut self, sequence: SceneSequence) {
        self.sequences.insert(sequence.name.clone(), sequence);
    }

    pub fn get(&self, name: &str) -> Option<&SceneSequence> {
        self.sequences.get(name)
    }

    /// The first sequence containing `id`
    pub fn sequence_of(&self, id: &SceneId) -> Option<&SceneSequence> {
        self.sequences.values().find(|s| s.contains(id))
    }

    /// `None` only when no sequence has that name
    pub fn next(&self, name: &str, current: &SceneId) -> Option<SceneId> {
        self.get(name).map(|s| s.next(current))
    }

    pub fn previous(&self, name: &str, current: &SceneId) -> Option<SceneId> {
        self.get(name).map(|s| s.previous(current))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> SceneSequence {
        SceneSequence::new(
            "numbers",
            (0..10).map(|i| format!("playing_{i}")),
            "playing_numbers",
        )
    }

    #[test]
    fn test_interior_navigation() {
        let seq = digits();
        let four = SceneId::new("playing_4");
        assert_eq!(seq.next(&four), "playing_5");
        assert_eq!(seq.previous(&four), "playing_3");
    }

    #[test]
    fn test_ends_saturate_to_landing() {
        let seq = digits();
        assert_eq!(seq.next(&SceneId::new("playing_9")), "playing_numbers");
        assert_eq!(seq.previous(&SceneId::new("playing_0")), "playing_numbers");
    }

    #[test]
    fn test_absent_id_goes_to_landing() {
        let seq = digits();
        let stray = SceneId::new("playing_home");
        assert_eq!(seq.next(&stray), "playing_numbers");
        assert_eq!(seq.previous(&stray), "playing_numbers");
    }

    #[test]
    fn test_index_lookup() {
        let index = SequenceIndex::new()
            .with(digits())
            .with(SceneSequence::new("phrases", ["playing_hello"], "playing_phrases"));
        assert_eq!(
            index.sequence_of(&SceneId::new("playing_hello")).map(|s| s.name()),
            Some("phrases")
        );
        assert_eq!(index.next("alphabet", &SceneId::new("playing_a")), None);
        assert_eq!(
            index.next("phrases", &SceneId::new("playing_hello")),
            Some(SceneId::new("playing_phrases"))
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn next_then_previous_returns_for_interior(len in 3usize..40, pick in 0usize..1000) {
            let seq = SceneSequence::new("s", (0..len).map(|i| format!("item_{i}")), "landing");
            let i = pick % (len - 1);
            let id = SceneId::new(format!("item_{i}"));
            let next = seq.next(&id);
            prop_assert_eq!(seq.previous(&next), id);
        }

        #[test]
        fn navigation_stays_in_sequence_or_landing(len in 1usize..40, pick in 0usize..80) {
            let seq = SceneSequence::new("s", (0..len).map(|i| format!("item_{i}")), "landing");
            let id = SceneId::new(format!("item_{pick}"));
            for target in [seq.next(&id), seq.previous(&id)] {
                prop_assert!(seq.contains(&target) || &target == seq.landing());
            }
        }
    }
}
