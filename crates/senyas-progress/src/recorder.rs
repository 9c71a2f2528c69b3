//! Progress recorder - idempotent completion markers
//!
//! Load, insert if absent, write back. Only confirmed correctness reaches
//! here; a replayed confirmation leaves the file untouched.

use senyas_core::{Category, ProfileId, SenyasResult};

use crate::profile::ProfileProgress;
use crate::store::ProfileStore;

/// What a `record` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    AlreadyPresent,
    /// No learner signed in; nothing written
    NoActiveProfile,
}

/// Appends completed items to a learner's profile
#[derive(Debug, Clone)]
pub struct ProgressRecorder {
    store: ProfileStore,
}

impl ProgressRecorder {
    pub fn new(store: ProfileStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn record(
        &self,
        profile: Option<&ProfileId>,
        category: Category,
        entry: &str,
    ) -> SenyasResult<RecordOutcome> {
        let Some(id) = profile else {
            tracing::debug!(%category, entry, "no active profile, progress not recorded");
            return Ok(RecordOutcome::NoActiveProfile);
        };

        let mut document = self.store.load(id)?;
        if !document.progress.insert(category, entry) {
            return Ok(RecordOutcome::AlreadyPresent);
        }
        self.store.save(&document)?;
        tracing::info!(profile = %id, %category, entry, "progress recorded");
        Ok(RecordOutcome::Inserted)
    }

    /// Current document for a learner
    pub fn progress_of(&self, id: &ProfileId) -> SenyasResult<ProfileProgress> {
        self.store.load(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use senyas_core::{LessonKind, SenyasError};
    use std::fs;

    fn recorder() -> (tempfile::TempDir, ProgressRecorder) {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ProgressRecorder::new(ProfileStore::new(dir.path()));
        (dir, recorder)
    }

    #[test]
    fn test_record_twice_is_one_entry() {
        let (_dir, recorder) = recorder();
        recorder.store().create("ana").unwrap();
        let ana = ProfileId::new("ana");
        let entry = LessonKind::Alphabets.entry("A");

        let first = recorder
            .record(Some(&ana), Category::GalaxyExplorer, &entry)
            .unwrap();
        let second = recorder
            .record(Some(&ana), Category::GalaxyExplorer, &entry)
            .unwrap();
        assert_eq!(first, RecordOutcome::Inserted);
        assert_eq!(second, RecordOutcome::AlreadyPresent);

        let doc = recorder.progress_of(&ana).unwrap();
        assert_eq!(doc.progress.entries(Category::GalaxyExplorer), &[entry]);
    }

    #[test]
    fn test_no_active_profile_is_noop() {
        let (dir, recorder) = recorder();
        let outcome = recorder
            .record(None, Category::CosmicCopy, "Numbers: 4")
            .unwrap();
        assert_eq!(outcome, RecordOutcome::NoActiveProfile);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_profile_reported() {
        let (_dir, recorder) = recorder();
        let err = recorder
            .record(Some(&ProfileId::new("ghost")), Category::StarQuest, "Fingerspelling: SUN")
            .unwrap_err();
        assert!(matches!(err, SenyasError::ProfileNotFound(_)));
    }

    #[test]
    fn test_legacy_file_upgraded_on_record() {
        let (dir, recorder) = recorder();
        fs::write(
            dir.path().join("ben.json"),
            r#"{"name": "ben", "created at": "03/01/2025", "progress": {"completed lessons": []}}"#,
        )
        .unwrap();
        let ben = ProfileId::new("ben");
        recorder
            .record(Some(&ben), Category::GalaxyExplorer, "Phrase: hello")
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("ben.json")).unwrap()).unwrap();
        assert_eq!(raw["created_at"], "03/01/2025");
        assert_eq!(
            raw["progress"]["completed_lessons"]["galaxy_explorer"][0],
            "Phrase: hello"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn recorded_lists_stay_sorted_and_unique(values in prop::collection::vec("[A-Z0-9]", 1..20)) {
            let dir = tempfile::tempdir().unwrap();
            let recorder = ProgressRecorder::new(ProfileStore::new(dir.path()));
            recorder.store().create("ana").unwrap();
            let ana = ProfileId::new("ana");
            for v in &values {
                recorder.record(Some(&ana), Category::CosmicCopy, &format!("Alphabets: {v}")).unwrap();
            }
            let doc = recorder.progress_of(&ana).unwrap();
            let entries = doc.progress.entries(Category::CosmicCopy);
            prop_assert!(entries.windows(2).all(|w| w[0] < w[1]));
            let mut expected: Vec<_> = values.iter().map(|v| format!("Alphabets: {v}")).collect();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(entries, expected.as_slice());
        }
    }
}
