//! Profile store - one JSON file per learner under a save directory
//!
//! Writes go to a hidden sibling file which is then renamed over the target,
//! so a crash mid-write leaves the previous file intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use senyas_core::{ProfileId, SenyasError, SenyasResult};

use crate::profile::ProfileProgress;

const EXTENSION: &str = "json";

/// Directory of learner profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Trim and check a learner name; it becomes a file stem
    pub fn validate_name(name: &str) -> SenyasResult<ProfileId> {
        let trimmed = name.trim();
        let bad = trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed.starts_with('.')
            || trimmed.chars().any(|c| matches!(c, '/' | '\\' | '\0'));
        if bad {
            return Err(SenyasError::InvalidProfileName(name.to_string()));
        }
        Ok(ProfileId::new(trimmed))
    }

    pub fn path_for(&self, id: &ProfileId) -> PathBuf {
        self.root.join(format!("{}.{}", id.as_str(), EXTENSION))
    }

    pub fn exists(&self, id: &ProfileId) -> bool {
        self.path_for(id).is_file()
    }

    /// New empty profile; an existing profile of the same name is replaced
    pub fn create(&self, name: &str) -> SenyasResult<ProfileProgress> {
        let id = Self::validate_name(name)?;
        let created_at = humantime::format_rfc3339_seconds(SystemTime::now()).to_string();
        let profile = ProfileProgress::new(id.as_str(), created_at);
        if self.exists(&id) {
            tracing::info!(profile = %id, "replacing existing profile");
        }
        self.save(&profile)?;
        tracing::info!(profile = %id, "profile created");
        Ok(profile)
    }

    pub fn load(&self, id: &ProfileId) -> SenyasResult<ProfileProgress> {
        let path = self.path_for(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SenyasError::ProfileNotFound(id.clone()));
            }
            Err(err) => return Err(SenyasError::io(path, err)),
        };
        serde_json::from_slice(&bytes).map_err(|err| SenyasError::ProfileCorrupt {
            path,
            reason: err.to_string(),
        })
    }

    /// Atomic write of the whole document
    pub fn save(&self, profile: &ProfileProgress) -> SenyasResult<()> {
        let id = Self::validate_name(&profile.name)?;
        fs::create_dir_all(&self.root).map_err(|err| SenyasError::io(&self.root, err))?;

        let mut bytes = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
        profile
            .serialize(&mut serializer)
            .map_err(|err| SenyasError::ProfileCorrupt {
                path: self.path_for(&id),
                reason: err.to_string(),
            })?;
        bytes.push(b'\n');

        let target = self.path_for(&id);
        let staging = self.root.join(format!(".{}.{}.tmp", id.as_str(), EXTENSION));
        write_file(&staging, &bytes)?;
        fs::rename(&staging, &target).map_err(|err| {
            let _ = fs::remove_file(&staging);
            SenyasError::io(&target, err)
        })
    }

    /// Profile names, sorted; an absent directory has none
    pub fn list(&self) -> SenyasResult<Vec<ProfileId>> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(SenyasError::io(&self.root, err)),
        };

        let mut names = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|err| SenyasError::io(&self.root, err))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') || !path.is_file() {
                continue;
            }
            names.push(ProfileId::new(stem));
        }
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, id: &ProfileId) -> SenyasResult<()> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(profile = %id, "profile deleted");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(SenyasError::ProfileNotFound(id.clone()))
            }
            Err(err) => Err(SenyasError::io(path, err)),
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> SenyasResult<()> {
    let mut file = fs::File::create(path).map_err(|err| SenyasError::io(path, err))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|err| SenyasError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use senyas_core::Category;

    fn store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("saves"));
        (dir, store)
    }

    #[test]
    fn test_create_load_roundtrip() {
        let (_dir, store) = store();
        let created = store.create("  ana ").unwrap();
        assert_eq!(created.name, "ana");
        assert!(humantime::parse_rfc3339(&created.created_at).is_ok());

        let loaded = store.load(&ProfileId::new("ana")).unwrap();
        assert_eq!(loaded, created);
        assert!(store.path_for(&ProfileId::new("ana")).ends_with("saves/ana.json"));
    }

    #[test]
    fn test_create_replaces_existing() {
        let (_dir, store) = store();
        let mut profile = store.create("ana").unwrap();
        profile.progress.insert(Category::StarQuest, "Fingerspelling: CAT");
        store.save(&profile).unwrap();

        store.create("ana").unwrap();
        let loaded = store.load(&ProfileId::new("ana")).unwrap();
        assert_eq!(loaded.progress.total(), 0);
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "   ", ".", "..", "a/b", "a\\b", ".hidden"] {
            assert!(
                matches!(
                    ProfileStore::validate_name(name),
                    Err(SenyasError::InvalidProfileName(_))
                ),
                "{name:?} accepted"
            );
        }
    }

    #[test]
    fn test_list_sorted_and_skips_other_files() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
        store.create("zoe").unwrap();
        store.create("ana").unwrap();
        fs::write(store.root().join("notes.txt"), "x").unwrap();
        fs::write(store.root().join(".ana.json.tmp"), "x").unwrap();
        assert_eq!(
            store.list().unwrap(),
            vec![ProfileId::new("ana"), ProfileId::new("zoe")]
        );
    }

    #[test]
    fn test_missing_and_corrupt() {
        let (_dir, store) = store();
        let ghost = ProfileId::new("ghost");
        assert!(matches!(store.load(&ghost), Err(SenyasError::ProfileNotFound(_))));
        assert!(matches!(store.delete(&ghost), Err(SenyasError::ProfileNotFound(_))));

        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.path_for(&ProfileId::new("bad")), "{not json").unwrap();
        let err = store.load(&ProfileId::new("bad")).unwrap_err();
        assert!(matches!(err, SenyasError::ProfileCorrupt { .. }));
        assert!(err.is_persistence());
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = store();
        store.create("ana").unwrap();
        let id = ProfileId::new("ana");
        store.delete(&id).unwrap();
        assert!(!store.exists(&id));
    }

    #[test]
    fn test_save_leaves_no_staging_file() {
        let (_dir, store) = store();
        store.create("ana").unwrap();
        let names: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["ana.json".to_string()]);
    }
}
