//! Identity types for the lesson engine
//!
//! Scenes and profiles are addressed by human-readable strings so that scene
//! tables and save files stay greppable.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scene identity - key into the registered scene table
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        SceneId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scene({})", self.0)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        SceneId::new(id)
    }
}

impl From<String> for SceneId {
    fn from(id: String) -> Self {
        SceneId(id)
    }
}

impl Borrow<str> for SceneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SceneId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SceneId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Profile identity - the learner's name, which is also the save file stem
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        ProfileId(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Profile({})", self.0)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(name: &str) -> Self {
        ProfileId::new(name)
    }
}

impl From<String> for ProfileId {
    fn from(name: String) -> Self {
        ProfileId(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_scene_id_lookup_by_str() {
        let mut table = HashMap::new();
        table.insert(SceneId::new("playing_a"), 1);
        assert_eq!(table.get("playing_a"), Some(&1));
        assert_eq!(SceneId::from("playing_a"), "playing_a");
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", SceneId::new("home")), "Scene(home)");
        assert_eq!(format!("{}", ProfileId::new("ana")), "ana");
    }
}
