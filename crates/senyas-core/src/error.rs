//! Error types for the lesson engine

use std::path::PathBuf;

use thiserror::Error;

use crate::{ProfileId, SceneId};

/// Core SENYAS errors
#[derive(Error, Debug)]
pub enum SenyasError {
    // Configuration errors
    #[error("Unknown scene: {0}")]
    UnknownScene(SceneId),

    #[error("Scene already registered: {0}")]
    DuplicateScene(SceneId),

    #[error("Scene machine not started")]
    NotStarted,

    #[error("Frame order violated: {0}")]
    FrameOrder(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Perception errors
    #[error("Camera busy: held by scene {0}")]
    CameraBusy(SceneId),

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("Feature length mismatch: expected {expected}, got {actual}")]
    FeatureLength { expected: usize, actual: usize },

    #[error("Classifier error: {0}")]
    Classifier(String),

    // Persistence errors
    #[error("Invalid profile name: {0:?}")]
    InvalidProfileName(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(ProfileId),

    #[error("Profile file corrupt at {}: {reason}", path.display())]
    ProfileCorrupt { path: PathBuf, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SenyasError {
    /// Configuration errors abort startup or the offending transition.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SenyasError::UnknownScene(_)
                | SenyasError::DuplicateScene(_)
                | SenyasError::NotStarted
                | SenyasError::FrameOrder(_)
                | SenyasError::InvalidConfig(_)
        )
    }

    /// Errors raised while reading or writing learner profiles.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            SenyasError::InvalidProfileName(_)
                | SenyasError::ProfileNotFound(_)
                | SenyasError::ProfileCorrupt { .. }
                | SenyasError::Io { .. }
        )
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SenyasError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for SENYAS operations
pub type SenyasResult<T> = Result<T, SenyasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_fatal() {
        assert!(SenyasError::UnknownScene(SceneId::new("nowhere")).is_fatal());
        assert!(SenyasError::NotStarted.is_fatal());
        assert!(!SenyasError::Classifier("model offline".into()).is_fatal());
    }

    #[test]
    fn test_persistence_errors() {
        let err = SenyasError::ProfileCorrupt {
            path: PathBuf::from("saves/ana.json"),
            reason: "expected value at line 1".into(),
        };
        assert!(err.is_persistence());
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("saves/ana.json"));
    }
}
