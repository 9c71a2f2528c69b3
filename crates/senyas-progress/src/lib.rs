//! SENYAS Progress - Learner profiles and completed-lesson tracking
//!
//! This crate implements the persistence side of a lesson session:
//! - Profile documents, tolerant of older save-file shapes
//! - One JSON file per learner, written atomically
//! - Idempotent recording of completed items per lesson category
//! - Text summaries for the profile loader

pub mod profile;
pub mod recorder;
pub mod store;
pub mod summary;

pub use profile::*;
pub use recorder::*;
pub use store::*;
pub use summary::*;
