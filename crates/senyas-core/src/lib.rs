//! SENYAS Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the lesson engine:
//! - Identifiers (SceneId, ProfileId)
//! - Lesson categories and progress entry kinds
//! - Session time (monotonic, tick-driven)
//! - Semantic input events
//! - The error taxonomy shared by every crate

pub mod error;
pub mod event;
pub mod id;
pub mod lesson;
pub mod time;

pub use error::*;
pub use event::*;
pub use id::*;
pub use lesson::*;
pub use time::*;
