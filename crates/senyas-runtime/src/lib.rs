//! SENYAS Runtime - Lesson session engine
//!
//! This crate implements the frame loop of a lesson player:
//! 1. Dispatch input events to the active scene
//! 2. Tick the active scene (camera read, recognition, timers)
//! 3. Execute the transition the scene asked for, if any
//! 4. Render the active scene into a display list
//!
//! Scenes never reach a global owner. Everything shared (active profile,
//! progress recorder, camera, sequence index, transition payload, audio cues)
//! travels in a [`SceneContext`] passed to every scene call.

pub mod catalog;
pub mod context;
pub mod display;
pub mod machine;
pub mod player;
pub mod scene;
pub mod scenes;
pub mod sequence;

pub use catalog::*;
pub use context::*;
pub use display::*;
pub use machine::*;
pub use player::*;
pub use scene::*;
pub use sequence::*;
