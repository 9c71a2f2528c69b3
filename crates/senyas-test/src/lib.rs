//! SENYAS Test Harness - Scripted collaborators and end-to-end sessions
//!
//! This crate provides:
//! - Scripted frame and window classifiers
//! - A sign board standing in for a learner in front of a camera
//! - Camera chaos (dropped frames, lost detections, jitter, latency)
//! - A session harness driving the standard lesson catalogue
//! - End-to-end session tests

pub mod board;
pub mod chaos;
pub mod harness;
pub mod integration;
pub mod scripted;

pub use board::*;
pub use chaos::*;
pub use harness::*;
pub use scripted::*;
