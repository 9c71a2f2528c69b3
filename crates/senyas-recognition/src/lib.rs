//! SENYAS Recognition
//!
//! The gesture-verification protocol layered on top of a per-frame classifier.
//!
//! # Flow
//!
//! ```text
//! feature vector ─► motion gate ─► rolling window ─► classifier
//!                                                       │
//!        Pending | Correct | Incorrect ◄─ debounce ◄────┘
//! ```
//!
//! A confirmed `Correct` starts a [`CelebrationController`]; when it finishes
//! the owner resets the [`RecognitionChallenge`] before observing again.

pub mod celebration;
pub mod challenge;
pub mod thresholds;

pub use celebration::*;
pub use challenge::*;
pub use thresholds::*;
