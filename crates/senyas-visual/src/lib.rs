//! SENYAS Visual
//!
//! Landmarks in, labels out. This crate does NOT decode video or run a model.
//!
//! # Pipeline
//!
//! Camera → Detection (landmarks) → FeatureVector → Classifier → Prediction
//!
//! The camera and the landmark detector are collaborators behind the
//! [`Camera`] trait; trained models sit behind [`FrameClassifier`] and
//! [`SequenceClassifier`] (or [`ProbabilityModel`] when the model only hands
//! back a probability vector).
//!
//! # Feature Layouts
//!
//! - HandXy: 21 hand points × (x, y) = 42 values (letters)
//! - HandXyz: 21 hand points × (x, y, z) = 63 values (digits)
//! - Holistic: pose 33 × 4 + two hands 21 × 3 each = 258 values (phrases)

pub mod camera;
pub mod classifier;
pub mod features;
pub mod landmark;

pub use camera::*;
pub use classifier::*;
pub use features::*;
pub use landmark::*;
