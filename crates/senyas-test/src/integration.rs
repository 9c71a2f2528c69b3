//! End-to-end session tests
//!
//! Drive the standard catalogue through the lesson player:
//! - Onboarding from the welcome screen to the home menu
//! - Recognition lessons in single-frame and temporal mode
//! - Cosmic copy and star quest
//! - Profile loading
//! - Degraded cameras and persistence failures
