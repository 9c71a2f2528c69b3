//! Scene types
//!
//! One parametrised type per capability. The catalogue builds the player's
//! scene graph out of these by filling in descriptors.

pub mod menu;
pub mod mixed;
pub mod profiles;
pub mod recognition;
pub mod sign_in;
pub mod spelling;
pub mod text_entry;
pub mod video;

pub use menu::*;
pub use mixed::*;
pub use profiles::*;
pub use recognition::*;
pub use sign_in::*;
pub use spelling::*;
pub use text_entry::*;
pub use video::*;

use senyas_core::{SenyasError, SenyasResult};
use senyas_recognition::{RecognitionChallenge, Verdict};

use crate::context::SceneContext;
use crate::display::{sounds, DisplayList, TextRole};

/// Hover tracking; the hover cue plays only when the pointer moves onto a
/// different button
#[derive(Debug, Clone, Default)]
pub(crate) struct HoverState {
    hovered: Option<String>,
}

impl HoverState {
    pub(crate) fn update(&mut self, target: Option<&str>, ctx: &mut SceneContext) {
        if let Some(name) = target {
            if self.hovered.as_deref() != Some(name) {
                ctx.play(sounds::HOVER);
            }
        }
        self.hovered = target.map(str::to_string);
    }

    pub(crate) fn is(&self, name: &str) -> bool {
        self.hovered.as_deref() == Some(name)
    }

    pub(crate) fn clear(&mut self) {
        self.hovered = None;
    }
}

/// Feedback line under the camera feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    Blank,
    Correct,
    TryAgain,
}

impl Feedback {
    pub fn text(self) -> Option<&'static str> {
        match self {
            Feedback::Blank => None,
            Feedback::Correct => Some("Correct"),
            Feedback::TryAgain => Some("Try Again"),
        }
    }

    pub(crate) fn render(self, out: &mut DisplayList) {
        if let Some(text) = self.text() {
            out.text(TextRole::Verdict, text);
        }
    }
}

/// Open the camera for the current scene
///
/// A missing camera is not fatal: the scene still renders and simply never
/// sees a frame. A camera held by another scene is.
pub(crate) fn acquire_camera(ctx: &mut SceneContext) -> SenyasResult<bool> {
    let scene = ctx.current_scene();
    match ctx.camera().acquire(&scene) {
        Ok(()) => Ok(true),
        Err(SenyasError::CameraUnavailable(reason)) => {
            tracing::warn!(scene = %scene, %reason, "camera unavailable, recognition disabled");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

pub(crate) fn release_camera(ctx: &mut SceneContext) {
    let scene = ctx.current_scene();
    ctx.camera().release(&scene);
}

/// Read one frame and feed it to the challenge
///
/// Returns `None` when no frame was available. Classifier failures count as
/// a frame with nothing recognised.
pub(crate) fn observe_frame(
    challenge: &mut RecognitionChallenge,
    ctx: &mut SceneContext,
) -> SenyasResult<Option<(Verdict, bool)>> {
    let scene = ctx.current_scene();
    let Some(frame) = ctx.camera().read_frame(&scene) else {
        return Ok(None);
    };
    let detected = frame.detection.is_some();
    match challenge.observe_detection(frame.detection.as_ref()) {
        Ok(verdict) => Ok(Some((verdict, detected))),
        Err(SenyasError::Classifier(reason)) => {
            tracing::warn!(scene = %scene, %reason, "classifier failed, frame skipped");
            Ok(Some((Verdict::Pending, false)))
        }
        Err(err) => Err(err),
    }
}

/// Next feedback after an observation
pub(crate) fn feedback_for(current: Feedback, verdict: Verdict, detected: bool) -> Feedback {
    match verdict {
        Verdict::Correct => Feedback::Correct,
        Verdict::Incorrect => Feedback::TryAgain,
        Verdict::Pending if !detected => Feedback::Blank,
        Verdict::Pending => current,
    }
}

pub(crate) fn render_debug(challenge: &RecognitionChallenge, out: &mut DisplayList) {
    match challenge.last_prediction() {
        Some(p) => out.text(
            TextRole::Debug,
            format!("Prediction: {}, Confidence: {:.2}", p.label, p.confidence),
        ),
        None => out.text(TextRole::Debug, "Prediction: -"),
    }
}
