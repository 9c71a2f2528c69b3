//! Recognition scene - sign one item in front of the camera
//!
//! Each tick reads at most one frame and feeds it to the challenge. The first
//! confirmation records progress and starts a celebration. Recognition pauses
//! while confetti falls and restarts with a fresh challenge afterwards.

use std::time::Duration;

use senyas_core::{buttons, Category, InputEvent, LessonKind, SceneId, SenyasResult};
use senyas_recognition::{
    CelebrationConfig, CelebrationController, ChallengeConfig, RecognitionChallenge, Recognizer,
    Verdict,
};

use crate::context::SceneContext;
use crate::display::{sounds, DisplayList, DrawCommand};
use crate::scene::{Scene, SceneCommand};
use crate::scenes::{
    acquire_camera, feedback_for, observe_frame, release_camera, render_debug, Feedback,
    HoverState,
};

/// Descriptor of one recognition lesson
#[derive(Debug, Clone)]
pub struct RecognitionLesson {
    /// Lesson-facing label, e.g. `A`, `7`, `thankyou`
    pub label: String,
    pub kind: LessonKind,
    pub category: Category,
    /// Reference picture or clip of the sign
    pub image: String,
    pub recognizer: Recognizer,
    pub challenge: ChallengeConfig,
    pub back: SceneId,
    /// Sequence used by the next/previous buttons
    pub sequence: Option<String>,
}

impl RecognitionLesson {
    pub fn new(
        label: impl Into<String>,
        kind: LessonKind,
        recognizer: Recognizer,
        back: impl Into<SceneId>,
    ) -> Self {
        let label = label.into();
        Self {
            image: format!("sign_{}", label.to_lowercase()),
            label,
            kind,
            category: Category::GalaxyExplorer,
            recognizer,
            challenge: ChallengeConfig::default(),
            back: back.into(),
            sequence: None,
        }
    }

    pub fn with_challenge(mut self, challenge: ChallengeConfig) -> Self {
        self.challenge = challenge;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn in_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }

    /// Progress entry written on success, e.g. `Alphabets: A`
    pub fn entry(&self) -> String {
        self.kind.entry(&self.label)
    }
}

#[derive(Debug)]
pub struct RecognitionScene {
    lesson: RecognitionLesson,
    challenge: RecognitionChallenge,
    celebration: CelebrationController,
    feedback: Feedback,
    camera_ready: bool,
    debug: bool,
    hover: HoverState,
}

impl RecognitionScene {
    pub fn new(lesson: RecognitionLesson, celebration: CelebrationConfig) -> SenyasResult<Self> {
        Self::with_controller(lesson, CelebrationController::new(celebration)?)
    }

    /// Deterministic confetti
    pub fn with_seed(
        lesson: RecognitionLesson,
        celebration: CelebrationConfig,
        seed: u64,
    ) -> SenyasResult<Self> {
        Self::with_controller(lesson, CelebrationController::with_seed(celebration, seed)?)
    }

    fn with_controller(
        lesson: RecognitionLesson,
        celebration: CelebrationController,
    ) -> SenyasResult<Self> {
        let challenge = RecognitionChallenge::new(
            lesson.label.clone(),
            lesson.recognizer.clone(),
            lesson.challenge.clone(),
        )?;
        Ok(Self {
            lesson,
            challenge,
            celebration,
            feedback: Feedback::Blank,
            camera_ready: false,
            debug: false,
            hover: HoverState::default(),
        })
    }

    pub fn lesson(&self) -> &RecognitionLesson {
        &self.lesson
    }

    pub fn challenge(&self) -> &RecognitionChallenge {
        &self.challenge
    }

    pub fn celebration(&self) -> &CelebrationController {
        &self.celebration
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    fn navigation(&self) -> &'static [&'static str] {
        if self.lesson.sequence.is_some() {
            &[buttons::BACK, buttons::PREVIOUS, buttons::NEXT]
        } else {
            &[buttons::BACK]
        }
    }

    fn step(&self, name: &str, ctx: &SceneContext) -> Option<SceneId> {
        let sequence = self.lesson.sequence.as_deref()?;
        let current = ctx.current_scene();
        match name {
            buttons::NEXT => ctx.sequences().next(sequence, &current),
            buttons::PREVIOUS => ctx.sequences().previous(sequence, &current),
            _ => None,
        }
    }

    fn on_correct(&mut self, ctx: &mut SceneContext) {
        let entry = self.lesson.entry();
        ctx.record(self.lesson.category, &entry);
        if self.celebration.trigger(ctx.now()) {
            ctx.play(sounds::CELEBRATION);
        }
    }
}

impl Scene for RecognitionScene {
    fn enter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()> {
        self.challenge.reset();
        self.celebration.cancel();
        self.feedback = Feedback::Blank;
        self.hover.clear();
        self.camera_ready = acquire_camera(ctx)?;
        Ok(())
    }

    fn exit(&mut self, ctx: &mut SceneContext) {
        release_camera(ctx);
        self.camera_ready = false;
        self.challenge.reset();
        self.celebration.cancel();
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        ctx: &mut SceneContext,
    ) -> SenyasResult<SceneCommand> {
        match event {
            InputEvent::Hover(target) => {
                let target = target
                    .as_deref()
                    .filter(|name| self.navigation().contains(name));
                self.hover.update(target, ctx);
            }
            InputEvent::ToggleDebug => self.debug = !self.debug,
            InputEvent::Activate(name) if name == buttons::BACK => {
                ctx.play(sounds::CLICK);
                return Ok(SceneCommand::goto(self.lesson.back.clone()));
            }
            InputEvent::Activate(name) => {
                if let Some(target) = self.step(name, ctx) {
                    ctx.play(sounds::CLICK);
                    return Ok(SceneCommand::goto(target));
                }
            }
            _ => {}
        }
        Ok(SceneCommand::None)
    }

    fn update(&mut self, dt: Duration, ctx: &mut SceneContext) -> SenyasResult<SceneCommand> {
        if self.celebration.is_active() {
            if self.celebration.advance(dt) {
                self.challenge.reset();
                self.feedback = Feedback::Blank;
            }
            return Ok(SceneCommand::None);
        }
        if !self.camera_ready {
            return Ok(SceneCommand::None);
        }

        let Some((verdict, detected)) = observe_frame(&mut self.challenge, ctx)? else {
            return Ok(SceneCommand::None);
        };
        if verdict == Verdict::Correct && self.feedback != Feedback::Correct {
            self.on_correct(ctx);
        }
        self.feedback = feedback_for(self.feedback, verdict, detected);
        Ok(SceneCommand::None)
    }

    fn render(&self, _ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()> {
        out.push(DrawCommand::Image {
            key: self.lesson.image.clone(),
        });
        out.push(DrawCommand::CameraFeed);
        self.feedback.render(out);
        if self.debug {
            render_debug(&self.challenge, out);
        }
        for name in self.navigation() {
            out.button(*name, self.hover.is(name));
        }
        if self.celebration.is_active() {
            out.push(DrawCommand::Confetti(self.celebration.particles().to_vec()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{AudioCue, TextRole};
    use crate::scenes::testing::{context, recognizer, QueueClassifier};
    use crate::sequence::{SceneSequence, SequenceIndex};
    use senyas_core::ProfileId;

    fn lesson(classifier: std::sync::Arc<QueueClassifier>) -> RecognitionLesson {
        RecognitionLesson::new(
            "A",
            LessonKind::Alphabets,
            recognizer(classifier),
            "playing_alphabets",
        )
        .with_challenge(ChallengeConfig::alphabet())
        .in_sequence("alphabet")
    }

    fn tick(scene: &mut RecognitionScene, ctx: &mut SceneContext, n: usize) {
        for _ in 0..n {
            scene.update(Duration::from_millis(33), ctx).unwrap();
        }
    }

    #[test]
    fn test_confirmation_records_and_celebrates_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        ctx.store().create("ana").unwrap();
        ctx.set_profile(Some(ProfileId::new("ana")));

        let classifier = QueueClassifier::new(&[("A", 0.97)]);
        let mut scene =
            RecognitionScene::with_seed(lesson(classifier), CelebrationConfig::default(), 7)
                .unwrap();
        scene.enter(&mut ctx).unwrap();

        tick(&mut scene, &mut ctx, 4);
        assert_eq!(scene.feedback(), Feedback::Blank);
        tick(&mut scene, &mut ctx, 1);
        assert_eq!(scene.feedback(), Feedback::Correct);
        assert!(scene.celebration().is_active());
        assert!(ctx
            .drain_audio()
            .contains(&AudioCue::Play(sounds::CELEBRATION.into())));

        let progress = ctx.recorder().progress_of(&ProfileId::new("ana")).unwrap();
        assert!(progress
            .progress
            .contains(Category::GalaxyExplorer, "Alphabets: A"));

        let mut out = DisplayList::new();
        scene.render(&ctx, &mut out).unwrap();
        assert!(out.has_text(TextRole::Verdict, "Correct"));
        assert_eq!(out.confetti_count(), 100);
    }

    #[test]
    fn test_celebration_end_restarts_challenge() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        let classifier = QueueClassifier::new(&[("A", 0.97)]);
        let mut scene =
            RecognitionScene::with_seed(lesson(classifier), CelebrationConfig::default(), 1)
                .unwrap();
        scene.enter(&mut ctx).unwrap();
        tick(&mut scene, &mut ctx, 5);
        assert!(scene.challenge().is_correct());

        for _ in 0..400 {
            scene.update(Duration::from_millis(33), &mut ctx).unwrap();
            if !scene.celebration().is_active() {
                break;
            }
        }
        assert!(!scene.celebration().is_active());
        assert!(!scene.challenge().is_correct());
        assert_eq!(scene.celebration().completed(), 1);
    }

    #[test]
    fn test_mismatched_layout_fails_at_construction() {
        let classifier = QueueClassifier::new(&[("A", 0.97)]);
        let lesson = RecognitionLesson::new(
            "A",
            LessonKind::Alphabets,
            Recognizer::frame(classifier, senyas_visual::FeatureLayout::HandXyz),
            "playing_alphabets",
        );
        let err = RecognitionScene::new(lesson, CelebrationConfig::default()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_miss_shows_try_again() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        let classifier = QueueClassifier::new(&[("B", 0.99)]);
        let mut scene =
            RecognitionScene::new(lesson(classifier), CelebrationConfig::default()).unwrap();
        scene.enter(&mut ctx).unwrap();
        tick(&mut scene, &mut ctx, 1);
        assert_eq!(scene.feedback(), Feedback::TryAgain);
        assert!(ctx.store().list().unwrap().is_empty());
    }

    #[test]
    fn test_camera_lifecycle_and_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir).with_sequences(SequenceIndex::new().with(
            SceneSequence::new("alphabet", ["playing_a", "playing_b"], "playing_alphabets"),
        ));
        ctx.set_current(SceneId::new("playing_a"));

        let classifier = QueueClassifier::new(&[]);
        let mut scene =
            RecognitionScene::new(lesson(classifier), CelebrationConfig::default()).unwrap();
        scene.enter(&mut ctx).unwrap();
        assert_eq!(ctx.camera_owner(), Some(&SceneId::new("playing_a")));

        let cmd = scene
            .handle_input(&InputEvent::activate(buttons::NEXT), &mut ctx)
            .unwrap();
        assert_eq!(cmd, SceneCommand::goto("playing_b"));
        let cmd = scene
            .handle_input(&InputEvent::activate(buttons::PREVIOUS), &mut ctx)
            .unwrap();
        assert_eq!(cmd, SceneCommand::goto("playing_alphabets"));

        scene.exit(&mut ctx);
        assert!(ctx.camera_owner().is_none());
    }

    #[test]
    fn test_debug_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        let classifier = QueueClassifier::new(&[("C", 0.5)]);
        let mut scene =
            RecognitionScene::new(lesson(classifier), CelebrationConfig::default()).unwrap();
        scene.enter(&mut ctx).unwrap();
        scene
            .handle_input(&InputEvent::ToggleDebug, &mut ctx)
            .unwrap();
        tick(&mut scene, &mut ctx, 1);

        let mut out = DisplayList::new();
        scene.render(&ctx, &mut out).unwrap();
        assert!(out.has_text(TextRole::Debug, "Prediction: C, Confidence: 0.50"));
    }
}
