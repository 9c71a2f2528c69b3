//! Spelling scene - fingerspell whole words letter by letter
//!
//! A confirmed letter is held for a moment before the next letter starts.
//! A finished word celebrates, stays on screen for the word delay, then the
//! next level begins. Levels wrap after the last word.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use senyas_core::{
    buttons, Category, Countdown, InputEvent, LessonKind, SceneId, SenyasError, SenyasResult,
};
use senyas_recognition::{
    CelebrationConfig, CelebrationController, ChallengeConfig, RecognitionChallenge, Recognizer,
    Verdict,
};

use crate::context::SceneContext;
use crate::display::{sounds, DisplayList, DrawCommand, TextRole};
use crate::scene::{Scene, SceneCommand};
use crate::scenes::{
    acquire_camera, feedback_for, observe_frame, release_camera, render_debug, Feedback,
    HoverState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    pub levels: Vec<String>,
    /// Pause after a confirmed letter
    pub letter_hold_ms: u64,
    /// How long a finished word stays up
    pub word_delay_ms: u64,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            levels: ["CAT", "DOG", "SUN", "FISH", "ELEPHANT"]
                .into_iter()
                .map(String::from)
                .collect(),
            letter_hold_ms: 1000,
            word_delay_ms: 5000,
        }
    }
}

impl SpellingConfig {
    pub fn letter_hold(&self) -> Duration {
        Duration::from_millis(self.letter_hold_ms)
    }

    pub fn word_delay(&self) -> Duration {
        Duration::from_millis(self.word_delay_ms)
    }

    pub fn validate(&self) -> SenyasResult<()> {
        if self.levels.is_empty() {
            return Err(SenyasError::InvalidConfig("no spelling levels".into()));
        }
        if let Some(word) = self
            .levels
            .iter()
            .find(|w| w.is_empty() || !w.chars().all(|c| c.is_ascii_uppercase()))
        {
            return Err(SenyasError::InvalidConfig(format!(
                "spelling level {word:?} must be uppercase letters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellingPhase {
    /// Waiting for the current letter
    Signing,
    /// Letter confirmed, counting down to the next step
    Holding(Countdown),
    /// Word finished, counting down to the next level
    WordComplete(Countdown),
}

#[derive(Debug)]
pub struct SpellingScene {
    config: SpellingConfig,
    recognizer: Recognizer,
    challenge_config: ChallengeConfig,
    back: SceneId,
    level: usize,
    step: usize,
    phase: SpellingPhase,
    challenge: RecognitionChallenge,
    celebration: CelebrationController,
    feedback: Feedback,
    camera_ready: bool,
    debug: bool,
    hover: HoverState,
}

impl SpellingScene {
    pub fn new(
        config: SpellingConfig,
        recognizer: Recognizer,
        challenge_config: ChallengeConfig,
        back: impl Into<SceneId>,
        celebration: CelebrationConfig,
    ) -> SenyasResult<Self> {
        Self::build(
            config,
            recognizer,
            challenge_config,
            back.into(),
            CelebrationController::new(celebration)?,
        )
    }

    pub fn with_seed(
        config: SpellingConfig,
        recognizer: Recognizer,
        challenge_config: ChallengeConfig,
        back: impl Into<SceneId>,
        celebration: CelebrationConfig,
        seed: u64,
    ) -> SenyasResult<Self> {
        Self::build(
            config,
            recognizer,
            challenge_config,
            back.into(),
            CelebrationController::with_seed(celebration, seed)?,
        )
    }

    fn build(
        config: SpellingConfig,
        recognizer: Recognizer,
        challenge_config: ChallengeConfig,
        back: SceneId,
        celebration: CelebrationController,
    ) -> SenyasResult<Self> {
        config.validate()?;
        let first = letter_at(&config.levels[0], 0);
        let challenge = RecognitionChallenge::new(first, recognizer.clone(), challenge_config.clone())?;
        Ok(Self {
            config,
            recognizer,
            challenge_config,
            back,
            level: 0,
            step: 0,
            phase: SpellingPhase::Signing,
            challenge,
            celebration,
            feedback: Feedback::Blank,
            camera_ready: false,
            debug: false,
            hover: HoverState::default(),
        })
    }

    pub fn word(&self) -> &str {
        &self.config.levels[self.level]
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn phase(&self) -> SpellingPhase {
        self.phase
    }

    pub fn expected_letter(&self) -> &str {
        self.challenge.expected()
    }

    pub fn celebration(&self) -> &CelebrationController {
        &self.celebration
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    fn start_letter(&mut self) -> SenyasResult<()> {
        let letter = letter_at(self.word(), self.step);
        self.challenge = RecognitionChallenge::new(
            letter,
            self.recognizer.clone(),
            self.challenge_config.clone(),
        )?;
        self.phase = SpellingPhase::Signing;
        self.feedback = Feedback::Blank;
        Ok(())
    }

    fn finish_letter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()> {
        self.step += 1;
        if self.step < self.word().chars().count() {
            return self.start_letter();
        }

        let word = self.word().to_string();
        tracing::info!(word = %word, "word spelled");
        ctx.record(Category::StarQuest, &LessonKind::Fingerspelling.entry(&word));
        if self
            .celebration
            .trigger_with(ctx.now(), CelebrationConfig::WORD_PARTICLES)
        {
            ctx.play(sounds::CELEBRATION);
        }
        self.phase = SpellingPhase::WordComplete(Countdown::new(self.config.word_delay()));
        Ok(())
    }

    fn next_level(&mut self) -> SenyasResult<()> {
        self.level = (self.level + 1) % self.config.levels.len();
        self.step = 0;
        self.start_letter()
    }
}

fn letter_at(word: &str, step: usize) -> String {
    word.chars()
        .nth(step)
        .map(String::from)
        .unwrap_or_default()
}

impl Scene for SpellingScene {
    fn enter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()> {
        self.step = 0;
        self.celebration.cancel();
        self.hover.clear();
        self.start_letter()?;
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
                let target = target.as_deref().filter(|name| *name == buttons::BACK);
                self.hover.update(target, ctx);
            }
            InputEvent::ToggleDebug => self.debug = !self.debug,
            InputEvent::Activate(name) if name == buttons::BACK => {
                ctx.play(sounds::CLICK);
                return Ok(SceneCommand::goto(self.back.clone()));
            }
            _ => {}
        }
        Ok(SceneCommand::None)
    }

    fn update(&mut self, dt: Duration, ctx: &mut SceneContext) -> SenyasResult<SceneCommand> {
        if self.celebration.is_active() {
            self.celebration.advance(dt);
        }

        match &mut self.phase {
            SpellingPhase::WordComplete(delay) => {
                // The next word waits for the confetti as well as the delay
                if delay.advance(dt) && !self.celebration.is_active() {
                    self.next_level()?;
                }
                return Ok(SceneCommand::None);
            }
            SpellingPhase::Holding(hold) => {
                if hold.advance(dt) {
                    self.finish_letter(ctx)?;
                }
                return Ok(SceneCommand::None);
            }
            SpellingPhase::Signing => {}
        }

        if !self.camera_ready {
            return Ok(SceneCommand::None);
        }
        let Some((verdict, detected)) = observe_frame(&mut self.challenge, ctx)? else {
            return Ok(SceneCommand::None);
        };
        self.feedback = feedback_for(self.feedback, verdict, detected);
        if verdict == Verdict::Correct {
            self.phase = SpellingPhase::Holding(Countdown::new(self.config.letter_hold()));
        }
        Ok(SceneCommand::None)
    }

    fn render(&self, _ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()> {
        let word = self.word();
        let done = match self.phase {
            SpellingPhase::WordComplete(_) => word.chars().count(),
            _ => self.step,
        };
        out.push(DrawCommand::Image {
            key: format!("star_quest_{word}_{done}"),
        });
        out.text(TextRole::Title, word);
        let spelled: String = word.chars().take(done).collect();
        out.text(TextRole::Body, format!("Spelled: {spelled}"));
        if !matches!(self.phase, SpellingPhase::WordComplete(_)) {
            out.text(TextRole::Body, format!("Sign: {}", self.expected_letter()));
        }
        out.push(DrawCommand::CameraFeed);
        self.feedback.render(out);
        if self.debug {
            render_debug(&self.challenge, out);
        }
        out.button(buttons::BACK, self.hover.is(buttons::BACK));
        if self.celebration.is_active() {
            out.push(DrawCommand::Confetti(self.celebration.particles().to_vec()));
        }
        Ok(())
    }
}
