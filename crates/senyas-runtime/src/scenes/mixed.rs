//! Mixed challenge scene - random items drawn across lesson categories
//!
//! The category never repeats twice in a row. Within a category an item is
//! not drawn again while it sits in the recent list; once every item is
//! recent the list starts over.

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use senyas_core::{buttons, Category, InputEvent, LessonKind, SceneId, SenyasError, SenyasResult};
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

/// Recent-list lengths per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedChallengeConfig {
    pub recent_letters: usize,
    pub recent_digits: usize,
    pub recent_phrases: usize,
}

impl Default for MixedChallengeConfig {
    fn default() -> Self {
        Self {
            recent_letters: 5,
            recent_digits: 3,
            recent_phrases: 2,
        }
    }
}

/// One category of items with its recognizer
#[derive(Debug, Clone)]
pub struct MixedPool {
    kind: LessonKind,
    labels: Vec<String>,
    recognizer: Recognizer,
    challenge: ChallengeConfig,
    recent_limit: usize,
    recent: VecDeque<String>,
}

impl MixedPool {
    pub fn new(
        kind: LessonKind,
        labels: Vec<String>,
        recognizer: Recognizer,
        challenge: ChallengeConfig,
        recent_limit: usize,
    ) -> Self {
        Self {
            kind,
            labels,
            recognizer,
            challenge,
            recent_limit,
            recent: VecDeque::with_capacity(recent_limit + 1),
        }
    }

    pub fn kind(&self) -> LessonKind {
        self.kind
    }

    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    fn draw(&mut self, rng: &mut StdRng) -> Option<String> {
        let mut available: Vec<&String> = self
            .labels
            .iter()
            .filter(|l| !self.recent.contains(l))
            .collect();
        if available.is_empty() {
            self.recent.clear();
            available = self.labels.iter().collect();
        }
        let label = available.choose(rng).map(|l| (*l).clone())?;

        self.recent.push_back(label.clone());
        while self.recent.len() > self.recent_limit {
            self.recent.pop_front();
        }
        Some(label)
    }
}

/// The item currently being signed
#[derive(Debug)]
struct CurrentItem {
    pool: usize,
    challenge: RecognitionChallenge,
}

#[derive(Debug)]
pub struct MixedChallengeScene {
    pools: Vec<MixedPool>,
    back: SceneId,
    rng: StdRng,
    last_pool: Option<usize>,
    current: Option<CurrentItem>,
    celebration: CelebrationController,
    feedback: Feedback,
    camera_ready: bool,
    debug: bool,
    hover: HoverState,
}

impl MixedChallengeScene {
    pub fn new(
        pools: Vec<MixedPool>,
        back: impl Into<SceneId>,
        celebration: CelebrationConfig,
    ) -> SenyasResult<Self> {
        Self::build(
            pools,
            back.into(),
            StdRng::from_entropy(),
            CelebrationController::new(celebration)?,
        )
    }

    /// Deterministic draws and confetti
    pub fn with_seed(
        pools: Vec<MixedPool>,
        back: impl Into<SceneId>,
        celebration: CelebrationConfig,
        seed: u64,
    ) -> SenyasResult<Self> {
        Self::build(
            pools,
            back.into(),
            StdRng::seed_from_u64(seed),
            CelebrationController::with_seed(celebration, seed)?,
        )
    }

    fn build(
        pools: Vec<MixedPool>,
        back: SceneId,
        rng: StdRng,
        celebration: CelebrationController,
    ) -> SenyasResult<Self> {
        if pools.is_empty() {
            return Err(SenyasError::InvalidConfig(
                "mixed challenge needs at least one category".into(),
            ));
        }
        if let Some(pool) = pools.iter().find(|p| p.labels.is_empty()) {
            return Err(SenyasError::InvalidConfig(format!(
                "mixed challenge category {} has no items",
                pool.kind.prefix()
            )));
        }
        Ok(Self {
            pools,
            back,
            rng,
            last_pool: None,
            current: None,
            celebration,
            feedback: Feedback::Blank,
            camera_ready: false,
            debug: false,
            hover: HoverState::default(),
        })
    }

    pub fn pools(&self) -> &[MixedPool] {
        &self.pools
    }

    /// Kind and label of the item being signed
    pub fn current(&self) -> Option<(LessonKind, &str)> {
        self.current.as_ref().map(|item| {
            (
                self.pools[item.pool].kind,
                item.challenge.expected(),
            )
        })
    }

    pub fn celebration(&self) -> &CelebrationController {
        &self.celebration
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    /// Draw the next item
    pub fn advance_item(&mut self) -> SenyasResult<()> {
        let candidates: Vec<usize> = (0..self.pools.len())
            .filter(|i| self.pools.len() == 1 || Some(*i) != self.last_pool)
            .collect();
        let pool = *candidates
            .choose(&mut self.rng)
            .ok_or_else(|| SenyasError::InvalidConfig("no category to draw from".into()))?;
        let label = self.pools[pool]
            .draw(&mut self.rng)
            .ok_or_else(|| SenyasError::InvalidConfig("category has no items".into()))?;

        let source = &self.pools[pool];
        let challenge = RecognitionChallenge::new(
            label.as_str(),
            source.recognizer.clone(),
            source.challenge.clone(),
        )?;
        tracing::debug!(kind = source.kind.prefix(), label = %label, "mixed challenge item drawn");
        self.last_pool = Some(pool);
        self.current = Some(CurrentItem { pool, challenge });
        self.feedback = Feedback::Blank;
        Ok(())
    }

    fn on_correct(&mut self, ctx: &mut SceneContext) {
        if let Some((kind, label)) = self.current() {
            let entry = kind.entry(label);
            ctx.record(Category::CosmicCopy, &entry);
        }
        if self.celebration.trigger(ctx.now()) {
            ctx.play(sounds::CELEBRATION);
        }
    }
}

impl Scene for MixedChallengeScene {
    fn enter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()> {
        self.celebration.cancel();
        self.hover.clear();
        self.advance_item()?;
        self.camera_ready = acquire_camera(ctx)?;
        Ok(())
    }

    fn exit(&mut self, ctx: &mut SceneContext) {
        release_camera(ctx);
        self.camera_ready = false;
        self.current = None;
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
            if self.celebration.advance(dt) {
                self.advance_item()?;
            }
            return Ok(SceneCommand::None);
        }
        if !self.camera_ready {
            return Ok(SceneCommand::None);
        }
        let Some(item) = self.current.as_mut() else {
            return Ok(SceneCommand::None);
        };

        let Some((verdict, detected)) = observe_frame(&mut item.challenge, ctx)? else {
            return Ok(SceneCommand::None);
        };
        if verdict == Verdict::Correct && self.feedback != Feedback::Correct {
            self.on_correct(ctx);
        }
        self.feedback = feedback_for(self.feedback, verdict, detected);
        Ok(SceneCommand::None)
    }

    fn render(&self, _ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()> {
        if let Some((kind, label)) = self.current() {
            out.text(TextRole::Title, kind.entry(label));
            out.push(DrawCommand::Image {
                key: format!(
                    "cosmic_{}_{}",
                    kind.prefix().to_lowercase(),
                    label.to_lowercase()
                ),
            });
        }
        out.push(DrawCommand::CameraFeed);
        self.feedback.render(out);
        if self.debug {
            if let Some(item) = &self.current {
                render_debug(&item.challenge, out);
            }
        }
        out.button(buttons::BACK, self.hover.is(buttons::BACK));
        if self.celebration.is_active() {
            out.push(DrawCommand::Confetti(self.celebration.particles().to_vec()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::testing::{context, recognizer, QueueClassifier};
    use senyas_core::ProfileId;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn pools() -> Vec<MixedPool> {
        let classifier = QueueClassifier::new(&[]);
        let config = MixedChallengeConfig::default();
        vec![
            MixedPool::new(
                LessonKind::Alphabets,
                labels(&["A", "B", "C", "D", "E", "F", "G"]),
                recognizer(classifier.clone()),
                ChallengeConfig::alphabet(),
                config.recent_letters,
            ),
            MixedPool::new(
                LessonKind::Numbers,
                labels(&["1", "2", "3", "4"]),
                recognizer(classifier.clone()),
                ChallengeConfig::digits(),
                config.recent_digits,
            ),
            MixedPool::new(
                LessonKind::Phrase,
                labels(&["hello", "sorry"]),
                recognizer(classifier),
                ChallengeConfig::phrases(),
                config.recent_phrases,
            ),
        ]
    }

    #[test]
    fn test_category_never_repeats() {
        let mut scene =
            MixedChallengeScene::with_seed(pools(), "playing_home", CelebrationConfig::default(), 3)
                .unwrap();
        let mut last = None;
        for _ in 0..200 {
            scene.advance_item().unwrap();
            let (kind, _) = scene.current().unwrap();
            assert_ne!(Some(kind), last);
            last = Some(kind);
        }
    }

    #[test]
    fn test_recent_items_not_redrawn() {
        let mut scene =
            MixedChallengeScene::with_seed(pools(), "playing_home", CelebrationConfig::default(), 11)
                .unwrap();
        let mut letters: Vec<String> = Vec::new();
        for _ in 0..300 {
            scene.advance_item().unwrap();
            if let Some((LessonKind::Alphabets, label)) = scene.current() {
                letters.push(label.to_string());
            }
        }
        for window in letters.windows(6) {
            let last = &window[5];
            assert!(!window[..5].contains(last), "{last} drawn again too soon");
        }
        assert!(scene.pools()[0].recent().count() <= 5);
    }

    #[test]
    fn test_exhausted_recent_list_resets() {
        let classifier = QueueClassifier::new(&[]);
        let pool = MixedPool::new(
            LessonKind::Phrase,
            labels(&["hello", "sorry"]),
            recognizer(classifier),
            ChallengeConfig::phrases(),
            2,
        );
        let mut scene =
            MixedChallengeScene::with_seed(vec![pool], "back", CelebrationConfig::default(), 5)
                .unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            scene.advance_item().unwrap();
            seen.push(scene.current().unwrap().1.to_string());
        }
        assert_ne!(seen[0], seen[1]);
        assert_ne!(seen[2], seen[3]);
    }

    #[test]
    fn test_correct_records_and_advances_after_celebration() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        ctx.store().create("ana").unwrap();
        ctx.set_profile(Some(ProfileId::new("ana")));

        let classifier = QueueClassifier::new(&[("A", 0.99)]);
        let pool = MixedPool::new(
            LessonKind::Alphabets,
            labels(&["A"]),
            recognizer(classifier),
            ChallengeConfig::alphabet(),
            5,
        );
        let mut scene =
            MixedChallengeScene::with_seed(vec![pool], "playing_home", CelebrationConfig::default(), 9)
                .unwrap();
        scene.enter(&mut ctx).unwrap();

        for _ in 0..5 {
            scene.update(Duration::from_millis(33), &mut ctx).unwrap();
        }
        assert_eq!(scene.feedback(), Feedback::Correct);
        assert!(scene.celebration().is_active());
        let progress = ctx.recorder().progress_of(&ProfileId::new("ana")).unwrap();
        assert_eq!(
            progress.progress.entries(Category::CosmicCopy),
            &["Alphabets: A".to_string()]
        );

        for _ in 0..400 {
            scene.update(Duration::from_millis(33), &mut ctx).unwrap();
            if !scene.celebration().is_active() {
                break;
            }
        }
        assert_eq!(scene.feedback(), Feedback::Blank);
        assert_eq!(scene.current(), Some((LessonKind::Alphabets, "A")));
    }

    #[test]
    fn test_rejects_empty_pool() {
        let pool = MixedPool::new(
            LessonKind::Numbers,
            Vec::new(),
            recognizer(QueueClassifier::new(&[])),
            ChallengeConfig::digits(),
            3,
        );
        assert!(
            MixedChallengeScene::new(vec![pool], "back", CelebrationConfig::default()).is_err()
        );
        assert!(MixedChallengeScene::new(Vec::new(), "back", CelebrationConfig::default()).is_err());
    }
}
