//! Scene catalogue - the lesson player's full scene graph
//!
//! ```text
//! welcome -> playing_welcome -> playing_intro -> playing_usertype
//!   learner:  playing_learner_planet -> playing_learner_landing -> playing_blgsign
//!               new  -> playing_lgsign <-> on_screen_keyboard -> playing_home
//!               load -> load_game -> playing_home
//!   guardian: playing_guardian_planet -> playing_guardian_landing -> playing_home
//! playing_home -> playing_galaxy | playing_cosmic | playing_star
//! playing_galaxy -> playing_alphabets | playing_numbers | playing_phrases
//!   -> playing_a..z | playing_0..9 | playing_hello, playing_thankyou, ...
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use senyas_core::{Category, LessonKind, SceneId, SenyasResult};
use senyas_recognition::{CelebrationConfig, ChallengeConfig, Recognizer};
use senyas_visual::LabelSet;

use crate::machine::SceneStateMachine;
use crate::scenes::{
    MenuButton, MenuScene, MixedChallengeConfig, MixedChallengeScene, MixedPool,
    ProfileLoaderScene, RecognitionLesson, RecognitionScene, SignInScene, SpellingConfig,
    SpellingScene, TextEntryScene, VideoScene, DEFAULT_MAX_TEXT,
};
use crate::sequence::{SceneSequence, SequenceIndex};

/// Well-known scene ids
pub mod scene_ids {
    pub const START: &str = "welcome";
    pub const WELCOME_VIDEO: &str = "playing_welcome";
    pub const INTRO: &str = "playing_intro";
    pub const USER_TYPE: &str = "playing_usertype";
    pub const LEARNER_PLANET: &str = "playing_learner_planet";
    pub const LEARNER_LANDING: &str = "playing_learner_landing";
    pub const GUARDIAN_PLANET: &str = "playing_guardian_planet";
    pub const GUARDIAN_LANDING: &str = "playing_guardian_landing";
    pub const NEW_OR_LOAD: &str = "playing_blgsign";
    pub const SIGN_IN: &str = "playing_lgsign";
    pub const KEYBOARD: &str = "on_screen_keyboard";
    pub const LOAD_GAME: &str = "load_game";
    pub const HOME: &str = "playing_home";
    pub const GALAXY: &str = "playing_galaxy";
    pub const COSMIC: &str = "playing_cosmic";
    pub const STAR: &str = "playing_star";
    pub const ALPHABETS: &str = "playing_alphabets";
    pub const NUMBERS: &str = "playing_numbers";
    pub const PHRASES: &str = "playing_phrases";
}

/// Sequence names used by next/previous
pub mod sequence_names {
    pub const ALPHABET: &str = "alphabet";
    pub const NUMBERS: &str = "numbers";
    pub const PHRASES: &str = "phrases";
}

/// Scene id of a lesson item, e.g. `playing_a`, `playing_7`, `playing_hello`
pub fn lesson_scene(label: &str) -> SceneId {
    SceneId::new(format!("playing_{}", label.to_lowercase()))
}

/// Catalogue configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub alphabet: ChallengeConfig,
    pub digits: ChallengeConfig,
    pub phrases: ChallengeConfig,
    pub celebration: CelebrationConfig,
    pub mixed: MixedChallengeConfig,
    pub spelling: SpellingConfig,
    /// Length of clips without an entry in `clip_ms`
    pub default_clip_ms: u64,
    /// Per-clip lengths keyed by clip name
    pub clip_ms: BTreeMap<String, u64>,
    pub max_name_len: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            alphabet: ChallengeConfig::alphabet(),
            digits: ChallengeConfig::digits(),
            phrases: ChallengeConfig::phrases(),
            celebration: CelebrationConfig::default(),
            mixed: MixedChallengeConfig::default(),
            spelling: SpellingConfig::default(),
            default_clip_ms: 8000,
            clip_ms: BTreeMap::new(),
            max_name_len: DEFAULT_MAX_TEXT,
        }
    }
}

impl CatalogConfig {
    pub fn clip_length(&self, clip: &str) -> Duration {
        Duration::from_millis(
            self.clip_ms
                .get(clip)
                .copied()
                .unwrap_or(self.default_clip_ms),
        )
    }

    pub fn validate(&self) -> SenyasResult<()> {
        self.alphabet.validate()?;
        self.digits.validate()?;
        self.phrases.validate()?;
        self.celebration.validate()?;
        self.spelling.validate()
    }
}

/// One recognizer per lesson family
#[derive(Debug, Clone)]
pub struct Recognizers {
    pub alphabet: Recognizer,
    pub digits: Recognizer,
    pub phrases: Recognizer,
}

/// Builds the standard player
pub struct LessonCatalog;

impl LessonCatalog {
    pub const START: &'static str = scene_ids::START;

    /// Register every scene of the standard player and return its sequences
    pub fn standard(
        recognizers: &Recognizers,
        config: &CatalogConfig,
        machine: &mut SceneStateMachine,
    ) -> SenyasResult<SequenceIndex> {
        use scene_ids::*;

        config.validate()?;

        let videos = [
            (WELCOME_VIDEO, "welcome_video", INTRO, Some("welcome_narration")),
            (INTRO, "intro_video", USER_TYPE, Some("intro_narration")),
            (LEARNER_PLANET, "learner_planet", LEARNER_LANDING, None),
            (LEARNER_LANDING, "learner_landing", NEW_OR_LOAD, None),
            (GUARDIAN_PLANET, "guardian_planet", GUARDIAN_LANDING, None),
            (GUARDIAN_LANDING, "guardian_landing", HOME, None),
        ];
        for (id, clip, next, narration) in videos {
            let mut scene = VideoScene::new(clip, config.clip_length(clip), next);
            if let Some(audio) = narration {
                scene = scene.with_audio(audio);
            }
            machine.register(id, Box::new(scene))?;
        }

        let menus = [
            (
                START,
                MenuScene::new(vec![MenuButton::new("launch", WELCOME_VIDEO)])
                    .with_background("welcome_loop"),
            ),
            (
                USER_TYPE,
                MenuScene::new(vec![
                    MenuButton::new("learner", LEARNER_PLANET),
                    MenuButton::new("guardian", GUARDIAN_PLANET),
                ])
                .with_background("usertype_loop")
                .with_audio("usertype_narration"),
            ),
            (
                NEW_OR_LOAD,
                MenuScene::new(vec![
                    MenuButton::new("new", SIGN_IN),
                    MenuButton::new("load", LOAD_GAME),
                ])
                .with_background("blgsign_loop"),
            ),
            (
                HOME,
                MenuScene::new(vec![
                    MenuButton::new("cosmic", COSMIC),
                    MenuButton::new("galaxy", GALAXY),
                    MenuButton::new("star", STAR),
                ])
                .with_background("home_loop")
                .with_back(USER_TYPE)
                .with_profile_banner(),
            ),
            (
                GALAXY,
                MenuScene::new(vec![
                    MenuButton::new("alphabets", ALPHABETS),
                    MenuButton::new("numbers", NUMBERS),
                    MenuButton::new("phrases", PHRASES),
                ])
                .with_background("galaxy_loop")
                .with_back(HOME),
            ),
        ];
        for (id, menu) in menus {
            machine.register(id, Box::new(menu))?;
        }

        machine.register(
            SIGN_IN,
            Box::new(
                SignInScene::new(KEYBOARD, HOME, NEW_OR_LOAD).with_background("lgsign_loop"),
            ),
        )?;
        machine.register(
            KEYBOARD,
            Box::new(TextEntryScene::new(SIGN_IN).with_max_len(config.max_name_len)),
        )?;
        machine.register(LOAD_GAME, Box::new(ProfileLoaderScene::new(NEW_OR_LOAD, HOME)))?;

        let alphabet = LabelSet::alphabet().lesson_labels();
        let digits = LabelSet::digits().lesson_labels();
        let phrases = LabelSet::phrases().lesson_labels();

        let families = [
            (
                ALPHABETS,
                sequence_names::ALPHABET,
                LessonKind::Alphabets,
                &alphabet,
                &recognizers.alphabet,
                &config.alphabet,
            ),
            (
                NUMBERS,
                sequence_names::NUMBERS,
                LessonKind::Numbers,
                &digits,
                &recognizers.digits,
                &config.digits,
            ),
            (
                PHRASES,
                sequence_names::PHRASES,
                LessonKind::Phrase,
                &phrases,
                &recognizers.phrases,
                &config.phrases,
            ),
        ];

        let mut sequences = SequenceIndex::new();
        for (landing, sequence, kind, labels, recognizer, challenge) in families {
            let buttons = labels
                .iter()
                .map(|label| MenuButton::new(label.to_lowercase(), lesson_scene(label)))
                .collect();
            machine.register(landing, Box::new(MenuScene::new(buttons).with_back(GALAXY)))?;

            for label in labels {
                let lesson =
                    RecognitionLesson::new(label.as_str(), kind, recognizer.clone(), landing)
                        .with_category(Category::GalaxyExplorer)
                        .with_challenge(challenge.clone())
                        .in_sequence(sequence);
                let scene = RecognitionScene::new(lesson, config.celebration.clone())?;
                machine.register(lesson_scene(label), Box::new(scene))?;
            }
            sequences.insert(SceneSequence::new(
                sequence,
                labels.iter().map(|l| lesson_scene(l)),
                landing,
            ));
        }

        let pools = vec![
            MixedPool::new(
                LessonKind::Alphabets,
                alphabet,
                recognizers.alphabet.clone(),
                config.alphabet.clone(),
                config.mixed.recent_letters,
            ),
            MixedPool::new(
                LessonKind::Numbers,
                digits,
                recognizers.digits.clone(),
                config.digits.clone(),
                config.mixed.recent_digits,
            ),
            MixedPool::new(
                LessonKind::Phrase,
                phrases,
                recognizers.phrases.clone(),
                config.phrases.clone(),
                config.mixed.recent_phrases,
            ),
        ];
        machine.register(
            COSMIC,
            Box::new(MixedChallengeScene::new(pools, HOME, config.celebration.clone())?),
        )?;
        machine.register(
            STAR,
            Box::new(SpellingScene::new(
                config.spelling.clone(),
                recognizers.alphabet.clone(),
                config.alphabet.clone(),
                HOME,
                config.celebration.clone(),
            )?),
        )?;

        tracing::debug!(scenes = machine.len(), sequences = sequences.len(), "catalogue registered");
        Ok(sequences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::testing::{recognizer, QueueClassifier};

    fn recognizers() -> Recognizers {
        let classifier = QueueClassifier::new(&[]);
        Recognizers {
            alphabet: recognizer(classifier.clone()),
            digits: recognizer(classifier.clone()),
            phrases: recognizer(classifier),
        }
    }

    #[test]
    fn test_standard_graph() {
        let mut machine = SceneStateMachine::new();
        let sequences =
            LessonCatalog::standard(&recognizers(), &CatalogConfig::default(), &mut machine)
                .unwrap();

        // 6 videos, 5 menus, sign-in, keyboard, loader, 3 landings,
        // 26 + 10 + 4 lessons, cosmic, star
        assert_eq!(machine.len(), 6 + 5 + 3 + 3 + 40 + 2);
        for id in ["welcome", "playing_z", "playing_9", "playing_thankyou", "playing_star"] {
            assert!(machine.contains(&SceneId::new(id)), "{id} missing");
        }

        let alphabet = sequences.get(sequence_names::ALPHABET).unwrap();
        assert_eq!(alphabet.items().len(), 26);
        assert_eq!(
            sequences.next("alphabet", &SceneId::new("playing_z")),
            Some(SceneId::new("playing_alphabets"))
        );
        assert_eq!(
            sequences.previous("phrases", &SceneId::new("playing_thankyou")),
            Some(SceneId::new("playing_hello"))
        );
    }

    #[test]
    fn test_partial_config_override() {
        let config: CatalogConfig = serde_json::from_str(
            r#"{ "default_clip_ms": 1500, "clip_ms": { "intro_video": 30000 },
                 "alphabet": { "debounce_window": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.clip_length("welcome_video"), Duration::from_millis(1500));
        assert_eq!(config.clip_length("intro_video"), Duration::from_secs(30));
        assert_eq!(config.alphabet.debounce_window, 3);
        assert_eq!(config.digits, ChallengeConfig::digits());
        assert_eq!(config.spelling.levels.len(), 5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = CatalogConfig::default();
        config.phrases.debounce_window = 0;
        let mut machine = SceneStateMachine::new();
        let err = LessonCatalog::standard(&recognizers(), &config, &mut machine).unwrap_err();
        assert!(err.is_fatal());
        assert!(machine.is_empty());
    }
}
