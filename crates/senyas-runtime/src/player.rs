//! Lesson player - the frame driver the embedding application calls

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use senyas_core::{InputEvent, SceneId, SenyasResult};
use senyas_progress::{ProfileStore, ProgressRecorder};
use senyas_visual::Camera;

use crate::catalog::{CatalogConfig, LessonCatalog, Recognizers};
use crate::context::SceneContext;
use crate::display::{AudioCue, DisplayList};
use crate::machine::{MachineStats, SceneStateMachine};

/// Player configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Frame interval
    pub tick_interval_ms: u64,
    /// Queued inputs beyond this are dropped
    pub max_queued_inputs: usize,
    pub start_scene: String,
    /// Directory of learner profiles
    pub save_dir: PathBuf,
    pub catalog: CatalogConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            tick_interval_ms: 33,
            max_queued_inputs: 256,
            start_scene: LessonCatalog::START.to_string(),
            save_dir: PathBuf::from("SAVES"),
            catalog: CatalogConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlayerStats {
    pub frames: u64,
    pub inputs_queued: u64,
    pub inputs_dropped: u64,
    pub last_frame_duration: Duration,
}

/// Owns the scene machine, the context and the frame's display list
pub struct LessonPlayer {
    machine: SceneStateMachine,
    ctx: SceneContext,
    display: DisplayList,
    inputs: VecDeque<InputEvent>,
    config: PlayerConfig,
    stats: PlayerStats,
}

impl LessonPlayer {
    /// Player over an already populated machine
    pub fn new(machine: SceneStateMachine, ctx: SceneContext, config: PlayerConfig) -> Self {
        LessonPlayer {
            machine,
            ctx,
            display: DisplayList::new(),
            inputs: VecDeque::new(),
            config,
            stats: PlayerStats::default(),
        }
    }

    /// The standard lesson player
    pub fn standard(
        recognizers: &Recognizers,
        camera: Box<dyn Camera>,
        config: PlayerConfig,
    ) -> SenyasResult<Self> {
        let mut machine = SceneStateMachine::new();
        let sequences = LessonCatalog::standard(recognizers, &config.catalog, &mut machine)?;
        let recorder = ProgressRecorder::new(ProfileStore::new(config.save_dir.clone()));
        let ctx = SceneContext::new(recorder)
            .with_camera(camera)
            .with_sequences(sequences);
        Ok(Self::new(machine, ctx, config))
    }

    pub fn start(&mut self) -> SenyasResult<()> {
        let start = SceneId::new(self.config.start_scene.as_str());
        self.machine.start(start, &mut self.ctx)
    }

    /// Start on an arbitrary scene, e.g. to resume a lesson
    pub fn start_at(&mut self, scene: impl Into<SceneId>) -> SenyasResult<()> {
        self.machine.start(scene, &mut self.ctx)
    }

    /// Queue an input for the next frame
    pub fn queue_input(&mut self, event: InputEvent) {
        if self.inputs.len() >= self.config.max_queued_inputs {
            self.stats.inputs_dropped += 1;
            tracing::warn!(?event, "input queue full, event dropped");
            return;
        }
        self.stats.inputs_queued += 1;
        self.inputs.push_back(event);
    }

    /// Run one frame at the configured interval
    pub fn frame(&mut self) -> SenyasResult<&DisplayList> {
        self.frame_with(self.config.tick_interval())
    }

    /// Run one frame with an explicit time step
    pub fn frame_with(&mut self, dt: Duration) -> SenyasResult<&DisplayList> {
        let start = Instant::now();
        self.stats.frames += 1;

        // Queued input in arrival order, then tick, then render
        let inputs: Vec<InputEvent> = self.inputs.drain(..).collect();
        self.machine
            .frame(&inputs, dt, &mut self.ctx, &mut self.display)?;

        self.stats.last_frame_duration = start.elapsed();
        Ok(&self.display)
    }

    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    pub fn active_scene(&self) -> Option<&SceneId> {
        self.machine.active()
    }

    pub fn is_finished(&self) -> bool {
        self.machine.quit_requested()
    }

    pub fn drain_audio(&mut self) -> Vec<AudioCue> {
        self.ctx.drain_audio()
    }

    pub fn context(&self) -> &SceneContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.ctx
    }

    pub fn machine(&self) -> &SceneStateMachine {
        &self.machine
    }

    pub fn machine_stats(&self) -> &MachineStats {
        self.machine.stats()
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }
}

impl std::fmt::Debug for LessonPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessonPlayer")
            .field("machine", &self.machine)
            .field("queued", &self.inputs.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::TextRole;
    use crate::scenes::testing::{recognizer, HandCamera, QueueClassifier};
    use senyas_core::buttons;

    fn player(dir: &tempfile::TempDir) -> LessonPlayer {
        let classifier = QueueClassifier::new(&[]);
        let recognizers = Recognizers {
            alphabet: recognizer(classifier.clone()),
            digits: recognizer(classifier.clone()),
            phrases: recognizer(classifier),
        };
        let config = PlayerConfig {
            save_dir: dir.path().to_path_buf(),
            ..PlayerConfig::default()
        };
        let camera = Box::new(HandCamera {
            open: false,
            empty: true,
        });
        LessonPlayer::standard(&recognizers, camera, config).unwrap()
    }

    #[test]
    fn test_start_and_navigate() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = player(&dir);
        player.start().unwrap();
        assert_eq!(player.active_scene(), Some(&SceneId::new("welcome")));

        player.queue_input(InputEvent::activate("launch"));
        player.frame().unwrap();
        assert_eq!(player.active_scene(), Some(&SceneId::new("playing_welcome")));

        player.queue_input(InputEvent::Skip);
        player.frame().unwrap();
        assert_eq!(player.active_scene(), Some(&SceneId::new("playing_intro")));
        assert_eq!(player.stats().frames, 2);
    }

    #[test]
    fn test_input_queue_bound() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = player(&dir);
        player.start().unwrap();
        for _ in 0..300 {
            player.queue_input(InputEvent::hover(buttons::BACK));
        }
        assert_eq!(player.stats().inputs_dropped, 44);
        player.frame().unwrap();
        assert_eq!(player.machine_stats().inputs, 256);
    }

    #[test]
    fn test_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = player(&dir);
        player.start().unwrap();
        player.queue_input(InputEvent::Quit);
        player.frame().unwrap();
        assert!(player.is_finished());
        assert!(player.display().texts(TextRole::Title).next().is_none());
    }
}
