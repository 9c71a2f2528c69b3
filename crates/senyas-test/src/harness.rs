//! Session harness - a lesson player wired to a sign board
//!
//! Drives the standard catalogue the way a learner would: clicking buttons,
//! typing on the keyboard, and holding signs up to the camera. Profiles are
//! saved to a temporary directory removed with the harness.

use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use senyas_core::{InputEvent, ProfileId, SceneId, SenyasError, SenyasResult};
use senyas_progress::ProfileProgress;
use senyas_recognition::DEFAULT_SEQUENCE_WINDOW;
use senyas_runtime::{DisplayList, LessonPlayer, PlayerConfig};
use senyas_visual::Camera;

use crate::board::{BoardCamera, SignBoard};
use crate::chaos::{CameraChaosConfig, ChaosCamera};

/// A started-on-demand lesson player plus its sign board
pub struct SessionHarness {
    player: LessonPlayer,
    board: SignBoard,
    // Kept alive for the player's save directory
    dir: TempDir,
}

impl SessionHarness {
    /// Standard catalogue, default configuration, perfect camera
    pub fn new() -> SenyasResult<Self> {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> SenyasResult<Self> {
        let board = SignBoard::new();
        let camera = Box::new(BoardCamera::new(board.clone()));
        Self::build(config, board, camera)
    }

    /// Standard catalogue behind an unreliable camera
    pub fn with_chaos(config: PlayerConfig, chaos: CameraChaosConfig, seed: u64) -> SenyasResult<Self> {
        let board = SignBoard::new();
        let camera = Box::new(ChaosCamera::new(BoardCamera::new(board.clone()), chaos, seed));
        Self::build(config, board, camera)
    }

    fn build(mut config: PlayerConfig, board: SignBoard, camera: Box<dyn Camera>) -> SenyasResult<Self> {
        let dir = tempfile::tempdir().map_err(|e| SenyasError::io(std::env::temp_dir(), e))?;
        config.save_dir = dir.path().to_path_buf();
        let recognizers = board.recognizers(DEFAULT_SEQUENCE_WINDOW);
        let player = LessonPlayer::standard(&recognizers, camera, config)?;
        tracing::debug!(save_dir = %dir.path().display(), "session harness ready");
        Ok(Self { player, board, dir })
    }

    pub fn start(&mut self) -> SenyasResult<()> {
        self.player.start()
    }

    pub fn start_at(&mut self, scene: &str) -> SenyasResult<()> {
        self.player.start_at(scene)
    }

    /// Create a profile and make it the active learner
    pub fn sign_in_as(&mut self, name: &str) -> SenyasResult<ProfileId> {
        let profile = self.player.context().store().create(name)?;
        let id = profile.id();
        self.player.context_mut().set_profile(Some(id.clone()));
        Ok(id)
    }

    /// Hover and activate a button, then run one frame
    pub fn click(&mut self, button: &str) -> SenyasResult<()> {
        self.player.queue_input(InputEvent::hover(button));
        self.player.queue_input(InputEvent::activate(button));
        self.frame()
    }

    /// Deliver one event, then run one frame
    pub fn press(&mut self, event: InputEvent) -> SenyasResult<()> {
        self.player.queue_input(event);
        self.frame()
    }

    pub fn type_text(&mut self, text: &str) -> SenyasResult<()> {
        for c in text.chars() {
            self.player.queue_input(InputEvent::Char(c));
        }
        self.frame()
    }

    /// Hold a sign up to the camera until told otherwise
    pub fn sign(&self, label: &str) {
        self.board.show(label);
    }

    pub fn sign_with(&self, label: &str, confidence: f32) {
        self.board.show_with(label, confidence);
    }

    pub fn lower_hands(&self) {
        self.board.clear();
    }

    pub fn frame(&mut self) -> SenyasResult<()> {
        self.player.frame().map(|_| ())
    }

    pub fn run_frames(&mut self, frames: usize) -> SenyasResult<()> {
        for _ in 0..frames {
            self.frame()?;
        }
        Ok(())
    }

    /// Run whole frames until at least `duration` has elapsed
    pub fn run_for(&mut self, duration: Duration) -> SenyasResult<()> {
        let step = self.player.config().tick_interval();
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            self.player.frame_with(step)?;
            elapsed += step;
        }
        Ok(())
    }

    /// Run frames until `done` holds, failing after `max_frames`
    pub fn run_until<F>(&mut self, max_frames: usize, mut done: F) -> SenyasResult<usize>
    where
        F: FnMut(&LessonPlayer) -> bool,
    {
        for n in 0..max_frames {
            if done(&self.player) {
                return Ok(n);
            }
            self.frame()?;
        }
        if done(&self.player) {
            return Ok(max_frames);
        }
        Err(SenyasError::InvalidConfig(format!(
            "condition not met within {max_frames} frames"
        )))
    }

    pub fn active(&self) -> &str {
        self.player.active_scene().map(SceneId::as_str).unwrap_or("")
    }

    pub fn display(&self) -> &DisplayList {
        self.player.display()
    }

    /// Progress of the active learner, read back from disk
    pub fn progress(&self) -> SenyasResult<ProfileProgress> {
        let id = self
            .player
            .context()
            .profile()
            .cloned()
            .ok_or_else(|| SenyasError::ProfileNotFound(ProfileId::new("")))?;
        self.player.context().recorder().progress_of(&id)
    }

    pub fn board(&self) -> &SignBoard {
        &self.board
    }

    pub fn player(&self) -> &LessonPlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut LessonPlayer {
        &mut self.player
    }

    pub fn save_dir(&self) -> &Path {
        self.dir.path()
    }
}

impl std::fmt::Debug for SessionHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHarness")
            .field("player", &self.player)
            .field("board", &self.board.current())
            .field("save_dir", &self.dir.path())
            .finish()
    }
}
