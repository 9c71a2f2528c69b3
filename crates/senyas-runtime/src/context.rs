//! Scene context - everything a scene may touch besides itself

use std::time::Duration;

use senyas_core::{Category, ProfileId, SceneId, SenyasError, SenyasResult, SessionTime};
use senyas_progress::{ProfileStore, ProgressRecorder, RecordOutcome};
use senyas_visual::{Camera, CameraFrame};

use crate::display::AudioCue;
use crate::scene::TransitionPayload;
use crate::sequence::SequenceIndex;

/// Stand-in used when no camera is attached; it never opens
#[derive(Debug, Default)]
pub struct NoCamera;

impl Camera for NoCamera {
    fn open(&mut self) -> SenyasResult<()> {
        Err(SenyasError::CameraUnavailable("no camera attached".into()))
    }

    fn release(&mut self) {}

    fn is_open(&self) -> bool {
        false
    }

    fn try_read_frame(&mut self) -> Option<CameraFrame> {
        None
    }
}

/// The camera plus the scene currently holding it
pub struct CameraSlot {
    camera: Box<dyn Camera>,
    owner: Option<SceneId>,
}

impl CameraSlot {
    pub fn new(camera: Box<dyn Camera>) -> Self {
        Self {
            camera,
            owner: None,
        }
    }

    pub fn owner(&self) -> Option<&SceneId> {
        self.owner.as_ref()
    }

    /// Open the camera for `scene`; fails while another scene holds it
    pub fn acquire(&mut self, scene: &SceneId) -> SenyasResult<()> {
        match &self.owner {
            Some(owner) if owner == scene => return Ok(()),
            Some(owner) => return Err(SenyasError::CameraBusy(owner.clone())),
            None => {}
        }
        self.camera.open()?;
        self.owner = Some(scene.clone());
        tracing::debug!(scene = %scene, "camera acquired");
        Ok(())
    }

    /// Release if `scene` holds the camera
    pub fn release(&mut self, scene: &SceneId) {
        if self.owner.as_ref() == Some(scene) {
            self.camera.release();
            self.owner = None;
            tracing::debug!(scene = %scene, "camera released");
        }
    }

    /// Latest frame, only for the holder
    pub fn read_frame(&mut self, scene: &SceneId) -> Option<CameraFrame> {
        if self.owner.as_ref() != Some(scene) {
            return None;
        }
        self.camera.try_read_frame()
    }
}

impl std::fmt::Debug for CameraSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSlot")
            .field("owner", &self.owner)
            .field("open", &self.camera.is_open())
            .finish()
    }
}

/// Shared state passed into every scene call
#[derive(Debug)]
pub struct SceneContext {
    profile: Option<ProfileId>,
    recorder: ProgressRecorder,
    camera: CameraSlot,
    sequences: SequenceIndex,
    payload: Option<TransitionPayload>,
    audio: Vec<AudioCue>,
    current: Option<SceneId>,
    now: SessionTime,
}

impl SceneContext {
    pub fn new(recorder: ProgressRecorder) -> Self {
        Self {
            profile: None,
            recorder,
            camera: CameraSlot::new(Box::new(NoCamera)),
            sequences: SequenceIndex::new(),
            payload: None,
            audio: Vec::new(),
            current: None,
            now: SessionTime::ZERO,
        }
    }

    pub fn with_camera(mut self, camera: Box<dyn Camera>) -> Self {
        self.camera = CameraSlot::new(camera);
        self
    }

    pub fn with_sequences(mut self, sequences: SequenceIndex) -> Self {
        self.sequences = sequences;
        self
    }

    pub fn profile(&self) -> Option<&ProfileId> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: Option<ProfileId>) {
        tracing::info!(profile = ?profile, "active profile changed");
        self.profile = profile;
    }

    pub fn recorder(&self) -> &ProgressRecorder {
        &self.recorder
    }

    pub fn store(&self) -> &ProfileStore {
        self.recorder.store()
    }

    /// Record progress for the active learner
    ///
    /// Persistence failures are logged and swallowed here; the lesson keeps
    /// running and `None` is returned.
    pub fn record(&self, category: Category, entry: &str) -> Option<RecordOutcome> {
        match self
            .recorder
            .record(self.profile.as_ref(), category, entry)
        {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                tracing::warn!(
                    profile = ?self.profile,
                    %category,
                    entry,
                    error = %err,
                    "failed to record progress"
                );
                None
            }
        }
    }

    pub fn camera(&mut self) -> &mut CameraSlot {
        &mut self.camera
    }

    pub fn camera_owner(&self) -> Option<&SceneId> {
        self.camera.owner()
    }

    pub fn sequences(&self) -> &SequenceIndex {
        &self.sequences
    }

    /// Payload delivered with the transition into the current scene
    pub fn payload(&self) -> Option<&TransitionPayload> {
        self.payload.as_ref()
    }

    pub fn take_payload(&mut self) -> Option<TransitionPayload> {
        self.payload.take()
    }

    pub(crate) fn set_payload(&mut self, payload: Option<TransitionPayload>) {
        self.payload = payload;
    }

    pub fn cue(&mut self, cue: AudioCue) {
        self.audio.push(cue);
    }

    pub fn play(&mut self, key: &str) {
        self.audio.push(AudioCue::Play(key.to_string()));
    }

    /// Cues queued since the last drain
    pub fn drain_audio(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.audio)
    }

    /// Scene being entered, updated or rendered; empty before `start`
    pub fn current_scene(&self) -> SceneId {
        self.current.clone().unwrap_or_default()
    }

    pub(crate) fn set_current(&mut self, id: SceneId) {
        self.current = Some(id);
    }

    pub fn now(&self) -> SessionTime {
        self.now
    }

    pub(crate) fn advance_clock(&mut self, dt: Duration) {
        self.now = self.now + dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeCamera {
        open: bool,
    }

    impl Camera for FakeCamera {
        fn open(&mut self) -> SenyasResult<()> {
            self.open = true;
            Ok(())
        }

        fn release(&mut self) {
            self.open = false;
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn try_read_frame(&mut self) -> Option<CameraFrame> {
            self.open.then(|| CameraFrame::empty(SessionTime::ZERO))
        }
    }

    fn context(dir: &tempfile::TempDir) -> SceneContext {
        SceneContext::new(ProgressRecorder::new(ProfileStore::new(dir.path())))
            .with_camera(Box::new(FakeCamera { open: false }))
    }

    #[test]
    fn test_camera_single_owner() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        let a = SceneId::new("playing_a");
        let b = SceneId::new("playing_b");

        ctx.camera().acquire(&a).unwrap();
        assert!(matches!(
            ctx.camera().acquire(&b),
            Err(SenyasError::CameraBusy(owner)) if owner == a
        ));
        assert!(ctx.camera().read_frame(&b).is_none());
        assert!(ctx.camera().read_frame(&a).is_some());

        ctx.camera().release(&b);
        assert_eq!(ctx.camera_owner(), Some(&a));
        ctx.camera().release(&a);
        ctx.camera().acquire(&b).unwrap();
        assert_eq!(ctx.camera_owner(), Some(&b));
    }

    #[test]
    fn test_no_camera_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = SceneContext::new(ProgressRecorder::new(ProfileStore::new(dir.path())));
        let err = ctx.camera().acquire(&SceneId::new("playing_a")).unwrap_err();
        assert!(matches!(err, SenyasError::CameraUnavailable(_)));
        assert!(ctx.camera_owner().is_none());
    }

    #[test]
    fn test_record_failure_is_logged_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        assert_eq!(
            ctx.record(Category::GalaxyExplorer, "Alphabets: A"),
            Some(RecordOutcome::NoActiveProfile)
        );
        ctx.set_profile(Some(ProfileId::new("ghost")));
        assert_eq!(ctx.record(Category::GalaxyExplorer, "Alphabets: A"), None);
    }

    #[test]
    fn test_audio_drain() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        ctx.play("confetti");
        ctx.cue(AudioCue::StopNarration);
        assert_eq!(ctx.drain_audio().len(), 2);
        assert!(ctx.drain_audio().is_empty());
    }
}
