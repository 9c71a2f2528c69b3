//! Video scene - a clip that plays once and moves on

use std::time::Duration;

use senyas_core::{buttons, InputEvent, SceneId, SenyasResult};

use crate::context::SceneContext;
use crate::display::{AudioCue, DisplayList, DrawCommand};
use crate::scene::{Scene, SceneCommand};

/// Intro and cut-scene clip
#[derive(Debug, Clone)]
pub struct VideoScene {
    clip: String,
    length: Duration,
    audio: Option<String>,
    next: SceneId,
    elapsed: Duration,
}

impl VideoScene {
    pub fn new(clip: impl Into<String>, length: Duration, next: impl Into<SceneId>) -> Self {
        Self {
            clip: clip.into(),
            length,
            audio: None,
            next: next.into(),
            elapsed: Duration::ZERO,
        }
    }

    /// Narration started on enter and stopped on exit
    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = Some(audio.into());
        self
    }

    pub fn next(&self) -> &SceneId {
        &self.next
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Scene for VideoScene {
    fn enter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()> {
        self.elapsed = Duration::ZERO;
        if let Some(audio) = &self.audio {
            ctx.play(audio);
        }
        Ok(())
    }

    fn exit(&mut self, ctx: &mut SceneContext) {
        if self.audio.is_some() {
            ctx.cue(AudioCue::StopNarration);
        }
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        _ctx: &mut SceneContext,
    ) -> SenyasResult<SceneCommand> {
        match event {
            InputEvent::Skip => Ok(SceneCommand::goto(self.next.clone())),
            InputEvent::Activate(name) if name == buttons::NEXT => {
                Ok(SceneCommand::goto(self.next.clone()))
            }
            _ => Ok(SceneCommand::None),
        }
    }

    fn update(&mut self, dt: Duration, _ctx: &mut SceneContext) -> SenyasResult<SceneCommand> {
        self.elapsed += dt;
        if self.elapsed >= self.length {
            return Ok(SceneCommand::goto(self.next.clone()));
        }
        Ok(SceneCommand::None)
    }

    fn render(&self, _ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()> {
        out.push(DrawCommand::Clip {
            key: self.clip.clone(),
            position: self.elapsed.min(self.length),
            looping: false,
        });
        Ok(())
    }
}
