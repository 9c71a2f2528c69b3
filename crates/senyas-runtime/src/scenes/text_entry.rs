//! On-screen keyboard

use std::time::Duration;

use senyas_core::{buttons, InputEvent, SceneId, SenyasResult};

use crate::context::SceneContext;
use crate::display::{sounds, DisplayList, DrawCommand, TextRole};
use crate::scene::{Scene, SceneCommand, TransitionPayload};

/// Longest learner name the keyboard accepts
pub const DEFAULT_MAX_TEXT: usize = 20;

/// Edits a line of text and hands it back to the scene that opened it
#[derive(Debug, Clone)]
pub struct TextEntryScene {
    return_to: SceneId,
    max_len: usize,
    text: String,
}

impl TextEntryScene {
    pub fn new(return_to: impl Into<SceneId>) -> Self {
        Self {
            return_to: return_to.into(),
            max_len: DEFAULT_MAX_TEXT,
            text: String::new(),
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn submit(&self, ctx: &mut SceneContext) -> SceneCommand {
        ctx.play(sounds::CLICK);
        SceneCommand::goto_with(
            self.return_to.clone(),
            TransitionPayload::Text(self.text.clone()),
        )
    }
}

impl Scene for TextEntryScene {
    fn enter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()> {
        self.text = match ctx.take_payload() {
            Some(TransitionPayload::Text(text)) => text.chars().take(self.max_len).collect(),
            _ => String::new(),
        };
        Ok(())
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        ctx: &mut SceneContext,
    ) -> SenyasResult<SceneCommand> {
        match event {
            InputEvent::Char(c) if !c.is_control() => {
                if self.text.chars().count() < self.max_len {
                    self.text.push(*c);
                }
            }
            InputEvent::Backspace => {
                self.text.pop();
            }
            InputEvent::Submit => return Ok(self.submit(ctx)),
            InputEvent::Activate(name) if name == buttons::DONE => return Ok(self.submit(ctx)),
            _ => {}
        }
        Ok(SceneCommand::None)
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut SceneContext) -> SenyasResult<SceneCommand> {
        Ok(SceneCommand::None)
    }

    fn render(&self, _ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()> {
        out.push(DrawCommand::Keyboard);
        out.text(TextRole::Input, self.text.clone());
        out.button(buttons::DONE, false);
        Ok(())
    }
}
