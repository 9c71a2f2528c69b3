//! Sign-in scene - names a new learner and creates their profile

use std::time::Duration;

use senyas_core::{buttons, InputEvent, SceneId, SenyasResult};
use senyas_progress::ProfileStore;

use crate::context::SceneContext;
use crate::display::{sounds, DisplayList, DrawCommand, TextRole};
use crate::scene::{Scene, SceneCommand, TransitionPayload};
use crate::scenes::HoverState;

const SIGN_IN_BUTTONS: [&str; 3] = [buttons::EDIT, buttons::NEXT, buttons::BACK];

#[derive(Debug, Clone)]
pub struct SignInScene {
    background: Option<String>,
    keyboard: SceneId,
    next: SceneId,
    back: SceneId,
    name: String,
    notice: Option<String>,
    hover: HoverState,
    elapsed: Duration,
}

impl SignInScene {
    pub fn new(
        keyboard: impl Into<SceneId>,
        next: impl Into<SceneId>,
        back: impl Into<SceneId>,
    ) -> Self {
        Self {
            background: None,
            keyboard: keyboard.into(),
            next: next.into(),
            back: back.into(),
            name: String::new(),
            notice: None,
            hover: HoverState::default(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_background(mut self, clip: impl Into<String>) -> Self {
        self.background = Some(clip.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn sign_in(&mut self, ctx: &mut SceneContext) -> SceneCommand {
        if self.name.trim().is_empty() {
            return SceneCommand::None;
        }
        match ctx.store().create(&self.name) {
            Ok(profile) => {
                ctx.set_profile(Some(profile.id()));
                ctx.play(sounds::CLICK);
                SceneCommand::goto(self.next.clone())
            }
            Err(err) => {
                tracing::warn!(name = %self.name, error = %err, "could not create profile");
                self.notice = Some(match ProfileStore::validate_name(&self.name) {
                    Ok(_) => "Could not save profile".to_string(),
                    Err(_) => "Please choose another name".to_string(),
                });
                SceneCommand::None
            }
        }
    }
}

impl Scene for SignInScene {
    fn enter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()> {
        self.name = match ctx.take_payload() {
            Some(TransitionPayload::Text(text)) => text,
            _ => String::new(),
        };
        self.notice = None;
        self.hover.clear();
        self.elapsed = Duration::ZERO;
        Ok(())
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        ctx: &mut SceneContext,
    ) -> SenyasResult<SceneCommand> {
        let cmd = match event {
            InputEvent::Hover(target) => {
                let target = target
                    .as_deref()
                    .filter(|name| SIGN_IN_BUTTONS.contains(name));
                self.hover.update(target, ctx);
                SceneCommand::None
            }
            InputEvent::Char(c) if !c.is_control() => {
                self.name.push(*c);
                SceneCommand::None
            }
            InputEvent::Backspace => {
                self.name.pop();
                SceneCommand::None
            }
            InputEvent::Submit => self.sign_in(ctx),
            InputEvent::Activate(name) => match name.as_str() {
                buttons::EDIT => {
                    ctx.play(sounds::CLICK);
                    SceneCommand::goto_with(
                        self.keyboard.clone(),
                        TransitionPayload::Text(self.name.clone()),
                    )
                }
                buttons::NEXT => self.sign_in(ctx),
                buttons::BACK => {
                    ctx.play(sounds::CLICK);
                    SceneCommand::goto(self.back.clone())
                }
                _ => SceneCommand::None,
            },
            _ => SceneCommand::None,
        };
        Ok(cmd)
    }

    fn update(&mut self, dt: Duration, _ctx: &mut SceneContext) -> SenyasResult<SceneCommand> {
        self.elapsed += dt;
        Ok(SceneCommand::None)
    }

    fn render(&self, _ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()> {
        if let Some(clip) = &self.background {
            out.push(DrawCommand::Clip {
                key: clip.clone(),
                position: self.elapsed,
                looping: true,
            });
        }
        out.text(TextRole::Input, self.name.clone());
        for name in SIGN_IN_BUTTONS {
            out.button(name, self.hover.is(name));
        }
        if let Some(notice) = &self.notice {
            out.text(TextRole::Notice, notice.clone());
        }
        Ok(())
    }
}
