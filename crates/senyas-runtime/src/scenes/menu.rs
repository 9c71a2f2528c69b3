//! Menu scene - looping background and a set of buttons

use std::time::Duration;

use senyas_core::{buttons, InputEvent, SceneId, SenyasResult};

use crate::context::SceneContext;
use crate::display::{sounds, AudioCue, DisplayList, DrawCommand, TextRole};
use crate::scene::{Scene, SceneCommand};
use crate::scenes::HoverState;

/// A button and the scene it leads to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub name: String,
    pub target: SceneId,
}

impl MenuButton {
    pub fn new(name: impl Into<String>, target: impl Into<SceneId>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuScene {
    background: Option<String>,
    audio: Option<String>,
    buttons: Vec<MenuButton>,
    back: Option<SceneId>,
    show_profile: bool,
    hover: HoverState,
    elapsed: Duration,
}

impl MenuScene {
    pub fn new(buttons: Vec<MenuButton>) -> Self {
        Self {
            background: None,
            audio: None,
            buttons,
            back: None,
            show_profile: false,
            hover: HoverState::default(),
            elapsed: Duration::ZERO,
        }
    }

    /// Looping background clip
    pub fn with_background(mut self, clip: impl Into<String>) -> Self {
        self.background = Some(clip.into());
        self
    }

    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = Some(audio.into());
        self
    }

    pub fn with_back(mut self, back: impl Into<SceneId>) -> Self {
        self.back = Some(back.into());
        self
    }

    /// Show the active learner's name
    pub fn with_profile_banner(mut self) -> Self {
        self.show_profile = true;
        self
    }

    pub fn buttons(&self) -> &[MenuButton] {
        &self.buttons
    }

    /// Scene a button leads to, the back button included
    pub fn target_of(&self, name: &str) -> Option<&SceneId> {
        if name == buttons::BACK {
            if let Some(back) = &self.back {
                return Some(back);
            }
        }
        self.buttons
            .iter()
            .find(|b| b.name == name)
            .map(|b| &b.target)
    }

    fn is_button(&self, name: &str) -> bool {
        self.target_of(name).is_some()
    }
}

impl Scene for MenuScene {
    fn enter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()> {
        self.hover.clear();
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
        ctx: &mut SceneContext,
    ) -> SenyasResult<SceneCommand> {
        match event {
            InputEvent::Hover(target) => {
                let target = target.as_deref().filter(|name| self.is_button(name));
                self.hover.update(target, ctx);
                Ok(SceneCommand::None)
            }
            InputEvent::Activate(name) => match self.target_of(name) {
                Some(target) => {
                    let target = target.clone();
                    ctx.play(sounds::CLICK);
                    Ok(SceneCommand::goto(target))
                }
                None => Ok(SceneCommand::None),
            },
            _ => Ok(SceneCommand::None),
        }
    }

    fn update(&mut self, dt: Duration, _ctx: &mut SceneContext) -> SenyasResult<SceneCommand> {
        self.elapsed += dt;
        Ok(SceneCommand::None)
    }

    fn render(&self, ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()> {
        if let Some(clip) = &self.background {
            out.push(DrawCommand::Clip {
                key: clip.clone(),
                position: self.elapsed,
                looping: true,
            });
        }
        if self.show_profile {
            if let Some(profile) = ctx.profile() {
                out.text(TextRole::Body, format!("Learner: {profile}"));
            }
        }
        for button in &self.buttons {
            out.button(button.name.clone(), self.hover.is(&button.name));
        }
        if self.back.is_some() {
            out.button(buttons::BACK, self.hover.is(buttons::BACK));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::testing::context;
    use senyas_core::ProfileId;

    fn galaxy() -> MenuScene {
        MenuScene::new(vec![
            MenuButton::new("alphabets", "playing_alphabets"),
            MenuButton::new("numbers", "playing_numbers"),
        ])
        .with_background("galaxy_loop")
        .with_back("playing_home")
        .with_profile_banner()
    }

    #[test]
    fn test_activate_transitions_with_click() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        let mut menu = galaxy();
        menu.enter(&mut ctx).unwrap();

        let cmd = menu
            .handle_input(&InputEvent::activate("numbers"), &mut ctx)
            .unwrap();
        assert_eq!(cmd, SceneCommand::goto("playing_numbers"));
        assert_eq!(ctx.drain_audio(), vec![AudioCue::Play(sounds::CLICK.into())]);

        let cmd = menu
            .handle_input(&InputEvent::activate(buttons::BACK), &mut ctx)
            .unwrap();
        assert_eq!(cmd, SceneCommand::goto("playing_home"));

        let cmd = menu
            .handle_input(&InputEvent::activate("stars"), &mut ctx)
            .unwrap();
        assert!(cmd.is_none());
    }

    #[test]
    fn test_hover_cue_once_per_button() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        let mut menu = galaxy();
        menu.enter(&mut ctx).unwrap();

        for event in [
            InputEvent::hover("alphabets"),
            InputEvent::hover("alphabets"),
            InputEvent::hover("nowhere"),
            InputEvent::hover("numbers"),
        ] {
            menu.handle_input(&event, &mut ctx).unwrap();
        }
        assert_eq!(ctx.drain_audio().len(), 2);

        let mut out = DisplayList::new();
        menu.render(&ctx, &mut out).unwrap();
        assert!(out
            .commands()
            .contains(&DrawCommand::Button { name: "numbers".into(), hovered: true }));
    }

    #[test]
    fn test_profile_banner() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        let menu = galaxy();

        let mut out = DisplayList::new();
        menu.render(&ctx, &mut out).unwrap();
        assert_eq!(out.texts(TextRole::Body).count(), 0);

        ctx.set_profile(Some(ProfileId::new("ana")));
        out.clear();
        menu.render(&ctx, &mut out).unwrap();
        assert!(out.has_text(TextRole::Body, "Learner: ana"));
        assert!(out.has_button(buttons::BACK));
    }
}
