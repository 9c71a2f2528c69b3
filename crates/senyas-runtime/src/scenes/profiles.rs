//! Profile loader - pick an existing learner, inspect or delete their progress

use std::time::Duration;

use senyas_core::{buttons, InputEvent, ProfileId, SceneId, SenyasResult};
use senyas_progress::{summarize, SummaryLine, SUMMARY_WRAP};

use crate::context::SceneContext;
use crate::display::{sounds, DisplayList, TextRole};
use crate::scene::{Scene, SceneCommand, TransitionPayload};
use crate::scenes::HoverState;

/// Button name selecting a listed profile
pub fn select_button(id: &ProfileId) -> String {
    format!("{}{}", buttons::SELECT_PREFIX, id)
}

/// The selected profile and what the panel shows about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSelection {
    pub id: ProfileId,
    pub created_at: String,
    pub summary: Vec<SummaryLine>,
}

#[derive(Debug, Clone)]
pub struct ProfileLoaderScene {
    back: SceneId,
    home: SceneId,
    profiles: Vec<ProfileId>,
    selected: Option<ProfileSelection>,
    notice: Option<String>,
    hover: HoverState,
}

impl ProfileLoaderScene {
    pub fn new(back: impl Into<SceneId>, home: impl Into<SceneId>) -> Self {
        Self {
            back: back.into(),
            home: home.into(),
            profiles: Vec::new(),
            selected: None,
            notice: None,
            hover: HoverState::default(),
        }
    }

    pub fn profiles(&self) -> &[ProfileId] {
        &self.profiles
    }

    pub fn selected(&self) -> Option<&ProfileSelection> {
        self.selected.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn refresh(&mut self, ctx: &SceneContext) {
        match ctx.store().list() {
            Ok(profiles) => self.profiles = profiles,
            Err(err) => {
                tracing::warn!(error = %err, "could not list profiles");
                self.profiles.clear();
                self.notice = Some("Could not read saved profiles".to_string());
            }
        }
    }

    fn select(&mut self, id: ProfileId, ctx: &SceneContext) {
        if !self.profiles.contains(&id) {
            return;
        }
        match ctx.store().load(&id) {
            Ok(profile) => {
                self.notice = None;
                self.selected = Some(ProfileSelection {
                    id,
                    created_at: profile.created_at,
                    summary: summarize(&profile.progress, SUMMARY_WRAP),
                });
            }
            Err(err) => {
                tracing::warn!(profile = %id, error = %err, "could not load profile");
                self.selected = None;
                self.notice = Some(format!("Could not load {id}"));
            }
        }
    }

    fn delete_selected(&mut self, ctx: &SceneContext) {
        let Some(selection) = self.selected.take() else {
            return;
        };
        if let Err(err) = ctx.store().delete(&selection.id) {
            tracing::warn!(profile = %selection.id, error = %err, "could not delete profile");
            self.notice = Some(format!("Could not delete {}", selection.id));
        }
        self.refresh(ctx);
    }

    fn is_button(&self, name: &str) -> bool {
        match name.strip_prefix(buttons::SELECT_PREFIX) {
            Some(profile) => self.profiles.iter().any(|p| p.as_str() == profile),
            None => matches!(name, buttons::BACK | buttons::LOAD | buttons::DELETE),
        }
    }
}

impl Scene for ProfileLoaderScene {
    fn enter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()> {
        self.selected = None;
        self.notice = None;
        self.hover.clear();
        self.refresh(ctx);
        if let Some(TransitionPayload::Profile(id)) = ctx.take_payload() {
            self.select(id, ctx);
        }
        Ok(())
    }

    fn handle_input(
        &mut self,
        event: &InputEvent,
        ctx: &mut SceneContext,
    ) -> SenyasResult<SceneCommand> {
        let name = match event {
            InputEvent::Hover(target) => {
                let target = target.as_deref().filter(|name| self.is_button(name));
                self.hover.update(target, ctx);
                return Ok(SceneCommand::None);
            }
            InputEvent::Activate(name) => name.as_str(),
            _ => return Ok(SceneCommand::None),
        };

        if let Some(profile) = name.strip_prefix(buttons::SELECT_PREFIX) {
            ctx.play(sounds::CLICK);
            self.select(ProfileId::new(profile), ctx);
            return Ok(SceneCommand::None);
        }

        let cmd = match name {
            buttons::LOAD => match &self.selected {
                Some(selection) => {
                    ctx.play(sounds::CLICK);
                    ctx.set_profile(Some(selection.id.clone()));
                    SceneCommand::goto(self.home.clone())
                }
                None => SceneCommand::None,
            },
            buttons::DELETE => {
                ctx.play(sounds::CLICK);
                self.delete_selected(ctx);
                SceneCommand::None
            }
            buttons::BACK => {
                ctx.play(sounds::CLICK);
                SceneCommand::goto(self.back.clone())
            }
            _ => SceneCommand::None,
        };
        Ok(cmd)
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut SceneContext) -> SenyasResult<SceneCommand> {
        Ok(SceneCommand::None)
    }

    fn render(&self, _ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()> {
        out.text(TextRole::Title, "Load Game");
        for id in &self.profiles {
            let name = select_button(id);
            let hovered = self.hover.is(&name);
            out.button(name, hovered);
        }

        if let Some(selection) = &self.selected {
            out.text(TextRole::Title, selection.id.to_string());
            if !selection.created_at.is_empty() {
                out.text(
                    TextRole::Body,
                    format!("Created at: {}", selection.created_at),
                );
            }
            for line in &selection.summary {
                out.text(
                    TextRole::Body,
                    format!("{}{}", "  ".repeat(line.indent()), line.text),
                );
            }
            out.button(buttons::LOAD, self.hover.is(buttons::LOAD));
            out.button(buttons::DELETE, self.hover.is(buttons::DELETE));
        }

        out.button(buttons::BACK, self.hover.is(buttons::BACK));
        if let Some(notice) = &self.notice {
            out.text(TextRole::Notice, notice.clone());
        }
        Ok(())
    }
}
