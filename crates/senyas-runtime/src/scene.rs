//! Scene trait and transition commands

use std::time::Duration;

use senyas_core::{InputEvent, ProfileId, SceneId, SenyasResult};

use crate::context::SceneContext;
use crate::display::DisplayList;

/// Data handed from the outgoing scene to the incoming one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPayload {
    /// Text being edited, e.g. a learner name on its way to the keyboard
    Text(String),
    /// A profile chosen on the outgoing screen
    Profile(ProfileId),
}

/// A request to change the active scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub target: SceneId,
    pub payload: Option<TransitionPayload>,
}

impl Transition {
    pub fn to(target: impl Into<SceneId>) -> Self {
        Self {
            target: target.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: TransitionPayload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// What a scene wants the machine to do after an input or tick
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SceneCommand {
    #[default]
    None,
    Transition(Transition),
    Quit,
}

impl SceneCommand {
    pub fn goto(target: impl Into<SceneId>) -> Self {
        SceneCommand::Transition(Transition::to(target))
    }

    pub fn goto_with(target: impl Into<SceneId>, payload: TransitionPayload) -> Self {
        SceneCommand::Transition(Transition::to(target).with_payload(payload))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SceneCommand::None)
    }
}

/// One lesson screen
///
/// Scenes are created once at startup and live for the whole session; they
/// are entered and exited, never dropped. `enter` must fully reset any
/// per-visit state.
pub trait Scene: Send {
    fn enter(&mut self, ctx: &mut SceneContext) -> SenyasResult<()>;

    fn exit(&mut self, _ctx: &mut SceneContext) {}

    fn handle_input(
        &mut self,
        _event: &InputEvent,
        _ctx: &mut SceneContext,
    ) -> SenyasResult<SceneCommand> {
        Ok(SceneCommand::None)
    }

    fn update(&mut self, dt: Duration, ctx: &mut SceneContext) -> SenyasResult<SceneCommand>;

    fn render(&self, ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()>;
}
