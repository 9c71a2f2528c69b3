//! Scene state machine
//!
//! Exactly one scene is active. Per frame the caller dispatches zero or more
//! inputs, then ticks once, then renders once. `request_transition` is the
//! only way the active scene changes: the target is looked up first, then the
//! outgoing scene exits, the payload is stored and the incoming scene enters.

use std::collections::HashMap;
use std::time::Duration;

use senyas_core::{InputEvent, SceneId, SenyasError, SenyasResult};

use crate::context::SceneContext;
use crate::display::DisplayList;
use crate::scene::{Scene, SceneCommand, TransitionPayload};

/// Where the machine is within the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramePhase {
    /// Frame open: inputs and the tick may follow
    Input,
    /// Ticked: only render may follow
    Ticked,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MachineStats {
    pub frames: u64,
    pub inputs: u64,
    pub transitions: u64,
}

/// Owns every registered scene and the id of the active one
#[derive(Default)]
pub struct SceneStateMachine {
    scenes: HashMap<SceneId, Box<dyn Scene>>,
    active: Option<SceneId>,
    phase: Option<FramePhase>,
    quit_requested: bool,
    stats: MachineStats,
}

impl SceneStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<SceneId>, scene: Box<dyn Scene>) -> SenyasResult<()> {
        let id = id.into();
        if self.scenes.contains_key(&id) {
            return Err(SenyasError::DuplicateScene(id));
        }
        self.scenes.insert(id, scene);
        Ok(())
    }

    pub fn contains(&self, id: &SceneId) -> bool {
        self.scenes.contains_key(id)
    }

    /// Registered ids, sorted
    pub fn scene_ids(&self) -> Vec<SceneId> {
        let mut ids: Vec<SceneId> = self.scenes.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn active(&self) -> Option<&SceneId> {
        self.active.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.active.is_some()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn stats(&self) -> &MachineStats {
        &self.stats
    }

    /// Enter the initial scene
    pub fn start(&mut self, initial: impl Into<SceneId>, ctx: &mut SceneContext) -> SenyasResult<()> {
        let initial = initial.into();
        if self.active.is_some() {
            return Err(SenyasError::InvalidConfig(format!(
                "machine already started, cannot restart at {initial}"
            )));
        }
        let registered = self.scenes.len();
        let scene = self
            .scenes
            .get_mut(&initial)
            .ok_or_else(|| SenyasError::UnknownScene(initial.clone()))?;

        tracing::info!(scene = %initial, scenes = registered, "scene machine started");
        self.active = Some(initial.clone());
        self.phase = Some(FramePhase::Input);
        ctx.set_payload(None);
        ctx.set_current(initial);
        scene.enter(ctx)
    }

    pub fn dispatch_input(&mut self, event: &InputEvent, ctx: &mut SceneContext) -> SenyasResult<()> {
        match self.phase {
            None => return Err(SenyasError::NotStarted),
            Some(FramePhase::Ticked) => {
                return Err(SenyasError::FrameOrder("input dispatched after tick"))
            }
            Some(FramePhase::Input) => {}
        }
        self.stats.inputs += 1;
        if *event == InputEvent::Quit {
            return self.apply(SceneCommand::Quit, ctx);
        }

        let command = self.active_scene()?.handle_input(event, ctx)?;
        self.apply(command, ctx)
    }

    pub fn tick(&mut self, dt: Duration, ctx: &mut SceneContext) -> SenyasResult<()> {
        match self.phase {
            None => return Err(SenyasError::NotStarted),
            Some(FramePhase::Ticked) => return Err(SenyasError::FrameOrder("tick before render")),
            Some(FramePhase::Input) => {}
        }
        self.phase = Some(FramePhase::Ticked);
        ctx.advance_clock(dt);

        let command = self.active_scene()?.update(dt, ctx)?;
        self.apply(command, ctx)
    }

    pub fn render(&mut self, ctx: &SceneContext, out: &mut DisplayList) -> SenyasResult<()> {
        match self.phase {
            None => return Err(SenyasError::NotStarted),
            Some(FramePhase::Input) => return Err(SenyasError::FrameOrder("render before tick")),
            Some(FramePhase::Ticked) => {}
        }
        self.phase = Some(FramePhase::Input);
        self.stats.frames += 1;

        let id = self.active.as_ref().ok_or(SenyasError::NotStarted)?;
        let scene = self
            .scenes
            .get(id)
            .ok_or_else(|| SenyasError::UnknownScene(id.clone()))?;
        scene.render(ctx, out)
    }

    /// Inputs, tick and render for one frame
    pub fn frame(
        &mut self,
        inputs: &[InputEvent],
        dt: Duration,
        ctx: &mut SceneContext,
        out: &mut DisplayList,
    ) -> SenyasResult<()> {
        for event in inputs {
            self.dispatch_input(event, ctx)?;
            if self.quit_requested {
                return Ok(());
            }
        }
        self.tick(dt, ctx)?;
        out.clear();
        self.render(ctx, out)
    }

    /// Switch the active scene
    ///
    /// An unknown target fails before anything changes; the outgoing scene
    /// stays active and is not exited.
    pub fn request_transition(
        &mut self,
        target: impl Into<SceneId>,
        payload: Option<TransitionPayload>,
        ctx: &mut SceneContext,
    ) -> SenyasResult<()> {
        let target = target.into();
        if !self.scenes.contains_key(&target) {
            tracing::error!(scene = %target, "transition to unregistered scene");
            return Err(SenyasError::UnknownScene(target));
        }
        let outgoing = self.active.take().ok_or(SenyasError::NotStarted)?;

        if let Some(scene) = self.scenes.get_mut(&outgoing) {
            scene.exit(ctx);
        }
        tracing::info!(from = %outgoing, to = %target, payload = payload.is_some(), "scene transition");

        self.active = Some(target.clone());
        self.stats.transitions += 1;
        ctx.set_payload(payload);
        ctx.set_current(target.clone());

        let scene = self
            .scenes
            .get_mut(&target)
            .ok_or(SenyasError::UnknownScene(target))?;
        scene.enter(ctx)
    }

    fn active_scene(&mut self) -> SenyasResult<&mut Box<dyn Scene>> {
        let id = self.active.as_ref().ok_or(SenyasError::NotStarted)?;
        self.scenes
            .get_mut(id)
            .ok_or_else(|| SenyasError::UnknownScene(id.clone()))
    }

    fn apply(&mut self, command: SceneCommand, ctx: &mut SceneContext) -> SenyasResult<()> {
        match command {
            SceneCommand::None => Ok(()),
            SceneCommand::Transition(t) => self.request_transition(t.target, t.payload, ctx),
            SceneCommand::Quit => {
                tracing::info!(scene = ?self.active, "quit requested");
                self.quit_requested = true;
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for SceneStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStateMachine")
            .field("scenes", &self.scenes.len())
            .field("active", &self.active)
            .field("stats", &self.stats)
            .finish()
    }
}
