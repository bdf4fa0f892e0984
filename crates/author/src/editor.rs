use crate::config::EditorConfig;
use crate::link::{LinkCoordinator, LinkOutcome};
use crate::session::{ActorEditSession, EditorMode, FrameContext, SessionEffect};
use levelforge_common::{ActorId, Transform};
use levelforge_input::{EditorCommand, FrameInput};
use levelforge_kernel::{EntityRaycaster, Level};
use std::time::Duration;

/// Drives the three actor sessions against one level.
///
/// Each frame, every actor's pose is sampled first. The sessions are then run
/// strictly in `ActorId::ALL` order, and each one's cross-session effects are
/// applied before the next runs. That ordering is the only concurrency
/// control: a later actor always sees an earlier actor's edits from the same
/// frame.
#[derive(Debug, Clone)]
pub struct LevelEditor {
    config: EditorConfig,
    mode: EditorMode,
    sessions: [ActorEditSession; 3],
    link: LinkCoordinator,
}

impl Default for LevelEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl LevelEditor {
    /// Create an editor in edit mode with one idle session per actor.
    pub fn new(config: EditorConfig) -> Self {
        let sessions = ActorId::ALL.map(|actor| ActorEditSession::new(actor, &config));
        Self {
            config,
            mode: EditorMode::Edit,
            sessions,
            link: LinkCoordinator::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current editor mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch editor mode. Every session returns to Idle and any pending link
    /// is dropped.
    pub fn set_mode(&mut self, level: &mut Level, mode: EditorMode) {
        if self.mode == mode {
            return;
        }
        self.link.cancel(level);
        for session in &mut self.sessions {
            session.reset();
        }
        tracing::info!(from = ?self.mode, to = ?mode, "editor mode");
        self.mode = mode;
    }

    /// One actor's session.
    pub fn session(&self, actor: ActorId) -> &ActorEditSession {
        &self.sessions[actor.index()]
    }

    /// Mutable access to one actor's session.
    pub fn session_mut(&mut self, actor: ActorId) -> &mut ActorEditSession {
        &mut self.sessions[actor.index()]
    }

    /// All sessions in processing order.
    pub fn sessions(&self) -> impl Iterator<Item = &ActorEditSession> {
        self.sessions.iter()
    }

    /// The link-mode coordinator.
    pub fn link(&self) -> &LinkCoordinator {
        &self.link
    }

    /// Run one frame of input. `now` is the frame clock used for tap timing.
    pub fn process_frame(
        &mut self,
        level: &mut Level,
        raycaster: &dyn EntityRaycaster,
        input: &FrameInput,
        now: Duration,
    ) {
        let _span = tracing::info_span!("edit_frame", mode = ?self.mode).entered();
        if self.mode == EditorMode::Play {
            return;
        }

        let frames = ActorId::ALL.map(|actor| input.actor_frame(actor, &self.config.input));
        for (session, frame) in self.sessions.iter_mut().zip(&frames) {
            if let Some(frame) = frame {
                session.update_pose(frame.pose, &self.config);
            }
        }

        for actor in ActorId::ALL {
            let Some(frame) = frames[actor.index()] else {
                continue;
            };
            let peer = actor
                .peer()
                .filter(|peer| frames[peer.index()].is_some())
                .map(|peer| self.sessions[peer.index()].peer_view());
            let mut ctx = FrameContext {
                level: &mut *level,
                raycaster,
                config: &self.config,
                mode: self.mode,
                now,
            };
            let effects = self.sessions[actor.index()].process(&mut ctx, &frame.gestures, peer);
            for effect in effects {
                self.apply_effect(level, actor, effect);
            }
        }
    }

    /// Handle a named UI command. Returns false when it was not handled,
    /// including when its target no longer resolves.
    pub fn dispatch(&mut self, level: &mut Level, command: EditorCommand) -> bool {
        let handled = match command {
            EditorCommand::Undo { actor } => self.sessions[actor.index()].undo(level),
            EditorCommand::Redo { actor } => self.sessions[actor.index()].redo(level),
            EditorCommand::EnterLinkMode { entity } => {
                if self.mode == EditorMode::Play || !self.link.enter(level, entity) {
                    false
                } else {
                    for session in &mut self.sessions {
                        session.enter_linking();
                    }
                    true
                }
            }
            EditorCommand::CancelLinkMode => {
                let cancelled = self.link.cancel(level);
                if cancelled {
                    self.finish_linking();
                }
                cancelled
            }
            EditorCommand::ResetTransform { entity } => match level.resolve_mut(entity) {
                Some(target) => {
                    target.transform = Transform::default();
                    level.mark_unsaved();
                    true
                }
                None => false,
            },
            EditorCommand::Select { entity } => {
                self.sessions[ActorId::MouseKeyboard.index()].select(level, entity)
            }
            EditorCommand::Delete { entity } => {
                self.sessions[ActorId::MouseKeyboard.index()].delete(level, entity)
            }
        };
        if handled {
            tracing::info!(?command, "command");
        } else {
            tracing::debug!(?command, "command not handled");
        }
        handled
    }

    fn apply_effect(&mut self, level: &mut Level, actor: ActorId, effect: SessionEffect) {
        match effect {
            SessionEffect::BeginJointScale { peer } => self.sessions[peer.index()].join_scale(),
            SessionEffect::EndJointScale { peer } => self.sessions[peer.index()].leave_scale(),
            SessionEffect::LinkPick { picked } => match self.link.complete(level, picked) {
                LinkOutcome::Linked(record) => {
                    self.sessions[actor.index()].commit(level, record);
                    self.finish_linking();
                }
                LinkOutcome::Incompatible => {}
                LinkOutcome::Cancelled => self.finish_linking(),
            },
        }
    }

    fn finish_linking(&mut self) {
        for session in &mut self.sessions {
            session.finish_linking();
        }
    }
}
