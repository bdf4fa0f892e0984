use crate::config::EditorConfig;
use crate::history::History;
use crate::record::{ActionRecord, TransformKind};
use glam::Vec3;
use levelforge_common::{ActorId, AxisLock, EntityKind, EntityUid, Transform};
use levelforge_input::{ActorPose, DoubleTapDetector, Gestures, TapResolution};
use levelforge_kernel::{BoundsRaycaster, EntityRaycaster, Level};
use std::time::Duration;

/// How far below an object drop-to-ground looks for support.
const GROUND_PROBE_DISTANCE: f32 = 1000.0;

/// Footprint sample points for drop-to-ground, in half-extent units: centre,
/// corners, then edge midpoints.
const FOOTPRINT: [(f32, f32); 9] = [
    (0.0, 0.0),
    (-1.0, -1.0),
    (1.0, -1.0),
    (-1.0, 1.0),
    (1.0, 1.0),
    (0.0, -1.0),
    (0.0, 1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
];

/// Per-actor edit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionMode {
    #[default]
    Idle,
    Selected,
    Translating,
    Rotating,
    Scaling,
    Cloning,
    Linking,
}

impl ActionMode {
    /// Idle and Selected behave the same for starting new operations.
    pub fn is_at_rest(self) -> bool {
        matches!(self, Self::Idle | Self::Selected)
    }

    fn tracks_hover(self) -> bool {
        self.is_at_rest() || self == Self::Linking
    }
}

/// Editor-wide mode shared by all sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Place new objects from a chosen kind.
    Create,
    #[default]
    Edit,
    /// Editing is suspended.
    Play,
}

/// What one hand can see of the other during two-handed operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PeerView {
    pub actor: ActorId,
    pub mode: ActionMode,
    pub selected: Option<EntityUid>,
    pub position: Vec3,
    pub last_position: Vec3,
}

/// Cross-session consequences of one session's frame, applied by the editor
/// before the next actor runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEffect {
    BeginJointScale { peer: ActorId },
    EndJointScale { peer: ActorId },
    LinkPick { picked: EntityUid },
}

pub(crate) struct FrameContext<'a> {
    pub level: &'a mut Level,
    pub raycaster: &'a dyn EntityRaycaster,
    pub config: &'a EditorConfig,
    pub mode: EditorMode,
    pub now: Duration,
}

#[derive(Debug, Clone, Copy, Default)]
struct AimTracking {
    /// Distance along the aim ray; zero means "use the raycast distance".
    hold_distance: f32,
    current: Vec3,
    previous: Vec3,
}

#[derive(Debug, Clone, Copy, Default)]
struct Placement {
    kind: Option<EntityKind>,
    start: Vec3,
    end: Vec3,
}

/// One actor's hover/selection state machine and its private history.
///
/// Entities are only ever held by `EntityUid` and re-resolved every frame, so
/// an entity deleted by another actor simply stops responding.
#[derive(Debug, Clone)]
pub struct ActorEditSession {
    actor: ActorId,
    mode: ActionMode,
    hovered: Option<EntityUid>,
    selected: Option<EntityUid>,
    history: History,
    axis_lock: AxisLock,
    aim: AimTracking,
    pose: ActorPose,
    last_pose: ActorPose,
    posed: bool,
    drives_scale: bool,
    placement: Placement,
    history_taps: DoubleTapDetector,
}

impl ActorEditSession {
    /// Create an idle session with an empty history.
    pub fn new(actor: ActorId, config: &EditorConfig) -> Self {
        Self {
            actor,
            mode: ActionMode::Idle,
            hovered: None,
            selected: None,
            history: History::new(config.history_policy),
            axis_lock: AxisLock::None,
            aim: AimTracking::default(),
            pose: ActorPose::default(),
            last_pose: ActorPose::default(),
            posed: false,
            drives_scale: false,
            placement: Placement::default(),
            history_taps: DoubleTapDetector::new(config.redo_tap_window()),
        }
    }

    /// The actor driving this session.
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Current edit mode.
    pub fn mode(&self) -> ActionMode {
        self.mode
    }

    /// Entity under the aim ray, if any.
    pub fn hovered(&self) -> Option<EntityUid> {
        self.hovered
    }

    /// Entity being edited or bookmarked.
    pub fn selected(&self) -> Option<EntityUid> {
        self.selected
    }

    /// This actor's undo/redo stacks.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Axis restriction applied to drags.
    pub fn axis_lock(&self) -> AxisLock {
        self.axis_lock
    }

    /// Distance along the aim ray to the held point. Zero means the full raycast distance.
    pub fn hold_distance(&self) -> f32 {
        self.aim.hold_distance
    }

    /// Point on the aim ray at the hold distance.
    pub fn aim_point(&self) -> Vec3 {
        self.aim.current
    }

    /// Whether this session's movement drives a two-handed scale.
    pub fn drives_scale(&self) -> bool {
        self.drives_scale
    }

    /// Kind placed by the next create-mode drag.
    pub fn placement_kind(&self) -> Option<EntityKind> {
        self.placement.kind
    }

    /// Choose the create-mode kind. The player start is never placeable.
    pub fn set_placement_kind(&mut self, kind: Option<EntityKind>) {
        self.placement.kind = kind.filter(|k| *k != EntityKind::PlayerStart);
    }

    /// Undo the last edit. Returns true if a record was consumed.
    pub fn undo(&mut self, level: &mut Level) -> bool {
        self.history.undo(level)
    }

    /// Redo the last undone edit. Returns true if a record was consumed.
    pub fn redo(&mut self, level: &mut Level) -> bool {
        self.history.redo(level)
    }

    /// Bookmark an entity without editing it. Only from rest.
    pub fn select(&mut self, level: &Level, uid: EntityUid) -> bool {
        if !self.mode.is_at_rest() || !level.contains(uid) {
            return false;
        }
        self.selected = Some(uid);
        self.mode = ActionMode::Selected;
        tracing::debug!(actor = %self.actor, %uid, "selected");
        true
    }

    /// Remove an entity and record it. The player start cannot be deleted.
    pub fn delete(&mut self, level: &mut Level, uid: EntityUid) -> bool {
        if uid == EntityUid::PLAYER_START {
            return false;
        }
        let Some(removed) = level.despawn(uid) else {
            tracing::debug!(actor = %self.actor, %uid, "delete target is gone");
            return false;
        };
        self.commit(
            level,
            ActionRecord::Delete {
                entity: uid,
                kind: removed.kind,
                prior: removed.transform,
                partner: removed.partner,
            },
        );
        if self.selected == Some(uid) {
            self.selected = None;
            if self.mode == ActionMode::Selected {
                self.mode = ActionMode::Idle;
            }
        }
        if self.hovered == Some(uid) {
            self.hovered = None;
        }
        true
    }

    pub(crate) fn commit(&mut self, level: &mut Level, record: ActionRecord) {
        level.mark_unsaved();
        self.history.record(record);
    }

    pub(crate) fn peer_view(&self) -> PeerView {
        PeerView {
            actor: self.actor,
            mode: self.mode,
            selected: self.selected,
            position: self.pose.position,
            last_position: self.last_pose.position,
        }
    }

    /// Sample this frame's pose and advance the aim point.
    pub(crate) fn update_pose(&mut self, pose: ActorPose, config: &EditorConfig) {
        self.last_pose = if self.posed { self.pose } else { pose };
        self.pose = pose;
        self.aim.previous = self.aim.current;
        self.aim.current = self.aim_at_hold_distance(config);
        if !self.posed {
            self.aim.previous = self.aim.current;
            self.posed = true;
        }
    }

    /// Drop every transient state and return to Idle. History is kept.
    pub(crate) fn reset(&mut self) {
        self.end_drag();
        self.hovered = None;
        self.placement.start = self.aim.current;
        self.placement.end = self.aim.current;
        self.history_taps.reset();
    }

    pub(crate) fn enter_linking(&mut self) {
        self.end_drag();
        self.mode = ActionMode::Linking;
    }

    pub(crate) fn finish_linking(&mut self) {
        if self.mode == ActionMode::Linking {
            self.mode = ActionMode::Idle;
        }
    }

    /// The peer hand started scaling the entity this session is translating.
    pub(crate) fn join_scale(&mut self) {
        if self.mode == ActionMode::Translating || self.mode == ActionMode::Rotating {
            self.mode = ActionMode::Scaling;
            self.drives_scale = false;
        }
    }

    pub(crate) fn leave_scale(&mut self) {
        if self.mode == ActionMode::Scaling {
            self.end_drag();
        }
    }

    pub(crate) fn process(
        &mut self,
        ctx: &mut FrameContext<'_>,
        gestures: &Gestures,
        peer: Option<PeerView>,
    ) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        match ctx.mode {
            EditorMode::Play => {}
            EditorMode::Create => self.process_create(ctx, gestures),
            EditorMode::Edit => self.process_edit(ctx, gestures, peer, &mut effects),
        }
        effects
    }

    fn process_edit(
        &mut self,
        ctx: &mut FrameContext<'_>,
        g: &Gestures,
        peer: Option<PeerView>,
        effects: &mut Vec<SessionEffect>,
    ) {
        if self.mode.tracks_hover() {
            self.refresh_hover(ctx);
        }
        if g.cycle_axis_lock {
            self.axis_lock = self.axis_lock.next();
            tracing::debug!(actor = %self.actor, lock = ?self.axis_lock, "axis lock");
        }

        if g.primary.pressed {
            self.on_grab(ctx, peer, effects);
        }
        if g.secondary.pressed {
            self.on_secondary(ctx);
        }
        if g.primary.released {
            self.on_grab_released(effects);
        }
        if g.secondary.released {
            self.on_secondary_released();
        }

        if g.delete && self.mode.is_at_rest() {
            if let Some(target) = self.edit_target(ctx.level) {
                self.delete(ctx.level, target);
                self.mode = ActionMode::Idle;
                self.selected = None;
            }
        }

        if g.primary.held {
            match self.mode {
                ActionMode::Translating => {
                    self.drag(ctx, g.hold_distance_delta);
                    if g.drop_to_ground {
                        self.drop_to_ground(ctx);
                    }
                }
                ActionMode::Rotating => self.twist(ctx.level),
                ActionMode::Scaling if self.drives_scale => self.stretch(ctx, peer),
                _ => {}
            }
        }
        if g.secondary.held && self.mode == ActionMode::Cloning {
            self.drag(ctx, g.hold_distance_delta);
        }

        if g.select {
            self.on_select(effects);
        }
        if self.mode.is_at_rest() {
            self.nudge(ctx, g.rotate_steps, g.scale_steps);
        }

        let tap_allowed = self.hovered.is_none();
        self.history_gestures(ctx, g, tap_allowed);
    }

    fn process_create(&mut self, ctx: &mut FrameContext<'_>, g: &Gestures) {
        self.hovered = None;
        if !g.place.held {
            let hit = ctx.raycaster.raycast_vs_entities(
                ctx.level,
                self.pose.aim_origin,
                self.pose.aim_direction,
                ctx.config.raycast_distance,
                None,
            );
            if let Some(hit) = hit {
                self.aim.hold_distance = hit.distance;
            }
        }
        if g.cycle_kind != 0 {
            self.placement.kind = EntityKind::cycle(self.placement.kind, g.cycle_kind);
            tracing::debug!(actor = %self.actor, kind = ?self.placement.kind, "placement kind");
        }
        if self.placement.kind.is_some() {
            self.adjust_hold_distance(g.hold_distance_delta, ctx.config);
        }

        if g.place.released {
            self.place_batch(ctx);
        }
        if g.place.held {
            self.placement.end = self.aim.current;
        } else {
            self.placement.start = self.aim.current;
            self.placement.end = self.aim.current;
        }

        self.history_gestures(ctx, g, true);
    }

    fn refresh_hover(&mut self, ctx: &FrameContext<'_>) {
        let hit = ctx.raycaster.raycast_vs_entities(
            ctx.level,
            self.pose.aim_origin,
            self.pose.aim_direction,
            ctx.config.raycast_distance,
            None,
        );
        match hit {
            Some(hit) => {
                if self.hovered != Some(hit.entity) {
                    tracing::trace!(actor = %self.actor, entity = %hit.entity, "hover");
                }
                self.hovered = Some(hit.entity);
                self.aim.hold_distance = hit.distance;
            }
            None => {
                self.hovered = None;
                self.aim.hold_distance = 0.0;
            }
        }
    }

    fn on_grab(
        &mut self,
        ctx: &mut FrameContext<'_>,
        peer: Option<PeerView>,
        effects: &mut Vec<SessionEffect>,
    ) {
        if let Some(peer) = peer {
            if peer.mode == ActionMode::Translating
                && self.hovered.is_some()
                && self.hovered == peer.selected
            {
                let Some(uid) = peer.selected else {
                    return;
                };
                let Some(prior) = ctx.level.resolve(uid).map(|e| e.transform) else {
                    return;
                };
                self.selected = Some(uid);
                self.mode = ActionMode::Scaling;
                self.drives_scale = true;
                self.commit(
                    ctx.level,
                    ActionRecord::Transform {
                        kind: TransformKind::Scale,
                        entity: uid,
                        prior,
                    },
                );
                effects.push(SessionEffect::BeginJointScale { peer: peer.actor });
                tracing::debug!(actor = %self.actor, %uid, "two-handed scale");
                return;
            }
        }

        if !self.mode.is_at_rest() {
            return;
        }
        let Some(uid) = self.hovered else {
            return;
        };
        let Some(prior) = ctx.level.resolve(uid).map(|e| e.transform) else {
            return;
        };
        self.selected = Some(uid);
        self.mode = ActionMode::Translating;
        self.anchor_aim(ctx.config);
        self.commit(
            ctx.level,
            ActionRecord::Transform {
                kind: TransformKind::Translate,
                entity: uid,
                prior,
            },
        );
        tracing::debug!(actor = %self.actor, %uid, "translate");
    }

    fn on_secondary(&mut self, ctx: &mut FrameContext<'_>) {
        if self.mode == ActionMode::Translating {
            let Some(uid) = self.selected else {
                return;
            };
            let Some(prior) = ctx.level.resolve(uid).map(|e| e.transform) else {
                return;
            };
            self.mode = ActionMode::Rotating;
            self.commit(
                ctx.level,
                ActionRecord::Transform {
                    kind: TransformKind::Rotate,
                    entity: uid,
                    prior,
                },
            );
            tracing::debug!(actor = %self.actor, %uid, "rotate");
        } else if self.mode.is_at_rest() {
            self.clone_hovered(ctx);
        }
    }

    fn clone_hovered(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(source) = self.hovered.and_then(|uid| ctx.level.resolve(uid)) else {
            return;
        };
        if source.kind == EntityKind::PlayerStart {
            return;
        }
        let (kind, transform) = (source.kind, source.transform);
        let uid = match ctx.level.spawn(kind, transform) {
            Ok(uid) => uid,
            Err(err) => {
                tracing::warn!(actor = %self.actor, %err, "clone failed");
                return;
            }
        };
        self.selected = Some(uid);
        self.mode = ActionMode::Cloning;
        self.anchor_aim(ctx.config);
        self.commit(ctx.level, ActionRecord::Clone { entity: uid });
        tracing::debug!(actor = %self.actor, %uid, ?kind, "clone");
    }

    fn on_grab_released(&mut self, effects: &mut Vec<SessionEffect>) {
        match self.mode {
            ActionMode::Translating | ActionMode::Rotating => self.end_drag(),
            ActionMode::Scaling => {
                self.end_drag();
                if let Some(peer) = self.actor.peer() {
                    effects.push(SessionEffect::EndJointScale { peer });
                }
            }
            _ => {}
        }
    }

    fn on_secondary_released(&mut self) {
        match self.mode {
            ActionMode::Cloning => self.end_drag(),
            ActionMode::Rotating => self.mode = ActionMode::Translating,
            _ => {}
        }
    }

    fn on_select(&mut self, effects: &mut Vec<SessionEffect>) {
        match self.mode {
            ActionMode::Selected => {
                self.mode = ActionMode::Idle;
                self.selected = None;
            }
            ActionMode::Linking => {
                if let Some(picked) = self.hovered {
                    effects.push(SessionEffect::LinkPick { picked });
                }
            }
            ActionMode::Idle => {
                if let Some(uid) = self.hovered {
                    self.selected = Some(uid);
                    self.mode = ActionMode::Selected;
                }
            }
            _ => {}
        }
    }

    fn drag(&mut self, ctx: &mut FrameContext<'_>, hold_distance_delta: f32) {
        self.adjust_hold_distance(hold_distance_delta, ctx.config);
        let Some(uid) = self.selected else {
            return;
        };
        let Some(entity) = ctx.level.resolve_mut(uid) else {
            tracing::trace!(actor = %self.actor, %uid, "dragged entity is gone");
            return;
        };
        let delta = self.axis_lock.mask(self.aim.current - self.aim.previous);
        entity.transform.position += delta;
        snap_to_grid(
            &mut entity.transform.position,
            &mut self.aim.current,
            ctx.config.snap_threshold,
        );
    }

    fn twist(&mut self, level: &mut Level) {
        let Some(uid) = self.selected else {
            return;
        };
        let Some(entity) = level.resolve_mut(uid) else {
            return;
        };
        entity.transform.orientation.yaw_degrees +=
            self.pose.yaw_degrees - self.last_pose.yaw_degrees;
    }

    fn stretch(&mut self, ctx: &mut FrameContext<'_>, peer: Option<PeerView>) {
        let Some(peer) = peer else {
            return;
        };
        let Some(uid) = self.selected else {
            return;
        };
        let Some(entity) = ctx.level.resolve_mut(uid) else {
            return;
        };
        let now = self.pose.position.distance(peer.position);
        let before = self.last_pose.position.distance(peer.last_position);
        let scale = entity.transform.scale + (now - before);
        entity.transform.scale = scale.max(ctx.config.min_scale);
    }

    fn drop_to_ground(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(uid) = self.selected else {
            return;
        };
        let Some(transform) = ctx.level.resolve(uid).map(|e| e.transform) else {
            return;
        };
        let half = BoundsRaycaster::half_extent(transform.scale);
        let rotation = transform.orientation.to_quat();
        let ground = FOOTPRINT
            .iter()
            .filter_map(|(x, y)| {
                let origin = transform.position + rotation * Vec3::new(x * half, y * half, 0.0);
                ctx.raycaster.raycast_vs_entities(
                    ctx.level,
                    origin,
                    Vec3::NEG_Z,
                    GROUND_PROBE_DISTANCE,
                    Some(uid),
                )
            })
            .map(|hit| hit.position.z)
            .reduce(f32::max);
        if let Some(entity) = ctx.level.resolve_mut(uid) {
            let z = ground.unwrap_or(0.0) + half;
            entity.transform.position.z = z;
            tracing::debug!(actor = %self.actor, %uid, z, "dropped to ground");
        }
        self.end_drag();
    }

    fn nudge(&mut self, ctx: &mut FrameContext<'_>, rotate_steps: i32, scale_steps: i32) {
        if rotate_steps == 0 && scale_steps == 0 {
            return;
        }
        let Some(uid) = self.edit_target(ctx.level) else {
            return;
        };
        let Some(prior) = ctx.level.resolve(uid).map(|e| e.transform) else {
            return;
        };
        if rotate_steps != 0 {
            self.commit(
                ctx.level,
                ActionRecord::Transform {
                    kind: TransformKind::Rotate,
                    entity: uid,
                    prior,
                },
            );
            if let Some(entity) = ctx.level.resolve_mut(uid) {
                entity.transform.orientation.yaw_degrees +=
                    rotate_steps as f32 * ctx.config.nudge_yaw_degrees;
            }
        }
        if scale_steps != 0 {
            let prior = ctx.level.resolve(uid).map_or(prior, |e| e.transform);
            self.commit(
                ctx.level,
                ActionRecord::Transform {
                    kind: TransformKind::Scale,
                    entity: uid,
                    prior,
                },
            );
            if let Some(entity) = ctx.level.resolve_mut(uid) {
                let scale =
                    entity.transform.scale + scale_steps as f32 * ctx.config.nudge_scale_step;
                entity.transform.scale = scale.max(ctx.config.min_scale);
            }
        }
    }

    fn place_batch(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(kind) = self.placement.kind else {
            return;
        };
        let lo = self.placement.start.min(self.placement.end).as_ivec3();
        let hi = self.placement.start.max(self.placement.end).as_ivec3();
        let cells: i64 = (0..3)
            .map(|axis| i64::from(hi[axis] - lo[axis] + 1))
            .product();
        let limit = ctx.config.max_batch_cells;
        if cells > limit as i64 {
            tracing::warn!(actor = %self.actor, cells, limit, "placement too large");
            return;
        }

        let mut entities = Vec::with_capacity(cells as usize);
        let mut priors = Vec::with_capacity(cells as usize);
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    let transform = Transform::at(Vec3::new(x as f32, y as f32, z as f32));
                    match ctx.level.spawn(kind, transform) {
                        Ok(uid) => {
                            entities.push(uid);
                            priors.push(transform);
                        }
                        Err(err) => {
                            tracing::warn!(actor = %self.actor, %err, "placement stopped early");
                        }
                    }
                }
            }
        }
        if entities.is_empty() {
            return;
        }
        tracing::debug!(actor = %self.actor, ?kind, count = entities.len(), "placed batch");
        self.commit(ctx.level, ActionRecord::Create { entities, priors });
        self.placement.kind = None;
    }

    fn history_gestures(&mut self, ctx: &mut FrameContext<'_>, g: &Gestures, tap_allowed: bool) {
        if g.undo {
            self.history.undo(ctx.level);
        }
        if g.redo {
            self.history.redo(ctx.level);
        }
        if g.history_tap && tap_allowed {
            if self.history_taps.tap(ctx.now) == Some(TapResolution::Double) {
                self.history.redo(ctx.level);
            }
        }
        if self.history_taps.poll(ctx.now) == Some(TapResolution::Single) {
            self.history.undo(ctx.level);
        }
    }

    fn adjust_hold_distance(&mut self, delta: f32, config: &EditorConfig) {
        if delta == 0.0 {
            return;
        }
        let (min, max) = (config.hold_distance_min, config.hold_distance_max);
        self.aim.hold_distance = (self.reach(config) + delta).clamp(min, max);
    }

    /// Hold distance, with zero meaning the full raycast distance.
    fn reach(&self, config: &EditorConfig) -> f32 {
        if self.aim.hold_distance > 0.0 {
            self.aim.hold_distance
        } else {
            config.raycast_distance
        }
    }

    fn aim_at_hold_distance(&self, config: &EditorConfig) -> Vec3 {
        self.pose.aim_origin + self.pose.aim_direction.normalize_or_zero() * self.reach(config)
    }

    /// The selection if it still resolves, otherwise the hovered entity.
    fn edit_target(&self, level: &Level) -> Option<EntityUid> {
        self.selected
            .filter(|uid| level.contains(*uid))
            .or(self.hovered)
    }

    /// Restart aim tracking at the current hold distance so a new drag starts
    /// without a jump.
    fn anchor_aim(&mut self, config: &EditorConfig) {
        self.aim.current = self.aim_at_hold_distance(config);
        self.aim.previous = self.aim.current;
    }

    fn end_drag(&mut self) {
        self.mode = ActionMode::Idle;
        self.selected = None;
        self.drives_scale = false;
    }
}

/// Snap each axis of `position` to the nearest integer when it is closer than
/// `threshold`, moving `aim` by the same correction.
pub fn snap_to_grid(position: &mut Vec3, aim: &mut Vec3, threshold: f32) {
    for axis in 0..3 {
        let rounded = position[axis].round();
        let correction = rounded - position[axis];
        if correction.abs() < threshold {
            position[axis] = rounded;
            aim[axis] += correction;
        }
    }
}
