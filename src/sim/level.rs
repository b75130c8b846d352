//! Level state machine
//!
//! Owns the authored level sequence and the bodies/entities spawned for the
//! current level. The player, goal and camera outlive every level; the machine
//! only ever touches them through handles.

use glam::Vec3;

use super::ending::EndingSequence;
use super::state::{CameraState, PlayerState, SessionState, Stage};
use crate::levels::{LevelSet, ObstacleDesc};
use crate::physics::{BodyDesc, BodyHandle, BodyKind, PhysicsWorld, ProbeHandle};
use crate::render::{EntityId, Projection, Renderable, RenderableKind, Renderer, Shading};

/// Hands out render entity ids for the session
#[derive(Debug, Clone, Default)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn allocate(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }
}

/// Session-lifetime handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actors {
    pub player_body: BodyHandle,
    pub player_entity: EntityId,
    pub probe: ProbeHandle,
    pub goal_body: BodyHandle,
    pub goal_entity: EntityId,
    pub floor_body: BodyHandle,
    pub floor_entity: EntityId,
    pub indicator_entity: EntityId,
}

/// One obstacle spawned for the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeObject {
    pub body: BodyHandle,
    pub entity: EntityId,
}

/// Everything spawned for the current level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelRuntime {
    pub obstacles: Vec<RuntimeObject>,
    pub overlays: Vec<EntityId>,
}

/// Mutable pieces of the session a transition rewrites
pub struct TransitionCtx<'a> {
    pub actors: &'a Actors,
    pub player: &'a mut PlayerState,
    pub camera: &'a mut CameraState,
    pub state: &'a mut SessionState,
    pub ids: &'a mut EntityIds,
}

/// The level sequence and its live objects
#[derive(Debug, Clone)]
pub struct LevelMachine {
    levels: LevelSet,
    runtime: LevelRuntime,
    ending: Option<EndingSequence>,
}

impl LevelMachine {
    pub fn new(levels: LevelSet) -> Self {
        Self {
            levels,
            runtime: LevelRuntime::default(),
            ending: None,
        }
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn runtime(&self) -> &LevelRuntime {
        &self.runtime
    }

    /// Present only in the terminal stage
    pub fn ending(&self) -> Option<&EndingSequence> {
        self.ending.as_ref()
    }

    /// Number of obstacles authored for a stage
    pub fn authored_obstacles(&self, stage: Stage) -> usize {
        match stage {
            Stage::Level(n) => self.levels.level(n).map_or(0, |l| l.obstacles.len()),
            Stage::Terminal => self.levels.finale.obstacles.len(),
        }
    }

    /// Clear the current stage and move to the next one
    pub fn advance<P, R>(&mut self, world: &mut P, renderer: &mut R, ctx: TransitionCtx<'_>)
    where
        P: PhysicsWorld,
        R: Renderer,
    {
        let from = ctx.state.stage;
        let to = from.next(self.levels.count());

        let stats = &mut ctx.state.stats;
        stats.level_times.push(stats.stage_elapsed);
        log::info!(
            "{:?} cleared in {:.1}s, entering {:?}",
            from,
            stats.stage_elapsed,
            to
        );

        self.transition(to, world, renderer, ctx);
    }

    /// Tear down the current level and spawn `to`. Completes before returning.
    pub fn transition<P, R>(&mut self, to: Stage, world: &mut P, renderer: &mut R, ctx: TransitionCtx<'_>)
    where
        P: PhysicsWorld,
        R: Renderer,
    {
        let TransitionCtx {
            actors,
            player,
            camera,
            state,
            ids,
        } = ctx;

        // Ordinals past the authored range are the way into the final level
        let to = match to {
            Stage::Level(n) => Stage::from_ordinal(n, self.levels.count()),
            Stage::Terminal => Stage::Terminal,
        };

        self.teardown(world, renderer);

        camera.set_yaw(0.0);
        renderer.set_camera(camera);
        renderer.set_indicator_rotation(0.0);
        state.is_depth_locked = true;
        state.stage = to;
        state.stats.stage_elapsed = 0.0;

        match to {
            Stage::Level(n) => {
                self.ending = None;
                let level = self.levels.level(n).cloned().unwrap_or_default();
                self.place_actors(
                    world,
                    renderer,
                    actors,
                    player,
                    level.player_spawn,
                    level.goal_spawn,
                );
                self.spawn_obstacles(world, renderer, ids, &level.obstacles);
                if let Some(text) = level.text {
                    self.spawn_overlay(renderer, ids, text);
                }
            }
            Stage::Terminal => {
                let finale = self.levels.finale.clone();

                self.place_actors(
                    world,
                    renderer,
                    actors,
                    player,
                    finale.player_spawn,
                    finale.goal_spawn,
                );
                self.spawn_obstacles(world, renderer, ids, &finale.obstacles);
                if let Some(text) = finale.text.clone() {
                    self.spawn_overlay(renderer, ids, text);
                }

                renderer.set_shading(actors.player_entity, Shading::Lit);
                renderer.set_shading(actors.goal_entity, Shading::Lit);
                renderer.set_shading(actors.floor_entity, Shading::Lit);
                renderer.set_projection(Projection::ENDING_VIEW);

                let ending = EndingSequence::new(&finale);
                ending.place_camera(camera, player.position.x);
                renderer.set_camera(camera);
                self.ending = Some(ending);
            }
        }

        log::info!(
            "Entered {:?}: {} obstacles, {} overlays",
            to,
            self.runtime.obstacles.len(),
            self.runtime.overlays.len()
        );
    }

    /// Remove every runtime object of the current level from both collaborators
    fn teardown<P, R>(&mut self, world: &mut P, renderer: &mut R)
    where
        P: PhysicsWorld,
        R: Renderer,
    {
        for object in self.runtime.obstacles.drain(..) {
            renderer.remove_renderable(object.entity);
            world.remove_body(object.body);
        }
        for overlay in self.runtime.overlays.drain(..) {
            renderer.remove_renderable(overlay);
        }
    }

    fn place_actors<P, R>(
        &self,
        world: &mut P,
        renderer: &mut R,
        actors: &Actors,
        player: &mut PlayerState,
        player_spawn: Vec3,
        goal_spawn: Vec3,
    ) where
        P: PhysicsWorld,
        R: Renderer,
    {
        world.set_translation(actors.player_body, player_spawn);
        world.set_linear_velocity(actors.player_body, Vec3::ZERO);
        player.position = player_spawn;
        player.velocity = Vec3::ZERO;
        renderer.set_translation(actors.player_entity, player_spawn);

        world.set_translation(actors.goal_body, goal_spawn);
        renderer.set_translation(actors.goal_entity, goal_spawn);
    }

    fn spawn_obstacles<P, R>(
        &mut self,
        world: &mut P,
        renderer: &mut R,
        ids: &mut EntityIds,
        obstacles: &[ObstacleDesc],
    ) where
        P: PhysicsWorld,
        R: Renderer,
    {
        for obstacle in obstacles {
            let body = world.add_body(&BodyDesc {
                shape: obstacle.shape,
                kind: BodyKind::Fixed,
                translation: obstacle.translation,
                yaw_degrees: obstacle.yaw_degrees,
            });
            let entity = ids.allocate();
            renderer.add_renderable(&Renderable {
                id: entity,
                kind: RenderableKind::Obstacle(obstacle.shape),
                translation: obstacle.translation,
                yaw_degrees: obstacle.yaw_degrees,
            });
            self.runtime.obstacles.push(RuntimeObject { body, entity });
        }
    }

    fn spawn_overlay<R: Renderer>(&mut self, renderer: &mut R, ids: &mut EntityIds, text: String) {
        let entity = ids.allocate();
        renderer.add_renderable(&Renderable {
            id: entity,
            kind: RenderableKind::OverlayText(text),
            translation: Vec3::ZERO,
            yaw_degrees: 0.0,
        });
        self.runtime.overlays.push(entity);
    }
}
