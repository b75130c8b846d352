//! Fixed timestep simulation tick
//!
//! One call advances the session by one step, in a fixed order:
//! motion, jump, physics, clamp, camera, goal check, ending.

use std::time::Duration;

use glam::Vec3;

use super::boundary;
use super::camera;
use super::ending::{self, EndingFrame};
use super::jump;
use super::level::{Actors, EntityIds, LevelMachine, TransitionCtx};
use super::motion::{self, MoveIntents};
use super::state::{CameraState, MotionMode, PlayerState, SessionState, Stage};
use crate::consts::{
    ARENA_RADIUS, FLOOR_CENTER_Y, FLOOR_HALF_HEIGHT, GOAL_HALF_EXTENT, PLAYER_HALF_HEIGHT,
    PLAYER_MASS, PLAYER_RADIUS,
};
use crate::levels::LevelSet;
use crate::physics::{BodyDesc, BodyKind, PhysicsWorld, Shape};
use crate::render::{
    DECAY_PARAMETER, Projection, Renderable, RenderableKind, Renderer, Shading,
};
use crate::{Tuning, from_ground_xz};

/// Named player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Jump,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Skip to next level (debug/testing)
    pub skip_level: bool,
}

impl TickInput {
    pub fn is_active(&self, intent: Intent) -> bool {
        match intent {
            Intent::Forward => self.forward,
            Intent::Back => self.back,
            Intent::StrafeLeft => self.strafe_left,
            Intent::StrafeRight => self.strafe_right,
            Intent::Jump => self.jump,
        }
    }

    pub fn move_intents(&self) -> MoveIntents {
        MoveIntents {
            forward: self.forward,
            back: self.back,
            strafe_left: self.strafe_left,
            strafe_right: self.strafe_right,
        }
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped,
    /// A level transition finished; the session is now in this stage
    StageEntered(Stage),
    /// The final goal was reached and the run stopped
    EndingReached,
    Paused,
    Resumed,
}

/// A single play session
#[derive(Debug, Clone)]
pub struct Session {
    pub tuning: Tuning,
    pub state: SessionState,
    pub player: PlayerState,
    pub camera: CameraState,
    pub actors: Actors,
    pub levels: LevelMachine,
    ids: EntityIds,
}

impl Session {
    /// Build the session-lifetime objects and enter the first level
    pub fn new<P, R>(world: &mut P, renderer: &mut R, tuning: Tuning, levels: LevelSet) -> Self
    where
        P: PhysicsWorld,
        R: Renderer,
    {
        let mut ids = EntityIds::default();

        let floor_translation = Vec3::new(0.0, FLOOR_CENTER_Y, 0.0);
        let floor_body = world.add_body(&BodyDesc::fixed(
            Shape::Cylinder {
                half_height: FLOOR_HALF_HEIGHT,
                radius: ARENA_RADIUS,
            },
            floor_translation,
        ));
        let floor_entity = ids.allocate();
        renderer.add_renderable(&Renderable {
            id: floor_entity,
            kind: RenderableKind::Floor,
            translation: floor_translation,
            yaw_degrees: 0.0,
        });

        let player_body = world.add_body(&BodyDesc {
            shape: Shape::Cylinder {
                half_height: PLAYER_HALF_HEIGHT,
                radius: PLAYER_RADIUS,
            },
            kind: BodyKind::Dynamic {
                mass: PLAYER_MASS,
                lock_rotations: true,
            },
            translation: Vec3::ZERO,
            yaw_degrees: 0.0,
        });
        let player_entity = ids.allocate();
        renderer.add_renderable(&Renderable {
            id: player_entity,
            kind: RenderableKind::Player,
            translation: Vec3::ZERO,
            yaw_degrees: 0.0,
        });

        let probe = world.add_sensor_probe(Shape::Cuboid {
            half_extents: tuning.probe_half_extents,
        });

        let goal_body = world.add_body(&BodyDesc {
            kind: BodyKind::Trigger,
            ..BodyDesc::fixed(
                Shape::Cuboid {
                    half_extents: Vec3::splat(GOAL_HALF_EXTENT),
                },
                Vec3::ZERO,
            )
        });
        let goal_entity = ids.allocate();
        renderer.add_renderable(&Renderable {
            id: goal_entity,
            kind: RenderableKind::Goal,
            translation: Vec3::ZERO,
            yaw_degrees: 0.0,
        });

        let indicator_entity = ids.allocate();
        renderer.add_renderable(&Renderable {
            id: indicator_entity,
            kind: RenderableKind::OrientationIndicator,
            translation: Vec3::ZERO,
            yaw_degrees: 0.0,
        });

        for entity in [floor_entity, player_entity, goal_entity] {
            renderer.set_shading(entity, Shading::Flat);
        }
        renderer.set_projection(Projection::DISC_VIEW);

        let actors = Actors {
            player_body,
            player_entity,
            probe,
            goal_body,
            goal_entity,
            floor_body,
            floor_entity,
            indicator_entity,
        };

        let first = Stage::from_ordinal(1, levels.count());
        let mut session = Self {
            player: PlayerState::new(Vec3::ZERO, tuning.jump_cooldown()),
            camera: CameraState::neutral(),
            state: SessionState::new(first, tuning.decay_start),
            actors,
            levels: LevelMachine::new(levels),
            tuning,
            ids,
        };

        let Session {
            state,
            player,
            camera,
            actors,
            levels,
            ids,
            ..
        } = &mut session;
        levels.transition(first, world, renderer, TransitionCtx {
            actors,
            player,
            camera,
            state,
            ids,
        });

        log::info!(
            "Session started: {} levels plus the finale",
            session.levels.levels().count()
        );
        session
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn motion_mode(&self) -> MotionMode {
        self.state.stage.motion_mode()
    }

    /// The radial camera only runs on the disc levels
    pub fn camera_controller_active(&self) -> bool {
        !self.state.stage.is_terminal()
    }
}

/// Advance the session by one fixed timestep
pub fn tick<P, R>(
    session: &mut Session,
    world: &mut P,
    renderer: &mut R,
    input: &TickInput,
    dt: f32,
) -> Vec<GameEvent>
where
    P: PhysicsWorld,
    R: Renderer,
{
    let mut events = Vec::new();
    let Session {
        tuning,
        state,
        player,
        camera,
        actors,
        levels,
        ids,
    } = session;

    // Handle pause toggle
    if input.pause {
        state.paused = !state.paused;
        if state.paused {
            log::info!("Paused");
            events.push(GameEvent::Paused);
        } else {
            log::info!("Resumed");
            events.push(GameEvent::Resumed);
        }
    }
    if state.paused {
        return events;
    }

    state.stats.ticks += 1;
    state.stats.stage_elapsed += dt;

    // Once the ending stops, gameplay input is no longer read
    let input = if state.is_running {
        input.clone()
    } else {
        TickInput::default()
    };

    // Debug: skip to next level
    if input.skip_level && !state.stage.is_terminal() {
        levels.advance(world, renderer, TransitionCtx {
            actors: &*actors,
            player: &mut *player,
            camera: &mut *camera,
            state: &mut *state,
            ids: &mut *ids,
        });
        events.push(GameEvent::StageEntered(state.stage));
        return events;
    }

    if state.is_depth_locked && !input.forward && !input.back {
        state.is_depth_locked = false;
    }
    let intents = if state.is_depth_locked {
        input.move_intents().without_depth()
    } else {
        input.move_intents()
    };

    // --- MOTION ---
    player.position = world.translation(actors.player_body);
    player.velocity = world.linear_velocity(actors.player_body);
    let stage = state.stage;
    let planar = motion::resolve(
        stage.motion_mode(),
        player.ground_position(),
        camera.ground_forward(),
        intents,
        dt,
        tuning,
    );

    // --- GROUND / JUMP ---
    world.set_probe_translation(actors.probe, player.position - Vec3::Y * tuning.probe_offset);
    let probe_contact = world.probe_has_contact(actors.probe);
    let current_vy = player.velocity.y;
    let outcome = jump::arbitrate(
        player,
        probe_contact,
        input.jump,
        current_vy,
        Duration::try_from_secs_f32(dt).unwrap_or(Duration::ZERO),
        tuning,
    );
    if outcome.jumped {
        state.stats.jumps += 1;
        events.push(GameEvent::Jumped);
    }

    // --- PHYSICS ---
    world.set_linear_velocity(
        actors.player_body,
        from_ground_xz(planar, outcome.vertical_velocity),
    );
    world.step(dt);

    // --- CLAMP ---
    player.position = world.translation(actors.player_body);
    player.velocity = world.linear_velocity(actors.player_body);
    let clamped = boundary::apply(player, tuning);
    if clamped.changed() {
        world.set_translation(actors.player_body, player.position);
        world.set_linear_velocity(actors.player_body, player.velocity);
        log::trace!("clamped player to {}", player.position);
    }
    renderer.set_translation(actors.player_entity, player.position);

    // --- CAMERA ---
    match stage {
        Stage::Level(_) => {
            if let Some(angle) = camera::follow(camera, player.ground_position(), tuning.reference_axis) {
                renderer.set_camera(camera);
                renderer.set_indicator_rotation(angle);
            }
        }
        Stage::Terminal => {}
    }

    // --- GOAL ---
    if world.bodies_in_contact(actors.player_body, actors.goal_body) {
        match stage {
            Stage::Level(_) => {
                levels.advance(world, renderer, TransitionCtx {
                    actors: &*actors,
                    player: &mut *player,
                    camera: &mut *camera,
                    state: &mut *state,
                    ids: &mut *ids,
                });
                events.push(GameEvent::StageEntered(state.stage));
                return events;
            }
            Stage::Terminal => {
                if state.is_running {
                    ending::finish(state, tuning);
                    events.push(GameEvent::EndingReached);
                }
            }
        }
    }

    // --- ENDING ---
    if let (Stage::Terminal, Some(sequence)) = (stage, levels.ending()) {
        match sequence.tick(state, camera, player.position.x, dt, tuning) {
            EndingFrame::Scripted { .. } => renderer.set_camera(camera),
            EndingFrame::Decaying { decay } => renderer.set_shader_parameter(DECAY_PARAMETER, decay),
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::levels::{LevelDef, ObstacleDesc, final_level};
    use crate::physics::mock::MockWorld;
    use crate::render::testing::RecordingRenderer;
    use glam::Vec2;

    fn three_levels() -> LevelSet {
        let block = |x: f32| ObstacleDesc::block(x, 0.0, Vec3::splat(0.3), 0.0);
        let level = |obstacles: Vec<ObstacleDesc>, text: Option<&str>| LevelDef {
            obstacles,
            player_spawn: Vec3::new(-3.0, -4.0, 0.0),
            goal_spawn: Vec3::new(3.0, -4.1, 0.0),
            text: text.map(str::to_string),
        };
        LevelSet {
            levels: vec![
                level(vec![block(0.0), block(1.0)], Some("one")),
                level(vec![block(-1.0), block(0.5), block(1.5)], None),
                level(vec![block(2.0)], Some("three")),
            ],
            finale: final_level(),
        }
    }

    fn start() -> (Session, MockWorld, RecordingRenderer) {
        let mut world = MockWorld::new();
        let mut renderer = RecordingRenderer::new();
        let session = Session::new(&mut world, &mut renderer, Tuning::default(), three_levels());
        (session, world, renderer)
    }

    /// Teleport the player onto the goal and report the contact
    fn reach_goal(session: &mut Session, world: &mut MockWorld, renderer: &mut RecordingRenderer) -> Vec<GameEvent> {
        world.touch(session.actors.player_body, session.actors.goal_body);
        let events = tick(session, world, renderer, &TickInput::default(), SIM_DT);
        world.untouch_all();
        events
    }

    /// Bodies that live for the whole session: floor, player, goal
    const PERSISTENT_BODIES: usize = 3;

    #[test]
    fn test_session_starts_in_level_one() {
        let (session, world, renderer) = start();
        assert_eq!(session.stage(), Stage::Level(1));
        assert_eq!(session.levels.runtime().obstacles.len(), 2);
        assert_eq!(session.levels.runtime().overlays.len(), 1);
        assert_eq!(world.body_count(), PERSISTENT_BODIES + 2);
        assert_eq!(world.probes.len(), 1);
        assert_eq!(session.player.position, Vec3::new(-3.0, -4.0, 0.0));
        assert!(session.state.is_depth_locked);
        assert_eq!(renderer.projection, Some(Projection::DISC_VIEW));
    }

    #[test]
    fn test_transition_replaces_every_runtime_object() {
        let (mut session, mut world, mut renderer) = start();
        let old: Vec<_> = session.levels.runtime().obstacles.clone();
        let old_overlay = session.levels.runtime().overlays[0];

        let events = reach_goal(&mut session, &mut world, &mut renderer);
        assert_eq!(events, vec![GameEvent::StageEntered(Stage::Level(2))]);

        let runtime = session.levels.runtime();
        assert_eq!(runtime.obstacles.len(), session.levels.authored_obstacles(Stage::Level(2)));
        assert_eq!(runtime.obstacles.len(), 3);
        assert!(runtime.overlays.is_empty());
        assert_eq!(world.body_count(), PERSISTENT_BODIES + 3);

        for object in &old {
            assert!(!world.contains_body(object.body));
            assert!(!renderer.live.contains_key(&object.entity));
        }
        assert!(!renderer.live.contains_key(&old_overlay));
        assert!(world.contains_body(session.actors.goal_body));

        // Exactly the old level's objects went away, nothing session-wide
        let old_bodies: Vec<_> = old.iter().map(|o| o.body).collect();
        let mut old_entities: Vec<_> = old.iter().map(|o| o.entity).collect();
        old_entities.push(old_overlay);
        assert_eq!(world.removed, old_bodies);
        assert_eq!(renderer.removed, old_entities);
        assert_eq!(
            renderer.count(|k| matches!(k, RenderableKind::Obstacle(_))),
            3
        );
    }

    #[test]
    fn test_transition_resets_camera_and_locks_depth() {
        let (mut session, mut world, mut renderer) = start();
        session.camera.set_yaw(123.0);

        reach_goal(&mut session, &mut world, &mut renderer);
        assert_eq!(session.camera.yaw, 0.0);
        assert!(session.state.is_depth_locked);
        assert_eq!(renderer.indicator_degrees, Some(0.0));
    }

    #[test]
    fn test_depth_lock_holds_until_release() {
        let (mut session, mut world, mut renderer) = start();
        reach_goal(&mut session, &mut world, &mut renderer);
        let spawn = session.player.position;

        let held = TickInput {
            forward: true,
            ..Default::default()
        };
        tick(&mut session, &mut world, &mut renderer, &held, SIM_DT);
        assert!(session.state.is_depth_locked);
        assert_eq!(world.linear_velocity(session.actors.player_body).x, 0.0);
        assert_eq!(world.linear_velocity(session.actors.player_body).z, 0.0);
        assert_eq!(session.player.position, spawn);

        tick(&mut session, &mut world, &mut renderer, &TickInput::default(), SIM_DT);
        assert!(!session.state.is_depth_locked);

        tick(&mut session, &mut world, &mut renderer, &held, SIM_DT);
        assert!(world.linear_velocity(session.actors.player_body).length() > 0.0);
    }

    #[test]
    fn test_strafe_moves_player_and_camera_follows() {
        let (mut session, mut world, mut renderer) = start();
        let input = TickInput {
            strafe_right: true,
            ..Default::default()
        };
        tick(&mut session, &mut world, &mut renderer, &input, SIM_DT);

        let expected_x = -3.0 + Tuning::default().strafe_speed * SIM_DT;
        assert!((session.player.position.x - expected_x).abs() < 1e-5);
        // Player stays on the x axis, so the camera's right stays on it too
        assert!(session.camera.ground_right().dot(Vec2::X).abs() > 0.9999);
        assert!(renderer.indicator_degrees.is_some());
    }

    #[test]
    fn test_jump_uses_probe_and_cooldown() {
        let (mut session, mut world, mut renderer) = start();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        // Airborne: nothing
        world.probe_contact = false;
        let events = tick(&mut session, &mut world, &mut renderer, &jump, SIM_DT);
        assert!(!events.contains(&GameEvent::Jumped));

        world.probe_contact = true;
        let events = tick(&mut session, &mut world, &mut renderer, &jump, SIM_DT);
        assert!(events.contains(&GameEvent::Jumped));
        assert_eq!(
            world.linear_velocity(session.actors.player_body).y,
            Tuning::default().jump_strength
        );

        // Still inside the cooldown on the very next tick
        let events = tick(&mut session, &mut world, &mut renderer, &jump, SIM_DT);
        assert!(!events.contains(&GameEvent::Jumped));
        assert_eq!(session.state.stats.jumps, 1);
    }

    #[test]
    fn test_probe_follows_player() {
        let (mut session, mut world, mut renderer) = start();
        tick(&mut session, &mut world, &mut renderer, &TickInput::default(), SIM_DT);
        let probe = world.probe_translation(session.actors.probe).unwrap();
        let offset = Tuning::default().probe_offset;
        assert!((probe - (Vec3::new(-3.0, -4.0, 0.0) - Vec3::Y * offset)).length() < 1e-5);
    }

    #[test]
    fn test_player_is_kept_on_the_disc() {
        let (mut session, mut world, mut renderer) = start();
        world.set_translation(session.actors.player_body, Vec3::new(-20.0, -9.0, 0.0));
        tick(&mut session, &mut world, &mut renderer, &TickInput::default(), SIM_DT);

        let tuning = Tuning::default();
        assert!((session.player.ground_position().length() - tuning.max_dist_to_center).abs() < 1e-4);
        assert_eq!(session.player.position.y, -tuning.max_y);
        assert!(session.player.on_ground);
        assert_eq!(world.translation(session.actors.player_body), session.player.position);
    }

    #[test]
    fn test_past_last_level_enters_terminal() {
        let (mut session, mut world, mut renderer) = start();
        for _ in 0..3 {
            reach_goal(&mut session, &mut world, &mut renderer);
        }
        assert_eq!(session.stage(), Stage::Terminal);
        assert!(session.state.is_final_level());
        assert_eq!(session.motion_mode(), MotionMode::Free);
        assert!(!session.camera_controller_active());
        assert!(session.levels.ending().is_some());
        assert_eq!(renderer.projection, Some(Projection::ENDING_VIEW));
        assert_eq!(renderer.shading.get(&session.actors.player_entity), Some(&Shading::Lit));
        assert_eq!(renderer.shading.get(&session.actors.goal_entity), Some(&Shading::Lit));
        assert_eq!(
            session.levels.runtime().obstacles.len(),
            final_level().obstacles.len()
        );
        assert_eq!(session.state.stats.level_times.len(), 3);
    }

    #[test]
    fn test_terminal_camera_tracks_player_x_not_yaw_controller() {
        let (mut session, mut world, mut renderer) = start();
        for _ in 0..3 {
            reach_goal(&mut session, &mut world, &mut renderer);
        }
        let input = TickInput {
            strafe_right: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut session, &mut world, &mut renderer, &input, SIM_DT);
            assert_eq!(session.motion_mode(), MotionMode::Free);
        }

        let ending = session.levels.ending().unwrap();
        let mut expected = CameraState::neutral();
        ending.place_camera(&mut expected, session.player.position.x);
        assert_eq!(session.camera, expected);
        assert!(session.player.position.x > final_level().player_spawn.x);
    }

    #[test]
    fn test_final_goal_stops_input_and_decays() {
        let (mut session, mut world, mut renderer) = start();
        for _ in 0..3 {
            reach_goal(&mut session, &mut world, &mut renderer);
        }
        let events = reach_goal(&mut session, &mut world, &mut renderer);
        assert!(events.contains(&GameEvent::EndingReached));
        assert!(!session.state.is_running);
        assert_eq!(session.stage(), Stage::Terminal);

        // The finishing tick already applies one decay step
        let tuning = Tuning::default();
        let start_decay = renderer.parameters[DECAY_PARAMETER];
        assert!((start_decay - (tuning.decay_start - tuning.decay_rate * SIM_DT)).abs() < 1e-6);
        assert_eq!(session.state.decay, start_decay);
        let input = TickInput {
            strafe_right: true,
            jump: true,
            ..Default::default()
        };
        world.probe_contact = true;
        for _ in 0..10 {
            let events = tick(&mut session, &mut world, &mut renderer, &input, SIM_DT);
            assert!(!events.contains(&GameEvent::Jumped));
            assert_eq!(world.linear_velocity(session.actors.player_body), Vec3::ZERO);
        }
        assert!(renderer.parameters[DECAY_PARAMETER] < start_decay);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let (mut session, mut world, mut renderer) = start();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let events = tick(&mut session, &mut world, &mut renderer, &pause, SIM_DT);
        assert_eq!(events, vec![GameEvent::Paused]);

        let steps = world.steps;
        let walk = TickInput {
            strafe_right: true,
            ..Default::default()
        };
        tick(&mut session, &mut world, &mut renderer, &walk, SIM_DT);
        assert_eq!(world.steps, steps);

        let events = tick(&mut session, &mut world, &mut renderer, &pause, SIM_DT);
        assert_eq!(events, vec![GameEvent::Resumed]);
        assert_eq!(world.steps, steps + 1);
    }

    #[test]
    fn test_skip_level_advances() {
        let (mut session, mut world, mut renderer) = start();
        let skip = TickInput {
            skip_level: true,
            ..Default::default()
        };
        let events = tick(&mut session, &mut world, &mut renderer, &skip, SIM_DT);
        assert_eq!(events, vec![GameEvent::StageEntered(Stage::Level(2))]);
        assert_eq!(world.body_count(), PERSISTENT_BODIES + 3);
    }

    #[test]
    fn test_intent_lookup() {
        let input = TickInput {
            back: true,
            jump: true,
            ..Default::default()
        };
        assert!(input.is_active(Intent::Back));
        assert!(input.is_active(Intent::Jump));
        assert!(!input.is_active(Intent::Forward));
        assert!(!input.is_active(Intent::StrafeLeft));
    }
}
