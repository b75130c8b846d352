//! Disc Walker headless runner
//!
//! Plays the whole level sequence against the rapier world with a simple
//! autopilot and no window. Usage: `disc-walker [tuning.json]`

use disc_walker::consts::*;
use disc_walker::levels::LevelSet;
use disc_walker::physics::{PhysicsWorld, RapierWorld};
use disc_walker::render::LogRenderer;
use disc_walker::sim::{GameEvent, Session, Stage, TickInput, tick};
use disc_walker::{Tuning, ground_xz};

/// Host frame length; deliberately off the sim rate so substeps vary
const FRAME_DT: f32 = 1.0 / 45.0;
/// Give up on a level and skip it after this long
const STAGE_TIMEOUT_SECS: f32 = 20.0;
/// Hard stop for the whole run
const MAX_FRAMES: u32 = 45 * 600;

struct Game {
    session: Session,
    world: RapierWorld,
    renderer: LogRenderer,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(tuning: Tuning) -> Self {
        let mut world = RapierWorld::new(tuning.gravity);
        let mut renderer = LogRenderer::new();
        let session = Session::new(&mut world, &mut renderer, tuning, LevelSet::default());
        Self {
            session,
            world,
            renderer,
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            let events = tick(&mut self.session, &mut self.world, &mut self.renderer, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.pause = false;
            self.input.skip_level = false;

            for event in events {
                match event {
                    GameEvent::StageEntered(stage) => log::info!("-> {:?}", stage),
                    GameEvent::EndingReached => log::info!("Final goal reached"),
                    _ => {}
                }
            }
        }
    }

    /// Walk toward the goal along the camera's right axis, hopping over whatever is in the way
    fn steer(&mut self) {
        let session = &self.session;
        let to_goal = ground_xz(self.world_goal() - session.player.position);
        let along = to_goal.dot(session.camera.ground_right());

        self.input.strafe_right = along > 0.05;
        self.input.strafe_left = along < -0.05;
        self.input.jump = true;

        if session.stage() != Stage::Terminal && session.state.stats.stage_elapsed > STAGE_TIMEOUT_SECS {
            log::warn!("Autopilot stuck in {:?}, skipping", session.stage());
            self.input.skip_level = true;
        }
    }

    fn world_goal(&self) -> glam::Vec3 {
        self.world.translation(self.session.actors.goal_body)
    }

    fn finished(&self) -> bool {
        let state = &self.session.state;
        !state.is_running && state.decay <= self.session.tuning.decay_floor
    }
}

fn load_tuning() -> Tuning {
    let Some(path) = std::env::args().nth(1) else {
        return Tuning::default();
    };
    match Tuning::load(&path) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Failed to load tuning from {}: {}, using defaults", path, e);
            Tuning::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Disc Walker (headless) starting...");

    let mut game = Game::new(load_tuning());

    let mut frames = 0;
    while !game.finished() && frames < MAX_FRAMES {
        game.steer();
        game.update(FRAME_DT);
        frames += 1;
    }

    let state = &game.session.state;
    println!(
        "Stage {:?}, running: {}, ticks: {}, jumps: {}, decay: {:.2}",
        state.stage, state.is_running, state.stats.ticks, state.stats.jumps, state.decay
    );
    for (i, secs) in state.stats.level_times.iter().enumerate() {
        println!("  level {}: {:.1}s", i + 1, secs);
    }
}
