//! Authored level content
//!
//! Five disc levels followed by the final corridor. Heights are given
//! relative to the floor top so obstacles sit on the disc.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{FLOOR_TOP_Y, GOAL_HALF_EXTENT, PLAYER_HALF_HEIGHT};
use crate::physics::Shape;
use crate::sim::curve::{AngularCurvePath, AngularInterpolation, CubicBezier, CurvePath};

/// One piece of static level geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDesc {
    pub shape: Shape,
    pub translation: Vec3,
    /// Rotation about world Y (degrees)
    pub yaw_degrees: f32,
}

impl ObstacleDesc {
    /// Box resting on the floor at ground position (x, z)
    pub fn block(x: f32, z: f32, half_extents: Vec3, yaw_degrees: f32) -> Self {
        Self {
            shape: Shape::Cuboid { half_extents },
            translation: Vec3::new(x, FLOOR_TOP_Y + half_extents.y, z),
            yaw_degrees,
        }
    }

    /// Upright pillar resting on the floor at ground position (x, z)
    pub fn pillar(x: f32, z: f32, radius: f32, half_height: f32) -> Self {
        Self {
            shape: Shape::Cylinder {
                half_height,
                radius,
            },
            translation: Vec3::new(x, FLOOR_TOP_Y + half_height, z),
            yaw_degrees: 0.0,
        }
    }
}

/// A regular disc level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub obstacles: Vec<ObstacleDesc>,
    pub player_spawn: Vec3,
    pub goal_spawn: Vec3,
    pub text: Option<String>,
}

/// The final, non-replayable level and its scripted camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalLevelDef {
    pub obstacles: Vec<ObstacleDesc>,
    pub player_spawn: Vec3,
    pub goal_spawn: Vec3,
    pub text: Option<String>,
    /// Player x mapped to curve parameter 0
    pub scene_min_x: f32,
    /// Player x mapped to curve parameter 1
    pub scene_max_x: f32,
    pub camera_path: CurvePath,
    pub camera_angles: AngularCurvePath,
}

/// Ordered level sequence plus the finale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<LevelDef>,
    pub finale: FinalLevelDef,
}

impl LevelSet {
    /// Number of authored disc levels (N)
    pub fn count(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Level by 1-based ordinal; `None` past the authored range
    pub fn level(&self, ordinal: u32) -> Option<&LevelDef> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self {
            levels: authored_levels(),
            finale: final_level(),
        }
    }
}

/// Player center height when standing on the floor
const STAND_Y: f32 = FLOOR_TOP_Y + PLAYER_HALF_HEIGHT;
/// Goal center height when resting on the floor
const GOAL_Y: f32 = FLOOR_TOP_Y + GOAL_HALF_EXTENT;

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// The disc levels, in play order
pub fn authored_levels() -> Vec<LevelDef> {
    vec![
        // 1: straight line along the view slice
        LevelDef {
            obstacles: Vec::new(),
            player_spawn: Vec3::new(-3.0, STAND_Y, 0.0),
            goal_spawn: Vec3::new(3.0, GOAL_Y, 0.0),
            text: text("A and D move. Reach the cube."),
        },
        // 2: a low wall to hop
        LevelDef {
            obstacles: vec![ObstacleDesc::block(0.0, 0.0, Vec3::new(0.3, 0.5, 1.0), 0.0)],
            player_spawn: Vec3::new(-3.0, STAND_Y, 0.0),
            goal_spawn: Vec3::new(3.0, GOAL_Y, 0.0),
            text: text("Space jumps."),
        },
        // 3: goal is off the slice; walk around the disc
        LevelDef {
            obstacles: vec![ObstacleDesc::block(1.5, 0.0, Vec3::new(0.3, 2.0, 0.6), 0.0)],
            player_spawn: Vec3::new(3.0, STAND_Y, 0.0),
            goal_spawn: Vec3::new(0.0, GOAL_Y, 3.0),
            text: text("W and S turn the world."),
        },
        // 4: ring of pillars
        LevelDef {
            obstacles: vec![
                ObstacleDesc::pillar(2.0, 2.0, 0.4, 1.5),
                ObstacleDesc::pillar(-2.0, 2.0, 0.4, 1.5),
                ObstacleDesc::pillar(2.0, -2.0, 0.4, 1.5),
                ObstacleDesc::pillar(-2.0, -2.0, 0.4, 1.5),
                ObstacleDesc::pillar(0.0, 0.0, 0.6, 0.4),
            ],
            player_spawn: Vec3::new(-3.5, STAND_Y, 0.0),
            goal_spawn: Vec3::new(0.0, GOAL_Y, -3.5),
            text: None,
        },
        // 5: staircase up to a raised goal, with a wall you must walk around
        LevelDef {
            obstacles: vec![
                ObstacleDesc::block(1.0, 0.0, Vec3::new(0.4, 1.5, 0.8), 0.0),
                ObstacleDesc::block(-1.0, 1.8, Vec3::new(0.5, 0.3, 0.5), 30.0),
                ObstacleDesc::block(-2.2, 2.4, Vec3::new(0.5, 0.7, 0.5), 45.0),
                ObstacleDesc::block(-3.2, 2.4, Vec3::new(0.5, 1.1, 0.5), 60.0),
            ],
            player_spawn: Vec3::new(3.5, STAND_Y, 0.0),
            goal_spawn: Vec3::new(-3.6, FLOOR_TOP_Y + 2.2 + GOAL_HALF_EXTENT, 1.6),
            text: text("Almost there."),
        },
    ]
}

/// The closing corridor and its camera move
pub fn final_level() -> FinalLevelDef {
    let eye = |yaw: f32, pitch: f32| {
        Quat::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch.to_radians(), 0.0)
    };

    FinalLevelDef {
        obstacles: vec![
            ObstacleDesc::block(-1.0, 0.0, Vec3::new(0.4, 0.2, 1.5), 0.0),
            ObstacleDesc::block(1.5, 0.0, Vec3::new(0.4, 0.4, 1.5), 0.0),
        ],
        player_spawn: Vec3::new(-4.0, STAND_Y, 0.0),
        goal_spawn: Vec3::new(4.0, GOAL_Y, 0.0),
        text: None,
        scene_min_x: -4.0,
        scene_max_x: 4.0,
        camera_path: CurvePath::new(vec![
            CubicBezier::new(
                Vec3::new(-6.0, -1.0, 7.0),
                Vec3::new(-3.0, 0.5, 8.0),
                Vec3::new(-1.0, 1.5, 8.0),
                Vec3::new(0.0, 1.0, 7.0),
            ),
            CubicBezier::new(
                Vec3::new(0.0, 1.0, 7.0),
                Vec3::new(1.0, 0.5, 6.0),
                Vec3::new(4.0, -1.0, 5.0),
                Vec3::new(7.0, -2.5, 3.0),
            ),
        ]),
        camera_angles: AngularCurvePath::new(
            vec![
                eye(-25.0, -15.0),
                eye(-5.0, -25.0),
                eye(10.0, -20.0),
                eye(35.0, -10.0),
            ],
            AngularInterpolation::Squad,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::ground_xz;

    #[test]
    fn test_ordinals_are_one_based() {
        let set = LevelSet::default();
        assert_eq!(set.count(), 5);
        assert!(set.level(0).is_none());
        assert!(set.level(1).is_some());
        assert!(set.level(5).is_some());
        assert!(set.level(6).is_none());
    }

    #[test]
    fn test_spawns_are_inside_the_disc() {
        let limit = Tuning::default().max_dist_to_center;
        let set = LevelSet::default();
        let spawns = set
            .levels
            .iter()
            .flat_map(|l| [l.player_spawn, l.goal_spawn])
            .chain([set.finale.player_spawn, set.finale.goal_spawn]);
        for spawn in spawns {
            assert!(ground_xz(spawn).length() <= limit, "{spawn} is off the disc");
        }
    }

    #[test]
    fn test_obstacles_rest_on_the_floor() {
        for level in authored_levels() {
            for obstacle in level.obstacles {
                let half_height = match obstacle.shape {
                    Shape::Cuboid { half_extents } => half_extents.y,
                    Shape::Cylinder { half_height, .. } => half_height,
                    Shape::Ball { radius } => radius,
                };
                assert!((obstacle.translation.y - half_height - FLOOR_TOP_Y).abs() < 1e-5);
            }
        }
    }
}
