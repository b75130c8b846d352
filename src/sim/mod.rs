//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Physics and rendering reached only through their traits
//! - Level objects referenced by handle, never owned

pub mod boundary;
pub mod camera;
pub mod curve;
pub mod ending;
pub mod jump;
pub mod level;
pub mod motion;
pub mod state;
pub mod tick;

pub use curve::{AngularCurvePath, AngularInterpolation, CubicBezier, CurvePath, ParametricCurve};
pub use ending::{EndingFrame, EndingSequence};
pub use level::{Actors, LevelMachine, LevelRuntime, RuntimeObject};
pub use motion::MoveIntents;
pub use state::{CameraState, MotionMode, PlayerState, SessionState, SessionStats, Stage};
pub use tick::{GameEvent, Intent, Session, TickInput, tick};
