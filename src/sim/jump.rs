//! Ground/jump arbiter
//!
//! Decides each tick whether the player is grounded and whether a jump fires.

use std::time::Duration;

use super::state::PlayerState;
use crate::Tuning;

/// Vertical outcome of one arbitration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpOutcome {
    /// Vertical velocity to hand to the physics body
    pub vertical_velocity: f32,
    pub jumped: bool,
}

/// Update grounding and cooldown, then fire a jump if it is legal.
///
/// `probe_contact` is this tick's ground-probe query. `current_vy` is the
/// body's vertical velocity as the physics world left it; it is kept unless a
/// jump replaces it.
pub fn arbitrate(
    player: &mut PlayerState,
    probe_contact: bool,
    jump_held: bool,
    current_vy: f32,
    dt: Duration,
    tuning: &Tuning,
) -> JumpOutcome {
    let cooldown = tuning.jump_cooldown();
    player.since_last_jump = player.since_last_jump.saturating_add(dt).min(cooldown);

    // The floor latch counts once, for the check right after it was set
    player.on_ground = probe_contact || std::mem::take(&mut player.floor_latched);

    if jump_held && player.on_ground && player.since_last_jump >= cooldown {
        player.since_last_jump = Duration::ZERO;
        log::debug!("jump at {}", player.position);
        return JumpOutcome {
            vertical_velocity: tuning.jump_strength,
            jumped: true,
        };
    }

    JumpOutcome {
        vertical_velocity: current_vy,
        jumped: false,
    }
}
