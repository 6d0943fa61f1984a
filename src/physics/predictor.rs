//! Forward kinematic prediction.
//!
//! [`step`] advances a [`PhysicsState`] by exactly one tick under a fixed
//! [`InputPlan`]; [`predict`] runs a clone forward several ticks. The update
//! order is load-bearing and must not be rearranged: input acceleration,
//! jump impulse, collision-resolved movement, then inertia and gravity.

use glam::DVec3;

use crate::constants::*;
use crate::physics::{Control, EffectKind, InputPlan, PhysicsState};
use crate::world::{Cell, GridWorld, Surface};

/// Simulate `ticks` whole ticks of `plan` and return the resulting state.
/// The input state is untouched; this is the what-if primitive everything
/// else builds on.
pub fn predict<W: GridWorld + ?Sized>(
    state: &PhysicsState,
    plan: &InputPlan,
    ticks: u32,
    world: &W,
) -> PhysicsState {
    let mut s = state.clone();
    for _ in 0..ticks {
        step(&mut s, plan, world);
    }
    s
}

/// Advance `s` by one tick under `plan`.
pub fn step<W: GridWorld + ?Sized>(s: &mut PhysicsState, plan: &InputPlan, world: &W) {
    s.sneaking = plan.is_held(Control::Sneak);
    let jumping = plan.is_held(Control::Jump) && s.can_jump();
    if jumping {
        s.mark_jumped();
    }
    s.yaw = plan.target_yaw;

    let mut strafe = plan.strafe_amount();
    let mut forward = plan.forward_amount();
    if s.sneaking {
        strafe *= SNEAK_FACTOR;
        forward *= SNEAK_FACTOR;
    }
    strafe *= INPUT_DAMP;
    forward *= INPUT_DAMP;

    // inertia is how much horizontal speed the end of this tick keeps
    let mut inertia = AIR_INERTIA;
    if s.on_ground {
        inertia = world.friction(cell_under_feet(s.pos)) * AIR_INERTIA;
    }
    let acceleration = ACCELERATION_NUMERATOR / (inertia * inertia * inertia);

    let mut move_mod = if s.on_ground {
        let speed = s.effects.level(EffectKind::Speed, s.tick) as f64;
        let slow = s.effects.level(EffectKind::Slowness, s.tick) as f64;
        GROUND_MOVE_FACTOR
            * acceleration
            * (speed * SPEED_EFFECT_PER_LEVEL - slow * SLOWNESS_EFFECT_PER_LEVEL + 1.0)
    } else {
        AIR_MOVE_FACTOR
    };
    if plan.is_held(Control::Sprint) {
        move_mod *= SPRINT_MULTIPLIER;
    }

    let dist_sq = strafe * strafe + forward * forward;
    if dist_sq >= 1.0e-4 {
        // inputs shorter than a full press still move at full strength
        let scale = move_mod / dist_sq.sqrt().max(1.0);
        strafe *= scale;
        forward *= scale;
        let (sin_yaw, cos_yaw) = s.yaw.to_radians().sin_cos();
        s.vel.x += strafe * cos_yaw - forward * sin_yaw;
        s.vel.z += forward * cos_yaw + strafe * sin_yaw;
    }

    if jumping {
        let boost = s.effects.level(EffectKind::JumpBoost, s.tick) as f64;
        s.vel.y = JUMP_VELOCITY + boost * JUMP_BOOST_VELOCITY_PER_LEVEL;
        if plan.is_held(Control::Sprint) {
            let f = s.yaw.to_radians();
            s.vel.x -= f.sin() * SPRINT_JUMP_KICK;
            s.vel.z += f.cos() * SPRINT_JUMP_KICK;
        }
    }

    move_and_collide(s, world);

    s.vel.x *= inertia;
    s.vel.z *= inertia;
    s.vel.y = (s.vel.y - GRAVITY_OFFSET) * VERTICAL_DRAG;

    s.record_position();
    s.tick += 1;
}

/// Cell whose top face the agent is standing on.
fn cell_under_feet(pos: DVec3) -> Cell {
    Cell::new(
        pos.x.floor() as i32,
        pos.y.floor() as i32 - 1,
        pos.z.floor() as i32,
    )
}

/// Move the agent by its velocity, resolving collisions one axis at a time
/// (Y, then X, then Z) against every box the swept volume can touch. Each
/// axis clamps independently.
fn move_and_collide<W: GridWorld + ?Sized>(s: &mut PhysicsState, world: &W) {
    let init = s.vel;
    let mut x = init.x;
    let mut y = init.y;
    let mut z = init.z;

    let nearby = world.collision_boxes(&s.bounds.swept(init));

    if y != 0.0 {
        for b in &nearby {
            y = b.clamp_y_offset(&s.bounds, y);
        }
        s.bounds = s.bounds.translated(DVec3::new(0.0, y, 0.0));
    }
    if x != 0.0 {
        for b in &nearby {
            x = b.clamp_x_offset(&s.bounds, x);
        }
        if x != 0.0 {
            s.bounds = s.bounds.translated(DVec3::new(x, 0.0, 0.0));
        }
    }
    if z != 0.0 {
        for b in &nearby {
            z = b.clamp_z_offset(&s.bounds, z);
        }
        if z != 0.0 {
            s.bounds = s.bounds.translated(DVec3::new(0.0, 0.0, z));
        }
    }

    s.sync_pos_from_bounds();

    s.collided_horizontally = init.x != x || init.z != z;
    s.collided_vertically = init.y != y;
    s.on_ground = s.collided_vertically && init.y < 0.0;

    let landing = landing_surface(s.pos, world);
    update_fall_state(s, y);

    if init.x != x {
        s.vel.x = 0.0;
    }
    if init.z != z {
        s.vel.z = 0.0;
    }

    if s.collided_vertically {
        match landing {
            Surface::Bouncy if !s.sneaking && s.vel.y < 0.0 => s.vel.y = -s.vel.y,
            Surface::Springy if !s.sneaking && s.vel.y < 0.0 => {
                s.vel.y = -s.vel.y * SPRINGY_BOUNCE_RETENTION;
            }
            _ => s.vel.y = 0.0,
        }
    }
}

/// Surface the agent is landing on. When the cell just under the feet is
/// open, a tall post one below still counts; its collision box pokes into
/// the landing cell.
fn landing_surface<W: GridWorld + ?Sized>(pos: DVec3, world: &W) -> Surface {
    let cell = Cell::new(
        pos.x.floor() as i32,
        (pos.y - 0.2).floor() as i32,
        pos.z.floor() as i32,
    );
    match world.surface(cell) {
        Surface::Open => match world.surface(cell.below()) {
            Surface::TallPost => Surface::TallPost,
            _ => Surface::Open,
        },
        s => s,
    }
}

fn update_fall_state(s: &mut PhysicsState, moved_y: f64) {
    if s.on_ground {
        let boost = s.effects.level(EffectKind::JumpBoost, s.tick) as f64;
        let damage = (s.fall_distance - FALL_DAMAGE_THRESHOLD - boost).ceil();
        if damage > 0.0 {
            s.damage_taken += damage;
        }
        s.fall_distance = 0.0;
    } else if moved_y < 0.0 {
        s.fall_distance -= moved_y;
    }
}
