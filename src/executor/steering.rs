//! Low-level steering used while lining up, flying, and landing jumps.

use glam::DVec3;

use crate::constants::*;
use crate::helpers::vec_yaw;
use crate::physics::{predict, Control, InputPlan, PhysicsState};
use crate::world::{Cell, GridWorld};

/// Face the target and hold forward.
pub fn steer_towards(plan: &mut InputPlan, from: DVec3, target: DVec3) {
    plan.target_yaw = vec_yaw(target - from);
    plan.hold(Control::Forward);
}

/// Face the center of a cell and hold forward.
pub fn steer_towards_cell(plan: &mut InputPlan, from: DVec3, cell: Cell) {
    steer_towards(plan, from, cell.floor_center());
}

/// Hold the strafe key that moves along `angle_diff` degrees off the current
/// facing without turning. Small angles fall back to plain forward.
pub fn side_move(plan: &mut InputPlan, mut angle_diff: f64) {
    if angle_diff > 180.0 {
        angle_diff = 180.0 - angle_diff;
    }
    if angle_diff < -180.0 {
        angle_diff = -180.0 - angle_diff;
    }
    if angle_diff >= SIDE_MOVE_DEADZONE_DEG {
        plan.hold(Control::Right);
    } else if angle_diff <= -SIDE_MOVE_DEADZONE_DEG {
        plan.hold(Control::Left);
    } else {
        plan.hold(Control::Forward);
    }
}

/// Strafe toward `move_yaw` while continuing to face `look_yaw`.
pub fn side_move_yaws(plan: &mut InputPlan, look_yaw: f64, move_yaw: f64) {
    side_move(plan, move_yaw - look_yaw);
}

/// Strafe toward `move_dest` while facing `look_dest`, both relative to
/// `src`.
pub fn side_move_cells(plan: &mut InputPlan, src: Cell, look_dest: Cell, move_dest: Cell) {
    let look = look_dest - src;
    let mv = move_dest - src;
    let look_yaw = vec_yaw(DVec3::new(look.x as f64, 0.0, look.z as f64));
    let move_yaw = vec_yaw(DVec3::new(mv.x as f64, 0.0, mv.z as f64));
    side_move_yaws(plan, look_yaw, move_yaw);
}

/// Signed distance from a position to the edge of `cell` grown by
/// `edge_size`, along the closer axis. Negative once the position is past an
/// edge; only the sign is meaningful then.
pub fn dist_to_edge_neg(pos_x: f64, pos_z: f64, cell: Cell, edge_size: f64) -> f64 {
    let dx = (cell.x as f64 + 0.5 - pos_x).abs();
    let dz = (cell.z as f64 + 0.5 - pos_z).abs();
    (edge_size - dx).min(edge_size - dz)
}

/// Euclidean distance from a position to the edge of `cell`, traced along
/// the momentum vector. Tells the landing check how much room remains before
/// sliding off.
pub fn edge_distance_along(
    pos_x: f64,
    pos_z: f64,
    cell: Cell,
    momentum: DVec3,
    edge_size: f64,
) -> f64 {
    let rel_x = pos_x - cell.x as f64 - 0.5;
    let rel_z = pos_z - cell.z as f64 - 0.5;

    // distance to the edge the momentum is headed at, per axis
    let rel_x = if momentum.x > 0.0 {
        edge_size - rel_x
    } else {
        -edge_size - rel_x
    };
    let rel_z = if momentum.z > 0.0 {
        edge_size - rel_z
    } else {
        -edge_size - rel_z
    };

    // near-axis momentum would blow up the slope division
    if momentum.z.abs() < 0.01 {
        return rel_x.abs();
    }
    if momentum.x.abs() < 0.01 {
        return rel_z.abs();
    }

    let dis_x = (rel_z * momentum.x / momentum.z).abs();
    let dis_z = (rel_x * momentum.z / momentum.x).abs();
    let x = if dis_x < dis_z {
        dis_x
    } else {
        dis_z * momentum.x / momentum.z
    };
    let z = if dis_x > dis_z {
        dis_z
    } else {
        dis_x * momentum.z / momentum.x
    };
    (x * x + z * z).sqrt()
}

/// Pick the approach speed (sprint, walk, sneak, or stop) that lands the
/// agent on `block` within `ticks_remaining`, by simulating each option.
/// `inwards` flips the goal: pull back onto the block instead of riding its
/// edge outwards.
pub fn land_here<W: GridWorld + ?Sized>(
    agent: &PhysicsState,
    world: &W,
    plan: &mut InputPlan,
    block: Cell,
    ticks_remaining: i32,
    inwards: bool,
) {
    if !inwards && dist_to_edge_neg(agent.pos.x, agent.pos.z, block, 0.8) < 0.0 {
        // already carried past the edge, speed changes won't help
        return;
    }

    plan.release(Control::Sprint);
    plan.release(Control::Sneak);
    plan.hold(Control::Forward);

    let ticks = ticks_remaining.max(0) as u32;
    let future = predict(agent, plan, ticks, world);

    // collided_vertically over the window means we came down on the block
    if (future.collided_vertically && !inwards) || (!future.collided_vertically && inwards) {
        plan.hold(Control::Sprint);
        let future = predict(agent, plan, ticks, world);
        if !future.collided_vertically && !inwards {
            // sprinting overshoots, walking was right
            plan.release(Control::Sprint);
        }
    } else {
        plan.hold(Control::Sneak);
        let future = predict(agent, plan, ticks, world);
        if (!future.collided_vertically && !inwards) || (future.collided_vertically && inwards) {
            plan.release(Control::Forward);
            plan.release(Control::Sneak);
            let future = predict(agent, plan, ticks, world);
            if !inwards && !future.collided_vertically {
                // even stopping won't save it, turn back toward the block
                steer_towards_cell(plan, agent.pos, block);
            } else if inwards && !future.collided_vertically {
                plan.hold(Control::Sneak);
                plan.hold(Control::Forward);
            }
        } else if inwards {
            plan.release(Control::Sneak);
        }
    }
}
