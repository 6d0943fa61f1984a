//! Closed-form vertical flight math.
//!
//! The tick recurrence `v' = (v - 0.08) * 0.98` telescopes to
//! `v(t) = v1 * 0.98^(t-1) + 4 * 0.98^t - 3.92`, which lets the planner ask
//! "how high is the agent `t` ticks after takeoff" without simulating.
//! Takeoff happens on tick 1; tick 0 is the last grounded tick.

use crate::constants::*;

/// Vertical velocity `ticks_from_start` ticks after takeoff, in blocks per
/// tick (positive is up). `jumping` distinguishes a jump from a walk-off
/// fall; `boost` is the 1-based jump-boost level.
pub fn fall_velocity(ticks_from_start: u32, jumping: bool, boost: u32) -> f64 {
    if ticks_from_start == 0 {
        return 0.0;
    }
    let init = if jumping {
        JUMP_VELOCITY + JUMP_BOOST_VELOCITY_PER_LEVEL * boost as f64
    } else {
        FALL_VELOCITY_INIT
    };
    let t = ticks_from_start as f64;
    let mut vel = init * VERTICAL_DRAG.powf(t - 1.0)
        + 4.0 * VERTICAL_DRAG.powf(t)
        - TERMINAL_VELOCITY;
    if vel < -TERMINAL_VELOCITY {
        vel = -TERMINAL_VELOCITY;
    }
    if vel.abs() < MINIMUM_VELOCITY {
        vel = 0.0;
    }
    vel
}

/// Height relative to the takeoff point `ticks_from_start` ticks after
/// takeoff.
pub fn fall_position(ticks_from_start: u32, jumping: bool, boost: u32) -> f64 {
    (1..=ticks_from_start)
        .map(|t| fall_velocity(t, jumping, boost))
        .sum()
}

/// Air time in ticks of a jump landing `ascend` blocks above the takeoff
/// point (negative for descends). `None` when the landing height cannot be
/// reached at all.
pub fn jump_time(ascend: f64, jumping: bool, boost: u32) -> Option<u32> {
    if ascend == 0.0 && boost == 0 && jumping {
        return Some(FLAT_JUMP_TICKS);
    }
    if ascend > max_jump_height(jumping, boost) {
        return None;
    }
    let mut ticks = 0u32;
    let mut prev_height = -1.0;
    let mut new_height = 0.0;
    // landing requires moving down and being at or below the target height
    while prev_height < new_height || new_height > ascend {
        ticks += 1;
        prev_height = new_height;
        new_height += fall_velocity(ticks, jumping, boost);
    }
    Some(ticks - 1)
}

/// Apex height of a jump with the given boost level. Falls have no upward
/// travel at all.
pub fn max_jump_height(jumping: bool, boost: u32) -> f64 {
    if !jumping {
        return 0.0;
    }
    if boost == 0 {
        return MAX_JUMP_HEIGHT_NORMAL;
    }
    let mut ticks = 1u32;
    let mut prev_height = -1.0;
    let mut new_height = 0.0;
    while prev_height < new_height {
        prev_height = new_height;
        new_height += fall_velocity(ticks, jumping, boost);
        ticks += 1;
    }
    prev_height
}
