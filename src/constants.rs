//! Tunable constants for the parkour core.
//!
//! Physics values reproduce the reference tick simulation exactly; planner
//! values were calibrated against it. All units are blocks and ticks unless
//! noted otherwise.

// =============================================================================
// AGENT DIMENSIONS
// =============================================================================

pub const AGENT_HALF_WIDTH: f64 = 0.3; // blocks either side of center
pub const AGENT_HEIGHT: f64 = 1.8; // blocks

// =============================================================================
// TICK PHYSICS
// =============================================================================

pub const JUMP_VELOCITY: f64 = 0.42; // initial vertical velocity of a jump
pub const JUMP_BOOST_VELOCITY_PER_LEVEL: f64 = 0.1; // added per jump-boost level
pub const SPRINT_JUMP_KICK: f64 = 0.2; // forward velocity added on sprint jumps
pub const GRAVITY_OFFSET: f64 = 0.08; // subtracted from vy every tick
pub const VERTICAL_DRAG: f64 = 0.98; // vy multiplier every tick
pub const AIR_INERTIA: f64 = 0.91; // horizontal velocity retained while airborne
pub const BASE_FRICTION: f64 = 0.6; // default surface slipperiness
pub const SLIPPERY_SURFACE_FRICTION: f64 = 0.98; // ice-like surfaces
pub const BOUNCY_SURFACE_FRICTION: f64 = 0.8; // bouncy surfaces are also slick
pub const ACCELERATION_NUMERATOR: f64 = 0.16277136; // (0.6 * 0.91)^-3 scale base
pub const GROUND_MOVE_FACTOR: f64 = 0.1; // grounded acceleration scale
pub const AIR_MOVE_FACTOR: f64 = 0.02; // airborne acceleration scale
pub const SPRINT_MULTIPLIER: f64 = 1.3;
pub const SNEAK_FACTOR: f64 = 0.3; // input scale while sneaking
pub const INPUT_DAMP: f64 = 0.98; // raw strafe/forward input scale
pub const SPEED_EFFECT_PER_LEVEL: f64 = 0.2; // move bonus per speed level
pub const SLOWNESS_EFFECT_PER_LEVEL: f64 = 0.15; // move penalty per slowness level
pub const SPRINGY_BOUNCE_RETENTION: f64 = 0.66; // springy surfaces return 66% of vy
pub const TERMINAL_VELOCITY: f64 = 3.92; // maximum downward speed
pub const MINIMUM_VELOCITY: f64 = 0.003; // |vy| below this snaps to zero
pub const FALL_VELOCITY_INIT: f64 = -0.0784; // first-tick velocity of a pure fall
pub const FALL_DAMAGE_THRESHOLD: f64 = 3.0; // safe fall height in blocks
pub const JUMP_COOLDOWN_TICKS: u32 = 10; // minimum ticks between jumps
pub const HISTORY_CAPACITY: usize = 64; // position history horizon in ticks

// =============================================================================
// JUMP REACH
// =============================================================================

pub const MAX_JUMP_WALK: f64 = 3.48; // longest flat jump without sprinting
pub const MAX_JUMP_SPRINT: f64 = 4.6; // longest flat sprint jump
pub const MAX_JUMP_MOMENTUM: f64 = 5.3; // longest momentum-assisted jump
pub const MAX_JUMP_HEIGHT_NORMAL: f64 = 1.251; // max ascend without jump boost
pub const FLAT_JUMP_TICKS: u32 = 12; // air time of a flat unboosted jump

// Average horizontal stride per airborne tick over a full flat jump (the
// reach figures above include 1.6 blocks of hitbox width + cell centers).
pub const WALK_JUMP_PER_TICK: f64 = 1.45574 / FLAT_JUMP_TICKS as f64;
pub const SPRINT_JUMP_PER_TICK: f64 = 2.87582 / FLAT_JUMP_TICKS as f64;
pub const MOMENTUM_JUMP_PER_TICK: f64 = (MAX_JUMP_MOMENTUM - 1.6) / FLAT_JUMP_TICKS as f64;

// =============================================================================
// COST MODEL
// =============================================================================

pub const COST_INF: f64 = 1_000_000.0; // large but finite so sums stay ordered
pub const ASCEND_DIST_PER_BLOCK: f64 = 0.6; // rising makes a jump harder
pub const DESCEND_DIST_PER_BLOCK: f64 = -0.2; // dropping makes it slightly easier
pub const TURN_COST_PER_RADIAN: f64 = 0.3;
pub const LAND_COST: f64 = 3.0; // ticks to settle after touchdown
pub const LIQUID_LANDING_COST: f64 = 5.0; // penalty for landing in liquid
pub const SLAB_ASCEND: f64 = 0.5; // ascend perturbation from bottom slabs

// =============================================================================
// FLIGHT-PATH CLEARANCE
// =============================================================================

pub const CLEARANCE_OVERLAP: f64 = 0.3; // margin when snapping samples to cells
pub const CLEARANCE_SAMPLES_PER_BLOCK: f64 = 2.0;

// =============================================================================
// EXECUTION
// =============================================================================

pub const JUMP_TIMEOUT_TICKS: i32 = 40; // flat jumps land in ~12
pub const PREP_OFFSET: f64 = 0.2215; // default stance offset from the cell center
pub const LAUNCH_OFFSET: f64 = 0.33; // launch point past the cell edge
pub const LAUNCH_SIDE_SHIFT: f64 = 0.18; // launch shift toward the landing side
pub const JUMP_ENVELOPE: f64 = 0.85; // predicted exit of this box triggers the jump
pub const DODGE_ANGLE_DEG: f64 = 25.0; // predicted-collision angle that forces a dodge
pub const SIDE_MOVE_DEADZONE_DEG: f64 = 20.0; // strafe-vs-forward dead zone
pub const LANDING_RADIUS: f64 = 1.0; // distance to destination that starts landing
pub const CENTER_RADIUS: f64 = 0.45; // close enough to settle over the center
pub const SLIP_FRICTION_THRESHOLD: f64 = 0.61; // above this the floor counts as slick
pub const SLIP_RETENTION: f64 = 4.0; // slide per unit motion on slick floors
pub const SLIP_RETENTION_BASE: f64 = 0.5;
pub const INITIAL_SLIP_RETENTION: f64 = 2.9; // softer factor on the first landing tick
