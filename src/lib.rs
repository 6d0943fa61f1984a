//! Parkour - grid-world jump planning, prediction, and execution
//!
//! This crate provides a deterministic tick predictor for agent movement, a
//! jump planner that enumerates and prices candidate jumps, and an executor
//! that drives a planned jump tick by tick.

// Core modules
pub mod constants;
pub mod helpers;
pub mod settings;
pub mod world;

// Simulation and planning modules
pub mod executor;
pub mod physics;
pub mod planner;

// Re-export commonly used types for convenience
pub use constants::*;
pub use executor::{
    JumpExecutor, JumpStatus, dist_to_edge_neg, edge_distance_along, land_here, side_move,
    side_move_cells, side_move_yaws, steer_towards, steer_towards_cell,
};
pub use helpers::*;
pub use physics::{
    Control, EffectKind, EffectMap, InputPlan, PhysicsState, fall_position, fall_velocity,
    jump_time, max_jump_height, predict, step,
};
pub use planner::{
    CandidateJump, JumpKind, JumpPlanner, dest_direction, kind_for, offsets,
};
pub use settings::{SETTINGS_FILE, Settings};
pub use world::{Aabb, Block, Cell, Direction, GridMap, GridWorld, Surface};
