//! Physics - forward kinematic prediction of agent movement.
//!
//! The predictor integrates one control plan over whole ticks against a
//! [`GridWorld`](crate::world::GridWorld), reproducing the reference
//! simulation bit for bit. Everything downstream (costs, steering, landing
//! checks) leans on that determinism.

mod flight;
mod input;
mod predictor;
mod state;

pub use flight::{fall_position, fall_velocity, jump_time, max_jump_height};
pub use input::{Control, InputPlan};
pub use predictor::{predict, step};
pub use state::{EffectKind, EffectMap, PhysicsState};
