//! Planned jump description handed to the executor.

use glam::DVec3;

use crate::planner::JumpKind;
use crate::world::{Cell, Direction};

/// One fully costed jump from a source cell to a landing cell.
///
/// Everything the executor needs is precomputed here so execution never
/// re-derives planner state: the approach and landing directions, the entry
/// point on the landing cell, and the calibrated distances the steering
/// heuristics compare against.
#[derive(Clone, Debug)]
pub struct CandidateJump {
    pub src: Cell,
    pub dest: Cell,
    /// `dest - src`.
    pub jump: Cell,
    /// Side of the source cell the jump leaves from.
    pub direction: Direction,
    /// Direction facing the destination, off the approach axis.
    pub dest_direction: Direction,
    /// Side of the landing cell the agent should enter through.
    pub entry_direction: Direction,
    /// Point on the landing cell to aim at while airborne.
    pub entry_point: DVec3,
    /// Signed degrees between the approach direction and the jump vector.
    pub jump_angle: f64,
    pub kind: JumpKind,
    /// Difficulty metric the reach limits are calibrated against.
    pub move_dist: f64,
    /// Horizontal run length: distance past the first step, plus one.
    pub distance_xz: f64,
    /// Height gain from takeoff to landing, including slab fractions.
    pub ascend: f64,
    /// Ticks: preparation + air time + landing, plus any placement cost.
    pub cost: f64,
}

impl CandidateJump {
    /// Center of the landing cell at landing height.
    pub fn dest_center(&self) -> DVec3 {
        DVec3::new(
            self.dest.x as f64 + 0.5,
            self.dest.y as f64,
            self.dest.z as f64 + 0.5,
        )
    }

    /// Center of the source cell at takeoff height.
    pub fn src_center(&self) -> DVec3 {
        DVec3::new(
            self.src.x as f64 + 0.5,
            self.src.y as f64,
            self.src.z as f64 + 0.5,
        )
    }

    /// True when this jump cannot be made at walking speed.
    pub fn requires_sprint(&self) -> bool {
        match self.kind.max_reach_walk() {
            Some(walk) => self.move_dist > walk,
            None => true,
        }
    }
}
