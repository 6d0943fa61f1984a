//! Jump archetypes and the table of candidate offsets.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::constants::*;
use crate::world::{Cell, Direction};

/// The jump techniques the planner knows how to cost and the executor knows
/// how to fly. `Momentum` is a placeholder resolved into `MomentumWall` or
/// `MomentumNoWall` once the cell behind the source is known.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum JumpKind {
    /// Plain run-up and jump.
    Straight,
    /// Straight jump with little room for mid-air corrections.
    Cramped,
    /// Straight-line offsets; only planned when the landing is lower than
    /// the takeoff.
    StraightDescend,
    /// No run-up, jump from the cell edge (for higher-angle jumps).
    Edge,
    /// Around-the-pillar jump to a cell beside the source.
    EdgeWraparound,
    /// Unresolved momentum jump (backward wind-up before the run).
    Momentum,
    /// Momentum jump with a wall directly behind the source.
    MomentumWall,
    /// Momentum jump with open space behind the source.
    MomentumNoWall,
}

impl JumpKind {
    /// Longest move-distance this technique covers without sprinting.
    /// `None` means the technique always sprints.
    pub fn max_reach_walk(self) -> Option<f64> {
        match self {
            JumpKind::Straight | JumpKind::Cramped | JumpKind::StraightDescend => {
                Some(MAX_JUMP_WALK)
            }
            JumpKind::Edge => Some(3.0),
            JumpKind::EdgeWraparound
            | JumpKind::Momentum
            | JumpKind::MomentumWall
            | JumpKind::MomentumNoWall => None,
        }
    }

    /// Longest move-distance this technique covers at a sprint.
    pub fn max_reach_sprint(self) -> f64 {
        match self {
            JumpKind::Straight | JumpKind::Cramped | JumpKind::StraightDescend => MAX_JUMP_SPRINT,
            JumpKind::Edge => MAX_JUMP_SPRINT,
            JumpKind::EdgeWraparound => 4.0,
            JumpKind::Momentum | JumpKind::MomentumWall | JumpKind::MomentumNoWall => {
                MAX_JUMP_MOMENTUM
            }
        }
    }

    /// Ticks of positioning before takeoff.
    pub fn prep_cost(self) -> f64 {
        match self {
            JumpKind::Straight | JumpKind::StraightDescend => 4.0,
            JumpKind::Cramped => 8.0,
            JumpKind::Edge | JumpKind::EdgeWraparound => 7.0,
            JumpKind::MomentumWall => 15.0,
            JumpKind::Momentum | JumpKind::MomentumNoWall => 18.0,
        }
    }

    pub fn is_momentum(self) -> bool {
        matches!(
            self,
            JumpKind::Momentum | JumpKind::MomentumWall | JumpKind::MomentumNoWall
        )
    }
}

/// Candidate landing offsets per approach direction. Authored once for the
/// south (+Z) quadrant, mirrored across the approach axis and rotated into
/// the other three directions.
static OFFSETS: LazyLock<HashMap<Direction, HashMap<Cell, JumpKind>>> = LazyLock::new(|| {
    // (forward, sideways, technique), sideways mirrored to both sides
    let quadrant: &[(i32, i32, JumpKind)] = &[
        (2, 0, JumpKind::StraightDescend),
        (3, 0, JumpKind::StraightDescend),
        (4, 0, JumpKind::StraightDescend),
        (5, 0, JumpKind::Momentum),
        (1, 1, JumpKind::Straight),
        (2, 1, JumpKind::Cramped),
        (3, 1, JumpKind::Straight),
        (4, 1, JumpKind::Straight),
        (5, 1, JumpKind::Momentum),
        (0, 2, JumpKind::EdgeWraparound),
        (1, 2, JumpKind::Edge),
        (2, 2, JumpKind::Edge),
        (3, 2, JumpKind::Edge),
        (4, 2, JumpKind::Momentum),
        (1, 3, JumpKind::Edge),
        (2, 3, JumpKind::Edge),
    ];

    let mut by_direction: HashMap<Direction, HashMap<Cell, JumpKind>> = HashMap::new();
    for dir in Direction::ALL {
        by_direction.insert(dir, HashMap::new());
    }
    for &(forward, sideways, kind) in quadrant {
        for side in [-sideways, sideways] {
            let south = Cell::new(side, 0, forward);
            for dir in Direction::ALL {
                if let Some(map) = by_direction.get_mut(&dir) {
                    map.insert(dir.rotate_offset(south), kind);
                }
            }
        }
    }
    by_direction
});

/// All candidate offsets for one approach direction.
pub fn offsets(direction: Direction) -> &'static HashMap<Cell, JumpKind> {
    // the table is seeded for every direction
    OFFSETS
        .get(&direction)
        .unwrap_or_else(|| unreachable!("offset table covers all directions"))
}

/// Technique assigned to a source-relative offset, if it is jumpable at all.
pub fn kind_for(direction: Direction, offset: Cell) -> Option<JumpKind> {
    offsets(direction)
        .get(&Cell::new(offset.x, 0, offset.z))
        .copied()
}
