//! World model - grid occupancy interface and the geometry types it speaks.
//!
//! The planner and predictor never see the host's actual world data. They
//! query through [`GridWorld`], which exposes exactly the facts the parkour
//! core needs: passability, standability, surface kind, friction, collision
//! volumes, and block-placement support. [`GridMap`] is the map-backed
//! implementation used by the test fixtures and headless harnesses.

mod aabb;
mod grid;

pub use aabb::Aabb;
pub use grid::{Block, GridMap};

use glam::DVec3;

use crate::constants::*;

/// Integer cell coordinates. `y` is up.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub const fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    pub const fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Point at the center of the cell's floor.
    pub fn floor_center(self) -> DVec3 {
        DVec3::new(self.x as f64 + 0.5, self.y as f64, self.z as f64 + 0.5)
    }

    /// Cell containing a continuous position.
    pub fn containing(p: DVec3) -> Self {
        Self::new(
            p.x.floor() as i32,
            p.y.floor() as i32,
            p.z.floor() as i32,
        )
    }
}

impl std::ops::Add for Cell {
    type Output = Cell;
    fn add(self, rhs: Cell) -> Cell {
        Cell::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Cell {
    type Output = Cell;
    fn sub(self, rhs: Cell) -> Cell {
        Cell::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// The four cardinal approach directions on the grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    /// +Z
    South,
    /// -X
    West,
    /// -Z
    North,
    /// +X
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::South,
        Direction::West,
        Direction::North,
        Direction::East,
    ];

    /// Unit cell step in this direction.
    pub const fn step(self) -> Cell {
        match self {
            Direction::South => Cell::new(0, 0, 1),
            Direction::West => Cell::new(-1, 0, 0),
            Direction::North => Cell::new(0, 0, -1),
            Direction::East => Cell::new(1, 0, 0),
        }
    }

    /// Unit vector on the ground plane.
    pub fn vec(self) -> DVec3 {
        let s = self.step();
        DVec3::new(s.x as f64, 0.0, s.z as f64)
    }

    /// Yaw (degrees) an agent faces when walking this direction.
    pub const fn yaw(self) -> f64 {
        match self {
            Direction::South => 0.0,
            Direction::West => 90.0,
            Direction::North => 180.0,
            Direction::East => -90.0,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::North => Direction::South,
            Direction::East => Direction::West,
        }
    }

    /// Quarter turn clockwise when viewed from above (+Z toward -X).
    pub const fn clockwise(self) -> Direction {
        match self {
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::North => Direction::East,
            Direction::East => Direction::South,
        }
    }

    pub const fn counter_clockwise(self) -> Direction {
        self.clockwise().opposite()
    }

    /// Number of clockwise quarter turns from South.
    pub const fn quarter_turns(self) -> u32 {
        match self {
            Direction::South => 0,
            Direction::West => 1,
            Direction::North => 2,
            Direction::East => 3,
        }
    }

    /// Rotate a cell offset from the canonical South frame into this
    /// direction's frame.
    pub const fn rotate_offset(self, c: Cell) -> Cell {
        let mut out = c;
        let mut turns = self.quarter_turns();
        while turns > 0 {
            out = Cell::new(-out.z, out.y, out.x);
            turns -= 1;
        }
        out
    }
}

/// What kind of footing a cell offers. Drives friction, landing behavior,
/// and several planner vetoes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Surface {
    /// Ordinary full block.
    Normal,
    /// High-friction-retention floor (ice-like); landings slide.
    Slippery,
    /// Inverts downward velocity on landing unless sneaking.
    Bouncy,
    /// Returns 66% of downward velocity on landing unless sneaking.
    Springy,
    /// Vine/ladder-like; cancels falls, cannot be jumped from.
    Climbable,
    /// Water-like; swimmable, never solid.
    Liquid,
    /// Lava-like; planner refuses to path adjacent to it.
    Hazard,
    /// Solid but unusable as a parkour landing.
    SoftFarmland,
    /// Half-height block occupying the lower half of its cell.
    BottomSlab,
    /// Stair block; the solid lip faces `facing`.
    Stair { facing: Direction },
    /// Narrow post with a collision box taller than its cell (fence-like).
    TallPost,
    /// Nothing to stand on.
    Open,
}

/// Read-only world access for planning and prediction.
///
/// Implementations must be cheap to query and side-effect free; the planner
/// probes hundreds of cells per source position and the predictor queries
/// collision volumes every simulated tick.
pub trait GridWorld: Sync {
    /// True when an agent's body can occupy the cell (air, liquid,
    /// climbable...). Partial blocks are not passable.
    fn is_passable(&self, cell: Cell) -> bool;

    /// True when an agent can stand on top of the cell.
    fn is_walkable_on(&self, cell: Cell) -> bool;

    /// Footing classification of the cell.
    fn surface(&self, cell: Cell) -> Surface;

    /// Slipperiness of the cell's top face, `BASE_FRICTION` for most blocks.
    fn friction(&self, cell: Cell) -> f64 {
        match self.surface(cell) {
            Surface::Slippery => SLIPPERY_SURFACE_FRICTION,
            Surface::Bouncy => BOUNCY_SURFACE_FRICTION,
            _ => BASE_FRICTION,
        }
    }

    /// Collision boxes intersecting `region`, in world coordinates.
    fn collision_boxes(&self, region: &Aabb) -> Vec<Aabb>;

    /// Cost of placing a support block in `cell`, `COST_INF` when impossible
    /// (no materials, cell not replaceable, or placement disabled host-side).
    fn placement_cost(&self, cell: Cell) -> f64;

    /// True when `cell` holds nothing a placed block would destroy.
    fn is_replaceable(&self, cell: Cell) -> bool;

    /// True when a new block could be placed against this cell's faces.
    fn can_place_against(&self, cell: Cell) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_matches_direction_steps() {
        let south = Cell::new(0, 0, 1);
        for dir in Direction::ALL {
            assert_eq!(dir.rotate_offset(south), dir.step(), "{dir:?}");
        }
    }

    #[test]
    fn rotation_preserves_handedness() {
        // one cell forward, one to the left of the approach
        let offset = Cell::new(1, 0, 2);
        assert_eq!(Direction::West.rotate_offset(offset), Cell::new(-2, 0, 1));
        assert_eq!(Direction::North.rotate_offset(offset), Cell::new(-1, 0, -2));
        assert_eq!(Direction::East.rotate_offset(offset), Cell::new(2, 0, -1));
    }

    #[test]
    fn containing_cell_floors_negative_coordinates() {
        let c = Cell::containing(DVec3::new(-0.2, 1.5, -1.9));
        assert_eq!(c, Cell::new(-1, 1, -2));
    }

    #[test]
    fn opposites_and_turns() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.clockwise().counter_clockwise(), dir);
        }
    }
}
