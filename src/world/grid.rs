//! Map-backed world implementation.
//!
//! Levels for headless runs and tests are authored by writing [`Block`]s into
//! a [`GridMap`]; unset cells are open air. This is deliberately a plain
//! `HashMap` so fixtures stay one-liners.

use std::collections::HashMap;

use crate::constants::*;
use crate::world::{Aabb, Cell, Direction, GridWorld, Surface};

/// Block kinds a [`GridMap`] can hold.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Block {
    Solid,
    /// Ice-like full block.
    Slick,
    /// Slime-like full block.
    Bouncy,
    /// Bed-like block, returns part of the landing velocity.
    Springy,
    /// Ladder/vine; occupies the cell but an agent passes through it.
    Climbable,
    Liquid,
    /// Lava-like.
    Hazard,
    /// Tilled soil; solid, but not a landing the planner accepts.
    Farmland,
    /// Slab filling the lower half of its cell.
    BottomSlab,
    /// Stair whose tall half faces the given direction.
    Stair(Direction),
    /// Fence/wall; collision extends half a block above the cell.
    Fence,
}

/// Sparse grid of blocks. Unset cells are open air.
#[derive(Default)]
pub struct GridMap {
    cells: HashMap<Cell, Block>,
}

impl GridMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, cell: Cell, block: Block) -> &mut Self {
        self.cells.insert(cell, block);
        self
    }

    pub fn clear(&mut self, cell: Cell) -> &mut Self {
        self.cells.remove(&cell);
        self
    }

    pub fn get(&self, cell: Cell) -> Option<Block> {
        self.cells.get(&cell).copied()
    }

    /// Fill an inclusive box of cells with one block kind.
    pub fn fill(&mut self, from: Cell, to: Cell, block: Block) -> &mut Self {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                for z in from.z.min(to.z)..=from.z.max(to.z) {
                    self.cells.insert(Cell::new(x, y, z), block);
                }
            }
        }
        self
    }

    /// Flat floor whose top face is at `y`, spanning the inclusive XZ range.
    pub fn floor(&mut self, from_x: i32, from_z: i32, to_x: i32, to_z: i32, y: i32) -> &mut Self {
        self.fill(
            Cell::new(from_x, y - 1, from_z),
            Cell::new(to_x, y - 1, to_z),
            Block::Solid,
        )
    }
}

impl GridWorld for GridMap {
    fn is_passable(&self, cell: Cell) -> bool {
        matches!(
            self.get(cell),
            None | Some(Block::Liquid) | Some(Block::Hazard) | Some(Block::Climbable)
        )
    }

    fn is_walkable_on(&self, cell: Cell) -> bool {
        matches!(
            self.get(cell),
            Some(
                Block::Solid
                    | Block::Slick
                    | Block::Bouncy
                    | Block::Springy
                    | Block::Farmland
                    | Block::BottomSlab
                    | Block::Stair(_)
                    | Block::Fence
            )
        )
    }

    fn surface(&self, cell: Cell) -> Surface {
        match self.get(cell) {
            None => Surface::Open,
            Some(Block::Solid) => Surface::Normal,
            Some(Block::Slick) => Surface::Slippery,
            Some(Block::Bouncy) => Surface::Bouncy,
            Some(Block::Springy) => Surface::Springy,
            Some(Block::Climbable) => Surface::Climbable,
            Some(Block::Liquid) => Surface::Liquid,
            Some(Block::Hazard) => Surface::Hazard,
            Some(Block::Farmland) => Surface::SoftFarmland,
            Some(Block::BottomSlab) => Surface::BottomSlab,
            Some(Block::Stair(facing)) => Surface::Stair { facing },
            Some(Block::Fence) => Surface::TallPost,
        }
    }

    fn collision_boxes(&self, region: &Aabb) -> Vec<Aabb> {
        let mut out = Vec::new();
        let min = Cell::containing(region.min);
        let max = Cell::containing(region.max);
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    let cell = Cell::new(x, y, z);
                    let mut boxes: Vec<Aabb> = Vec::new();
                    match self.get(cell) {
                        Some(
                            Block::Solid
                            | Block::Slick
                            | Block::Bouncy
                            | Block::Springy
                            | Block::Farmland,
                        ) => boxes.push(Aabb::cell_cube(cell)),
                        Some(Block::BottomSlab) => boxes.push(Aabb::cell_slab(cell, 0.5)),
                        Some(Block::Fence) => boxes.push(fence_box(cell)),
                        Some(Block::Stair(facing)) => boxes.extend(stair_boxes(cell, facing)),
                        _ => {}
                    }
                    for b in boxes {
                        if b.intersects(region) {
                            out.push(b);
                        }
                    }
                }
            }
        }
        out
    }

    fn placement_cost(&self, cell: Cell) -> f64 {
        if self.is_replaceable(cell) {
            PLACE_BLOCK_COST
        } else {
            COST_INF
        }
    }

    fn is_replaceable(&self, cell: Cell) -> bool {
        matches!(self.get(cell), None | Some(Block::Liquid))
    }

    fn can_place_against(&self, cell: Cell) -> bool {
        matches!(
            self.get(cell),
            Some(
                Block::Solid
                    | Block::Slick
                    | Block::Bouncy
                    | Block::Springy
                    | Block::Farmland
                    | Block::Stair(_)
            )
        )
    }
}

/// Cost [`GridMap`] charges for placing one support block.
pub const PLACE_BLOCK_COST: f64 = 20.0;

fn fence_box(cell: Cell) -> Aabb {
    let x = cell.x as f64;
    let y = cell.y as f64;
    let z = cell.z as f64;
    // narrow post, half a block taller than its cell
    Aabb::new(
        glam::DVec3::new(x + 0.375, y, z + 0.375),
        glam::DVec3::new(x + 0.625, y + 1.5, z + 0.625),
    )
}

fn stair_boxes(cell: Cell, facing: Direction) -> [Aabb; 2] {
    let base = Aabb::cell_slab(cell, 0.5);
    // the tall half occupies the side the stair faces
    let mut top = Aabb::cell_cube(cell);
    match facing {
        Direction::South => top.min.z += 0.5,
        Direction::North => top.max.z -= 0.5,
        Direction::East => top.min.x += 0.5,
        Direction::West => top.max.x -= 0.5,
    }
    [base, top]
}
