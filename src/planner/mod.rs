//! Jump planning - candidate enumeration and the cost model.
//!
//! For a source cell and approach direction the planner walks a fixed table
//! of landing offsets, vetoes the ones the world geometry rules out, checks
//! flight-path clearance against the closed-form jump arc, and prices the
//! survivors in ticks. Costs use a calibrated `move_dist` metric rather than
//! raw euclidean distance so reach limits transfer across jump shapes.

mod archetype;
mod candidate;

pub use archetype::{JumpKind, kind_for, offsets};
pub use candidate::CandidateJump;

use glam::DVec3;
use log::debug;
use rayon::prelude::*;

use crate::constants::*;
use crate::helpers::{line_cells, offset_distance, signed_angle};
use crate::physics::{self, EffectKind, EffectMap};
use crate::settings::Settings;
use crate::world::{Cell, Direction, GridWorld, Surface};

/// Landing direction implied by a jump offset: the approach direction bent
/// a quarter turn toward the side the offset leans to.
pub fn dest_direction(direction: Direction, jump_x: i32, jump_z: i32) -> Direction {
    let step = direction.step();
    let angle = signed_angle(
        step.x as f64,
        step.z as f64,
        jump_x as f64,
        jump_z as f64,
    );
    if angle < -5.0 {
        direction.counter_clockwise()
    } else if angle > 5.0 {
        direction.clockwise()
    } else {
        direction
    }
}

/// True when a jump of difficulty `move_dist` cannot be made at walking
/// speed with this technique.
pub(crate) fn needs_sprint(kind: JumpKind, move_dist: f64) -> bool {
    match kind.max_reach_walk() {
        Some(walk) => move_dist > walk,
        None => true,
    }
}

/// Enumerates and prices candidate jumps against one world snapshot.
pub struct JumpPlanner<'a, W: GridWorld + ?Sized> {
    world: &'a W,
    settings: &'a Settings,
    effects: &'a EffectMap,
    /// Tick the effect durations are evaluated at.
    tick: u32,
}

impl<'a, W: GridWorld + ?Sized> JumpPlanner<'a, W> {
    pub fn new(world: &'a W, settings: &'a Settings, effects: &'a EffectMap, tick: u32) -> Self {
        Self {
            world,
            settings,
            effects,
            tick,
        }
    }

    fn jump_boost(&self) -> u32 {
        if self.settings.consider_status_effects {
            self.effects.level_at(EffectKind::JumpBoost, self.tick)
        } else {
            0
        }
    }

    /// Candidates from `src` across all four approach directions, cheapest
    /// first.
    pub fn plan_all_directions(&self, src: Cell) -> Vec<CandidateJump> {
        let mut all: Vec<CandidateJump> = Direction::ALL
            .par_iter()
            .flat_map_iter(|&direction| self.plan_jumps(src, direction))
            .collect();
        all.sort_by(|a, b| {
            a.cost
                .total_cmp(&b.cost)
                .then_with(|| (a.dest.x, a.dest.y, a.dest.z).cmp(&(b.dest.x, b.dest.y, b.dest.z)))
        });
        debug!(
            "planned {} candidate jumps from ({}, {}, {})",
            all.len(),
            src.x,
            src.y,
            src.z
        );
        all
    }

    /// Candidates from `src` leaving through `direction`, cheapest first.
    pub fn plan_jumps(&self, src: Cell, direction: Direction) -> Vec<CandidateJump> {
        let mut out = Vec::new();
        if !self.settings.allow_jumps {
            return out;
        }
        if src.y >= self.settings.height_limit && !self.settings.allow_jump_at_height_limit {
            return out;
        }

        let w = self.world;
        let step = direction.step();
        let adjacent = src + step;
        let mut extra_ascend = 0.0;

        if !w.is_passable(adjacent) {
            return out; // block at foot level directly ahead
        }
        let adj_below = adjacent.below();
        if w.is_walkable_on(adj_below) {
            return out; // walking there is strictly better
        }
        if w.surface(adj_below) == Surface::Hazard {
            return out; // never jump with a hazard at the takeoff edge
        }
        if !w.is_passable(adjacent.above()) || !w.is_passable(adjacent.offset(0, 2, 0)) {
            return out; // head or above-head blocked ahead, no jump can clear
        }
        if !w.is_passable(src.offset(0, 2, 0)) {
            return out; // can't gain height under a ceiling
        }

        match w.surface(src.below()) {
            Surface::Climbable | Surface::Liquid => return out,
            Surface::Stair { facing } if facing == direction.opposite() => {
                return out; // the low lip faces the jump, we'd slip off early
            }
            Surface::BottomSlab => {
                if !self.settings.allow_walk_on_bottom_slab {
                    return out;
                }
                extra_ascend += SLAB_ASCEND;
            }
            _ => {}
        }

        for (&offset, &kind) in archetype::offsets(direction) {
            if (kind == JumpKind::Momentum || kind == JumpKind::EdgeWraparound)
                && !self.settings.allow_momentum_jumps
            {
                continue;
            }

            let dest_flat = src + offset;
            let max_jump = if self.settings.can_sprint {
                kind.max_reach_sprint()
            } else {
                match kind.max_reach_walk() {
                    Some(m) => m,
                    None => continue,
                }
            };

            if !w.is_passable(dest_flat) && kind != JumpKind::StraightDescend {
                // blocked landing at takeoff height: only an ascend can work
                let raised = Cell::new(offset.x, offset.y + 1, offset.z);
                let move_dis = self.move_dist(src, raised, extra_ascend, direction);
                if move_dis > max_jump {
                    continue;
                }
                if self.settings.allow_ascends && w.is_walkable_on(dest_flat) {
                    if self.blocks_in_way(
                        src,
                        offset,
                        1,
                        direction,
                        kind,
                        needs_sprint(kind, move_dis),
                    ) {
                        continue;
                    }
                    self.try_push(
                        &mut out,
                        src,
                        dest_flat.above(),
                        offset,
                        direction,
                        kind,
                        extra_ascend,
                        0.0,
                    );
                }
                continue;
            }

            let move_dis = self.move_dist(src, offset, extra_ascend, direction);
            if move_dis > max_jump {
                continue;
            }

            for descend in 0..self.settings.max_fall_height {
                let landing = Cell::new(dest_flat.x, dest_flat.y - descend - 1, dest_flat.z);
                if w.surface(landing) == Surface::SoftFarmland || !w.is_walkable_on(landing) {
                    continue;
                }
                let sprint = needs_sprint(
                    kind,
                    move_dis + descend as f64 * DESCEND_DIST_PER_BLOCK,
                );
                if self.blocks_in_way(src, offset, -descend, direction, kind, sprint) {
                    continue;
                }
                // straight-line offsets landing level are plain jumps
                let level_kind = if kind == JumpKind::StraightDescend && descend == 0 {
                    JumpKind::Straight
                } else {
                    kind
                };
                self.try_push(
                    &mut out,
                    src,
                    landing.above(),
                    offset,
                    direction,
                    level_kind,
                    extra_ascend - descend as f64,
                    0.0,
                );
            }

            // nothing to land on: consider placing a support block
            if !self.settings.allow_block_placement || kind == JumpKind::StraightDescend {
                continue;
            }
            let support = dest_flat.below();
            let place_cost = w.placement_cost(support);
            if place_cost >= COST_INF || !w.is_replaceable(support) {
                continue;
            }
            let run_x = offset.x - step.x;
            let run_z = offset.z - step.z;
            let run_len = ((run_x * run_x + run_z * run_z) as f64).sqrt();
            let mut clearance_checked = false;
            for against in [
                Cell::new(0, 0, 1),
                Cell::new(-1, 0, 0),
                Cell::new(0, 0, -1),
                Cell::new(1, 0, 0),
                Cell::new(0, -1, 0),
            ] {
                if !w.can_place_against(support + against) {
                    continue;
                }
                // placing mid-flight only works on faces we can turn to
                let angle = (((against.x * run_x + against.z * run_z) as f64) / run_len)
                    .acos()
                    .to_degrees();
                if angle > 90.0 {
                    continue;
                }
                if !clearance_checked {
                    if self.blocks_in_way(
                        src,
                        offset,
                        0,
                        direction,
                        kind,
                        needs_sprint(kind, move_dis),
                    ) {
                        break;
                    }
                    clearance_checked = true;
                }
                self.try_push(
                    &mut out,
                    src,
                    dest_flat,
                    offset,
                    direction,
                    kind,
                    extra_ascend,
                    place_cost,
                );
            }
        }

        out.sort_by(|a, b| {
            a.cost
                .total_cmp(&b.cost)
                .then_with(|| (a.dest.x, a.dest.y, a.dest.z).cmp(&(b.dest.x, b.dest.y, b.dest.z)))
        });
        out
    }

    /// Re-derive the cost of an existing candidate against the current
    /// world. Returns `COST_INF` when the jump is no longer viable.
    pub fn refresh_cost(&self, c: &CandidateJump) -> f64 {
        let init_kind = if matches!(c.kind, JumpKind::MomentumWall | JumpKind::MomentumNoWall) {
            JumpKind::Momentum
        } else {
            c.kind
        };

        let mut extra_ascend = 0.0;
        if self.world.surface(c.src.below()) == Surface::BottomSlab {
            if !self.settings.allow_walk_on_bottom_slab {
                return COST_INF;
            }
            extra_ascend += SLAB_ASCEND;
        }
        let move_dis = self.move_dist(c.src, c.jump, extra_ascend, c.direction);

        if (init_kind == JumpKind::Momentum || init_kind == JumpKind::EdgeWraparound)
            && !self.settings.allow_momentum_jumps
        {
            return COST_INF;
        }

        let max_jump = if self.settings.can_sprint {
            c.kind.max_reach_sprint()
        } else {
            match c.kind.max_reach_walk() {
                Some(m) => m,
                None => return COST_INF,
            }
        };

        if move_dis <= max_jump
            && !self.blocks_in_way(
                c.src,
                c.jump,
                0,
                c.direction,
                init_kind,
                needs_sprint(c.kind, move_dis),
            )
        {
            let (cost, _) = self.cost_from_jump(
                c.src,
                c.jump.x,
                c.jump.y,
                c.jump.z,
                extra_ascend,
                c.direction,
                c.kind,
            );
            return cost;
        }
        COST_INF
    }

    /// Difficulty metric for a jump offset: run length after the mandatory
    /// first step, a turning penalty, and an ascend/descend adjustment.
    fn move_dist(&self, src: Cell, jump: Cell, extra_ascend: f64, direction: Direction) -> f64 {
        let mut ascend = jump.y as f64 + extra_ascend;
        // landing on a bottom slab halves the effective ascend
        if self.world.surface(Cell::new(src.x + jump.x, src.y + jump.y - 1, src.z + jump.z))
            == Surface::BottomSlab
        {
            ascend -= SLAB_ASCEND;
        }

        let step = direction.step();
        let x = jump.x - step.x;
        let z = jump.z - step.z;
        let mut distance = ((x * x + z * z) as f64).sqrt();
        let angle = (((x * step.x + z * step.z) as f64) / distance).acos();
        distance += TURN_COST_PER_RADIAN * angle + 1.0;

        if ascend > 0.0 {
            if ascend > physics::max_jump_height(true, self.jump_boost()) {
                return COST_INF;
            }
            distance += ascend * ASCEND_DIST_PER_BLOCK;
        } else {
            distance += -ascend * DESCEND_DIST_PER_BLOCK;
        }
        distance
    }

    /// Walks the flight path and reports whether any cell the agent's body
    /// sweeps through is blocked. Flight height per path cell comes from the
    /// closed-form arc using an estimated per-tick stride.
    fn blocks_in_way(
        &self,
        src: Cell,
        jump: Cell,
        dy_offset: i32,
        direction: Direction,
        kind: JumpKind,
        sprint: bool,
    ) -> bool {
        let w = self.world;
        let jump_y = jump.y + dy_offset;
        let dest = Cell::new(src.x + jump.x, src.y + jump_y, src.z + jump.z);
        if !w.is_passable(dest) || !w.is_passable(dest.above()) {
            return true; // landing itself is blocked
        }
        let dd = dest_direction(direction, jump.x, jump.z);
        let entry = match self.entry_direction(src, jump.x, jump_y, jump.z, direction, dd, kind) {
            Some(e) => e,
            None => return true,
        };

        let step = direction.step();
        let entry_step = entry.step();
        let end = Cell::new(
            jump.x - entry_step.x - step.x,
            jump_y,
            jump.z - entry_step.z - step.z,
        );
        let mut path = line_cells(end);

        let mut step_size = if sprint {
            SPRINT_JUMP_PER_TICK
        } else {
            WALK_JUMP_PER_TICK
        };
        if kind.is_momentum() {
            // the wind-up swings through the cell behind and above the head
            path.push(Cell::new(-step.x, 2, -step.z));
            step_size = MOMENTUM_JUMP_PER_TICK;
        }

        let boost = self.jump_boost();
        let mut prev_height = 0.0;
        let mut prev_tick = 0i32;
        for cell in path {
            let distance = ((cell.x * cell.x + cell.z * cell.z) as f64).sqrt();
            let tick = (distance / step_size) as i32 + 1;
            if tick == prev_tick + 1 {
                prev_height += physics::fall_velocity(tick as u32, true, boost);
                prev_tick = tick;
            } else if tick != prev_tick {
                prev_height = physics::fall_position(tick as u32, true, boost);
                prev_tick = tick;
            }
            // feet through head for the flight height over this cell
            let lowest = prev_height as i32;
            let highest = (AGENT_HEIGHT + prev_height).ceil() as i32;
            for j in lowest..=highest {
                let check = Cell::new(
                    src.x + step.x + cell.x,
                    src.y + cell.y + j,
                    src.z + step.z + cell.z,
                );
                if !w.is_passable(check) {
                    return true;
                }
            }
        }
        false
    }

    /// Which side of the landing cell the agent can enter through, preferring
    /// whichever open side bends the flight path least. `None` when every
    /// usable side is walled off.
    fn entry_direction(
        &self,
        src: Cell,
        jump_x: i32,
        jump_y: i32,
        jump_z: i32,
        direction: Direction,
        dd: Direction,
        kind: JumpKind,
    ) -> Option<Direction> {
        let w = self.world;
        let direction = if kind == JumpKind::EdgeWraparound {
            direction.opposite()
        } else {
            direction
        };
        let step = direction.step();
        let dest = Cell::new(src.x + jump_x, src.y + jump_y, src.z + jump_z);
        let landing_on_slab = w.surface(dest.below()) == Surface::BottomSlab;

        let run_x = (jump_x - step.x) as f64;
        let run_z = (jump_z - step.z) as f64;

        let mut dd_angle = -1.0;
        if direction != dd && kind != JumpKind::EdgeWraparound {
            let c = dest - dd.step();
            if w.is_passable(c)
                && w.is_passable(c.above())
                && (!landing_on_slab || w.is_passable(c.below()))
            {
                let dd_step = dd.step();
                dd_angle =
                    signed_angle(dd_step.x as f64, dd_step.z as f64, run_x, run_z).abs();
            }
        }

        let c = dest - step;
        if w.is_passable(c)
            && w.is_passable(c.above())
            && (!landing_on_slab || w.is_passable(c.below()))
        {
            let dir_angle = signed_angle(step.x as f64, step.z as f64, run_x, run_z).abs();
            if dd_angle >= 0.0 && dd_angle < dir_angle {
                return Some(dd);
            }
            return Some(direction);
        }
        if dd_angle >= 0.0 {
            return Some(dd);
        }
        None
    }

    /// Price a jump and resolve its final technique. Momentum splits on the
    /// wall behind the source; wraparounds fold onto the adjacent cell.
    fn cost_from_jump(
        &self,
        src: Cell,
        jump_x: i32,
        jump_y: i32,
        jump_z: i32,
        extra_ascend: f64,
        direction: Direction,
        kind: JumpKind,
    ) -> (f64, JumpKind) {
        let w = self.world;
        let mut kind = kind;
        let mut cost_mod = 0.0;
        if w.surface(Cell::new(src.x + jump_x, src.y + jump_y - 1, src.z + jump_z))
            == Surface::Liquid
        {
            cost_mod = LIQUID_LANDING_COST;
        }

        match kind {
            JumpKind::Momentum => {
                let step = direction.step();
                let behind = src - step;
                if w.is_passable(behind) && w.is_passable(behind.above()) {
                    kind = JumpKind::MomentumNoWall;
                    if jump_x != 0 && jump_z != 0 && jump_y >= 0 {
                        return (COST_INF, kind); // angled wind-up is unsafe
                    }
                    if w.is_walkable_on(behind.below()) {
                        return (COST_INF, kind); // backing onto a ledge is unsafe
                    }
                } else {
                    kind = JumpKind::MomentumWall;
                }
            }
            JumpKind::EdgeWraparound => {
                let sx = jump_x.signum();
                let sz = jump_z.signum();
                if w.is_passable(Cell::new(src.x + sx, src.y + 1, src.z + sz)) {
                    // a plain jump fits, wrapping around would waste ticks
                    return (COST_INF, kind);
                }
            }
            _ => {}
        }

        let air_time = match physics::jump_time(jump_y as f64 + extra_ascend, true, self.jump_boost())
        {
            Some(t) => t as f64,
            None => return (COST_INF, kind),
        };
        (
            kind.prep_cost() + air_time + cost_mod + LAND_COST,
            kind,
        )
    }

    /// Validate, price, and append one landing. Drops candidates priced at
    /// or above `COST_INF`.
    #[allow(clippy::too_many_arguments)]
    fn try_push(
        &self,
        out: &mut Vec<CandidateJump>,
        src: Cell,
        dest: Cell,
        offset: Cell,
        direction: Direction,
        kind: JumpKind,
        extra_ascend: f64,
        cost_modifier: f64,
    ) {
        let dy = dest.y - src.y;

        // sharp edge offsets overlap a plain jump entered from the bent
        // direction; keep only the one the plain technique cannot fly
        if kind == JumpKind::Edge
            && matches!((offset.x.abs(), offset.z.abs()), (1, 3) | (3, 1))
        {
            let dd = dest_direction(direction, offset.x, offset.z);
            let md = self.move_dist(src, Cell::new(offset.x, dy, offset.z), extra_ascend, dd);
            if !self.blocks_in_way(
                src,
                offset,
                dy,
                dd,
                JumpKind::Straight,
                needs_sprint(JumpKind::Straight, md),
            ) {
                return;
            }
        }

        let (cost, resolved) =
            self.cost_from_jump(src, offset.x, dy, offset.z, extra_ascend, direction, kind);
        let cost = cost + cost_modifier;
        if cost < COST_INF {
            out.push(self.describe(src, dest, direction, resolved, cost));
        }
    }

    /// Fill in the execution geometry for an accepted landing.
    fn describe(
        &self,
        src: Cell,
        dest: Cell,
        direction: Direction,
        kind: JumpKind,
        cost: f64,
    ) -> CandidateJump {
        let w = self.world;
        let jump = dest - src;
        // move_dist subtracts the slab height of the landing itself
        let extra_ascend = if w.surface(src.below()) == Surface::BottomSlab {
            SLAB_ASCEND
        } else {
            0.0
        };
        let move_dist = self.move_dist(src, jump, extra_ascend, direction);

        let mut ascend = jump.y as f64 + extra_ascend;
        if w.surface(dest.below()) == Surface::BottomSlab {
            ascend -= SLAB_ASCEND;
        }
        let distance_xz = offset_distance(Cell::new(jump.x, 0, jump.z), direction);
        let step = direction.step();
        let jump_angle = signed_angle(
            step.x as f64,
            step.z as f64,
            jump.x as f64,
            jump.z as f64,
        );
        let dd = dest_direction(direction, jump.x, jump.z);
        let entry_direction = self
            .entry_direction(src, jump.x, jump.y, jump.z, direction, dd, kind)
            .unwrap_or(direction);
        let entry_step = entry_direction.step();
        let entry_point = DVec3::new(
            dest.x as f64 + 0.5 + entry_step.x as f64 * 0.5,
            dest.y as f64 + ascend,
            dest.z as f64 + 0.5 + entry_step.z as f64 * 0.5,
        );

        CandidateJump {
            src,
            dest,
            jump,
            direction,
            dest_direction: dd,
            entry_direction,
            entry_point,
            jump_angle,
            kind,
            move_dist,
            distance_xz,
            ascend,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Block, GridMap};

    fn flat_gap_world() -> GridMap {
        let mut w = GridMap::new();
        w.set(Cell::new(0, -1, 0), Block::Solid);
        w.set(Cell::new(0, -1, 3), Block::Solid);
        w
    }

    #[test]
    fn flat_gap_yields_one_straight_candidate() {
        let w = flat_gap_world();
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        assert_eq!(jumps.len(), 1);
        let c = &jumps[0];
        assert_eq!(c.dest, Cell::new(0, 0, 3));
        assert_eq!(c.kind, JumpKind::Straight);
        assert_eq!(c.entry_direction, Direction::South);
        // 4 prep + 12 airborne + 3 landing
        assert!((c.cost - 19.0).abs() < 1e-9, "cost {}", c.cost);
        assert!(!c.requires_sprint());
    }

    #[test]
    fn all_directions_finds_only_the_southern_gap() {
        let w = flat_gap_world();
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        let jumps = planner.plan_all_directions(Cell::new(0, 0, 0));
        assert_eq!(jumps.len(), 1);
        assert_eq!(jumps[0].direction, Direction::South);
    }

    #[test]
    fn refresh_matches_planned_cost() {
        let w = flat_gap_world();
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        let c = &jumps[0];
        assert!((planner.refresh_cost(c) - c.cost).abs() < 1e-9);
    }

    #[test]
    fn refresh_prices_out_a_filled_gap() {
        let mut w = flat_gap_world();
        let settings = Settings::default();
        let fx = EffectMap::new();
        let c = {
            let planner = JumpPlanner::new(&w, &settings, &fx, 0);
            planner.plan_jumps(Cell::new(0, 0, 0), Direction::South)[0].clone()
        };
        // a wall grew across the flight path since planning
        w.set(Cell::new(0, 1, 2), Block::Solid);
        w.set(Cell::new(0, 2, 2), Block::Solid);
        w.set(Cell::new(0, 3, 2), Block::Solid);
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);
        assert!(planner.refresh_cost(&c) >= COST_INF);
    }

    #[test]
    fn long_gap_resolves_to_momentum_without_wall() {
        let mut w = GridMap::new();
        w.set(Cell::new(0, -1, 0), Block::Solid);
        w.set(Cell::new(0, -1, 5), Block::Solid);
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        assert_eq!(jumps.len(), 1);
        let c = &jumps[0];
        assert_eq!(c.kind, JumpKind::MomentumNoWall);
        assert_eq!(c.dest, Cell::new(0, 0, 5));
        assert!(c.requires_sprint());
        // 18 prep + 12 airborne + 3 landing
        assert!((c.cost - 33.0).abs() < 1e-9, "cost {}", c.cost);
    }

    #[test]
    fn wall_behind_source_cheapens_the_windup() {
        let mut w = GridMap::new();
        w.set(Cell::new(0, -1, 0), Block::Solid);
        w.set(Cell::new(0, -1, 5), Block::Solid);
        w.set(Cell::new(0, 0, -1), Block::Solid);
        w.set(Cell::new(0, 1, -1), Block::Solid);
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        assert_eq!(jumps.len(), 1);
        assert_eq!(jumps[0].kind, JumpKind::MomentumWall);
        assert!((jumps[0].cost - 30.0).abs() < 1e-9);
    }

    #[test]
    fn momentum_flag_prunes_long_gaps() {
        let mut w = GridMap::new();
        w.set(Cell::new(0, -1, 0), Block::Solid);
        w.set(Cell::new(0, -1, 5), Block::Solid);
        let settings = Settings {
            allow_momentum_jumps: false,
            ..Settings::default()
        };
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        assert!(planner.plan_jumps(Cell::new(0, 0, 0), Direction::South).is_empty());
    }

    #[test]
    fn blocked_diagonal_becomes_an_ascend() {
        let mut w = GridMap::new();
        w.set(Cell::new(0, -1, 0), Block::Solid);
        w.set(Cell::new(1, 0, 1), Block::Solid);
        let fx = EffectMap::new();

        let settings = Settings::default();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);
        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        assert_eq!(jumps.len(), 1);
        let c = &jumps[0];
        assert_eq!(c.dest, Cell::new(1, 1, 1));
        assert_eq!(c.kind, JumpKind::Straight);
        assert!((c.ascend - 1.0).abs() < 1e-9);
        // 4 prep + 8 airborne + 3 landing
        assert!((c.cost - 15.0).abs() < 1e-9, "cost {}", c.cost);

        let settings = Settings {
            allow_ascends: false,
            ..Settings::default()
        };
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);
        assert!(planner.plan_jumps(Cell::new(0, 0, 0), Direction::South).is_empty());
    }

    #[test]
    fn wraparound_goes_behind_the_pillar() {
        let mut w = GridMap::new();
        w.set(Cell::new(0, -1, 0), Block::Solid);
        w.set(Cell::new(1, 0, 0), Block::Solid);
        w.set(Cell::new(1, 1, 0), Block::Solid);
        w.set(Cell::new(2, -1, 0), Block::Solid);
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        assert_eq!(jumps.len(), 1);
        let c = &jumps[0];
        assert_eq!(c.kind, JumpKind::EdgeWraparound);
        assert_eq!(c.dest, Cell::new(2, 0, 0));
        // 7 prep + 12 airborne + 3 landing
        assert!((c.cost - 22.0).abs() < 1e-9, "cost {}", c.cost);
    }

    #[test]
    fn open_side_discards_the_wraparound() {
        // same landing but no pillar to wrap: the sideways hop is strictly
        // worse than jumping straight at it from another heading
        let mut w = GridMap::new();
        w.set(Cell::new(0, -1, 0), Block::Solid);
        w.set(Cell::new(2, -1, 0), Block::Solid);
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        assert!(planner.plan_jumps(Cell::new(0, 0, 0), Direction::South).is_empty());
    }

    #[test]
    fn hazard_at_the_takeoff_edge_vetoes_everything() {
        let mut w = flat_gap_world();
        w.set(Cell::new(0, -1, 1), Block::Hazard);
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        assert!(planner.plan_jumps(Cell::new(0, 0, 0), Direction::South).is_empty());
    }

    #[test]
    fn walkable_next_step_prefers_traversal() {
        let mut w = flat_gap_world();
        w.set(Cell::new(0, -1, 1), Block::Solid);
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        assert!(planner.plan_jumps(Cell::new(0, 0, 0), Direction::South).is_empty());
    }

    #[test]
    fn walk_reach_boundary_is_exclusive() {
        assert!(!needs_sprint(JumpKind::Straight, MAX_JUMP_WALK));
        assert!(needs_sprint(JumpKind::Straight, MAX_JUMP_WALK + 1e-9));
        assert!(needs_sprint(JumpKind::Momentum, 0.0));
    }

    #[test]
    fn placement_offers_a_landing_where_none_exists() {
        let mut w = GridMap::new();
        w.set(Cell::new(0, -1, 0), Block::Solid);
        // a block to place against, one below the support spot
        w.set(Cell::new(1, -2, 1), Block::Solid);
        let settings = Settings {
            allow_block_placement: true,
            ..Settings::default()
        };
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        assert_eq!(jumps.len(), 2);
        // descending onto the existing block is cheaper than placing
        assert_eq!(jumps[0].dest, Cell::new(1, -1, 1));
        assert!((jumps[0].cost - 20.0).abs() < 1e-9, "cost {}", jumps[0].cost);
        // the placed support carries the 20-tick placement charge
        assert_eq!(jumps[1].dest, Cell::new(1, 0, 1));
        assert!((jumps[1].cost - 39.0).abs() < 1e-9, "cost {}", jumps[1].cost);
    }

    #[test]
    fn jump_boost_changes_airtime_pricing() {
        let w = flat_gap_world();
        let settings = Settings::default();
        let mut fx = EffectMap::new();
        fx.insert(EffectKind::JumpBoost, 0, 1000);
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);
        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        // 4 prep + 13 airborne (higher arc) + 3 landing
        assert!((jumps[0].cost - 20.0).abs() < 1e-9, "cost {}", jumps[0].cost);

        let settings = Settings {
            consider_status_effects: false,
            ..Settings::default()
        };
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);
        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        assert!((jumps[0].cost - 19.0).abs() < 1e-9);
    }

    #[test]
    fn slab_takeoff_raises_the_effective_ascend() {
        let mut w = GridMap::new();
        w.set(Cell::new(0, -1, 0), Block::BottomSlab);
        w.set(Cell::new(0, -1, 3), Block::Solid);
        let settings = Settings::default();
        let fx = EffectMap::new();
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);

        let jumps = planner.plan_jumps(Cell::new(0, 0, 0), Direction::South);
        assert_eq!(jumps.len(), 1);
        let c = &jumps[0];
        assert!((c.ascend - 0.5).abs() < 1e-9);
        // 4 prep + 9 airborne (the arc crosses the half-block level early) + 3
        assert!((c.cost - 16.0).abs() < 1e-9, "cost {}", c.cost);
        assert!(!c.requires_sprint());

        let settings = Settings {
            allow_walk_on_bottom_slab: false,
            ..Settings::default()
        };
        let planner = JumpPlanner::new(&w, &settings, &fx, 0);
        assert!(planner.plan_jumps(Cell::new(0, 0, 0), Direction::South).is_empty());
    }

    #[test]
    fn rotated_worlds_plan_rotated_jumps() {
        let src = Cell::new(0, 0, 0);
        let mut reference_cost = None;
        for dir in Direction::ALL {
            let step = dir.step();
            let mut w = GridMap::new();
            w.set(src.below(), Block::Solid);
            w.set(Cell::new(step.x * 3, -1, step.z * 3), Block::Solid);
            let settings = Settings::default();
            let fx = EffectMap::new();
            let planner = JumpPlanner::new(&w, &settings, &fx, 0);

            let jumps = planner.plan_jumps(src, dir);
            assert_eq!(jumps.len(), 1, "{dir:?}");
            let c = &jumps[0];
            assert_eq!(c.dest, Cell::new(step.x * 3, 0, step.z * 3), "{dir:?}");
            assert_eq!(c.kind, JumpKind::Straight);
            let cost = *reference_cost.get_or_insert(c.cost);
            assert!((c.cost - cost).abs() < 1e-9, "{dir:?} cost {}", c.cost);
        }
    }
}
