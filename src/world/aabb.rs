//! Axis-aligned collision boxes.

use glam::DVec3;

use crate::world::Cell;

/// Axis-aligned bounding box in world coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Full unit cube of a cell.
    pub fn cell_cube(c: Cell) -> Self {
        let min = DVec3::new(c.x as f64, c.y as f64, c.z as f64);
        Self::new(min, min + DVec3::ONE)
    }

    /// Box occupying the bottom `height` of a cell.
    pub fn cell_slab(c: Cell, height: f64) -> Self {
        let min = DVec3::new(c.x as f64, c.y as f64, c.z as f64);
        Self::new(min, min + DVec3::new(1.0, height, 1.0))
    }

    /// Agent bounding box for feet at `pos`.
    pub fn agent(pos: DVec3, half_width: f64, height: f64) -> Self {
        Self::new(
            DVec3::new(pos.x - half_width, pos.y, pos.z - half_width),
            DVec3::new(pos.x + half_width, pos.y + height, pos.z + half_width),
        )
    }

    /// Feet position of an agent box (bottom center).
    pub fn bottom_center(&self) -> DVec3 {
        DVec3::new(
            (self.min.x + self.max.x) * 0.5,
            self.min.y,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn translated(&self, d: DVec3) -> Self {
        Self::new(self.min + d, self.max + d)
    }

    /// Grow the box in the direction of a displacement, producing the swept
    /// region a move through `d` can touch.
    pub fn swept(&self, d: DVec3) -> Self {
        let mut out = *self;
        if d.x < 0.0 {
            out.min.x += d.x;
        } else {
            out.max.x += d.x;
        }
        if d.y < 0.0 {
            out.min.y += d.y;
        } else {
            out.max.y += d.y;
        }
        if d.z < 0.0 {
            out.min.z += d.z;
        } else {
            out.max.z += d.z;
        }
        out
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Clamp a proposed X displacement of `moving` so it cannot penetrate
    /// this box. Only applies when the boxes overlap on the other two axes;
    /// each axis resolves independently.
    pub fn clamp_x_offset(&self, moving: &Aabb, dx: f64) -> f64 {
        if moving.max.y <= self.min.y || moving.min.y >= self.max.y {
            return dx;
        }
        if moving.max.z <= self.min.z || moving.min.z >= self.max.z {
            return dx;
        }
        if dx > 0.0 && moving.max.x <= self.min.x {
            dx.min(self.min.x - moving.max.x)
        } else if dx < 0.0 && moving.min.x >= self.max.x {
            dx.max(self.max.x - moving.min.x)
        } else {
            dx
        }
    }

    /// Clamp a proposed Y displacement. See [`Aabb::clamp_x_offset`].
    pub fn clamp_y_offset(&self, moving: &Aabb, dy: f64) -> f64 {
        if moving.max.x <= self.min.x || moving.min.x >= self.max.x {
            return dy;
        }
        if moving.max.z <= self.min.z || moving.min.z >= self.max.z {
            return dy;
        }
        if dy > 0.0 && moving.max.y <= self.min.y {
            dy.min(self.min.y - moving.max.y)
        } else if dy < 0.0 && moving.min.y >= self.max.y {
            dy.max(self.max.y - moving.min.y)
        } else {
            dy
        }
    }

    /// Clamp a proposed Z displacement. See [`Aabb::clamp_x_offset`].
    pub fn clamp_z_offset(&self, moving: &Aabb, dz: f64) -> f64 {
        if moving.max.x <= self.min.x || moving.min.x >= self.max.x {
            return dz;
        }
        if moving.max.y <= self.min.y || moving.min.y >= self.max.y {
            return dz;
        }
        if dz > 0.0 && moving.max.z <= self.min.z {
            dz.min(self.min.z - moving.max.z)
        } else if dz < 0.0 && moving.min.z >= self.max.z {
            dz.max(self.max.z - moving.min.z)
        } else {
            dz
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_at(x: f64, y: f64, z: f64) -> Aabb {
        Aabb::agent(DVec3::new(x, y, z), 0.3, 1.8)
    }

    #[test]
    fn z_clamp_stops_at_face() {
        let wall = Aabb::cell_cube(Cell::new(0, 0, 1));
        let agent = agent_at(0.5, 0.0, 0.5);
        let clamped = wall.clamp_z_offset(&agent, 1.0);
        assert!((clamped - 0.2).abs() < 1e-12);
        // already flush: no further motion allowed
        let flush = agent.translated(DVec3::new(0.0, 0.0, clamped));
        assert_eq!(wall.clamp_z_offset(&flush, 1.0), 0.0);
    }

    #[test]
    fn clamps_are_per_axis() {
        // box offset diagonally must not affect pure X motion when the
        // agent's Z extent misses it entirely
        let block = Aabb::cell_cube(Cell::new(1, 0, 3));
        let agent = agent_at(0.5, 0.0, 0.5);
        assert_eq!(block.clamp_x_offset(&agent, 5.0), 5.0);
        // but once Z overlaps, X clamps at the face
        let agent_near = agent_at(0.5, 0.0, 3.5);
        assert!((block.clamp_x_offset(&agent_near, 5.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn y_clamp_only_against_motion() {
        let floor = Aabb::cell_cube(Cell::new(0, -1, 0));
        let agent = agent_at(0.5, 0.5, 0.5);
        // falling: stops on the top face
        assert!((floor.clamp_y_offset(&agent, -2.0) - (-0.5)).abs() < 1e-12);
        // rising: unaffected by a box below
        assert_eq!(floor.clamp_y_offset(&agent, 0.3), 0.3);
    }

    #[test]
    fn swept_region_covers_both_endpoints() {
        let agent = agent_at(0.5, 0.0, 0.5);
        let swept = agent.swept(DVec3::new(1.0, -0.5, 0.0));
        assert!(swept.intersects(&agent));
        assert!(swept.intersects(&agent.translated(DVec3::new(1.0, -0.5, 0.0))));
    }
}
