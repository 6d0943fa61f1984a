//! Small geometry helpers shared by the planner and the executor.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use glam::DVec3;

use crate::constants::*;
use crate::world::Cell;

/// Signed angle in degrees from vector (x1, z1) to vector (x2, z2),
/// positive clockwise when viewed from above.
pub fn signed_angle(x1: f64, z1: f64, x2: f64, z2: f64) -> f64 {
    (x1 * z2 - z1 * x2).atan2(x1 * x2 + z1 * z2).to_degrees()
}

/// Signed angle between the XZ projections of two vectors.
pub fn signed_angle_vec(v1: DVec3, v2: DVec3) -> f64 {
    signed_angle(v1.x, v1.z, v2.x, v2.z)
}

/// Yaw (degrees) an agent must face to walk along `d`. Zero faces +Z,
/// positive yaw turns toward -X.
pub fn vec_yaw(d: DVec3) -> f64 {
    (-d.x).atan2(d.z).to_degrees()
}

/// Unit look vector for a yaw in degrees.
pub fn look_vec(yaw_deg: f64) -> DVec3 {
    let r = yaw_deg.to_radians();
    DVec3::new(-r.sin(), 0.0, r.cos())
}

static DISTANCE_CACHE: LazyLock<Mutex<HashMap<(i32, i32, i32), f64>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Memoized length of an integer offset. The planner asks for the same
/// handful of offsets for every source cell, so this is worth caching.
pub fn cached_distance(c: Cell) -> f64 {
    let key = (c.x.abs(), c.y.abs(), c.z.abs());
    let compute =
        || ((key.0 * key.0 + key.1 * key.1 + key.2 * key.2) as f64).sqrt();
    if let Ok(mut cache) = DISTANCE_CACHE.lock() {
        *cache.entry(key).or_insert_with(compute)
    } else {
        compute()
    }
}

/// Run-up length of a jump offset: the part after the mandatory first step
/// in `direction`, plus one.
pub fn offset_distance(c: Cell, direction: crate::world::Direction) -> f64 {
    let step = direction.step();
    cached_distance(Cell::new(c.x - step.x, c.y, c.z - step.z)) + 1.0
}

/// Ordered, deduplicated cells touched by a straight run from the origin
/// cell center to the center of `end`, sampled every half block. Samples
/// within `CLEARANCE_OVERLAP` of a cell edge also claim the neighbor; the
/// cell Y is the rounded sample height, so a level line sits one above the
/// floor line (the flight-height origin the clearance walk expects).
pub fn line_cells(end: Cell) -> Vec<Cell> {
    let length = cached_distance(end);
    if length < f64::EPSILON {
        return Vec::new();
    }
    let ux = end.x as f64 / length;
    let uy = end.y as f64 / length;
    let uz = end.z as f64 / length;

    let mut out: Vec<Cell> = Vec::new();
    let mut t = 0.0;
    while t < length {
        let px = ux * t + 0.5;
        let py = uy * t + 0.5;
        let pz = uz * t + 0.5;
        let y = py.round() as i32;
        let mut x = (px - CLEARANCE_OVERLAP).floor() as i32;
        while x as f64 <= px + CLEARANCE_OVERLAP {
            let mut z = (pz - CLEARANCE_OVERLAP).floor() as i32;
            while z as f64 <= pz + CLEARANCE_OVERLAP {
                let c = Cell::new(x, y, z);
                if !out.contains(&c) {
                    out.push(c);
                }
                z += 1;
            }
            x += 1;
        }
        t += 1.0 / CLEARANCE_SAMPLES_PER_BLOCK;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Direction;

    #[test]
    fn signed_angle_orientation() {
        // +Z to -X is a clockwise quarter turn seen from above
        assert!((signed_angle(0.0, 1.0, -1.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((signed_angle(0.0, 1.0, 1.0, 0.0) - (-90.0)).abs() < 1e-9);
        assert!(signed_angle(0.0, 1.0, 0.0, 2.0).abs() < 1e-9);
    }

    #[test]
    fn yaw_round_trips_through_look_vec() {
        for yaw in [-135.0, -45.0, 0.0, 45.0, 90.0] {
            let v = look_vec(yaw);
            let back = vec_yaw(v);
            assert!((back - yaw).abs() < 1e-9, "yaw {yaw} came back as {back}");
        }
    }

    #[test]
    fn offset_distance_counts_the_first_step_as_one() {
        // straight two-forward offset: one step + one block of run
        let d = offset_distance(Cell::new(0, 0, 2), Direction::South);
        assert!((d - 2.0).abs() < 1e-12);
        // pure sideways offsets pay for the detour
        let d = offset_distance(Cell::new(2, 0, 0), Direction::South);
        assert!((d - (5.0f64.sqrt() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn line_covers_straight_run() {
        let cells = line_cells(Cell::new(0, 0, 3));
        // level lines snap to the cell row above the floor line
        for z in 0..=3 {
            assert!(cells.contains(&Cell::new(0, 1, z)), "missing z={z}");
        }
        assert!(cells.iter().all(|c| c.x == 0 && c.y == 1));
    }

    #[test]
    fn diagonal_line_touches_both_columns() {
        let cells = line_cells(Cell::new(2, 0, 2));
        assert!(cells.contains(&Cell::new(0, 1, 0)));
        assert!(cells.iter().any(|c| c.x >= 1 && c.z >= 1));
    }

    #[test]
    fn zero_length_line_is_empty() {
        assert!(line_cells(Cell::new(0, 0, 0)).is_empty());
    }
}
