//! Agent snapshot the predictor advances.

use std::collections::{HashMap, VecDeque};

use glam::DVec3;

use crate::constants::*;
use crate::world::Aabb;

/// Status effects that change movement or fall handling.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EffectKind {
    JumpBoost,
    Speed,
    Slowness,
}

#[derive(Clone, Copy, Debug)]
struct EffectInstance {
    amplifier: u32,
    /// Ticks from the snapshot origin after which the effect is gone.
    remaining: u32,
}

/// Active status effects with lazily evicted expirations.
///
/// Levels are 1-based: an active effect at amplifier 0 reports level 1, an
/// absent or expired effect reports 0. Hosts that don't want effects factored
/// into prediction construct this with [`EffectMap::disabled`].
#[derive(Clone, Debug, Default)]
pub struct EffectMap {
    entries: HashMap<EffectKind, EffectInstance>,
    ignore_all: bool,
}

impl EffectMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// An effect map that always reports level 0.
    pub fn disabled() -> Self {
        Self {
            entries: HashMap::new(),
            ignore_all: true,
        }
    }

    pub fn insert(&mut self, kind: EffectKind, amplifier: u32, remaining: u32) {
        self.entries
            .insert(kind, EffectInstance { amplifier, remaining });
    }

    /// Effect level at `tick`, evicting the entry once it has expired.
    pub fn level(&mut self, kind: EffectKind, tick: u32) -> u32 {
        if self.ignore_all {
            return 0;
        }
        match self.entries.get(&kind) {
            Some(e) if e.remaining < tick => {
                self.entries.remove(&kind);
                0
            }
            Some(e) => e.amplifier + 1,
            None => 0,
        }
    }

    /// Non-evicting read of the effect level at `tick`.
    pub fn level_at(&self, kind: EffectKind, tick: u32) -> u32 {
        if self.ignore_all {
            return 0;
        }
        match self.entries.get(&kind) {
            Some(e) if e.remaining < tick => 0,
            Some(e) => e.amplifier + 1,
            None => 0,
        }
    }
}

/// Full kinematic snapshot of the agent. Cloning one and ticking the clone
/// forward is how every what-if question in this crate gets answered.
#[derive(Clone, Debug)]
pub struct PhysicsState {
    /// Feet position (bottom center of the bounding box).
    pub pos: DVec3,
    pub vel: DVec3,
    /// Facing in degrees; zero faces +Z, positive turns toward -X.
    pub yaw: f64,
    pub on_ground: bool,
    pub sneaking: bool,
    pub collided_horizontally: bool,
    pub collided_vertically: bool,
    /// Blocks fallen since last touching the ground.
    pub fall_distance: f64,
    /// Accumulated fall damage over the simulated span.
    pub damage_taken: f64,
    /// Ticks simulated since this snapshot was created.
    pub tick: u32,
    pub bounds: Aabb,
    pub effects: EffectMap,
    last_jump: i32,
    history: VecDeque<DVec3>,
    first_recorded_tick: u32,
}

impl PhysicsState {
    pub fn new(pos: DVec3, yaw: f64) -> Self {
        let mut history = VecDeque::with_capacity(HISTORY_CAPACITY);
        history.push_back(pos);
        Self {
            pos,
            vel: DVec3::ZERO,
            yaw,
            on_ground: true,
            sneaking: false,
            collided_horizontally: false,
            collided_vertically: false,
            fall_distance: 0.0,
            damage_taken: 0.0,
            tick: 0,
            bounds: Aabb::agent(pos, AGENT_HALF_WIDTH, AGENT_HEIGHT),
            effects: EffectMap::new(),
            // a fresh agent may jump immediately
            last_jump: -(JUMP_COOLDOWN_TICKS as i32),
            history,
            first_recorded_tick: 0,
        }
    }

    pub fn with_effects(mut self, effects: EffectMap) -> Self {
        self.effects = effects;
        self
    }

    /// True when a jump input this tick would actually leave the ground.
    pub fn can_jump(&self) -> bool {
        self.on_ground && self.tick as i32 - self.last_jump >= JUMP_COOLDOWN_TICKS as i32
    }

    pub(crate) fn mark_jumped(&mut self) {
        self.last_jump = self.tick as i32;
    }

    /// Re-derive the bounding box from the feet position.
    pub fn sync_bounds(&mut self) {
        self.bounds = Aabb::agent(self.pos, AGENT_HALF_WIDTH, AGENT_HEIGHT);
    }

    /// Re-derive the feet position from the bounding box.
    pub(crate) fn sync_pos_from_bounds(&mut self) {
        self.pos = self.bounds.bottom_center();
    }

    /// Position recorded after simulating tick `tick`, while it is still
    /// inside the bounded history window.
    pub fn position_at(&self, tick: u32) -> Option<DVec3> {
        let idx = tick.checked_sub(self.first_recorded_tick)? as usize;
        self.history.get(idx).copied()
    }

    pub(crate) fn record_position(&mut self) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
            self.first_recorded_tick += 1;
        }
        self.history.push_back(self.pos);
    }

    /// Horizontal distance from a point to the feet.
    pub fn distance_xz_to(&self, p: DVec3) -> f64 {
        let dx = self.pos.x - p.x;
        let dz = self.pos.z - p.z;
        (dx * dx + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_agent_may_jump_at_tick_zero() {
        let s = PhysicsState::new(DVec3::new(0.5, 0.0, 0.5), 0.0);
        assert!(s.can_jump());
    }

    #[test]
    fn jump_cooldown_blocks_early_rejump() {
        let mut s = PhysicsState::new(DVec3::new(0.5, 0.0, 0.5), 0.0);
        s.mark_jumped();
        s.tick = 9;
        assert!(!s.can_jump());
        s.tick = 10;
        assert!(s.can_jump());
    }

    #[test]
    fn effects_expire_at_their_tick() {
        let mut fx = EffectMap::new();
        fx.insert(EffectKind::JumpBoost, 1, 5);
        assert_eq!(fx.level(EffectKind::JumpBoost, 5), 2);
        assert_eq!(fx.level(EffectKind::JumpBoost, 6), 0);
        // evicted, stays gone even for earlier ticks
        assert_eq!(fx.level(EffectKind::JumpBoost, 0), 0);
    }

    #[test]
    fn disabled_map_reports_nothing() {
        let mut fx = EffectMap::disabled();
        fx.insert(EffectKind::Speed, 3, 100);
        assert_eq!(fx.level(EffectKind::Speed, 0), 0);
        assert_eq!(fx.level_at(EffectKind::Speed, 0), 0);
    }

    #[test]
    fn history_is_bounded_and_indexed_by_tick() {
        let mut s = PhysicsState::new(DVec3::ZERO, 0.0);
        for i in 1..200u32 {
            s.pos.z = i as f64;
            s.tick = i;
            s.record_position();
        }
        assert!(s.position_at(0).is_none());
        let last = s.position_at(199).unwrap();
        assert_eq!(last.z, 199.0);
        assert_eq!(s.position_at(199 - (HISTORY_CAPACITY as u32 - 1)).unwrap().z,
            (199 - (HISTORY_CAPACITY as u32 - 1)) as f64);
    }
}
