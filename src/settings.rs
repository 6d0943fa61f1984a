//! Planner and executor feature flags.
//!
//! Loaded from `config/parkour_settings.json` when present so headless runs
//! can toggle jump families without recompiling. Missing or malformed files
//! fall back to defaults with a warning.

use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "config/parkour_settings.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master switch for the whole planner.
    pub allow_jumps: bool,
    /// Permit momentum and wraparound jumps (slow to execute, easy to flub).
    pub allow_momentum_jumps: bool,
    /// Permit jumps that land higher than they start.
    pub allow_ascends: bool,
    /// Permit planning jumps that require placing a support block.
    pub allow_block_placement: bool,
    /// Permit sprinting during jumps.
    pub can_sprint: bool,
    /// Deepest landing the descend scan will accept, in blocks.
    pub max_fall_height: i32,
    /// World ceiling; sources at this height cannot jump unless allowed.
    pub height_limit: i32,
    pub allow_jump_at_height_limit: bool,
    /// Treat bottom slabs as standable launch points.
    pub allow_walk_on_bottom_slab: bool,
    /// Factor status effects (jump boost, speed...) into planning.
    pub consider_status_effects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allow_jumps: true,
            allow_momentum_jumps: true,
            allow_ascends: true,
            allow_block_placement: false,
            can_sprint: true,
            max_fall_height: 3,
            height_limit: 256,
            allow_jump_at_height_limit: false,
            allow_walk_on_bottom_slab: true,
            consider_status_effects: true,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("failed to parse {}: {e}, using defaults", path.display());
                Self::default()
            }),
            Err(e) => {
                warn!("failed to read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let s = Settings::load_from(Path::new("does/not/exist.json"));
        assert!(s.allow_jumps);
        assert!(!s.allow_block_placement);
        assert_eq!(s.max_fall_height, 3);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let s: Settings = serde_json::from_str(r#"{"allow_momentum_jumps": false}"#).unwrap();
        assert!(!s.allow_momentum_jumps);
        assert!(s.allow_jumps);
        assert_eq!(s.height_limit, 256);
    }
}
