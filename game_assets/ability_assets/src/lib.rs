pub mod builtin;
mod catalog;

pub use catalog::{AbilityCatalog, CatalogError};

use {
    ability_components::AbilityId,
    bevy::prelude::*,
    bevy_common_assets::ron::RonAssetPlugin,
    serde::{Deserialize, Serialize},
    wallet::UpgradeCost,
};

pub struct AbilityAssetsPlugin;

impl Plugin for AbilityAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<AbilityDefinition>::new(&["ability.ron"]));
    }
}

/// One ability's tuning, loaded from `assets/abilities/*.ability.ron`.
///
/// Definitions are raw data; the loading phase compiles all of them
/// into an [`AbilityCatalog`], which is where validation happens.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub display_name: String,
    pub max_rank: u32,
    /// Cost of going from rank N to N+1, indexed by N. Empty for
    /// ExtraLife, whose cost is the `5 + rank` formula.
    #[serde(default)]
    pub costs: Vec<UpgradeCost>,
    /// Shop label per purchased rank, indexed by `new_rank - 1`.
    #[serde(default)]
    pub upgrade_names: Vec<String>,
    pub tuning: AbilityTuning,
}

/// Per-family rank tables. Value tables (`Jump`, `Speed`, ...) are
/// indexed by rank and sized `max_rank + 1`, entry 0 being the
/// locked/base value. Active-cycle tables (`Barrier`, `Emp`, ...) are
/// indexed by `rank - 1` and sized `max_rank`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AbilityTuning {
    Jump {
        max_jumps: Vec<u32>,
    },
    Speed {
        run_speed: Vec<f32>,
    },
    FastFall {
        fall_speed: Vec<f32>,
    },
    SlowBombs {
        slow_factor: Vec<f32>,
    },
    StarMagnet {
        range: Vec<f32>,
        force: Vec<f32>,
    },
    StarMultiplier {
        star_value: Vec<u32>,
    },
    TokenBonus {
        bonus_tokens: Vec<u32>,
    },
    Barrier {
        points_needed: Vec<u32>,
        duration_ms: Vec<u32>,
        cooldown_ms: Vec<u32>,
    },
    Emp {
        points_needed: Vec<u32>,
        return_delay_ms: Vec<u32>,
    },
    SonicBoom {
        points_needed: Vec<u32>,
        bombs_destroyed: Vec<u32>,
    },
    ZeroGravity {
        points_needed: Vec<u32>,
        duration_ms: Vec<u32>,
        gravity_scale: Vec<f32>,
    },
    LifeRegen {
        points_needed: Vec<u32>,
    },
    /// No numeric tables; the rank alone carries the meaning
    /// (PlatformDrop access flags, ExtraLife grants).
    Passive,
}
