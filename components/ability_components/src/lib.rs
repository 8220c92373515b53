use {
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

pub struct AbilityComponentsPlugin;

impl Plugin for AbilityComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AbilityId>()
            .register_type::<AbilityRanks>()
            .register_type::<ActiveModifiers>()
            .register_type::<BarrierCharge>()
            .register_type::<BarrierActive>()
            .register_type::<BarrierCooldown>()
            .register_type::<EmpCharge>()
            .register_type::<EmpActive>()
            .register_type::<SonicBoomCharge>()
            .register_type::<ZeroGravityCharge>()
            .register_type::<ZeroGravityActive>()
            .register_type::<LifeRegenProgress>()
            .init_resource::<AbilityRanks>()
            .init_resource::<ActiveModifiers>();
    }
}

/// Closed set of player abilities. Every rank table, cost table and
/// runtime state is keyed by one of these; there is no "unknown id"
/// fallback path anywhere.
#[derive(
    Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum AbilityId {
    Jump,
    Speed,
    FastFall,
    Barrier,
    SlowBombs,
    StarMagnet,
    Emp,
    PlatformDrop,
    TokenBonus,
    StarMultiplier,
    ExtraLife,
    SonicBoom,
    LifeRegen,
    ZeroGravity,
}

impl AbilityId {
    pub const ALL: [AbilityId; 14] = [
        AbilityId::Jump,
        AbilityId::Speed,
        AbilityId::FastFall,
        AbilityId::Barrier,
        AbilityId::SlowBombs,
        AbilityId::StarMagnet,
        AbilityId::Emp,
        AbilityId::PlatformDrop,
        AbilityId::TokenBonus,
        AbilityId::StarMultiplier,
        AbilityId::ExtraLife,
        AbilityId::SonicBoom,
        AbilityId::LifeRegen,
        AbilityId::ZeroGravity,
    ];
}

/// Current rank per ability. Rank 0 means locked; ranks only ever grow
/// and only through the purchase flow (plus the reset path).
#[derive(Resource, Reflect, Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(Resource, Default)]
pub struct AbilityRanks {
    ranks: HashMap<AbilityId, u32>,
}

impl AbilityRanks {
    pub fn rank(&self, id: AbilityId) -> u32 {
        self.ranks.get(&id).copied().unwrap_or(0)
    }

    pub fn is_unlocked(&self, id: AbilityId) -> bool {
        self.rank(id) >= 1
    }

    /// Bumps the rank by exactly one and returns the new value.
    pub fn increment(&mut self, id: AbilityId) -> u32 {
        let rank = self.ranks.entry(id).or_insert(0);
        *rank += 1;
        *rank
    }

    pub fn reset(&mut self) {
        self.ranks.clear();
    }
}

/// Physics/magnet overrides written by the zero-gravity machine and
/// read by arena integration and the star magnet. Passing these
/// explicitly keeps the magnet query pure instead of peeking at an
/// ambient flag.
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Resource, Default)]
pub struct ActiveModifiers {
    /// Multiplier on gravity applied to live bombs and stars.
    pub gravity_scale: f32,
    /// Doubles star magnet range and force while set.
    pub magnet_boost: bool,
}

impl Default for ActiveModifiers {
    fn default() -> Self {
        Self {
            gravity_scale: 1.0,
            magnet_boost: false,
        }
    }
}

/// What the platform-drop rank currently permits. Flags are
/// cumulative: rank 3 implies everything below it.
#[derive(Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Default)]
pub struct PlatformAccess {
    /// Rank >= 1: jump up through platforms from below.
    pub jump_through: bool,
    /// Rank >= 2: drop through platforms with the down key.
    pub drop_through: bool,
    /// Rank >= 3: drop through the ground and tall walls.
    pub drop_through_ground: bool,
}

impl PlatformAccess {
    pub fn from_rank(rank: u32) -> Self {
        Self {
            jump_through: rank >= 1,
            drop_through: rank >= 2,
            drop_through_ground: rank >= 3,
        }
    }
}

/// Barrier readiness. `charge` is the 0..=100 progress-bar value and
/// snaps straight to 100 when the point threshold is crossed.
#[derive(Component, Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(Component, Default)]
pub struct BarrierCharge {
    pub points: u32,
    pub charge: f32,
}

impl BarrierCharge {
    pub fn is_full(&self) -> bool {
        self.charge >= 100.0
    }
}

/// Barrier currently in effect; the player is invincible while this
/// component is present.
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct BarrierActive {
    pub timer: Timer,
}

/// Post-barrier cooldown; points do not accrue until it expires.
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct BarrierCooldown {
    pub timer: Timer,
}

#[derive(Component, Reflect, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct EmpCharge {
    pub points: u32,
    pub ready: bool,
}

/// EMP fired, captured bombs not yet returned.
#[derive(Component, Reflect, Default, Debug)]
#[reflect(Component, Default)]
pub struct EmpActive;

/// Sonic boom stockpiles whole charges; leftover points carry over to
/// the next one.
#[derive(Component, Reflect, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct SonicBoomCharge {
    pub points: u32,
    pub charges: u32,
}

#[derive(Component, Reflect, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct ZeroGravityCharge {
    pub points: u32,
    pub ready: bool,
}

#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct ZeroGravityActive {
    pub timer: Timer,
}

#[derive(Component, Reflect, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct LifeRegenProgress {
    pub points: u32,
}
