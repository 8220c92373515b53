use {ability_components::AbilityId, bevy::prelude::*};

pub struct AbilityEventsPlugin;

impl Plugin for AbilityEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<StarCollected>()
            .add_message::<ChargeSonicBoom>()
            .add_message::<SpawnBomb>()
            .register_type::<StarCollected>()
            .register_type::<ChargeSonicBoom>()
            .register_type::<SpawnBomb>()
            .register_type::<BuyUpgrade>()
            .register_type::<AbilityUpgraded>()
            .register_type::<AbilityActivated>()
            .register_type::<AbilityDeactivated>()
            .register_type::<LevelCompleted>();
    }
}

// --- Inbound messages (host -> core, buffered per frame) ---

/// A star was collected; fans out to every charge accumulator.
#[derive(Message, Reflect, Debug, Clone, Copy)]
#[reflect(Default)]
pub struct StarCollected {
    pub points: u32,
}

impl Default for StarCollected {
    fn default() -> Self {
        Self { points: 10 }
    }
}

/// Extra points granted to the sonic boom accumulator alone.
#[derive(Message, Reflect, Default, Debug, Clone, Copy)]
#[reflect(Default)]
pub struct ChargeSonicBoom {
    pub points: u32,
}

/// Request to spawn a bomb with an explicit velocity. Used by the
/// arena spawner and by the EMP return path.
#[derive(Message, Reflect, Default, Debug, Clone, Copy)]
#[reflect(Default)]
pub struct SpawnBomb {
    pub position: Vec2,
    pub velocity: Vec2,
}

// --- Inbound commands (observer events) ---

/// Shop request to buy the next rank of an ability.
#[derive(Event, Reflect, Debug, Clone, Copy)]
pub struct BuyUpgrade {
    pub ability: AbilityId,
}

/// The level timer elapsed; carries the base token reward.
#[derive(Event, Reflect, Debug, Clone, Copy)]
#[reflect(Default)]
pub struct LevelCompleted {
    pub reward: u32,
}

impl Default for LevelCompleted {
    fn default() -> Self {
        Self { reward: 3 }
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ActivateBarrier;

#[derive(Event, Debug, Clone, Copy)]
pub struct ActivateEmp;

#[derive(Event, Debug, Clone, Copy)]
pub struct ActivateSonicBoom;

#[derive(Event, Debug, Clone, Copy)]
pub struct ActivateZeroGravity;

/// Wipes wallet and ranks back to defaults (new game, save-version
/// bump).
#[derive(Event, Debug, Clone, Copy)]
pub struct ResetProgression;

// --- Outbound notifications (core -> host/UI) ---

#[derive(Event, Reflect, Debug, Clone, Copy)]
pub struct AbilityUpgraded {
    pub ability: AbilityId,
    pub new_rank: u32,
}

#[derive(Event, Reflect, Debug, Clone, Copy)]
pub struct AbilityActivated {
    pub ability: AbilityId,
}

#[derive(Event, Reflect, Debug, Clone, Copy)]
pub struct AbilityDeactivated {
    pub ability: AbilityId,
}

/// One extra life for the player (life regen threshold or the
/// extra-life upgrade).
#[derive(Event, Debug, Clone, Copy)]
pub struct LifeGranted;
