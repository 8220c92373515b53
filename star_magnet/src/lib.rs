//! Continuous star attraction. This runs every tick, not on events:
//! the pull is a function of current positions and rank, nothing else.

use {
    ability_assets::AbilityCatalog,
    ability_components::{AbilityId, AbilityRanks, ActiveModifiers},
    arena_components::{LinearVelocity, Star},
    bevy::prelude::*,
    player_components::Player,
    system_schedule::GameSchedule,
};

/// Stars closer than this are left alone so they do not jitter
/// around the player instead of being collected.
const MIN_PULL_DISTANCE: f32 = 20.0;

/// Distance at which the pull equals the rank's force value; closer
/// stars are pulled harder, farther ones weaker.
const REFERENCE_DISTANCE: f32 = 100.0;

pub struct StarMagnetPlugin;

impl Plugin for StarMagnetPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            attract_stars
                .in_set(GameSchedule::Effect)
                .run_if(resource_exists::<AbilityCatalog>),
        );
    }
}

/// The pull a single star receives, or `None` when it is out of range
/// or inside the anti-jitter radius. Pure so the tuning can be tested
/// without a world.
pub fn magnet_pull(player_pos: Vec2, star_pos: Vec2, range: f32, force: f32) -> Option<Vec2> {
    let offset = player_pos - star_pos;
    let distance = offset.length();

    if distance > range || distance < MIN_PULL_DISTANCE {
        return None;
    }

    let direction = offset / distance;
    Some(direction * force * (REFERENCE_DISTANCE / distance))
}

fn attract_stars(
    time: Res<Time>,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    modifiers: Res<ActiveModifiers>,
    players: Query<&Transform, With<Player>>,
    mut stars: Query<(&Transform, &mut LinearVelocity), With<Star>>,
) {
    let rank = ranks.rank(AbilityId::StarMagnet);
    if rank < 1 {
        return;
    }

    let Ok(player_transform) = players.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    let mut range = catalog.magnet_range(rank);
    let mut force = catalog.magnet_force(rank);
    if modifiers.magnet_boost {
        range *= 2.0;
        force *= 2.0;
    }

    for (star_transform, mut velocity) in &mut stars {
        let star_pos = star_transform.translation.truncate();
        if let Some(pull) = magnet_pull(player_pos, star_pos, range, force) {
            velocity.0 += pull * time.delta_secs();
        }
    }
}
