use bevy::prelude::*;

pub struct ArenaComponentsPlugin;

impl Plugin for ArenaComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Bomb>()
            .register_type::<Star>()
            .register_type::<StarPoints>()
            .register_type::<LinearVelocity>();
    }
}

/// A live bomb falling through the arena.
#[derive(Component, Reflect, Default, Debug)]
#[reflect(Component, Default)]
pub struct Bomb;

/// A collectible star.
#[derive(Component, Reflect, Default, Debug)]
#[reflect(Component, Default)]
pub struct Star;

/// Score granted on collection, fixed at spawn time from the star
/// multiplier rank.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq, Deref)]
#[reflect(Component, Default)]
pub struct StarPoints(pub u32);

impl Default for StarPoints {
    fn default() -> Self {
        Self(10)
    }
}

/// Straight-line velocity integrated by the arena each frame. The
/// star magnet and zero gravity both act by adjusting this.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Deref, DerefMut)]
#[reflect(Component, Default)]
pub struct LinearVelocity(pub Vec2);
