use {
    crate::{ARENA_HALF_WIDTH, ARENA_TOP, GRAVITY, GROUND_Y},
    ability_assets::AbilityCatalog,
    ability_components::{AbilityId, AbilityRanks, ActiveModifiers},
    ability_events::SpawnBomb,
    arena_components::{Bomb, LinearVelocity, Star, StarPoints},
    bevy::prelude::*,
    player_components::Player,
    rand::Rng,
};

const BOMB_SIZE: Vec2 = Vec2::new(22.0, 22.0);
const STAR_SIZE: Vec2 = Vec2::new(16.0, 16.0);

pub struct BombSpawnTimer(Timer);

impl Default for BombSpawnTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(1.2, TimerMode::Repeating))
    }
}

pub struct StarSpawnTimer(Timer);

impl Default for StarSpawnTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(0.9, TimerMode::Repeating))
    }
}

/// Periodic bomb drops. Launch speed is scaled down by the slow-bombs
/// rank at spawn time.
pub fn spawn_bombs(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: Local<BombSpawnTimer>,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    let mut rng = rand::rng();
    let slow = catalog.bomb_slow_factor(ranks.rank(AbilityId::SlowBombs));
    let position = Vec2::new(rng.random_range(-ARENA_HALF_WIDTH..ARENA_HALF_WIDTH), ARENA_TOP);
    let velocity = Vec2::new(
        rng.random_range(-60.0..60.0),
        -rng.random_range(120.0..220.0),
    ) * slow;

    spawn_bomb(&mut commands, position, velocity);
}

pub fn spawn_stars(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: Local<StarSpawnTimer>,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    let mut rng = rand::rng();
    let value = catalog.star_score_value(ranks.rank(AbilityId::StarMultiplier));

    commands.spawn((
        Star,
        StarPoints(value),
        LinearVelocity(Vec2::new(0.0, -rng.random_range(60.0..110.0))),
        Sprite {
            color: Color::srgb(1.0, 0.9, 0.2),
            custom_size: Some(STAR_SIZE),
            ..default()
        },
        Transform::from_xyz(
            rng.random_range(-ARENA_HALF_WIDTH..ARENA_HALF_WIDTH),
            ARENA_TOP,
            0.0,
        ),
    ));
}

/// Explicit spawn requests, used by the EMP return path.
pub fn apply_spawn_requests(mut commands: Commands, mut requests: MessageReader<SpawnBomb>) {
    for request in requests.read() {
        spawn_bomb(&mut commands, request.position, request.velocity);
    }
}

fn spawn_bomb(commands: &mut Commands, position: Vec2, velocity: Vec2) {
    commands.spawn((
        Bomb,
        LinearVelocity(velocity),
        Sprite {
            color: Color::srgb(0.9, 0.2, 0.2),
            custom_size: Some(BOMB_SIZE),
            ..default()
        },
        Transform::from_xyz(position.x, position.y, 0.0),
    ));
}

/// Straight-line integration with gravity. Bombs and stars feel the
/// zero-gravity scale from ActiveModifiers; the player always falls
/// at full gravity.
pub fn integrate_velocities(
    time: Res<Time>,
    modifiers: Res<ActiveModifiers>,
    mut movers: Query<(
        &mut Transform,
        &mut LinearVelocity,
        Has<Player>,
        Has<Bomb>,
        Has<Star>,
    )>,
) {
    let dt = time.delta_secs();

    for (mut transform, mut velocity, is_player, is_bomb, is_star) in &mut movers {
        let gravity_scale = if is_bomb || is_star {
            modifiers.gravity_scale
        } else if is_player {
            1.0
        } else {
            continue;
        };

        velocity.0.y -= GRAVITY * gravity_scale * dt;
        transform.translation.x += velocity.0.x * dt;
        transform.translation.y += velocity.0.y * dt;
    }
}

pub fn despawn_fallen(
    mut commands: Commands,
    fallers: Query<(Entity, &Transform), Or<(With<Bomb>, With<Star>)>>,
) {
    for (entity, transform) in &fallers {
        if transform.translation.y < GROUND_Y - 60.0 {
            commands.entity(entity).despawn();
        }
    }
}
