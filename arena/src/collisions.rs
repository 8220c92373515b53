use {
    ability_components::BarrierActive,
    ability_events::StarCollected,
    arena_components::{Bomb, LinearVelocity, Star, StarPoints},
    bevy::prelude::*,
    player_components::{Lives, Player},
    states::GameState,
};

const BOMB_HIT_DISTANCE: f32 = 30.0;
const STAR_COLLECT_DISTANCE: f32 = 26.0;

/// Charge points granted per pickup. Independent of the star's score
/// value, which the multiplier rank inflates.
const STAR_CHARGE_POINTS: u32 = 10;

fn within(a: Vec3, b: Vec3, distance: f32) -> bool {
    a.truncate().distance_squared(b.truncate()) <= distance * distance
}

/// Bomb contact: with the barrier up the bomb bounces away, otherwise
/// it costs a life and the run ends at zero.
pub fn bombs_hit_player(
    mut commands: Commands,
    mut next_state: ResMut<NextState<GameState>>,
    mut players: Query<(&Transform, &mut Lives, Has<BarrierActive>), With<Player>>,
    mut bombs: Query<(Entity, &Transform, &mut LinearVelocity), With<Bomb>>,
) {
    let Ok((player_transform, mut lives, invincible)) = players.single_mut() else {
        return;
    };

    for (bomb, bomb_transform, mut velocity) in &mut bombs {
        if !within(
            player_transform.translation,
            bomb_transform.translation,
            BOMB_HIT_DISTANCE,
        ) {
            continue;
        }

        if invincible {
            // Bounce instead of damage.
            velocity.0.y = velocity.0.y.abs();
            let away = bomb_transform.translation.x - player_transform.translation.x;
            velocity.0.x = velocity.0.x.abs().max(80.0).copysign(away);
            continue;
        }

        commands.entity(bomb).despawn();
        lives.0 = lives.0.saturating_sub(1);
        info!(lives = lives.0, "bomb hit");

        if lives.0 == 0 {
            info!("out of lives, game over");
            next_state.set(GameState::GameOver);
        }
    }
}

pub fn collect_stars(
    mut commands: Commands,
    mut collected: MessageWriter<StarCollected>,
    mut score: ResMut<crate::Score>,
    players: Query<&Transform, With<Player>>,
    stars: Query<(Entity, &Transform, &StarPoints), With<Star>>,
) {
    let Ok(player_transform) = players.single() else {
        return;
    };

    for (star, star_transform, points) in &stars {
        if !within(
            player_transform.translation,
            star_transform.translation,
            STAR_COLLECT_DISTANCE,
        ) {
            continue;
        }

        commands.entity(star).despawn();
        score.0 += points.0;
        collected.write(StarCollected {
            points: STAR_CHARGE_POINTS,
        });
        debug!(score_value = points.0, score = score.0, "star collected");
    }
}
