//! Host glue around the progression core: owns the live bomb/star
//! entities, straight-line physics, input bindings and the level
//! timer. The core never touches any of this directly; it reads
//! transforms and velocities and commands destroy/recreate through
//! events.

mod collisions;
mod player;
mod spawning;

use {
    ability_events::LevelCompleted,
    arena_components::{Bomb, Star},
    bevy::prelude::*,
    player_components::Player,
    states::GameState,
    system_schedule::GameSchedule,
};

pub const ARENA_HALF_WIDTH: f32 = 380.0;
pub const ARENA_TOP: f32 = 320.0;
pub const GROUND_Y: f32 = -280.0;
pub const GRAVITY: f32 = 900.0;

/// Base token reward per completed level; the token-bonus rank adds
/// to it on the ledger side.
const LEVEL_TOKEN_REWARD: u32 = 3;
const LEVEL_SECONDS: f32 = 30.0;

#[derive(Resource, Reflect, Default, Debug, Clone, Copy, Deref, DerefMut)]
#[reflect(Resource, Default)]
pub struct Score(pub u32);

#[derive(Resource, Reflect, Debug, Clone, Copy, Deref, DerefMut)]
#[reflect(Resource, Default)]
pub struct LevelCounter(pub u32);

impl Default for LevelCounter {
    fn default() -> Self {
        Self(1)
    }
}

#[derive(Resource)]
struct LevelTimer(Timer);

impl Default for LevelTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(LEVEL_SECONDS, TimerMode::Repeating))
    }
}

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Score>()
            .register_type::<LevelCounter>()
            .init_resource::<Score>()
            .init_resource::<LevelCounter>()
            .init_resource::<LevelTimer>()
            .add_observer(player::grant_life)
            .add_systems(OnEnter(GameState::Running), (start_run, player::spawn_player))
            .add_systems(OnExit(GameState::Running), despawn_run_entities)
            .add_systems(OnEnter(GameState::GameOver), spawn_game_over_screen)
            .add_systems(OnExit(GameState::GameOver), despawn_game_over_screen)
            .add_systems(
                Update,
                restart_on_enter.run_if(in_state(GameState::GameOver)),
            )
            .add_systems(
                Update,
                (
                    (player::movement_intent, player::activation_keys)
                        .in_set(GameSchedule::ResolveIntent),
                    (
                        spawning::spawn_bombs,
                        spawning::spawn_stars,
                        spawning::apply_spawn_requests,
                    )
                        .in_set(GameSchedule::PerformAction),
                    (
                        spawning::integrate_velocities,
                        player::reconcile_ground_contact,
                        collisions::bombs_hit_player,
                        collisions::collect_stars,
                        spawning::despawn_fallen,
                    )
                        .chain()
                        .in_set(GameSchedule::Effect),
                    tick_level_timer.in_set(GameSchedule::FrameEnd),
                )
                    .run_if(in_state(GameState::Running)),
            );
    }
}

fn start_run(
    mut score: ResMut<Score>,
    mut level: ResMut<LevelCounter>,
    mut timer: ResMut<LevelTimer>,
) {
    *score = Score::default();
    *level = LevelCounter::default();
    *timer = LevelTimer::default();
    info!("run started");
}

fn tick_level_timer(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: ResMut<LevelTimer>,
    mut level: ResMut<LevelCounter>,
) {
    if timer.0.tick(time.delta()).just_finished() {
        level.0 += 1;
        info!(level = level.0, "level complete");
        commands.trigger(LevelCompleted {
            reward: LEVEL_TOKEN_REWARD,
        });
    }
}

fn despawn_run_entities(
    mut commands: Commands,
    entities: Query<Entity, Or<(With<Player>, With<Bomb>, With<Star>)>>,
) {
    for entity in &entities {
        commands.entity(entity).despawn();
    }
}

#[derive(Component)]
struct GameOverScreen;

fn spawn_game_over_screen(mut commands: Commands, score: Res<Score>) {
    commands.spawn((
        GameOverScreen,
        Text::new(format!("Game Over\nScore: {}\nPress Enter", score.0)),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(35.0),
            left: Val::Percent(40.0),
            ..default()
        },
    ));
}

fn despawn_game_over_screen(mut commands: Commands, screens: Query<Entity, With<GameOverScreen>>) {
    for entity in &screens {
        commands.entity(entity).despawn();
    }
}

fn restart_on_enter(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        info!("restarting run");
        next_state.set(GameState::Running);
    }
}
