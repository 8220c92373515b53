use {
    abilities::AbilitiesPlugin,
    ability_assets::AbilityAssetsPlugin,
    ability_components::AbilityComponentsPlugin,
    actives::ActivesPlugin,
    arena::ArenaPlugin,
    arena_components::ArenaComponentsPlugin,
    bevy::prelude::*,
    hud::HudPlugin,
    loading::LoadingManagerPlugin,
    player_components::PlayerComponentsPlugin,
    save_load::SaveLoadPlugin,
    star_magnet::StarMagnetPlugin,
    states::GameState,
    system_schedule::GameSchedule,
    wallet::WalletPlugin,
};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .configure_sets(
                Update,
                (
                    GameSchedule::FrameStart,
                    GameSchedule::ResolveIntent,
                    GameSchedule::PerformAction,
                    GameSchedule::Effect,
                    GameSchedule::FrameEnd,
                )
                    .chain(),
            )
            .add_plugins((
                AbilityAssetsPlugin,
                AbilityComponentsPlugin,
                ArenaComponentsPlugin,
                PlayerComponentsPlugin,
                WalletPlugin,
                AbilitiesPlugin,
                ActivesPlugin,
                StarMagnetPlugin,
                ArenaPlugin,
                LoadingManagerPlugin,
                SaveLoadPlugin,
                HudPlugin,
            ))
            .add_systems(Startup, setup_camera);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
