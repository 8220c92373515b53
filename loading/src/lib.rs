use {
    ability_assets::{builtin, AbilityCatalog, AbilityDefinition},
    bevy::{
        asset::{LoadState, LoadedFolder},
        prelude::*,
    },
    states::GameState,
};

pub struct LoadingManagerPlugin;

impl Plugin for LoadingManagerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_ability_definitions)
            .add_systems(
                Update,
                check_assets_loaded.run_if(in_state(GameState::Loading)),
            )
            .add_systems(OnEnter(GameState::Loading), setup_loading_ui)
            .add_systems(OnExit(GameState::Loading), cleanup_loading_ui);
    }
}

#[derive(Resource)]
struct AbilitiesFolderHandle(Handle<LoadedFolder>);

fn load_ability_definitions(mut cmd: Commands, asset_server: Res<AssetServer>) {
    info!("started loading ability definitions");
    let handle = asset_server.load_folder("abilities");
    cmd.insert_resource(AbilitiesFolderHandle(handle));
}

fn check_assets_loaded(
    mut commands: Commands,
    mut next_state: ResMut<NextState<GameState>>,
    asset_server: Res<AssetServer>,
    folder_handle: Res<AbilitiesFolderHandle>,
    definitions: Res<Assets<AbilityDefinition>>,
) {
    let folder_failed = matches!(
        asset_server.load_state(folder_handle.0.id()),
        LoadState::Failed(_)
    );

    if !folder_failed && !asset_server.is_loaded_with_dependencies(folder_handle.0.id()) {
        return;
    }

    let mut loaded: Vec<AbilityDefinition> =
        definitions.iter().map(|(_, def)| def.clone()).collect();

    if loaded.is_empty() {
        warn!("no ability definitions on disk, falling back to built-in set");
        loaded = builtin::definitions();
    }

    // A broken definition set is unplayable; fail loudly at startup
    // instead of limping along with partial data.
    let catalog = match AbilityCatalog::compile(&loaded) {
        Ok(catalog) => catalog,
        Err(error) => panic!("invalid ability definitions: {error}"),
    };

    info!("ability catalog compiled, transitioning to Running");
    commands.insert_resource(catalog);
    next_state.set(GameState::Running);
}

// --- Loading UI ---

#[derive(Component)]
struct LoadingUi;

fn setup_loading_ui(mut commands: Commands) {
    info!("spawning loading ui");
    commands.spawn((
        Text::new("Loading..."),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(20.0),
            right: Val::Px(20.0),
            ..default()
        },
        LoadingUi,
    ));
}

fn cleanup_loading_ui(mut commands: Commands, query: Query<Entity, With<LoadingUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}
