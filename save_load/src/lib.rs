//! Persistence for the progression state: wallet and ability ranks.
//!
//! - F5 writes a timestamped manual save
//! - F9 loads the most recent save
//! - autosave every minute to a fixed file
//!
//! Runtime charge/cooldown state is deliberately not persisted; a
//! loaded game always starts with empty activation meters.

use {
    ability_components::AbilityRanks,
    ability_events::ResetProgression,
    bevy::prelude::*,
    chrono::Local,
    serde::{Deserialize, Serialize},
    states::GameState,
    std::{fs, path::Path, path::PathBuf},
    thiserror::Error,
    wallet::Wallet,
};

/// Bumped whenever the save layout changes shape. Older files are
/// rejected rather than migrated.
pub const SAVE_VERSION: u32 = 1;

const SAVES_DIR: &str = "saves";
const AUTOSAVE_FILE: &str = "progression.ron";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    pub version: u32,
    pub wallet: Wallet,
    pub ranks: AbilityRanks,
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("unsupported save version {found}, expected {SAVE_VERSION}")]
    VersionMismatch { found: u32 },
    #[error("malformed save file: {0}")]
    Malformed(#[from] ron::error::SpannedError),
}

/// Event to trigger loading the latest save file.
#[derive(Event)]
pub struct LoadGame;

/// Timer resource for automatic saves.
#[derive(Resource)]
pub struct AutosaveTimer(Timer);

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(60.0, TimerMode::Repeating))
    }
}

pub struct SaveLoadPlugin;

impl Plugin for SaveLoadPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutosaveTimer>()
            .add_observer(execute_load)
            .add_systems(Startup, load_on_startup)
            .add_systems(
                Update,
                (trigger_load_on_keypress, execute_save).run_if(in_state(GameState::Running)),
            )
            .add_systems(OnExit(GameState::Running), clean_up_save_load);
    }
}

/// Handles both manual (F5) and periodic saves.
fn execute_save(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut timer: ResMut<AutosaveTimer>,
    wallet: Res<Wallet>,
    ranks: Res<AbilityRanks>,
) {
    let manual = keyboard.just_pressed(KeyCode::F5);

    if manual {
        info!("Manual save triggered (F5)");
        // Reset autosave timer on manual save to avoid back-to-back saves
        timer.0.reset();
    } else if timer.0.tick(time.delta()).just_finished() {
        info!("Autosave triggered");
    } else {
        return;
    }

    let filename = if manual {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        format!("save_{timestamp}.ron")
    } else {
        AUTOSAVE_FILE.to_string()
    };

    let save = SaveFile {
        version: SAVE_VERSION,
        wallet: wallet.clone(),
        ranks: ranks.clone(),
    };

    let serialized = match ron::ser::to_string_pretty(&save, ron::ser::PrettyConfig::default()) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to serialize save: {e}");
            return;
        }
    };

    let saves_dir = Path::new(SAVES_DIR);
    if let Err(e) = fs::create_dir_all(saves_dir) {
        error!("Failed to create saves directory: {e}");
        return;
    }

    let filepath = saves_dir.join(&filename);
    match fs::write(&filepath, serialized) {
        Ok(()) => info!("Game saved to {}", filepath.display()),
        Err(e) => error!("Failed to write save file: {e}"),
    }
}

/// Progression carries across sessions: pick up the latest save as
/// soon as the app starts.
fn load_on_startup(mut commands: Commands) {
    commands.trigger(LoadGame);
}

/// Triggers a load when F9 is pressed.
fn trigger_load_on_keypress(keyboard: Res<ButtonInput<KeyCode>>, mut commands: Commands) {
    if keyboard.just_pressed(KeyCode::F9) {
        info!("Load triggered (F9)");
        commands.trigger(LoadGame);
    }
}

/// Observer that handles the LoadGame event. A missing save is a
/// no-op; a broken or stale one resets progression instead of loading
/// half a state.
fn execute_load(
    _trigger: On<LoadGame>,
    mut commands: Commands,
    mut wallet: ResMut<Wallet>,
    mut ranks: ResMut<AbilityRanks>,
) {
    let Some(path) = find_latest_save(Path::new(SAVES_DIR)) else {
        info!("no save files found, keeping current progression");
        return;
    };

    info!("Loading save file: {}", path.display());

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Failed to read save file: {e}");
            return;
        }
    };

    match decode_save(&contents) {
        Ok(save) => {
            *wallet = save.wallet;
            *ranks = save.ranks;
            info!("save loaded");
        }
        Err(e) => {
            warn!("Rejecting save file: {e}");
            commands.trigger(ResetProgression);
        }
    }
}

/// Parses and version-checks a save file.
pub fn decode_save(contents: &str) -> Result<SaveFile, SaveError> {
    let save: SaveFile = ron::from_str(contents)?;

    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            found: save.version,
        });
    }

    Ok(save)
}

/// Most recently modified `.ron` file in the saves directory, manual
/// saves and the autosave alike.
fn find_latest_save(saves_dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(saves_dir).ok()?;

    entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext == "ron")
                .unwrap_or(false)
        })
        .max_by_key(|e| e.metadata().and_then(|m| m.modified()).ok())
        .map(|e| e.path())
}

fn clean_up_save_load(mut timer: ResMut<AutosaveTimer>) {
    *timer = AutosaveTimer::default();
}

#[cfg(test)]
mod tests {
    use {super::*, ability_components::AbilityId};

    fn sample_save() -> SaveFile {
        let mut wallet = Wallet::default();
        wallet.earn_tokens(12);
        wallet.earn_special_token();

        let mut ranks = AbilityRanks::default();
        ranks.increment(AbilityId::Jump);
        ranks.increment(AbilityId::Jump);
        ranks.increment(AbilityId::Barrier);

        SaveFile {
            version: SAVE_VERSION,
            wallet,
            ranks,
        }
    }

    #[test]
    fn save_round_trips_through_ron() {
        let save = sample_save();
        let text = ron::ser::to_string_pretty(&save, ron::ser::PrettyConfig::default()).unwrap();
        let decoded = decode_save(&text).unwrap();
        assert_eq!(decoded, save);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let mut save = sample_save();
        save.version = SAVE_VERSION + 1;
        let text = ron::ser::to_string_pretty(&save, ron::ser::PrettyConfig::default()).unwrap();

        match decode_save(&text) {
            Err(SaveError::VersionMismatch { found }) => assert_eq!(found, SAVE_VERSION + 1),
            other => panic!("expected version mismatch, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            decode_save("not even ron {{"),
            Err(SaveError::Malformed(_))
        ));
    }
}
