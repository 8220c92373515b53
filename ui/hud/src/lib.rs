//! Text HUD: run status, activation meters and the upgrade shop.
//!
//! The shop is keyboard driven: Tab cycles through abilities, B buys
//! the selected upgrade. Purchase legality lives in the abilities
//! crate; the HUD only previews it.

pub mod components;

use {
    ability_assets::AbilityCatalog,
    ability_components::{
        AbilityId, AbilityRanks, BarrierActive, BarrierCharge, BarrierCooldown, EmpActive,
        EmpCharge, LifeRegenProgress, SonicBoomCharge, ZeroGravityActive, ZeroGravityCharge,
    },
    ability_events::BuyUpgrade,
    arena::{LevelCounter, Score},
    bevy::prelude::*,
    components::{ChargeText, HudRoot, ShopText, StatusText},
    player_components::{Lives, Player},
    states::GameState,
    system_schedule::GameSchedule,
    wallet::{UpgradeCost, Wallet},
};

/// Which ability the shop cursor is on.
#[derive(Resource, Default)]
pub struct ShopSelection {
    index: usize,
}

impl ShopSelection {
    pub fn selected(&self) -> AbilityId {
        AbilityId::ALL[self.index]
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % AbilityId::ALL.len();
    }

    pub fn previous(&mut self) {
        self.index = (self.index + AbilityId::ALL.len() - 1) % AbilityId::ALL.len();
    }
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShopSelection>()
            .add_systems(OnEnter(GameState::Running), spawn_hud)
            .add_systems(OnExit(GameState::Running), despawn_hud)
            .add_systems(
                Update,
                (
                    shop_input.in_set(GameSchedule::ResolveIntent),
                    (update_status_text, update_charge_text, update_shop_text)
                        .in_set(GameSchedule::FrameEnd),
                )
                    .run_if(in_state(GameState::Running)),
            );
    }
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            Name::new("Hud"),
        ))
        .with_children(|root| {
            root.spawn((
                StatusText,
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            root.spawn((
                ChargeText,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.9, 1.0)),
            ));
            root.spawn((
                ShopText,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.9, 0.4)),
            ));
        });
}

fn despawn_hud(mut commands: Commands, roots: Query<Entity, With<HudRoot>>) {
    for entity in &roots {
        commands.entity(entity).despawn();
    }
}

fn shop_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut selection: ResMut<ShopSelection>,
    mut commands: Commands,
) {
    if keyboard.just_pressed(KeyCode::Tab) {
        if keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight) {
            selection.previous();
        } else {
            selection.next();
        }
    }

    if keyboard.just_pressed(KeyCode::KeyB) {
        commands.trigger(BuyUpgrade {
            ability: selection.selected(),
        });
    }
}

fn update_status_text(
    wallet: Res<Wallet>,
    score: Res<Score>,
    level: Res<LevelCounter>,
    lives: Query<&Lives, With<Player>>,
    mut texts: Query<&mut Text, With<StatusText>>,
) {
    let Ok(mut text) = texts.single_mut() else {
        return;
    };

    let lives = lives.single().map(|l| l.0).unwrap_or(0);

    *text = Text::new(format!(
        "Level {}  Score {}\nLives {}  Tokens {}  Special {}",
        level.0, score.0, lives, wallet.tokens, wallet.special_tokens,
    ));
}

fn update_charge_text(
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    players: Query<
        (
            &BarrierCharge,
            &EmpCharge,
            &SonicBoomCharge,
            &ZeroGravityCharge,
            &LifeRegenProgress,
            Has<BarrierActive>,
            Has<BarrierCooldown>,
            Has<EmpActive>,
            Has<ZeroGravityActive>,
        ),
        With<Player>,
    >,
    mut texts: Query<&mut Text, With<ChargeText>>,
) {
    let Ok(mut text) = texts.single_mut() else {
        return;
    };

    let Ok((
        barrier,
        emp,
        boom,
        zero_gravity,
        regen,
        barrier_active,
        barrier_cooldown,
        emp_active,
        zero_gravity_active,
    )) = players.single()
    else {
        return;
    };

    let mut lines = Vec::new();

    let rank = ranks.rank(AbilityId::Barrier);
    if rank >= 1 {
        let state = if barrier_active {
            "ACTIVE".to_string()
        } else if barrier_cooldown {
            "cooling down".to_string()
        } else if barrier.is_full() {
            "READY".to_string()
        } else {
            format!("{:.0}%", barrier.charge)
        };
        lines.push(format!("[Q] Barrier: {state}"));
    }

    let rank = ranks.rank(AbilityId::Emp);
    if rank >= 1 {
        let state = if emp_active {
            "bombs away".to_string()
        } else if emp.ready {
            "READY".to_string()
        } else {
            format!("{}/{}", emp.points, catalog.emp_points_needed(rank))
        };
        lines.push(format!("[W] EMP: {state}"));
    }

    let rank = ranks.rank(AbilityId::SonicBoom);
    if rank >= 1 {
        lines.push(format!(
            "[E] Sonic Boom: x{} ({}/{})",
            boom.charges,
            boom.points,
            catalog.sonic_boom_points_needed(rank)
        ));
    }

    let rank = ranks.rank(AbilityId::ZeroGravity);
    if rank >= 1 {
        let state = if zero_gravity_active {
            "ACTIVE".to_string()
        } else if zero_gravity.ready {
            "READY".to_string()
        } else {
            format!(
                "{}/{}",
                zero_gravity.points,
                catalog.zero_gravity_points_needed(rank)
            )
        };
        lines.push(format!("[R] Zero-G: {state}"));
    }

    let rank = ranks.rank(AbilityId::LifeRegen);
    if rank >= 1 {
        lines.push(format!(
            "Life Regen: {}/{}",
            regen.points,
            catalog.life_regen_points_needed(rank)
        ));
    }

    *text = Text::new(lines.join("\n"));
}

fn update_shop_text(
    selection: Res<ShopSelection>,
    wallet: Res<Wallet>,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut texts: Query<&mut Text, With<ShopText>>,
) {
    let Ok(mut text) = texts.single_mut() else {
        return;
    };

    let ability = selection.selected();
    let rank = ranks.rank(ability);

    let line = match catalog.next_cost(ability, rank) {
        Some(cost) => {
            let marker = if abilities::can_upgrade(&catalog, &ranks, &wallet, ability) {
                "[B] buy"
            } else {
                "too expensive"
            };
            format!(
                "Shop (Tab): {} -> {} for {} ({marker})",
                catalog.display_name(ability),
                catalog.upgrade_name(ability, rank + 1),
                format_cost(&cost),
            )
        }
        None => format!("Shop (Tab): {} (maxed out)", catalog.display_name(ability)),
    };

    *text = Text::new(line);
}

fn format_cost(cost: &UpgradeCost) -> String {
    if cost.special_tokens > 0 {
        format!("{}t + {}s", cost.tokens, cost.special_tokens)
    } else {
        format!("{}t", cost.tokens)
    }
}
