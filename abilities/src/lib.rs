//! The upgrade ledger: the only place where tokens are spent and
//! ranks move. A purchase is atomic; every failure path is a logged
//! no-op so callers can treat `BuyUpgrade` as fire-and-forget.


use {
    ability_assets::AbilityCatalog,
    ability_components::{AbilityId, AbilityRanks, SonicBoomCharge},
    ability_events::{
        AbilityUpgraded, BuyUpgrade, LevelCompleted, LifeGranted, ResetProgression,
    },
    bevy::prelude::*,
    player_components::Player,
    wallet::Wallet,
};

pub struct AbilitiesPlugin;

impl Plugin for AbilitiesPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(purchase_upgrade)
            .add_observer(apply_level_reward)
            .add_observer(reset_progression);
    }
}

/// Whether the shop should light up the buy button: not maxed out and
/// both currencies covered.
pub fn can_upgrade(
    catalog: &AbilityCatalog,
    ranks: &AbilityRanks,
    wallet: &Wallet,
    ability: AbilityId,
) -> bool {
    catalog
        .next_cost(ability, ranks.rank(ability))
        .is_some_and(|cost| wallet.can_afford(&cost))
}

fn purchase_upgrade(
    trigger: On<BuyUpgrade>,
    mut commands: Commands,
    mut wallet: ResMut<Wallet>,
    mut ranks: ResMut<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut booms: Query<&mut SonicBoomCharge, With<Player>>,
) {
    let ability = trigger.event().ability;
    let current = ranks.rank(ability);

    let Some(cost) = catalog.next_cost(ability, current) else {
        warn!(?ability, rank = current, "already at max rank");
        return;
    };

    if !wallet.spend(&cost) {
        warn!(
            ?ability,
            ?cost,
            tokens = wallet.tokens,
            special_tokens = wallet.special_tokens,
            "cannot afford upgrade"
        );
        return;
    }

    let new_rank = ranks.increment(ability);
    info!(
        ?ability,
        new_rank,
        name = catalog.upgrade_name(ability, new_rank),
        "upgrade purchased"
    );

    match ability {
        AbilityId::ExtraLife => {
            commands.trigger(LifeGranted);
        }
        AbilityId::SonicBoom => {
            // Each rank comes with a free charge.
            if let Ok(mut boom) = booms.single_mut() {
                boom.charges += 1;
            }
        }
        _ => {}
    }

    commands.trigger(AbilityUpgraded { ability, new_rank });
}

/// Level rewards: the base token grant, one special token, plus the
/// token-bonus rank's extra tokens.
fn apply_level_reward(
    trigger: On<LevelCompleted>,
    mut wallet: ResMut<Wallet>,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
) {
    let bonus = catalog.bonus_tokens_per_level(ranks.rank(AbilityId::TokenBonus));
    let earned = trigger.event().reward + bonus;

    wallet.earn_tokens(earned);
    wallet.earn_special_token();
    info!(earned, bonus, "level reward banked");
}

fn reset_progression(
    _trigger: On<ResetProgression>,
    mut wallet: ResMut<Wallet>,
    mut ranks: ResMut<AbilityRanks>,
) {
    *wallet = Wallet::default();
    ranks.reset();
    info!("progression reset to defaults");
}
