//! End-to-end progression: level rewards fund a purchase, star points
//! charge the bought machine, activation consumes the charge.

use {
    abilities::AbilitiesPlugin,
    ability_assets::AbilityCatalog,
    ability_components::{
        AbilityId, AbilityRanks, ActiveModifiers, BarrierActive, BarrierCharge, BarrierCooldown,
        EmpCharge, LifeRegenProgress, SonicBoomCharge, ZeroGravityCharge,
    },
    ability_events::{ActivateBarrier, BuyUpgrade, LevelCompleted, StarCollected},
    actives::ActivesPlugin,
    bevy::prelude::*,
    player_components::Player,
    std::time::Duration,
    wallet::Wallet,
};

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins((AbilitiesPlugin, ActivesPlugin))
        .insert_resource(AbilityCatalog::builtin())
        .init_resource::<Wallet>()
        .init_resource::<AbilityRanks>()
        .init_resource::<ActiveModifiers>();
    app
}

fn spawn_player(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            Transform::default(),
            BarrierCharge::default(),
            EmpCharge::default(),
            SonicBoomCharge::default(),
            ZeroGravityCharge::default(),
            LifeRegenProgress::default(),
        ))
        .id()
}

fn collect_star(app: &mut App, points: u32) {
    app.world_mut()
        .resource_mut::<Messages<StarCollected>>()
        .write(StarCollected { points });
    app.update();
}

#[test]
fn rewards_fund_a_barrier_that_charges_and_fires() {
    let mut app = test_app();
    let player = spawn_player(&mut app);

    // Three finished levels: 9 tokens, 3 special tokens.
    for _ in 0..3 {
        app.world_mut().trigger(LevelCompleted { reward: 3 });
        app.update();
    }
    {
        let wallet = app.world().resource::<Wallet>();
        assert_eq!(wallet.tokens, 9);
        assert_eq!(wallet.special_tokens, 3);
    }

    // Barrier rank 1 costs 3 tokens + 1 special token.
    app.world_mut().trigger(BuyUpgrade {
        ability: AbilityId::Barrier,
    });
    app.update();
    {
        let wallet = app.world().resource::<Wallet>();
        assert_eq!(wallet.tokens, 6);
        assert_eq!(wallet.special_tokens, 2);
        assert!(
            app.world()
                .resource::<AbilityRanks>()
                .is_unlocked(AbilityId::Barrier)
        );
    }

    // Stars now feed the barrier accumulator; rank 1 needs 110 points.
    collect_star(&mut app, 70);
    collect_star(&mut app, 50);
    assert!(app.world().get::<BarrierCharge>(player).unwrap().is_full());

    app.world_mut().trigger(ActivateBarrier);
    app.update();
    assert!(app.world().get::<BarrierActive>(player).is_some());

    // Expiry hands over to the cooldown.
    app.world_mut()
        .get_mut::<BarrierActive>(player)
        .unwrap()
        .timer
        .tick(Duration::from_millis(3100));
    app.update();

    assert!(app.world().get::<BarrierActive>(player).is_none());
    assert!(app.world().get::<BarrierCooldown>(player).is_some());
}

#[test]
fn upgrading_mid_charge_keeps_accumulated_points() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    {
        let mut wallet = app.world_mut().resource_mut::<Wallet>();
        wallet.earn_tokens(9);
        wallet.earn_special_token();
    }

    app.world_mut().trigger(BuyUpgrade {
        ability: AbilityId::Barrier,
    });
    app.update();

    collect_star(&mut app, 60);

    // Rank 2 lowers the threshold from 110 to 90; the 60 banked
    // points stay and the progress bar is recomputed on the next star.
    app.world_mut().trigger(BuyUpgrade {
        ability: AbilityId::Barrier,
    });
    app.update();
    assert_eq!(
        app.world().resource::<AbilityRanks>().rank(AbilityId::Barrier),
        2
    );
    assert_eq!(app.world().get::<BarrierCharge>(player).unwrap().points, 60);

    collect_star(&mut app, 30);
    assert!(app.world().get::<BarrierCharge>(player).unwrap().is_full());
}
