use {
    crate::*,
    ability_assets::AbilityCatalog,
    ability_components::{
        AbilityId, AbilityRanks, ActiveModifiers, BarrierActive, BarrierCharge, BarrierCooldown,
        EmpActive, EmpCharge, LifeRegenProgress, SonicBoomCharge, ZeroGravityActive,
        ZeroGravityCharge,
    },
    ability_events::{
        ActivateBarrier, ActivateEmp, ActivateSonicBoom, ActivateZeroGravity, LifeGranted,
        SpawnBomb, StarCollected,
    },
    arena_components::{Bomb, LinearVelocity},
    bevy::prelude::*,
    player_components::Player,
    std::time::Duration,
};

#[derive(Resource, Default)]
struct SpawnedBombs(Vec<SpawnBomb>);

#[derive(Resource, Default)]
struct LivesGranted(u32);

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(ActivesPlugin)
        .insert_resource(AbilityCatalog::builtin())
        .init_resource::<AbilityRanks>()
        .init_resource::<ActiveModifiers>()
        .init_resource::<SpawnedBombs>()
        .init_resource::<LivesGranted>();

    app.add_systems(
        Update,
        |mut spawns: MessageReader<SpawnBomb>, mut seen: ResMut<SpawnedBombs>| {
            for spawn in spawns.read() {
                seen.0.push(*spawn);
            }
        },
    );
    app.add_observer(|_: On<LifeGranted>, mut granted: ResMut<LivesGranted>| {
        granted.0 += 1;
    });

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

fn set_rank(app: &mut App, id: AbilityId, rank: u32) {
    let mut ranks = app.world_mut().resource_mut::<AbilityRanks>();
    for _ in 0..rank {
        ranks.increment(id);
    }
}

fn collect_star(app: &mut App, points: u32) {
    app.world_mut()
        .resource_mut::<Messages<StarCollected>>()
        .write(StarCollected { points });
    app.update();
}

#[test]
fn barrier_charges_in_two_collections() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::Barrier, 1);

    // Rank 1 needs 110 points: 60 is partial, 120 total snaps to full.
    collect_star(&mut app, 60);
    {
        let barrier = app.world().get::<BarrierCharge>(player).unwrap();
        assert_eq!(barrier.points, 60);
        assert!((barrier.charge - 54.545455).abs() < 1e-3);
    }

    collect_star(&mut app, 60);
    let barrier = app.world().get::<BarrierCharge>(player).unwrap();
    assert_eq!(barrier.charge, 100.0);
    assert_eq!(barrier.points, 0);
}

#[test]
fn locked_abilities_ignore_star_points() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    // Only sonic boom is unlocked; the other accumulators must not move.
    set_rank(&mut app, AbilityId::SonicBoom, 1);

    collect_star(&mut app, 130);

    assert_eq!(app.world().get::<BarrierCharge>(player).unwrap().points, 0);
    assert_eq!(app.world().get::<EmpCharge>(player).unwrap().points, 0);
    let boom = app.world().get::<SonicBoomCharge>(player).unwrap();
    assert_eq!(boom.charges, 1);
    assert_eq!(boom.points, 10);
}

#[test]
fn barrier_activation_requires_full_charge() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::Barrier, 1);

    collect_star(&mut app, 60);
    app.world_mut().trigger(ActivateBarrier);
    app.update();

    assert!(app.world().get::<BarrierActive>(player).is_none());
    assert_eq!(app.world().get::<BarrierCharge>(player).unwrap().points, 60);

    collect_star(&mut app, 60);
    app.world_mut().trigger(ActivateBarrier);
    app.update();

    let active = app.world().get::<BarrierActive>(player).unwrap();
    assert_eq!(active.timer.duration(), Duration::from_millis(3000));
    let barrier = app.world().get::<BarrierCharge>(player).unwrap();
    assert_eq!(barrier.charge, 0.0);
}

#[test]
fn barrier_expiry_starts_cooldown_and_blocks_accrual() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::Barrier, 1);

    collect_star(&mut app, 110);
    app.world_mut().trigger(ActivateBarrier);
    app.update();

    app.world_mut()
        .get_mut::<BarrierActive>(player)
        .unwrap()
        .timer
        .tick(Duration::from_millis(3100));
    app.update();

    assert!(app.world().get::<BarrierActive>(player).is_none());
    assert!(app.world().get::<BarrierCooldown>(player).is_some());

    // Stars collected during cooldown are lost to the barrier.
    collect_star(&mut app, 50);
    assert_eq!(app.world().get::<BarrierCharge>(player).unwrap().points, 0);

    app.world_mut()
        .get_mut::<BarrierCooldown>(player)
        .unwrap()
        .timer
        .tick(Duration::from_millis(10100));
    app.update();
    assert!(app.world().get::<BarrierCooldown>(player).is_none());

    collect_star(&mut app, 50);
    assert_eq!(app.world().get::<BarrierCharge>(player).unwrap().points, 50);
}

#[test]
fn emp_cycle_returns_every_captured_bomb() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::Emp, 1);
    app.world_mut().get_mut::<EmpCharge>(player).unwrap().ready = true;

    app.world_mut().spawn((
        Bomb,
        Transform::from_xyz(10.0, 300.0, 0.0),
        LinearVelocity(Vec2::new(-40.0, -250.0)),
    ));
    app.world_mut().spawn((
        Bomb,
        Transform::from_xyz(-80.0, 200.0, 0.0),
        LinearVelocity(Vec2::new(160.0, -30.0)),
    ));

    app.world_mut().trigger(ActivateEmp);
    app.update();

    let mut bombs = app.world_mut().query_filtered::<(), With<Bomb>>();
    assert_eq!(bombs.iter(app.world()).count(), 0);
    assert!(app.world().get::<EmpActive>(player).is_some());
    assert!(!app.world().get::<EmpCharge>(player).unwrap().ready);

    let mut returns = app.world_mut().query::<&mut crate::systems::EmpReturn>();
    {
        let mut pending = returns.single_mut(app.world_mut()).unwrap();
        assert_eq!(pending.timer.duration(), Duration::from_millis(8000));
        pending.timer.tick(Duration::from_millis(8100));
    }
    app.update();

    let returned = &app.world().resource::<SpawnedBombs>().0;
    assert_eq!(returned.len(), 2);
    for spawn in returned {
        assert!(spawn.velocity.x.abs() >= 100.0);
        assert!(spawn.velocity.y.abs() >= 100.0);
    }
    // The slow axes kept their direction.
    assert!(returned.iter().any(|s| s.velocity == Vec2::new(-100.0, -250.0)));
    assert!(returned.iter().any(|s| s.velocity == Vec2::new(160.0, -100.0)));

    assert!(app.world().get::<EmpActive>(player).is_none());
}

#[test]
fn emp_holds_without_live_bombs() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::Emp, 1);
    app.world_mut().get_mut::<EmpCharge>(player).unwrap().ready = true;

    app.world_mut().trigger(ActivateEmp);
    app.update();

    // The charge is not wasted on an empty sky.
    assert!(app.world().get::<EmpCharge>(player).unwrap().ready);
    assert!(app.world().get::<EmpActive>(player).is_none());
}

#[test]
fn sonic_boom_destroys_the_closest_bombs() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::SonicBoom, 2);
    app.world_mut()
        .get_mut::<SonicBoomCharge>(player)
        .unwrap()
        .charges = 2;

    let near = app
        .world_mut()
        .spawn((Bomb, Transform::from_xyz(20.0, 0.0, 0.0)))
        .id();
    let mid = app
        .world_mut()
        .spawn((Bomb, Transform::from_xyz(0.0, 90.0, 0.0)))
        .id();
    let far = app
        .world_mut()
        .spawn((Bomb, Transform::from_xyz(300.0, 300.0, 0.0)))
        .id();

    app.world_mut().trigger(ActivateSonicBoom);
    app.update();

    // Rank 2 destroys the two closest; the far bomb survives.
    assert!(app.world().get_entity(near).is_err());
    assert!(app.world().get_entity(mid).is_err());
    assert!(app.world().get_entity(far).is_ok());
    assert_eq!(
        app.world().get::<SonicBoomCharge>(player).unwrap().charges,
        1
    );
}

#[test]
fn sonic_boom_spends_one_charge_even_when_bombs_run_short() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::SonicBoom, 3);
    app.world_mut()
        .get_mut::<SonicBoomCharge>(player)
        .unwrap()
        .charges = 1;

    app.world_mut().spawn((Bomb, Transform::default()));

    app.world_mut().trigger(ActivateSonicBoom);
    app.update();

    let mut bombs = app.world_mut().query_filtered::<(), With<Bomb>>();
    assert_eq!(bombs.iter(app.world()).count(), 0);
    assert_eq!(
        app.world().get::<SonicBoomCharge>(player).unwrap().charges,
        0
    );
}

#[test]
fn zero_gravity_duration_scales_with_rank() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::ZeroGravity, 2);
    app.world_mut()
        .get_mut::<ZeroGravityCharge>(player)
        .unwrap()
        .ready = true;

    app.world_mut().trigger(ActivateZeroGravity);
    app.update();

    let active = app.world().get::<ZeroGravityActive>(player).unwrap();
    assert_eq!(active.timer.duration(), Duration::from_millis(15000));

    let modifiers = app.world().resource::<ActiveModifiers>();
    assert!(modifiers.magnet_boost);
    assert_eq!(modifiers.gravity_scale, 0.45);

    app.world_mut()
        .get_mut::<ZeroGravityActive>(player)
        .unwrap()
        .timer
        .tick(Duration::from_millis(15100));
    app.update();

    assert!(app.world().get::<ZeroGravityActive>(player).is_none());
    assert_eq!(
        *app.world().resource::<ActiveModifiers>(),
        ActiveModifiers::default()
    );
    // Ready stays false until the charge cycle completes again.
    assert!(!app.world().get::<ZeroGravityCharge>(player).unwrap().ready);
}

#[test]
fn zero_gravity_double_activation_is_a_no_op() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::ZeroGravity, 1);
    app.world_mut()
        .get_mut::<ZeroGravityCharge>(player)
        .unwrap()
        .ready = true;

    app.world_mut().trigger(ActivateZeroGravity);
    app.update();
    app.world_mut().trigger(ActivateZeroGravity);
    app.update();

    let active = app.world().get::<ZeroGravityActive>(player).unwrap();
    assert_eq!(active.timer.duration(), Duration::from_millis(12000));
}

#[test]
fn life_regen_fires_immediately_on_threshold() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::LifeRegen, 5);

    // Rank 5 needs 250 points.
    collect_star(&mut app, 200);
    assert_eq!(app.world().resource::<LivesGranted>().0, 0);

    // Crossing the threshold grants the life and discards the
    // 10-point surplus; the counter restarts from zero.
    collect_star(&mut app, 60);
    assert_eq!(app.world().resource::<LivesGranted>().0, 1);
    assert_eq!(
        app.world().get::<LifeRegenProgress>(player).unwrap().points,
        0
    );
}

#[test]
fn charging_stops_while_ready() {
    let mut app = test_app();
    let player = spawn_player(&mut app);
    set_rank(&mut app, AbilityId::Emp, 3);

    // Rank 3 needs 100 points.
    collect_star(&mut app, 120);
    assert!(app.world().get::<EmpCharge>(player).unwrap().ready);

    collect_star(&mut app, 80);
    let emp = app.world().get::<EmpCharge>(player).unwrap();
    assert!(emp.ready);
    assert_eq!(emp.points, 0);
}
