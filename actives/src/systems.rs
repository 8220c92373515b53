use {
    ability_assets::AbilityCatalog,
    ability_components::{
        AbilityId, AbilityRanks, ActiveModifiers, BarrierActive, BarrierCharge, BarrierCooldown,
        EmpActive, EmpCharge, SonicBoomCharge, ZeroGravityActive, ZeroGravityCharge,
    },
    ability_events::{
        AbilityActivated, AbilityDeactivated, ActivateBarrier, ActivateEmp, ActivateSonicBoom,
        ActivateZeroGravity, SpawnBomb,
    },
    arena_components::{Bomb, LinearVelocity},
    bevy::prelude::*,
    player_components::Player,
    std::time::Duration,
};

/// Returned bombs never crawl: each axis keeps its direction but gets
/// at least this much speed.
const EMP_RETURN_MIN_AXIS_SPEED: f32 = 100.0;

/// Deferred EMP effect: holds the captured bombs until the
/// rank-dependent delay elapses, then re-spawns every one of them.
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct EmpReturn {
    pub timer: Timer,
    pub snapshots: Vec<BombSnapshot>,
}

#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct BombSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
}

fn once_ms(ms: u32) -> Timer {
    Timer::new(Duration::from_millis(ms as u64), TimerMode::Once)
}

pub fn activate_barrier(
    _trigger: On<ActivateBarrier>,
    mut commands: Commands,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut players: Query<(Entity, &mut BarrierCharge, Has<BarrierActive>), With<Player>>,
) {
    let Ok((player, mut barrier, active)) = players.single_mut() else {
        return;
    };

    let rank = ranks.rank(AbilityId::Barrier);
    if rank < 1 || active || !barrier.is_full() {
        debug!(rank, active, charge = barrier.charge, "barrier not ready");
        return;
    }

    barrier.charge = 0.0;
    barrier.points = 0;
    commands.entity(player).insert(BarrierActive {
        timer: once_ms(catalog.barrier_duration_ms(rank)),
    });
    commands.trigger(AbilityActivated {
        ability: AbilityId::Barrier,
    });
    info!(rank, "barrier raised");
}

/// Barrier expiry: the invincibility marker comes off and the
/// rank-tiered cooldown starts. Points do not accrue until the
/// cooldown expires too.
pub fn tick_barrier(
    mut commands: Commands,
    time: Res<Time>,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut players: Query<(Entity, &mut BarrierActive), With<Player>>,
) {
    for (player, mut active) in &mut players {
        if active.timer.tick(time.delta()).is_finished() {
            let rank = ranks.rank(AbilityId::Barrier);
            commands
                .entity(player)
                .remove::<BarrierActive>()
                .insert(BarrierCooldown {
                    timer: once_ms(catalog.barrier_cooldown_ms(rank)),
                });
            commands.trigger(AbilityDeactivated {
                ability: AbilityId::Barrier,
            });
            info!(rank, "barrier expired, cooling down");
        }
    }
}

pub fn tick_barrier_cooldown(
    mut commands: Commands,
    time: Res<Time>,
    mut players: Query<(Entity, &mut BarrierCooldown), With<Player>>,
) {
    for (player, mut cooldown) in &mut players {
        if cooldown.timer.tick(time.delta()).is_finished() {
            commands.entity(player).remove::<BarrierCooldown>();
            debug!("barrier cooldown over");
        }
    }
}

pub fn activate_emp(
    _trigger: On<ActivateEmp>,
    mut commands: Commands,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut players: Query<(Entity, &mut EmpCharge, Has<EmpActive>), With<Player>>,
    bombs: Query<(Entity, &Transform, &LinearVelocity), With<Bomb>>,
) {
    let Ok((player, mut emp, active)) = players.single_mut() else {
        return;
    };

    let rank = ranks.rank(AbilityId::Emp);
    if rank < 1 || !emp.ready || active {
        debug!(rank, ready = emp.ready, active, "EMP not ready");
        return;
    }
    if bombs.is_empty() {
        debug!("no live bombs, EMP held");
        return;
    }

    let mut snapshots = Vec::new();
    for (bomb, transform, velocity) in &bombs {
        snapshots.push(BombSnapshot {
            position: transform.translation.truncate(),
            velocity: velocity.0,
        });
        commands.entity(bomb).despawn();
    }

    let captured = snapshots.len();
    emp.ready = false;
    commands.entity(player).insert(EmpActive);
    commands.spawn(EmpReturn {
        timer: once_ms(catalog.emp_return_delay_ms(rank)),
        snapshots,
    });
    commands.trigger(AbilityActivated {
        ability: AbilityId::Emp,
    });
    info!(rank, captured, "EMP fired");
}

/// When the return delay elapses every captured bomb comes back with
/// its stored velocity, floored per axis.
pub fn tick_emp_return(
    mut commands: Commands,
    time: Res<Time>,
    mut spawns: MessageWriter<SpawnBomb>,
    mut returns: Query<(Entity, &mut EmpReturn)>,
    players: Query<Entity, (With<Player>, With<EmpActive>)>,
) {
    for (entity, mut pending) in &mut returns {
        if !pending.timer.tick(time.delta()).is_finished() {
            continue;
        }

        for snapshot in &pending.snapshots {
            spawns.write(SpawnBomb {
                position: snapshot.position,
                velocity: floor_return_velocity(snapshot.velocity),
            });
        }
        info!(returned = pending.snapshots.len(), "EMP bombs returned");

        commands.entity(entity).despawn();
        if let Ok(player) = players.single() {
            commands.entity(player).remove::<EmpActive>();
        }
        commands.trigger(AbilityDeactivated {
            ability: AbilityId::Emp,
        });
    }
}

pub fn floor_return_velocity(velocity: Vec2) -> Vec2 {
    Vec2::new(floor_axis(velocity.x), floor_axis(velocity.y))
}

fn floor_axis(v: f32) -> f32 {
    if v.abs() >= EMP_RETURN_MIN_AXIS_SPEED {
        v
    } else if v < 0.0 {
        -EMP_RETURN_MIN_AXIS_SPEED
    } else {
        EMP_RETURN_MIN_AXIS_SPEED
    }
}

pub fn activate_sonic_boom(
    _trigger: On<ActivateSonicBoom>,
    mut commands: Commands,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut players: Query<(&Transform, &mut SonicBoomCharge), With<Player>>,
    bombs: Query<(Entity, &Transform), With<Bomb>>,
) {
    let Ok((player_transform, mut boom)) = players.single_mut() else {
        return;
    };

    let rank = ranks.rank(AbilityId::SonicBoom);
    if rank < 1 || boom.charges == 0 {
        debug!(rank, charges = boom.charges, "sonic boom not available");
        return;
    }
    if bombs.is_empty() {
        debug!("no live bombs, sonic boom held");
        return;
    }

    let player_pos = player_transform.translation.truncate();
    let mut by_distance: Vec<(Entity, f32)> = bombs
        .iter()
        .map(|(bomb, transform)| {
            (
                bomb,
                transform.translation.truncate().distance_squared(player_pos),
            )
        })
        .collect();
    by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

    let to_destroy = catalog.sonic_boom_bombs_destroyed(rank) as usize;
    let destroyed = to_destroy.min(by_distance.len());
    for (bomb, _) in by_distance.into_iter().take(destroyed) {
        commands.entity(bomb).despawn();
    }

    // One charge spent regardless of how many bombs were in reach.
    boom.charges -= 1;
    commands.trigger(AbilityActivated {
        ability: AbilityId::SonicBoom,
    });
    info!(rank, destroyed, left = boom.charges, "sonic boom");
}

pub fn activate_zero_gravity(
    _trigger: On<ActivateZeroGravity>,
    mut commands: Commands,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut modifiers: ResMut<ActiveModifiers>,
    mut players: Query<(Entity, &mut ZeroGravityCharge, Has<ZeroGravityActive>), With<Player>>,
) {
    let Ok((player, mut zero_gravity, active)) = players.single_mut() else {
        return;
    };

    let rank = ranks.rank(AbilityId::ZeroGravity);
    if rank < 1 || !zero_gravity.ready || active {
        debug!(rank, ready = zero_gravity.ready, active, "zero gravity not ready");
        return;
    }

    zero_gravity.ready = false;
    commands.entity(player).insert(ZeroGravityActive {
        timer: once_ms(catalog.zero_gravity_duration_ms(rank)),
    });
    *modifiers = ActiveModifiers {
        gravity_scale: catalog.zero_gravity_gravity_scale(rank),
        magnet_boost: true,
    };
    commands.trigger(AbilityActivated {
        ability: AbilityId::ZeroGravity,
    });
    info!(rank, gravity_scale = modifiers.gravity_scale, "zero gravity on");
}

pub fn tick_zero_gravity(
    mut commands: Commands,
    time: Res<Time>,
    mut modifiers: ResMut<ActiveModifiers>,
    mut players: Query<(Entity, &mut ZeroGravityActive), With<Player>>,
) {
    for (player, mut active) in &mut players {
        if active.timer.tick(time.delta()).is_finished() {
            commands.entity(player).remove::<ZeroGravityActive>();
            *modifiers = ActiveModifiers::default();
            commands.trigger(AbilityDeactivated {
                ability: AbilityId::ZeroGravity,
            });
            info!("zero gravity over");
        }
    }
}

/// The run is over: pending deferred effects die with it instead of
/// firing into a torn-down arena.
pub fn cleanup_run_effects(
    mut commands: Commands,
    mut modifiers: ResMut<ActiveModifiers>,
    returns: Query<Entity, With<EmpReturn>>,
    players: Query<Entity, With<Player>>,
) {
    for entity in &returns {
        commands.entity(entity).despawn();
    }
    for player in &players {
        commands
            .entity(player)
            .remove::<(BarrierActive, BarrierCooldown, EmpActive, ZeroGravityActive)>();
    }
    *modifiers = ActiveModifiers::default();
}
