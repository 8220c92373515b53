//! Star-point accrual. One message fans out to every accumulator;
//! each applies its own guard, so a locked ability skipping a grant
//! never affects the others.

use {
    ability_assets::AbilityCatalog,
    ability_components::{
        AbilityId, AbilityRanks, BarrierActive, BarrierCharge, BarrierCooldown, EmpActive,
        EmpCharge, LifeRegenProgress, SonicBoomCharge, ZeroGravityActive, ZeroGravityCharge,
    },
    ability_events::{ChargeSonicBoom, LifeGranted, StarCollected},
    bevy::prelude::*,
    player_components::Player,
};

/// Feeds collected star points into the barrier. The charge value
/// tracks progress as a 0..=100 bar and snaps to exactly 100 at the
/// threshold; there is no carry-over.
pub fn accrue_barrier(barrier: &mut BarrierCharge, points: u32, needed: u32) {
    barrier.points += points;
    if barrier.points >= needed {
        barrier.charge = 100.0;
        barrier.points = 0;
    } else {
        barrier.charge = barrier.points as f32 / needed as f32 * 100.0;
    }
}

/// Single-charge accumulator shared by EMP and zero gravity: crossing
/// the threshold flips `ready` and discards the surplus.
pub fn accrue_single_charge(points: &mut u32, ready: &mut bool, grant: u32, needed: u32) {
    *points += grant;
    if *points >= needed {
        *ready = true;
        *points = 0;
    }
}

/// Sonic boom banks whole charges and carries the remainder over, so
/// one large grant can yield several charges.
pub fn accrue_sonic_boom(boom: &mut SonicBoomCharge, grant: u32, needed: u32) {
    boom.points += grant;
    while boom.points >= needed {
        boom.points -= needed;
        boom.charges += 1;
    }
}

pub fn fan_out_star_points(
    mut commands: Commands,
    mut collected: MessageReader<StarCollected>,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut players: Query<
        (
            &mut BarrierCharge,
            &mut EmpCharge,
            &mut ZeroGravityCharge,
            &mut SonicBoomCharge,
            &mut LifeRegenProgress,
            Has<BarrierActive>,
            Has<BarrierCooldown>,
            Has<EmpActive>,
            Has<ZeroGravityActive>,
        ),
        With<Player>,
    >,
) {
    let Ok((
        mut barrier,
        mut emp,
        mut zero_gravity,
        mut boom,
        mut regen,
        barrier_active,
        barrier_cooling,
        emp_active,
        zero_gravity_active,
    )) = players.single_mut()
    else {
        return;
    };

    // Split the Mut wrappers so per-field borrows work below.
    let emp = &mut *emp;
    let zero_gravity = &mut *zero_gravity;

    for star in collected.read() {
        let points = star.points;

        let barrier_rank = ranks.rank(AbilityId::Barrier);
        if barrier_rank >= 1 && !barrier_active && !barrier_cooling && !barrier.is_full() {
            accrue_barrier(
                &mut barrier,
                points,
                catalog.barrier_points_needed(barrier_rank),
            );
        }

        let emp_rank = ranks.rank(AbilityId::Emp);
        if emp_rank >= 1 && !emp.ready && !emp_active {
            accrue_single_charge(
                &mut emp.points,
                &mut emp.ready,
                points,
                catalog.emp_points_needed(emp_rank),
            );
        }

        let zg_rank = ranks.rank(AbilityId::ZeroGravity);
        if zg_rank >= 1 && !zero_gravity.ready && !zero_gravity_active {
            accrue_single_charge(
                &mut zero_gravity.points,
                &mut zero_gravity.ready,
                points,
                catalog.zero_gravity_points_needed(zg_rank),
            );
        }

        let boom_rank = ranks.rank(AbilityId::SonicBoom);
        if boom_rank >= 1 {
            accrue_sonic_boom(
                &mut boom,
                points,
                catalog.sonic_boom_points_needed(boom_rank),
            );
        }

        let regen_rank = ranks.rank(AbilityId::LifeRegen);
        if regen_rank >= 1 {
            regen.points += points;
            let needed = catalog.life_regen_points_needed(regen_rank);
            if regen.points >= needed {
                // No ready phase: the life lands immediately and the
                // surplus is discarded, same as the single-charge
                // machines.
                regen.points = 0;
                commands.trigger(LifeGranted);
                debug!("life regen threshold crossed");
            }
        }
    }
}

/// Extra points granted to the sonic boom accumulator alone.
pub fn absorb_boom_points(
    mut grants: MessageReader<ChargeSonicBoom>,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut players: Query<&mut SonicBoomCharge, With<Player>>,
) {
    let Ok(mut boom) = players.single_mut() else {
        return;
    };

    let rank = ranks.rank(AbilityId::SonicBoom);
    if rank < 1 {
        return;
    }

    let needed = catalog.sonic_boom_points_needed(rank);
    for grant in grants.read() {
        accrue_sonic_boom(&mut boom, grant.points, needed);
    }
}
