use {
    crate::{ARENA_HALF_WIDTH, GROUND_Y},
    ability_assets::AbilityCatalog,
    ability_components::{
        AbilityId, AbilityRanks, BarrierCharge, EmpCharge, LifeRegenProgress, PlatformAccess,
        SonicBoomCharge, ZeroGravityCharge,
    },
    ability_events::{
        ActivateBarrier, ActivateEmp, ActivateSonicBoom, ActivateZeroGravity, LifeGranted,
    },
    arena_components::LinearVelocity,
    bevy::prelude::*,
    player_components::{JumpState, Lives, Player},
};

const JUMP_SPEED: f32 = 450.0;
const PLAYER_SIZE: Vec2 = Vec2::new(28.0, 36.0);

pub fn spawn_player(mut commands: Commands) {
    commands.spawn((
        Player,
        Lives::default(),
        JumpState::default(),
        LinearVelocity::default(),
        BarrierCharge::default(),
        EmpCharge::default(),
        SonicBoomCharge::default(),
        ZeroGravityCharge::default(),
        LifeRegenProgress::default(),
        Sprite {
            color: Color::srgb(0.3, 0.8, 1.0),
            custom_size: Some(PLAYER_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, GROUND_Y, 1.0),
        Name::new("Player"),
    ));
    info!("player spawned");
}

pub fn movement_intent(
    keyboard: Res<ButtonInput<KeyCode>>,
    ranks: Res<AbilityRanks>,
    catalog: Res<AbilityCatalog>,
    mut players: Query<(&mut LinearVelocity, &mut JumpState), With<Player>>,
) {
    let Ok((mut velocity, mut jump_state)) = players.single_mut() else {
        return;
    };

    let speed = catalog.run_speed(ranks.rank(AbilityId::Speed));
    velocity.0.x = 0.0;
    if keyboard.pressed(KeyCode::ArrowLeft) {
        velocity.0.x = -speed;
    }
    if keyboard.pressed(KeyCode::ArrowRight) {
        velocity.0.x = speed;
    }

    if keyboard.just_pressed(KeyCode::Space) {
        let max_jumps = catalog.max_jumps(ranks.rank(AbilityId::Jump));
        if jump_state.can_jump(max_jumps) {
            jump_state.jumps_used += 1;
            jump_state.grounded = false;
            velocity.0.y = JUMP_SPEED;
        }
    }

    if keyboard.pressed(KeyCode::ArrowDown) {
        let fall_rank = ranks.rank(AbilityId::FastFall);
        if ranks.is_unlocked(AbilityId::FastFall) && !jump_state.grounded {
            velocity.0.y = velocity.0.y.min(-catalog.fast_fall_speed(fall_rank));
        }

        // Phasing through the ground needs the top platform tier.
        let access = PlatformAccess::from_rank(ranks.rank(AbilityId::PlatformDrop));
        if access.drop_through_ground && jump_state.grounded {
            jump_state.grounded = false;
            velocity.0.y = -JUMP_SPEED;
        }
    }
}

pub fn activation_keys(keyboard: Res<ButtonInput<KeyCode>>, mut commands: Commands) {
    if keyboard.just_pressed(KeyCode::KeyQ) {
        commands.trigger(ActivateBarrier);
    }
    if keyboard.just_pressed(KeyCode::KeyW) {
        commands.trigger(ActivateEmp);
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        commands.trigger(ActivateSonicBoom);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        commands.trigger(ActivateZeroGravity);
    }
}

/// Per-tick ground reconciliation: landing resets the air-jump count.
pub fn reconcile_ground_contact(
    mut players: Query<(&mut Transform, &mut LinearVelocity, &mut JumpState), With<Player>>,
) {
    let Ok((mut transform, mut velocity, mut jump_state)) = players.single_mut() else {
        return;
    };

    transform.translation.x = transform
        .translation
        .x
        .clamp(-ARENA_HALF_WIDTH, ARENA_HALF_WIDTH);

    if transform.translation.y <= GROUND_Y && velocity.0.y <= 0.0 {
        transform.translation.y = GROUND_Y;
        velocity.0.y = 0.0;
        if !jump_state.grounded {
            jump_state.land();
        }
    }
}

pub fn grant_life(_trigger: On<LifeGranted>, mut players: Query<&mut Lives, With<Player>>) {
    if let Ok(mut lives) = players.single_mut() {
        lives.0 += 1;
        info!(lives = lives.0, "life granted");
    }
}
