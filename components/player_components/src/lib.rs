use bevy::prelude::*;

pub struct PlayerComponentsPlugin;

impl Plugin for PlayerComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Player>()
            .register_type::<Lives>()
            .register_type::<JumpState>();
    }
}

#[derive(Component, Reflect, Default, Debug)]
#[reflect(Component, Default)]
pub struct Player;

#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct Lives(pub u32);

impl Default for Lives {
    fn default() -> Self {
        Self(3)
    }
}

/// Air-jump bookkeeping, reconciled against ground contact every tick.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq)]
#[reflect(Component, Default)]
pub struct JumpState {
    pub jumps_used: u32,
    pub grounded: bool,
}

impl JumpState {
    /// Whether another jump is allowed given the rank-derived cap.
    pub fn can_jump(&self, max_jumps: u32) -> bool {
        self.jumps_used < max_jumps
    }

    pub fn land(&mut self) {
        self.jumps_used = 0;
        self.grounded = true;
    }
}
