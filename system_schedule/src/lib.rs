use bevy::prelude::*;

/// Frame phases shared by every gameplay crate. The core plugin chains
/// these so intent resolution (input, activation keys) always runs
/// before actions (movement, spawning) and effects (collisions, charge
/// accrual, magnet pull).
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum GameSchedule {
    FrameStart,
    ResolveIntent,
    PerformAction,
    Effect,
    FrameEnd,
}
