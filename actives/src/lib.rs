//! The four activation state machines (barrier, EMP, sonic boom, zero
//! gravity) plus life regen. Each one cycles Locked -> Charging ->
//! Ready -> Active -> Charging; sonic boom stockpiles whole charges
//! instead. Activation requests are observer events and every failed
//! guard is a logged no-op.

pub mod charge;
pub mod systems;

#[cfg(test)]
mod tests;

use {
    ability_assets::AbilityCatalog,
    ability_events::AbilityEventsPlugin,
    bevy::prelude::*,
    states::GameState,
    system_schedule::GameSchedule,
};

pub struct ActivesPlugin;

impl Plugin for ActivesPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AbilityEventsPlugin)
            .register_type::<systems::EmpReturn>()
            .add_observer(systems::activate_barrier)
            .add_observer(systems::activate_emp)
            .add_observer(systems::activate_sonic_boom)
            .add_observer(systems::activate_zero_gravity)
            .add_systems(
                Update,
                (
                    (charge::fan_out_star_points, charge::absorb_boom_points)
                        .in_set(GameSchedule::Effect),
                    (
                        systems::tick_barrier,
                        systems::tick_barrier_cooldown,
                        systems::tick_emp_return,
                        systems::tick_zero_gravity,
                    )
                        .in_set(GameSchedule::FrameEnd),
                )
                    .run_if(resource_exists::<AbilityCatalog>),
            )
            .add_systems(OnExit(GameState::Running), systems::cleanup_run_effects);
    }
}
