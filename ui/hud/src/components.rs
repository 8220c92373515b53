use bevy::prelude::*;

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct StatusText;

#[derive(Component)]
pub struct ChargeText;

#[derive(Component)]
pub struct ShopText;
