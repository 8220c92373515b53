use {
    crate::{AbilityDefinition, AbilityTuning},
    ability_components::AbilityId,
    bevy::prelude::*,
    std::collections::HashMap,
    thiserror::Error,
    wallet::UpgradeCost,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no definition for {0:?}")]
    Missing(AbilityId),
    #[error("duplicate definition for {0:?}")]
    Duplicate(AbilityId),
    #[error("{ability:?}: tuning variant does not belong to this ability")]
    TuningMismatch { ability: AbilityId },
    #[error("{ability:?}: {table} has {actual} entries, expected {expected}")]
    TableLength {
        ability: AbilityId,
        table: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{ability:?}: {table} must be {order}")]
    TableOrder {
        ability: AbilityId,
        table: &'static str,
        order: &'static str,
    },
}

#[derive(Debug, Clone)]
struct AbilityInfo {
    display_name: String,
    max_rank: u32,
    costs: Vec<UpgradeCost>,
    upgrade_names: Vec<String>,
}

/// Every rank table of the game, compiled from the ability definition
/// assets and validated up front. A malformed definition fails
/// compilation, so past this point each lookup is a plain index and
/// there is no runtime fallback value anywhere.
///
/// Value tables are indexed by rank (entry 0 = locked/base); charge
/// cycle tables are indexed by `rank - 1` and only consulted for
/// unlocked abilities.
#[derive(Resource, Debug, Clone)]
pub struct AbilityCatalog {
    info: HashMap<AbilityId, AbilityInfo>,
    max_jumps: Vec<u32>,
    run_speed: Vec<f32>,
    fall_speed: Vec<f32>,
    slow_factor: Vec<f32>,
    magnet_range: Vec<f32>,
    magnet_force: Vec<f32>,
    star_value: Vec<u32>,
    bonus_tokens: Vec<u32>,
    barrier_points: Vec<u32>,
    barrier_duration: Vec<u32>,
    barrier_cooldown: Vec<u32>,
    emp_points: Vec<u32>,
    emp_delay: Vec<u32>,
    boom_points: Vec<u32>,
    boom_bombs: Vec<u32>,
    zg_points: Vec<u32>,
    zg_duration: Vec<u32>,
    zg_gravity: Vec<f32>,
    regen_points: Vec<u32>,
}

impl AbilityCatalog {
    pub fn compile<'a>(
        definitions: impl IntoIterator<Item = &'a AbilityDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            info: HashMap::new(),
            max_jumps: Vec::new(),
            run_speed: Vec::new(),
            fall_speed: Vec::new(),
            slow_factor: Vec::new(),
            magnet_range: Vec::new(),
            magnet_force: Vec::new(),
            star_value: Vec::new(),
            bonus_tokens: Vec::new(),
            barrier_points: Vec::new(),
            barrier_duration: Vec::new(),
            barrier_cooldown: Vec::new(),
            emp_points: Vec::new(),
            emp_delay: Vec::new(),
            boom_points: Vec::new(),
            boom_bombs: Vec::new(),
            zg_points: Vec::new(),
            zg_duration: Vec::new(),
            zg_gravity: Vec::new(),
            regen_points: Vec::new(),
        };

        for def in definitions {
            if catalog.info.contains_key(&def.id) {
                return Err(CatalogError::Duplicate(def.id));
            }

            validate_common(def)?;
            catalog.ingest_tuning(def)?;

            catalog.info.insert(
                def.id,
                AbilityInfo {
                    display_name: def.display_name.clone(),
                    max_rank: def.max_rank,
                    costs: def.costs.clone(),
                    upgrade_names: def.upgrade_names.clone(),
                },
            );
        }

        for id in AbilityId::ALL {
            if !catalog.info.contains_key(&id) {
                return Err(CatalogError::Missing(id));
            }
        }

        Ok(catalog)
    }

    fn ingest_tuning(&mut self, def: &AbilityDefinition) -> Result<(), CatalogError> {
        let value_len = def.max_rank as usize + 1;
        let tier_len = def.max_rank as usize;

        match &def.tuning {
            AbilityTuning::Jump { max_jumps } => {
                expect_family(def, AbilityId::Jump)?;
                check_table(def.id, "max_jumps", max_jumps, value_len)?;
                ascending(def.id, "max_jumps", max_jumps)?;
                self.max_jumps = max_jumps.clone();
            }
            AbilityTuning::Speed { run_speed } => {
                expect_family(def, AbilityId::Speed)?;
                check_table(def.id, "run_speed", run_speed, value_len)?;
                ascending(def.id, "run_speed", run_speed)?;
                self.run_speed = run_speed.clone();
            }
            AbilityTuning::FastFall { fall_speed } => {
                expect_family(def, AbilityId::FastFall)?;
                check_table(def.id, "fall_speed", fall_speed, value_len)?;
                ascending(def.id, "fall_speed", fall_speed)?;
                self.fall_speed = fall_speed.clone();
            }
            AbilityTuning::SlowBombs { slow_factor } => {
                expect_family(def, AbilityId::SlowBombs)?;
                check_table(def.id, "slow_factor", slow_factor, value_len)?;
                non_increasing(def.id, "slow_factor", slow_factor)?;
                self.slow_factor = slow_factor.clone();
            }
            AbilityTuning::StarMagnet { range, force } => {
                expect_family(def, AbilityId::StarMagnet)?;
                check_table(def.id, "range", range, value_len)?;
                check_table(def.id, "force", force, value_len)?;
                ascending(def.id, "range", range)?;
                ascending(def.id, "force", force)?;
                self.magnet_range = range.clone();
                self.magnet_force = force.clone();
            }
            AbilityTuning::StarMultiplier { star_value } => {
                expect_family(def, AbilityId::StarMultiplier)?;
                check_table(def.id, "star_value", star_value, value_len)?;
                ascending(def.id, "star_value", star_value)?;
                self.star_value = star_value.clone();
            }
            AbilityTuning::TokenBonus { bonus_tokens } => {
                expect_family(def, AbilityId::TokenBonus)?;
                check_table(def.id, "bonus_tokens", bonus_tokens, value_len)?;
                ascending(def.id, "bonus_tokens", bonus_tokens)?;
                self.bonus_tokens = bonus_tokens.clone();
            }
            AbilityTuning::Barrier {
                points_needed,
                duration_ms,
                cooldown_ms,
            } => {
                expect_family(def, AbilityId::Barrier)?;
                check_table(def.id, "points_needed", points_needed, tier_len)?;
                check_table(def.id, "duration_ms", duration_ms, tier_len)?;
                check_table(def.id, "cooldown_ms", cooldown_ms, tier_len)?;
                non_increasing(def.id, "points_needed", points_needed)?;
                ascending(def.id, "duration_ms", duration_ms)?;
                non_increasing(def.id, "cooldown_ms", cooldown_ms)?;
                self.barrier_points = points_needed.clone();
                self.barrier_duration = duration_ms.clone();
                self.barrier_cooldown = cooldown_ms.clone();
            }
            AbilityTuning::Emp {
                points_needed,
                return_delay_ms,
            } => {
                expect_family(def, AbilityId::Emp)?;
                check_table(def.id, "points_needed", points_needed, tier_len)?;
                check_table(def.id, "return_delay_ms", return_delay_ms, tier_len)?;
                non_increasing(def.id, "points_needed", points_needed)?;
                non_increasing(def.id, "return_delay_ms", return_delay_ms)?;
                self.emp_points = points_needed.clone();
                self.emp_delay = return_delay_ms.clone();
            }
            AbilityTuning::SonicBoom {
                points_needed,
                bombs_destroyed,
            } => {
                expect_family(def, AbilityId::SonicBoom)?;
                check_table(def.id, "points_needed", points_needed, tier_len)?;
                check_table(def.id, "bombs_destroyed", bombs_destroyed, tier_len)?;
                non_increasing(def.id, "points_needed", points_needed)?;
                ascending(def.id, "bombs_destroyed", bombs_destroyed)?;
                self.boom_points = points_needed.clone();
                self.boom_bombs = bombs_destroyed.clone();
            }
            AbilityTuning::ZeroGravity {
                points_needed,
                duration_ms,
                gravity_scale,
            } => {
                expect_family(def, AbilityId::ZeroGravity)?;
                check_table(def.id, "points_needed", points_needed, tier_len)?;
                check_table(def.id, "duration_ms", duration_ms, tier_len)?;
                check_table(def.id, "gravity_scale", gravity_scale, tier_len)?;
                non_increasing(def.id, "points_needed", points_needed)?;
                ascending(def.id, "duration_ms", duration_ms)?;
                non_increasing(def.id, "gravity_scale", gravity_scale)?;
                self.zg_points = points_needed.clone();
                self.zg_duration = duration_ms.clone();
                self.zg_gravity = gravity_scale.clone();
            }
            AbilityTuning::LifeRegen { points_needed } => {
                expect_family(def, AbilityId::LifeRegen)?;
                check_table(def.id, "points_needed", points_needed, tier_len)?;
                non_increasing(def.id, "points_needed", points_needed)?;
                self.regen_points = points_needed.clone();
            }
            AbilityTuning::Passive => {
                if !matches!(def.id, AbilityId::PlatformDrop | AbilityId::ExtraLife) {
                    return Err(CatalogError::TuningMismatch { ability: def.id });
                }
            }
        }

        Ok(())
    }

    fn info(&self, id: AbilityId) -> &AbilityInfo {
        self.info
            .get(&id)
            .expect("compiled catalog holds every ability")
    }

    pub fn max_rank(&self, id: AbilityId) -> u32 {
        self.info(id).max_rank
    }

    pub fn display_name(&self, id: AbilityId) -> &str {
        &self.info(id).display_name
    }

    /// Cost of the next rank, `None` once the ability is maxed out.
    pub fn next_cost(&self, id: AbilityId, current_rank: u32) -> Option<UpgradeCost> {
        if current_rank >= self.max_rank(id) {
            return None;
        }

        if id == AbilityId::ExtraLife {
            return Some(UpgradeCost::tokens(5 + current_rank));
        }

        self.info(id).costs.get(current_rank as usize).copied()
    }

    /// Shop label for reaching `new_rank`. Clamped so open-ended
    /// abilities (ExtraLife) reuse their last name forever.
    pub fn upgrade_name(&self, id: AbilityId, new_rank: u32) -> &str {
        let names = &self.info(id).upgrade_names;
        let index = (new_rank.saturating_sub(1) as usize).min(names.len() - 1);
        &names[index]
    }

    pub fn max_jumps(&self, rank: u32) -> u32 {
        value(&self.max_jumps, rank)
    }

    pub fn run_speed(&self, rank: u32) -> f32 {
        value(&self.run_speed, rank)
    }

    pub fn fast_fall_speed(&self, rank: u32) -> f32 {
        value(&self.fall_speed, rank)
    }

    pub fn bomb_slow_factor(&self, rank: u32) -> f32 {
        value(&self.slow_factor, rank)
    }

    pub fn magnet_range(&self, rank: u32) -> f32 {
        value(&self.magnet_range, rank)
    }

    pub fn magnet_force(&self, rank: u32) -> f32 {
        value(&self.magnet_force, rank)
    }

    pub fn star_score_value(&self, rank: u32) -> u32 {
        value(&self.star_value, rank)
    }

    pub fn bonus_tokens_per_level(&self, rank: u32) -> u32 {
        value(&self.bonus_tokens, rank)
    }

    pub fn barrier_points_needed(&self, rank: u32) -> u32 {
        tier(&self.barrier_points, rank)
    }

    pub fn barrier_duration_ms(&self, rank: u32) -> u32 {
        tier(&self.barrier_duration, rank)
    }

    pub fn barrier_cooldown_ms(&self, rank: u32) -> u32 {
        tier(&self.barrier_cooldown, rank)
    }

    pub fn emp_points_needed(&self, rank: u32) -> u32 {
        tier(&self.emp_points, rank)
    }

    pub fn emp_return_delay_ms(&self, rank: u32) -> u32 {
        tier(&self.emp_delay, rank)
    }

    pub fn sonic_boom_points_needed(&self, rank: u32) -> u32 {
        tier(&self.boom_points, rank)
    }

    pub fn sonic_boom_bombs_destroyed(&self, rank: u32) -> u32 {
        tier(&self.boom_bombs, rank)
    }

    pub fn zero_gravity_points_needed(&self, rank: u32) -> u32 {
        tier(&self.zg_points, rank)
    }

    pub fn zero_gravity_duration_ms(&self, rank: u32) -> u32 {
        tier(&self.zg_duration, rank)
    }

    pub fn zero_gravity_gravity_scale(&self, rank: u32) -> f32 {
        tier(&self.zg_gravity, rank)
    }

    pub fn life_regen_points_needed(&self, rank: u32) -> u32 {
        tier(&self.regen_points, rank)
    }
}

/// Rank-indexed lookup into a value table (entry 0 = locked/base).
fn value<T: Copy>(table: &[T], rank: u32) -> T {
    table[(rank as usize).min(table.len() - 1)]
}

/// Lookup into a charge-cycle table indexed by `rank - 1`.
fn tier<T: Copy>(table: &[T], rank: u32) -> T {
    table[(rank.saturating_sub(1) as usize).min(table.len() - 1)]
}

fn validate_common(def: &AbilityDefinition) -> Result<(), CatalogError> {
    if def.upgrade_names.is_empty() {
        return Err(CatalogError::TableLength {
            ability: def.id,
            table: "upgrade_names",
            expected: 1,
            actual: 0,
        });
    }

    if def.id == AbilityId::ExtraLife {
        // Cost comes from the formula; a table would silently shadow it.
        if !def.costs.is_empty() {
            return Err(CatalogError::TableLength {
                ability: def.id,
                table: "costs",
                expected: 0,
                actual: def.costs.len(),
            });
        }
        return Ok(());
    }

    if def.costs.len() != def.max_rank as usize {
        return Err(CatalogError::TableLength {
            ability: def.id,
            table: "costs",
            expected: def.max_rank as usize,
            actual: def.costs.len(),
        });
    }

    Ok(())
}

fn expect_family(def: &AbilityDefinition, expected: AbilityId) -> Result<(), CatalogError> {
    if def.id == expected {
        Ok(())
    } else {
        Err(CatalogError::TuningMismatch { ability: def.id })
    }
}

fn check_table<T>(
    ability: AbilityId,
    table: &'static str,
    values: &[T],
    expected: usize,
) -> Result<(), CatalogError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(CatalogError::TableLength {
            ability,
            table,
            expected,
            actual: values.len(),
        })
    }
}

fn ascending<T: PartialOrd>(
    ability: AbilityId,
    table: &'static str,
    values: &[T],
) -> Result<(), CatalogError> {
    if values.windows(2).all(|pair| pair[0] <= pair[1]) {
        Ok(())
    } else {
        Err(CatalogError::TableOrder {
            ability,
            table,
            order: "non-decreasing",
        })
    }
}

fn non_increasing<T: PartialOrd>(
    ability: AbilityId,
    table: &'static str,
    values: &[T],
) -> Result<(), CatalogError> {
    if values.windows(2).all(|pair| pair[0] >= pair[1]) {
        Ok(())
    } else {
        Err(CatalogError::TableOrder {
            ability,
            table,
            order: "non-increasing",
        })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::builtin};

    #[test]
    fn builtin_catalog_compiles() {
        let catalog = AbilityCatalog::builtin();

        assert_eq!(catalog.max_rank(AbilityId::Jump), 5);
        assert_eq!(catalog.max_rank(AbilityId::Barrier), 3);
        assert_eq!(catalog.max_rank(AbilityId::ExtraLife), 999);
    }

    #[test]
    fn derived_stats_match_tuning() {
        let catalog = AbilityCatalog::builtin();

        assert_eq!(catalog.max_jumps(0), 1);
        assert_eq!(catalog.max_jumps(1), 2);
        assert_eq!(catalog.max_jumps(5), 6);

        assert_eq!(catalog.run_speed(0), 200.0);
        assert_eq!(catalog.run_speed(1), 260.0);
        assert_eq!(catalog.run_speed(5), 500.0);

        assert_eq!(catalog.bomb_slow_factor(0), 1.0);
        assert_eq!(catalog.bomb_slow_factor(5), 0.25);

        assert_eq!(catalog.star_score_value(0), 9);
        assert_eq!(catalog.star_score_value(3), 15);

        assert_eq!(catalog.bonus_tokens_per_level(0), 0);
        assert_eq!(catalog.bonus_tokens_per_level(3), 4);

        assert_eq!(catalog.fast_fall_speed(0), 0.0);
    }

    #[test]
    fn charge_cycle_tiers_index_from_rank_one() {
        let catalog = AbilityCatalog::builtin();

        assert_eq!(catalog.barrier_points_needed(1), 110);
        assert_eq!(catalog.barrier_points_needed(3), 70);
        assert_eq!(catalog.barrier_duration_ms(1), 3000);
        assert_eq!(catalog.barrier_cooldown_ms(3), 6000);

        assert_eq!(catalog.emp_return_delay_ms(1), 8000);
        assert_eq!(catalog.emp_return_delay_ms(2), 6000);
        assert_eq!(catalog.emp_return_delay_ms(3), 4000);

        assert_eq!(catalog.sonic_boom_bombs_destroyed(1), 1);
        assert_eq!(catalog.sonic_boom_bombs_destroyed(3), 3);

        assert_eq!(catalog.life_regen_points_needed(1), 350);
        assert_eq!(catalog.life_regen_points_needed(5), 250);

        // Zero gravity: 12000 + 3000 per rank above the first.
        assert_eq!(catalog.zero_gravity_duration_ms(1), 12000);
        assert_eq!(catalog.zero_gravity_duration_ms(2), 15000);
        assert_eq!(catalog.zero_gravity_duration_ms(5), 24000);
    }

    #[test]
    fn extra_life_cost_follows_formula() {
        let catalog = AbilityCatalog::builtin();

        assert_eq!(
            catalog.next_cost(AbilityId::ExtraLife, 0),
            Some(UpgradeCost::tokens(5))
        );
        assert_eq!(
            catalog.next_cost(AbilityId::ExtraLife, 7),
            Some(UpgradeCost::tokens(12))
        );
    }

    #[test]
    fn next_cost_is_none_at_max_rank() {
        let catalog = AbilityCatalog::builtin();
        assert_eq!(catalog.next_cost(AbilityId::Barrier, 3), None);
        assert!(catalog.next_cost(AbilityId::Barrier, 2).is_some());
    }

    #[test]
    fn first_premium_unlocks_cost_a_special_token() {
        let catalog = AbilityCatalog::builtin();

        for id in [
            AbilityId::Barrier,
            AbilityId::Emp,
            AbilityId::PlatformDrop,
            AbilityId::TokenBonus,
            AbilityId::SonicBoom,
        ] {
            let first = catalog.next_cost(id, 0).unwrap();
            assert_eq!(first.special_tokens, 1, "{id:?} first unlock");
            let second = catalog.next_cost(id, 1).unwrap();
            assert_eq!(second.special_tokens, 0, "{id:?} second rank");
        }

        let jump = catalog.next_cost(AbilityId::Jump, 0).unwrap();
        assert_eq!(jump.special_tokens, 0);
    }

    #[test]
    fn upgrade_name_clamps_for_open_ended_abilities() {
        let catalog = AbilityCatalog::builtin();
        assert_eq!(catalog.upgrade_name(AbilityId::Jump, 1), "Double Jump");
        assert_eq!(
            catalog.upgrade_name(AbilityId::ExtraLife, 40),
            catalog.upgrade_name(AbilityId::ExtraLife, 1)
        );
    }

    #[test]
    fn missing_ability_is_rejected() {
        let defs: Vec<_> = builtin::definitions()
            .into_iter()
            .filter(|def| def.id != AbilityId::Emp)
            .collect();

        assert_eq!(
            AbilityCatalog::compile(&defs).unwrap_err(),
            CatalogError::Missing(AbilityId::Emp)
        );
    }

    #[test]
    fn duplicate_ability_is_rejected() {
        let mut defs = builtin::definitions();
        defs.push(defs[0].clone());

        assert_eq!(
            AbilityCatalog::compile(&defs).unwrap_err(),
            CatalogError::Duplicate(defs[0].id)
        );
    }

    #[test]
    fn wrong_table_length_is_rejected() {
        let mut defs = builtin::definitions();
        for def in &mut defs {
            if let AbilityTuning::Jump { max_jumps } = &mut def.tuning {
                max_jumps.pop();
            }
        }

        assert_eq!(
            AbilityCatalog::compile(&defs).unwrap_err(),
            CatalogError::TableLength {
                ability: AbilityId::Jump,
                table: "max_jumps",
                expected: 6,
                actual: 5,
            }
        );
    }

    #[test]
    fn non_monotonic_table_is_rejected() {
        let mut defs = builtin::definitions();
        for def in &mut defs {
            if let AbilityTuning::Speed { run_speed } = &mut def.tuning {
                run_speed.swap(1, 2);
            }
        }

        assert_eq!(
            AbilityCatalog::compile(&defs).unwrap_err(),
            CatalogError::TableOrder {
                ability: AbilityId::Speed,
                table: "run_speed",
                order: "non-decreasing",
            }
        );
    }

    #[test]
    fn tuning_family_mismatch_is_rejected() {
        let mut defs = builtin::definitions();
        for def in &mut defs {
            if def.id == AbilityId::Speed {
                def.tuning = AbilityTuning::Jump {
                    max_jumps: vec![1, 2, 3, 4, 5, 6],
                };
            }
        }

        assert_eq!(
            AbilityCatalog::compile(&defs).unwrap_err(),
            CatalogError::TuningMismatch {
                ability: AbilityId::Speed,
            }
        );
    }
}
