//! The shipped ability definitions, embedded at build time.
//!
//! These are the exact files under `assets/abilities/`; loading falls
//! back to them when the assets folder is absent, and tests compile
//! their catalog from them so tuning lives in one place.

use crate::{AbilityCatalog, AbilityDefinition};

const SOURCES: [&str; 14] = [
    include_str!("../../../assets/abilities/jump.ability.ron"),
    include_str!("../../../assets/abilities/speed.ability.ron"),
    include_str!("../../../assets/abilities/fast_fall.ability.ron"),
    include_str!("../../../assets/abilities/barrier.ability.ron"),
    include_str!("../../../assets/abilities/slow_bombs.ability.ron"),
    include_str!("../../../assets/abilities/star_magnet.ability.ron"),
    include_str!("../../../assets/abilities/emp.ability.ron"),
    include_str!("../../../assets/abilities/platform_drop.ability.ron"),
    include_str!("../../../assets/abilities/token_bonus.ability.ron"),
    include_str!("../../../assets/abilities/star_multiplier.ability.ron"),
    include_str!("../../../assets/abilities/extra_life.ability.ron"),
    include_str!("../../../assets/abilities/sonic_boom.ability.ron"),
    include_str!("../../../assets/abilities/life_regen.ability.ron"),
    include_str!("../../../assets/abilities/zero_gravity.ability.ron"),
];

pub fn definitions() -> Vec<AbilityDefinition> {
    SOURCES
        .iter()
        .map(|source| ron::from_str(source).expect("embedded ability definition must parse"))
        .collect()
}

impl AbilityCatalog {
    pub fn builtin() -> Self {
        Self::compile(&definitions()).expect("embedded ability definitions must compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_embedded_definition_parses() {
        assert_eq!(definitions().len(), 14);
    }
}
