use {
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
};

/// Price of a single upgrade step, in both currencies.
///
/// Carrying both token kinds in one value is what keeps purchases
/// atomic: `Wallet::spend` either debits the whole cost or nothing.
#[derive(Reflect, Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Default)]
pub struct UpgradeCost {
    pub tokens: u32,
    #[serde(default)]
    pub special_tokens: u32,
}

impl UpgradeCost {
    pub const fn tokens(tokens: u32) -> Self {
        Self {
            tokens,
            special_tokens: 0,
        }
    }
}

/// The player's two currencies. Tokens come from level rewards,
/// special tokens gate first-tier premium unlocks.
#[derive(Resource, Reflect, Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(Resource, Default)]
pub struct Wallet {
    pub tokens: u32,
    pub special_tokens: u32,
}

impl Wallet {
    pub fn earn_tokens(&mut self, amount: u32) {
        self.tokens += amount;
    }

    pub fn earn_special_token(&mut self) {
        self.special_tokens += 1;
    }

    pub fn can_afford(&self, cost: &UpgradeCost) -> bool {
        self.tokens >= cost.tokens && self.special_tokens >= cost.special_tokens
    }

    /// Debits both currencies, or neither. Returns false when the
    /// wallet cannot cover the cost; balances are untouched in that
    /// case and never go negative.
    pub fn spend(&mut self, cost: &UpgradeCost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }

        self.tokens -= cost.tokens;
        self.special_tokens -= cost.special_tokens;
        true
    }
}

pub struct WalletPlugin;

impl Plugin for WalletPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Wallet>()
            .register_type::<UpgradeCost>()
            .init_resource::<Wallet>();
    }
}
