//! Currency balances and cost arithmetic.
//!
//! A [`Wallet`] is the optional currency-balance capability an inventory may
//! expose. Costs are lists of [`CurrencyAmount`]s scaled by a craft
//! quantity; a wallet can answer affordability and perform the deduction.

use crate::id::CurrencyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An amount of one currency kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: CurrencyId,
    pub amount: u64,
}

/// Per-currency balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    balances: BTreeMap<CurrencyId, u64>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance for a currency kind. Unknown kinds read as zero.
    pub fn balance(&self, currency: CurrencyId) -> u64 {
        self.balances.get(&currency).copied().unwrap_or(0)
    }

    /// Add to a balance, saturating at `u64::MAX`.
    pub fn deposit(&mut self, currency: CurrencyId, amount: u64) {
        let entry = self.balances.entry(currency).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Whether every entry of `cost`, scaled by `multiplier`, is covered by
    /// the current balances. Entries of the same currency accumulate.
    pub fn can_afford(&self, cost: &[CurrencyAmount], multiplier: u32) -> bool {
        let mut required: BTreeMap<CurrencyId, u64> = BTreeMap::new();
        for entry in cost {
            let scaled = entry.amount.saturating_mul(multiplier as u64);
            let total = required.entry(entry.currency).or_insert(0);
            *total = total.saturating_add(scaled);
        }
        required
            .iter()
            .all(|(&currency, &amount)| self.balance(currency) >= amount)
    }

    /// Deduct `cost` scaled by `multiplier`. Returns false and deducts
    /// nothing if any balance is short.
    pub fn withdraw(&mut self, cost: &[CurrencyAmount], multiplier: u32) -> bool {
        if !self.can_afford(cost, multiplier) {
            return false;
        }
        for entry in cost {
            let scaled = entry.amount.saturating_mul(multiplier as u64);
            if let Some(balance) = self.balances.get_mut(&entry.currency) {
                *balance -= scaled.min(*balance);
            }
        }
        true
    }
}
