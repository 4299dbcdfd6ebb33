//! Live item storage: stacks, collections, and the inventory facade.
//!
//! An [`ItemCollection`] owns stacks in a slotmap, so a [`StackId`] names
//! one specific stack for the whole of its lifetime. The crafting engine
//! only ever reads collections during resolution and instructs removal
//! during commit.

use crate::id::{DefinitionId, PropertyId, StackId};
use crate::selection::Selection;
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::BTreeMap;

/// A quantity of one item with optional per-instance properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub definition: DefinitionId,
    pub quantity: u32,
    /// Per-instance properties (e.g., sharpness, durability).
    /// Empty by default.
    #[serde(default)]
    pub properties: BTreeMap<PropertyId, i64>,
}

impl ItemStack {
    pub fn new(definition: DefinitionId, quantity: u32) -> Self {
        Self {
            definition,
            quantity,
            properties: BTreeMap::new(),
        }
    }

    pub fn set_property(&mut self, id: PropertyId, value: i64) {
        self.properties.insert(id, value);
    }

    pub fn get_property(&self, id: PropertyId) -> Option<i64> {
        self.properties.get(&id).copied()
    }

    /// Exact-item equivalence: same definition and identical properties.
    pub fn value_equivalent(
        &self,
        definition: DefinitionId,
        properties: &BTreeMap<PropertyId, i64>,
    ) -> bool {
        self.definition == definition && self.properties == *properties
    }
}

/// A read-only view of one stack produced by an inventory query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackView {
    pub stack: StackId,
    pub definition: DefinitionId,
    /// The stack's full amount at query time.
    pub available: u32,
}

/// Slotmap-backed stack storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCollection {
    stacks: SlotMap<StackId, ItemStack>,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert as a new, distinct stack. Zero-quantity stacks are not stored.
    pub fn insert(&mut self, stack: ItemStack) -> Option<StackId> {
        if stack.quantity == 0 {
            return None;
        }
        Some(self.stacks.insert(stack))
    }

    /// Add items, merging into an existing value-equivalent stack when one
    /// exists. Returns the stack that received the items.
    pub fn deposit(&mut self, stack: ItemStack) -> Option<StackId> {
        if stack.quantity == 0 {
            return None;
        }
        for (id, existing) in self.stacks.iter_mut() {
            if existing.value_equivalent(stack.definition, &stack.properties) {
                existing.quantity = existing.quantity.saturating_add(stack.quantity);
                return Some(id);
            }
        }
        Some(self.stacks.insert(stack))
    }

    /// Remove up to `amount` from one stack. Returns the amount actually
    /// removed. A stack drained to zero is dropped from the collection.
    #[must_use = "returns the quantity actually removed, which may be less than requested"]
    pub fn remove(&mut self, stack: StackId, amount: u32) -> u32 {
        let Some(entry) = self.stacks.get_mut(stack) else {
            return 0;
        };
        let removed = amount.min(entry.quantity);
        entry.quantity -= removed;
        if entry.quantity == 0 {
            self.stacks.remove(stack);
        }
        removed
    }

    pub fn get(&self, stack: StackId) -> Option<&ItemStack> {
        self.stacks.get(stack)
    }

    /// Current amount of one stack. Missing stacks read as zero.
    pub fn quantity_of(&self, stack: StackId) -> u32 {
        self.stacks.get(stack).map(|s| s.quantity).unwrap_or(0)
    }

    /// Total amount across all stacks of a definition.
    pub fn total_of(&self, definition: DefinitionId) -> u64 {
        self.stacks
            .values()
            .filter(|s| s.definition == definition)
            .map(|s| s.quantity as u64)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StackId, &ItemStack)> {
        self.stacks.iter()
    }

    /// Query capability: push a view of every stack matching `pred` into
    /// `out`. The buffer is cleared first; it is a per-call scratch buffer
    /// and carries no state between resolutions.
    pub fn collect_matching(
        &self,
        out: &mut Vec<StackView>,
        mut pred: impl FnMut(&ItemStack) -> bool,
    ) {
        out.clear();
        for (id, stack) in self.stacks.iter() {
            if pred(stack) {
                out.push(StackView {
                    stack: id,
                    definition: stack.definition,
                    available: stack.quantity,
                });
            }
        }
    }

    /// Whether every reservation in `selection` is still fully present.
    pub fn holds(&self, selection: &Selection) -> bool {
        selection
            .iter()
            .all(|r| self.quantity_of(r.stack) >= r.amount)
    }
}

/// An inventory: the main stack collection plus an optional wallet.
///
/// The wallet is a capability looked up by the crafting engine; an
/// inventory without one can only afford recipes with no currency cost.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub main: ItemCollection,
    wallet: Option<Wallet>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wallet(wallet: Wallet) -> Self {
        Self {
            main: ItemCollection::new(),
            wallet: Some(wallet),
        }
    }

    pub fn attach_wallet(&mut self, wallet: Wallet) {
        self.wallet = Some(wallet);
    }

    /// Currency balance capability, if this inventory carries one.
    pub fn wallet(&self) -> Option<&Wallet> {
        self.wallet.as_ref()
    }

    pub fn wallet_mut(&mut self) -> Option<&mut Wallet> {
        self.wallet.as_mut()
    }
}
