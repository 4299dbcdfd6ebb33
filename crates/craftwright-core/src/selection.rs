//! Reservation bookkeeping for one craft resolution.
//!
//! A [`Selection`] lives only for the duration of a single `can_craft` or
//! `craft` call. Entries for the same stack are merged, never duplicated,
//! so the per-stack total is always available in one place.

use crate::id::StackId;

/// A provisional claim on part or all of one stack's amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub stack: StackId,
    pub amount: u32,
}

/// The accumulated reservations of one craft attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<Reservation>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total amount already reserved against `stack` by earlier
    /// requirements in this resolution.
    pub fn reserved_for(&self, stack: StackId) -> u32 {
        self.entries
            .iter()
            .find(|r| r.stack == stack)
            .map(|r| r.amount)
            .unwrap_or(0)
    }

    /// Reserve `amount` more of `stack`, merging into an existing entry.
    /// Zero-amount reservations still create an entry: the stack was
    /// visited and must participate in later double-count arithmetic.
    pub fn reserve(&mut self, stack: StackId, amount: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|r| r.stack == stack) {
            entry.amount = entry.amount.saturating_add(amount);
        } else {
            self.entries.push(Reservation { stack, amount });
        }
    }

    pub fn entries(&self) -> &[Reservation] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of all reserved amounts.
    pub fn total_reserved(&self) -> u64 {
        self.entries.iter().map(|r| r.amount as u64).sum()
    }
}
