//! Craftwright Core -- the crafting resolution engine for inventory-driven games.
//!
//! This crate provides recipe ingredient resolution over heterogeneous
//! specificity levels, a two-phase check/commit crafting protocol, and the
//! catalog, inventory, and currency plumbing those depend on.
//!
//! # Ingredient Specificity
//!
//! A recipe names its ingredients at three levels, resolved in a fixed
//! order from most to least specific:
//!
//! 1. **Exact item** -- A definition plus required property values; only
//!    stacks carrying those exact values qualify.
//! 2. **Definition** -- Any stack of a definition, properties ignored.
//! 3. **Category** -- Any stack whose definition sits under a category in
//!    the category DAG. Category lines are themselves processed from most
//!    to least specific so broad lines cannot starve narrow ones.
//!
//! Resolution builds a [`selection::Selection`]: per-stack reservations
//! that never exceed what the stack holds, no matter how many ingredient
//! lines the stack satisfies.
//!
//! # Two-Phase Protocol
//!
//! [`processor::CraftingProcessor::can_craft`] is read-only and safe to
//! call speculatively; [`processor::CraftingProcessor::craft`] re-validates
//! against the live inventory before removing anything, so stale approvals
//! are never spent.
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- Immutable database of definitions, categories,
//!   currencies, and recipes (frozen at startup via [`catalog::CatalogBuilder`]).
//! - [`item::ItemCollection`] -- Stack storage with stable keyed handles.
//! - [`matcher`] -- The greedy reservation engine shared by selection and
//!   validation.
//! - [`processor::CraftingProcessor`] -- Transaction coordinator: check,
//!   commit, currency deduction, output creation.
//! - [`crafter::Crafter`] -- A recipe set bound to a processor, modelling a
//!   crafting station.
//! - [`wallet::Wallet`] -- Currency balances with all-or-nothing withdrawal.

pub mod catalog;
pub mod crafter;
#[cfg(feature = "data-loader")]
pub mod data_loader;
pub mod id;
pub mod item;
pub mod matcher;
pub mod processor;
pub mod recipe;
pub mod selection;
pub mod wallet;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
