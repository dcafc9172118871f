//! Registrant collection ownership.
//!
//! # Responsibility
//! - Own the ordered registrant collection for one session.
//! - Mirror every mutation into local storage.
//!
//! # Invariants
//! - The store is the only mutator of registrant state.
//! - Callers only ever see shared borrows of stored records.

pub mod registrant_store;
