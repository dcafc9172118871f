//! Registration domain model.
//!
//! # Responsibility
//! - Define the canonical registrant record and its in-progress draft.
//! - Describe the event registrants sign up for.
//!
//! # Invariants
//! - Every registrant is identified by a stable `RegistrantId`.
//! - `kid_ages.len() == kids` for drafts and stored records alike.

pub mod event;
pub mod registrant;
