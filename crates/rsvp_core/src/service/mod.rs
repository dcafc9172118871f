//! Registration use-cases layered over the store.
//!
//! # Responsibility
//! - Keep per-form UI state (draft + visible errors) out of the store.

pub mod registration_form;
