//! Flutter-facing bridge for RSVP core.

pub mod api;
