//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `rsvp_core` linkage without the Flutter runtime.
//! - Print the registrant count of a store file when one is given.

use rsvp_core::{CoreConfig, RegistrantStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("rsvp_core ping={}", rsvp_core::ping());
    println!("rsvp_core version={}", rsvp_core::core_version());

    let Some(path) = std::env::args_os().nth(1) else {
        return ExitCode::SUCCESS;
    };
    let config = CoreConfig::default();
    match RegistrantStore::open_sqlite(&path, config.storage_key.as_str()) {
        Ok(store) => {
            println!("rsvp_core registrants={}", store.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("rsvp_core store open failed: {err}");
            ExitCode::FAILURE
        }
    }
}
