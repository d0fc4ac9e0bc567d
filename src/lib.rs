#![doc(test(attr(deny(warnings))))]

//! Streak Core tracks daily habit check-ins, derives the running streak, and
//! manages repair credits that patch missed days without counting toward new
//! rewards.

pub mod cli;
pub mod clock;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Streak Core tracing initialized.");
    });
}
