//! Shared test harness modules for the sitescore CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod helpers;
mod recalculate_steps;
mod score_unit;
