//! Match-three (workspace facade crate).
//!
//! The settle rules live in dedicated crates under `crates/` and are re-exported
//! here as `match_three::{core, types}`. This package adds what a headless
//! runner needs on top: TOML/env configuration, JSON-lines event records and
//! the session loop that logs them.

pub use match_three_core as core;
pub use match_three_types as types;

pub mod cli;
pub mod config;
pub mod session;
pub mod wire;
