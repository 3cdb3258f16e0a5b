//! Core settle logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the match-three board: swap legality, match
//! detection, clearing, gravity, refill and the cascade loop that ties them
//! together. It has **no dependencies** on rendering, input, or I/O, and never
//! logs:
//!
//! - **Deterministic**: Same seed and same commands give bit-identical boards
//! - **Synchronous**: A command settles fully before it returns
//! - **Testable**: Refills come from an injected [`TokenSource`]
//!
//! # Module Structure
//!
//! - [`grid`]: Bounds-checked cell storage with a fixed cell-class mask
//! - [`layout`]: Board shapes, preset tokens and the token palette
//! - [`matcher`]: Runs of three or more equal tokens
//! - [`swap`]: Swap legality, hypothetical boards and move search
//! - [`shuffle`]: Initial and fallback population without matches
//! - [`cascade`]: The engine state machine and its event log
//! - [`scoring`]: Clear points and session counters
//! - [`snapshot`]: Byte-coded board observations with a stable hash
//! - [`rng`]: Seeded LCG and the refill sources
//!
//! # Example
//!
//! ```
//! use match_three_core::{BoardLayout, CascadeEngine, CascadeEvent, Palette};
//!
//! let mut engine = CascadeEngine::seeded(&BoardLayout::starter(), Palette::default(), 42)
//!     .expect("starter board deals");
//!
//! // A dealt board always has a productive swap.
//! let hint = engine.hint().expect("at least one move");
//! let report = engine.propose_swap(hint.a, hint.b).expect("legal swap");
//!
//! assert!(report.is_committed());
//! assert_eq!(report.events.last(), Some(&CascadeEvent::SettleComplete));
//! assert!(engine.score() > 0);
//! ```

pub mod cascade;
pub mod error;
pub mod grid;
pub mod layout;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod shuffle;
pub mod snapshot;
pub mod swap;

pub use match_three_types as types;

// Re-export commonly used types for convenience
pub use cascade::{CascadeEngine, CascadeEvent, CascadeReport, EngineState, SwapOutcome};
pub use error::{BoardError, EngineError, LayoutError, ShuffleError, SwapError};
pub use grid::Grid;
pub use layout::{BoardLayout, Palette, TokenSpec, STARTER_ROWS};
pub use matcher::Match;
pub use rng::{RandomTokens, ScriptedTokens, SimpleRng, TokenSource};
pub use scoring::{CascadeTally, ScoreBoard};
pub use snapshot::BoardSnapshot;
pub use swap::{SwapPreview, SwapProposal};
