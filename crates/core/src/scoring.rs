//! Scoring module - points for cleared tokens and per-session counters
//!
//! A cleared run is worth its kind's palette value for every cell it empties.
//! When two runs share a cell (L and T shapes), the cell is paid out only to
//! the run that clears it first, so an intersection is never scored twice.
//!
//! Swaps that do not create a match are neither moves nor scored; they only
//! bump the `rejected` counter.

/// Points for emptying `cleared` cells worth `per_token` each
pub fn clear_points(per_token: u32, cleared: usize) -> u32 {
    per_token.saturating_mul(cleared.min(u32::MAX as usize) as u32)
}

/// Totals for one settle cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeTally {
    pub score: u32,
    /// Clear passes, the first one included
    pub rounds: u32,
    /// Tokens removed from the board
    pub cleared: u32,
}

impl CascadeTally {
    pub fn add_clear(&mut self, points: u32, cleared: usize) {
        self.score = self.score.saturating_add(points);
        self.cleared = self
            .cleared
            .saturating_add(cleared.min(u32::MAX as usize) as u32);
    }
}

/// Running totals across a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBoard {
    score: u32,
    moves: u32,
    rejected: u32,
    cascades: u32,
    best_chain: u32,
    tokens_cleared: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A committed player swap and the cascade it caused
    pub fn record_move(&mut self, tally: CascadeTally) {
        self.moves = self.moves.saturating_add(1);
        self.record_cascade(tally);
    }

    /// A cascade started by a forced clear; not a move
    pub fn record_forced(&mut self, tally: CascadeTally) {
        self.record_cascade(tally);
    }

    pub fn record_rejected(&mut self) {
        self.rejected = self.rejected.saturating_add(1);
    }

    fn record_cascade(&mut self, tally: CascadeTally) {
        self.score = self.score.saturating_add(tally.score);
        self.tokens_cleared = self.tokens_cleared.saturating_add(tally.cleared);
        if tally.rounds > 0 {
            self.cascades = self.cascades.saturating_add(1);
        }
        self.best_chain = self.best_chain.max(tally.rounds);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Committed swaps
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Swaps reverted for lack of a match
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Cascades that cleared at least one token
    pub fn cascades(&self) -> u32 {
        self.cascades
    }

    /// Most clear passes a single cascade needed
    pub fn best_chain(&self) -> u32 {
        self.best_chain
    }

    pub fn tokens_cleared(&self) -> u32 {
        self.tokens_cleared
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
