//! Cascade engine - swap commit, clear, gravity, refill, repeat
//!
//! [`CascadeEngine`] owns the grid and is the only thing that mutates it during
//! play. A command runs to completion inside one `&mut self` call and returns
//! the full event log for the renderer to replay:
//!
//! ```text
//! Idle -> Swapping -> Resolving <-> Settling
//!   ^        |            |
//!   +--------+------------+   (SwapReverted / SettleComplete)
//! ```
//!
//! - **Swapping**: the two tokens are exchanged (`Swapped`). Without a match
//!   through either cell they are put back (`SwapReverted`) and nothing is
//!   scored.
//! - **Resolving**: every match on the board is cleared in one pass, one
//!   `Cleared` per match. A cell shared by two matches pays out once.
//! - **Settling**: each column is compacted downward over its playable cells
//!   (`Dropped`), then the vacated top cells are refilled from the
//!   [`TokenSource`] lowest first (`Refilled`). Back to Resolving.
//!
//! The loop is capped at `width * height` clear passes. Hitting the cap is a
//! broken invariant: the engine returns [`EngineError::CascadeOverflow`] and
//! stays in `Resolving`, refusing further commands until [`reset`].
//!
//! [`reset`]: CascadeEngine::reset

use crate::error::{EngineError, SwapError};
use crate::grid::Grid;
use crate::layout::{BoardLayout, Palette};
use crate::matcher::{self, Match};
use crate::rng::{RandomTokens, SimpleRng, TokenSource};
use crate::scoring::{self, CascadeTally, ScoreBoard};
use crate::shuffle;
use crate::snapshot::BoardSnapshot;
use crate::swap::{self, SwapProposal};
use crate::types::{Cell, Position, TokenKind};

/// Engine phase; commands are only accepted in `Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    #[default]
    Idle,
    Swapping,
    Resolving,
    Settling,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Swapping => "swapping",
            EngineState::Resolving => "resolving",
            EngineState::Settling => "settling",
        }
    }
}

/// One step of a command, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeEvent {
    Swapped {
        a: Position,
        b: Position,
    },
    /// Rolls back `Swapped`; a renderer plays it instead of a pair of `Dropped` moves
    SwapReverted {
        a: Position,
        b: Position,
    },
    /// Every position of the run, including cells another run already emptied
    Cleared {
        positions: Vec<Position>,
        kind: TokenKind,
        points: u32,
    },
    Dropped {
        from: Position,
        to: Position,
        kind: TokenKind,
    },
    Refilled {
        pos: Position,
        kind: TokenKind,
    },
    /// The settled board had no move left and was dealt again (row-major cells)
    Reshuffled {
        tokens: Vec<Cell>,
    },
    SettleComplete,
}

impl CascadeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CascadeEvent::Swapped { .. } => "swapped",
            CascadeEvent::SwapReverted { .. } => "swap_reverted",
            CascadeEvent::Cleared { .. } => "cleared",
            CascadeEvent::Dropped { .. } => "dropped",
            CascadeEvent::Refilled { .. } => "refilled",
            CascadeEvent::Reshuffled { .. } => "reshuffled",
            CascadeEvent::SettleComplete => "settle_complete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Committed,
    Rejected,
}

/// Everything one command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    pub outcome: SwapOutcome,
    pub events: Vec<CascadeEvent>,
    /// Sum over every clear pass
    pub score: u32,
    /// Clear passes run
    pub rounds: u32,
    /// Tokens removed
    pub cleared: u32,
}

impl CascadeReport {
    fn rejected(events: Vec<CascadeEvent>) -> Self {
        Self {
            outcome: SwapOutcome::Rejected,
            events,
            score: 0,
            rounds: 0,
            cleared: 0,
        }
    }

    fn committed(events: Vec<CascadeEvent>, tally: CascadeTally) -> Self {
        Self {
            outcome: SwapOutcome::Committed,
            events,
            score: tally.score,
            rounds: tally.rounds,
            cleared: tally.cleared,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.outcome == SwapOutcome::Committed
    }

    /// Events of one kind, by `CascadeEvent::name`
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }
}

/// Match-three settle engine
#[derive(Debug, Clone)]
pub struct CascadeEngine<S: TokenSource = RandomTokens> {
    grid: Grid,
    palette: Palette,
    spawner: S,
    /// Drives initial deals and deadlock reshuffles
    rng: SimpleRng,
    state: EngineState,
    scores: ScoreBoard,
    round_limit: u32,
    reshuffle_on_deadlock: bool,
}

impl CascadeEngine<RandomTokens> {
    /// Engine whose refills are drawn uniformly from the palette
    pub fn seeded(layout: &BoardLayout, palette: Palette, seed: u32) -> Result<Self, EngineError> {
        let spawner = RandomTokens::new(&palette, seed.wrapping_add(1));
        Self::new(layout, palette, spawner, seed)
    }
}

impl<S: TokenSource> CascadeEngine<S> {
    /// Validate the layout and deal a board with no match and at least one move
    pub fn new(
        layout: &BoardLayout,
        palette: Palette,
        spawner: S,
        seed: u32,
    ) -> Result<Self, EngineError> {
        layout.validate(&palette)?;

        let mut rng = SimpleRng::new(seed);
        let mut grid = Grid::new(layout);
        shuffle::deal(&mut grid, &palette, &mut rng)?;

        let round_limit = round_limit_for(&grid);
        Ok(Self {
            grid,
            palette,
            spawner,
            rng,
            state: EngineState::Idle,
            scores: ScoreBoard::new(),
            round_limit,
            reshuffle_on_deadlock: true,
        })
    }

    /// Wrap an already populated grid, taken as-is.
    ///
    /// Deadlock reshuffling is off: fixture boards are often too small to have
    /// a move at all.
    pub fn with_grid(grid: Grid, palette: Palette, spawner: S) -> Self {
        let round_limit = round_limit_for(&grid);
        Self {
            grid,
            palette,
            spawner,
            rng: SimpleRng::default(),
            state: EngineState::Idle,
            scores: ScoreBoard::new(),
            round_limit,
            reshuffle_on_deadlock: false,
        }
    }

    pub fn set_reshuffle_on_deadlock(&mut self, enabled: bool) {
        self.reshuffle_on_deadlock = enabled;
    }

    /// Repopulate the board and clear the counters.
    ///
    /// Also the way out after a `CascadeOverflow`. On failure the engine is left
    /// as it was.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        let mut grid = self.grid.clone();
        if self.reshuffle_on_deadlock {
            shuffle::deal(&mut grid, &self.palette, &mut self.rng)?;
        } else {
            shuffle::populate(&mut grid, &self.palette, &mut self.rng)?;
        }
        self.grid = grid;
        self.scores.reset();
        self.state = EngineState::Idle;
        Ok(())
    }

    /// Try to exchange two adjacent tokens and settle the result.
    ///
    /// Illegal proposals fail with `EngineError::Swap` and change nothing. A
    /// legal swap that makes no match comes back as `SwapOutcome::Rejected`
    /// with the board unchanged.
    pub fn propose_swap(&mut self, a: Position, b: Position) -> Result<CascadeReport, EngineError> {
        self.ensure_idle()?;
        let SwapProposal { a, b } = swap::validate(&self.grid, a, b)?;

        self.state = EngineState::Swapping;
        if let Err(err) = self.grid.swap(a, b) {
            self.state = EngineState::Idle;
            return Err(SwapError::from(err).into());
        }
        let mut events = vec![CascadeEvent::Swapped { a, b }];

        if matcher::matches_touching(&self.grid, &[a, b]).is_empty() {
            self.grid.swap(a, b)?;
            events.push(CascadeEvent::SwapReverted { a, b });
            self.state = EngineState::Idle;
            self.scores.record_rejected();
            return Ok(CascadeReport::rejected(events));
        }

        let tally = self.resolve(&mut events, CascadeTally::default())?;
        self.scores.record_move(tally);
        self.finish(&mut events);
        Ok(CascadeReport::committed(events, tally))
    }

    /// Empty the given cells from outside the swap flow, then settle.
    ///
    /// Each filled cell yields its own `Cleared` worth the token's value.
    /// Holes, empty cells and repeats are skipped. The forced clear counts as
    /// the first round; it is scored but is not a move.
    pub fn force_clear(&mut self, positions: &[Position]) -> Result<CascadeReport, EngineError> {
        self.ensure_idle()?;
        for &pos in positions {
            self.grid.get(pos)?;
        }

        self.state = EngineState::Resolving;
        let mut events = Vec::new();
        let mut tally = CascadeTally::default();
        for &pos in positions {
            let Some(kind) = self.grid.token(pos) else {
                continue;
            };
            self.grid.set(pos, None)?;
            let points = self.palette.points(kind);
            tally.add_clear(points, 1);
            events.push(CascadeEvent::Cleared {
                positions: vec![pos],
                kind,
                points,
            });
        }

        if tally.cleared > 0 {
            tally.rounds = 1;
            self.state = EngineState::Settling;
            self.settle(&mut events)?;
        }
        let tally = self.resolve(&mut events, tally)?;
        self.scores.record_forced(tally);
        self.finish(&mut events);
        Ok(CascadeReport::committed(events, tally))
    }

    /// Clear passes until the board is stable
    fn resolve(
        &mut self,
        events: &mut Vec<CascadeEvent>,
        mut tally: CascadeTally,
    ) -> Result<CascadeTally, EngineError> {
        self.state = EngineState::Resolving;
        loop {
            let matches = matcher::all_matches(&self.grid);
            if matches.is_empty() {
                return Ok(tally);
            }
            if tally.rounds >= self.round_limit {
                return Err(EngineError::CascadeOverflow {
                    limit: self.round_limit,
                });
            }
            tally.rounds += 1;

            self.clear_matches(&matches, events, &mut tally)?;
            self.state = EngineState::Settling;
            self.settle(events)?;
            self.state = EngineState::Resolving;
        }
    }

    fn clear_matches(
        &mut self,
        matches: &[Match],
        events: &mut Vec<CascadeEvent>,
        tally: &mut CascadeTally,
    ) -> Result<(), EngineError> {
        for m in matches {
            let mut fresh = 0;
            for pos in m.positions() {
                if self.grid.token(pos).is_some() {
                    self.grid.set(pos, None)?;
                    fresh += 1;
                }
            }
            let points = scoring::clear_points(self.palette.points(m.kind), fresh);
            tally.add_clear(points, fresh);
            events.push(CascadeEvent::Cleared {
                positions: m.positions().collect(),
                kind: m.kind,
                points,
            });
        }
        Ok(())
    }

    /// Gravity, then refill, column by column
    fn settle(&mut self, events: &mut Vec<CascadeEvent>) -> Result<(), EngineError> {
        for col in 0..self.grid.width() {
            let column = self.grid.column(col);

            // Compact bottom-up; `floor` is the lowest slot not yet taken.
            let mut floor = column.len();
            for read in (0..column.len()).rev() {
                let Some(kind) = self.grid.token(column[read]) else {
                    continue;
                };
                floor -= 1;
                if floor != read {
                    let (from, to) = (column[read], column[floor]);
                    self.grid.set(to, Some(kind))?;
                    self.grid.set(from, None)?;
                    events.push(CascadeEvent::Dropped { from, to, kind });
                }
            }

            for &pos in column[..floor].iter().rev() {
                let kind = self.spawner.next_kind();
                self.grid.set(pos, Some(kind))?;
                events.push(CascadeEvent::Refilled { pos, kind });
            }
        }
        Ok(())
    }

    /// Deadlock check, then back to Idle
    fn finish(&mut self, events: &mut Vec<CascadeEvent>) {
        if self.reshuffle_on_deadlock && !swap::has_move(&self.grid) {
            let mut dealt = self.grid.clone();
            // A failed deal keeps the stuck board; `is_deadlocked` reports it.
            if shuffle::deal(&mut dealt, &self.palette, &mut self.rng).is_ok() {
                self.grid = dealt;
                events.push(CascadeEvent::Reshuffled {
                    tokens: self.grid.cells().to_vec(),
                });
            }
        }
        events.push(CascadeEvent::SettleComplete);
        self.state = EngineState::Idle;
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Idle => Ok(()),
            other => Err(EngineError::Busy(other.as_str())),
        }
    }

    /// First productive swap in scan order
    pub fn hint(&self) -> Option<SwapProposal> {
        swap::find_moves(&self.grid).into_iter().next()
    }

    pub fn is_deadlocked(&self) -> bool {
        !swap::has_move(&self.grid)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(
            &self.grid,
            self.state,
            self.scores.score(),
            self.scores.moves(),
        )
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn round_limit(&self) -> u32 {
        self.round_limit
    }
}

fn round_limit_for(grid: &Grid) -> u32 {
    (grid.width() as u32 * grid.height() as u32).max(1)
}
