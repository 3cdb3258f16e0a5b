//! Swap validation - legality checks and hypothetical boards
//!
//! [`propose`] never touches the caller's grid: it returns a [`SwapPreview`]
//! holding the post-swap board. Whether a legal swap is kept is the cascade
//! engine's decision (it must create a match through one of the two cells).

use crate::error::SwapError;
use crate::grid::Grid;
use crate::matcher::{self, Match};
use crate::types::{Direction, Position};

/// Two 4-adjacent positions to exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapProposal {
    pub a: Position,
    pub b: Position,
}

impl SwapProposal {
    pub fn new(a: Position, b: Position) -> Self {
        Self { a, b }
    }
}

/// Result of a legal swap, computed on a copy of the grid
#[derive(Debug, Clone)]
pub struct SwapPreview {
    pub proposal: SwapProposal,
    pub grid: Grid,
}

impl SwapPreview {
    /// Matches running through either swapped cell
    pub fn matches(&self) -> Vec<Match> {
        matcher::matches_touching(&self.grid, &[self.proposal.a, self.proposal.b])
    }

    /// Whether the engine would keep this swap
    pub fn is_productive(&self) -> bool {
        !self.matches().is_empty()
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Check a proposed swap without performing it.
///
/// Fails with `OutOfBounds`, then `NotAdjacent`, then `InvalidCell` (a hole or
/// an empty cell on either side).
pub fn validate(grid: &Grid, a: Position, b: Position) -> Result<SwapProposal, SwapError> {
    grid.get(a)?;
    grid.get(b)?;

    if !a.is_adjacent(b) {
        return Err(SwapError::NotAdjacent { a, b });
    }
    for pos in [a, b] {
        if !grid.is_playable(pos) || grid.token(pos).is_none() {
            return Err(SwapError::InvalidCell(pos));
        }
    }
    Ok(SwapProposal::new(a, b))
}

/// Validate and build the post-swap board
pub fn propose(grid: &Grid, a: Position, b: Position) -> Result<SwapPreview, SwapError> {
    let proposal = validate(grid, a, b)?;
    let mut hypothetical = grid.clone();
    hypothetical.swap(a, b)?;
    Ok(SwapPreview {
        proposal,
        grid: hypothetical,
    })
}

/// Every swap that would create a match, row-major, right neighbor before down
pub fn find_moves(grid: &Grid) -> Vec<SwapProposal> {
    let mut moves = Vec::new();
    scan_moves(grid, |proposal| {
        moves.push(proposal);
        true
    });
    moves
}

/// Whether at least one productive swap exists
pub fn has_move(grid: &Grid) -> bool {
    let mut found = false;
    scan_moves(grid, |_| {
        found = true;
        false
    });
    found
}

/// Visit productive swaps until `visit` returns false
fn scan_moves(grid: &Grid, mut visit: impl FnMut(SwapProposal) -> bool) {
    let mut scratch = grid.clone();
    let positions: Vec<Position> = grid.playable_positions().collect();

    for a in positions {
        let Some(kind_a) = grid.token(a) else {
            continue;
        };
        for dir in [Direction::Right, Direction::Down] {
            let Some(b) = a.step(dir).filter(|&p| grid.is_playable(p)) else {
                continue;
            };
            match grid.token(b) {
                Some(kind_b) if kind_b != kind_a => {}
                _ => continue,
            }

            // Both positions are in bounds, so the swaps cannot fail.
            if scratch.swap(a, b).is_err() {
                continue;
            }
            let productive = !matcher::runs_through(&scratch, a).is_empty()
                || !matcher::runs_through(&scratch, b).is_empty();
            let _ = scratch.swap(a, b);

            if productive && !visit(SwapProposal::new(a, b)) {
                return;
            }
        }
    }
}
