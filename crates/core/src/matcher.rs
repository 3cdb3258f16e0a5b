//! Match finder - runs of three or more equal tokens
//!
//! A run is walked cell by cell along one axis while the next cell is playable,
//! filled, and of the same kind. Holes and empty cells end a run. Every
//! reported [`Match`] is maximal: it cannot grow in either direction.
//!
//! Finding matches never fails. Out-of-bounds or empty origins simply produce
//! no matches.

use crate::grid::Grid;
use crate::types::{Axis, Position, TokenKind, MIN_MATCH_LEN};

/// A maximal run of at least [`MIN_MATCH_LEN`] equal tokens along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub kind: TokenKind,
    pub axis: Axis,
    /// Leftmost (horizontal) or topmost (vertical) cell
    pub start: Position,
    pub len: u8,
}

impl Match {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Never true for a reported match; present for API completeness
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Covered positions in axis order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let Match {
            axis, start, len, ..
        } = *self;
        (0..len).map(move |i| match axis {
            Axis::Horizontal => Position::new(start.col + i, start.row),
            Axis::Vertical => Position::new(start.col, start.row + i),
        })
    }

    pub fn contains(&self, pos: Position) -> bool {
        let (along, across, start_along, start_across) = match self.axis {
            Axis::Horizontal => (pos.col, pos.row, self.start.col, self.start.row),
            Axis::Vertical => (pos.row, pos.col, self.start.row, self.start.col),
        };
        across == start_across && along >= start_along && along - start_along < self.len
    }
}

/// Length of the equal-kind run through `pos` along `axis`, and its first cell
fn run_extent(grid: &Grid, pos: Position, kind: TokenKind, axis: Axis) -> (Position, u8) {
    let same = |p: Position| grid.is_playable(p) && grid.token(p) == Some(kind);

    let mut start = pos;
    while let Some(prev) = start.step(axis.backward()).filter(|&p| same(p)) {
        start = prev;
    }

    let mut len: u8 = 1;
    let mut cursor = start;
    while let Some(next) = cursor.step(axis.forward()).filter(|&p| same(p)) {
        cursor = next;
        len = len.saturating_add(1);
    }
    (start, len)
}

/// Length of the run `kind` would form at `pos` along `axis`, counting
/// neighbors only (the cell itself need not hold `kind` yet)
pub(crate) fn run_len_with(grid: &Grid, pos: Position, kind: TokenKind, axis: Axis) -> usize {
    let same = |p: Position| grid.is_playable(p) && grid.token(p) == Some(kind);
    let mut len = 1;
    for dir in [axis.backward(), axis.forward()] {
        let mut cursor = pos;
        while let Some(next) = cursor.step(dir).filter(|&p| same(p)) {
            cursor = next;
            len += 1;
        }
    }
    len
}

/// Matches through `pos`: at most one horizontal and one vertical
pub fn runs_through(grid: &Grid, pos: Position) -> Vec<Match> {
    let mut found = Vec::new();
    if !grid.is_playable(pos) {
        return found;
    }
    let Some(kind) = grid.token(pos) else {
        return found;
    };

    for axis in [Axis::Horizontal, Axis::Vertical] {
        let (start, len) = run_extent(grid, pos, kind, axis);
        if len as usize >= MIN_MATCH_LEN {
            found.push(Match {
                kind,
                axis,
                start,
                len,
            });
        }
    }
    found
}

/// Every match on the board.
///
/// Each run is reported once, from its first cell: horizontal runs in
/// row-major order first, then vertical runs in column-major order.
pub fn all_matches(grid: &Grid) -> Vec<Match> {
    let mut found = Vec::new();

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            push_if_run_start(grid, Position::new(col, row), Axis::Horizontal, &mut found);
        }
    }
    for col in 0..grid.width() {
        for row in 0..grid.height() {
            push_if_run_start(grid, Position::new(col, row), Axis::Vertical, &mut found);
        }
    }
    found
}

fn push_if_run_start(grid: &Grid, pos: Position, axis: Axis, out: &mut Vec<Match>) {
    if !grid.is_playable(pos) {
        return;
    }
    let Some(kind) = grid.token(pos) else {
        return;
    };
    let continues = pos
        .step(axis.backward())
        .is_some_and(|p| grid.is_playable(p) && grid.token(p) == Some(kind));
    if continues {
        return;
    }

    let (start, len) = run_extent(grid, pos, kind, axis);
    if len as usize >= MIN_MATCH_LEN {
        out.push(Match {
            kind,
            axis,
            start,
            len,
        });
    }
}

/// Matches covering any of `positions`, each reported once
pub fn matches_touching(grid: &Grid, positions: &[Position]) -> Vec<Match> {
    let mut found: Vec<Match> = Vec::new();
    for &pos in positions {
        for m in runs_through(grid, pos) {
            if !found.contains(&m) {
                found.push(m);
            }
        }
    }
    found
}

/// Whether the board holds any match
pub fn has_match(grid: &Grid) -> bool {
    grid.playable_positions()
        .any(|pos| !runs_through(grid, pos).is_empty())
}
