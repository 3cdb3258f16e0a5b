//! Shuffler - board population without pre-existing matches
//!
//! [`populate`] fills every playable cell that has no preset token. Cells are
//! visited row-major; a kind that would complete a run with the cells already
//! placed is excluded before the uniform draw, so the finished board never
//! starts with a match. Small palettes can paint a cell into a corner; the fill
//! then steps back and re-rolls the previous cells.
//!
//! [`deal`] repeats population until the board also offers at least one
//! productive swap. It is used for the initial board and as the fallback when a
//! settled board has no move left.

use crate::error::ShuffleError;
use crate::grid::Grid;
use crate::layout::Palette;
use crate::matcher;
use crate::rng::SimpleRng;
use crate::swap;
use crate::types::{Axis, Position, TokenKind, MIN_MATCH_LEN, SHUFFLE_ATTEMPTS};

/// Backtracking steps allowed per open cell in one fill
const FILL_STEPS_PER_CELL: usize = 64;

/// Fill every non-preset playable cell with a random kind, leaving no match.
///
/// Fails with `NoSolvablePlacement` when the palette cannot avoid a forced
/// match on this board shape.
pub fn populate(
    grid: &mut Grid,
    palette: &Palette,
    rng: &mut SimpleRng,
) -> Result<(), ShuffleError> {
    check_solvable(grid, palette)?;

    for _ in 0..SHUFFLE_ATTEMPTS {
        if try_fill(grid, palette, rng) {
            return Ok(());
        }
    }
    Err(ShuffleError::NoSolvablePlacement {
        kinds: palette.len(),
        reason: "every fill ran into a forced match",
    })
}

/// Populate until the board has at least one productive swap.
///
/// Returns the number of fills it took.
pub fn deal(grid: &mut Grid, palette: &Palette, rng: &mut SimpleRng) -> Result<u32, ShuffleError> {
    for attempt in 1..=SHUFFLE_ATTEMPTS {
        populate(grid, palette, rng)?;
        if swap::has_move(grid) {
            return Ok(attempt);
        }
    }
    Err(ShuffleError::NoPlayableMove {
        attempts: SHUFFLE_ATTEMPTS,
    })
}

/// Configuration checks that no amount of re-rolling can fix
fn check_solvable(grid: &Grid, palette: &Palette) -> Result<(), ShuffleError> {
    let open_cells = grid
        .playable_positions()
        .any(|pos| grid.preset(pos).is_none());

    let unsolvable = |reason| ShuffleError::NoSolvablePlacement {
        kinds: palette.len(),
        reason,
    };

    if palette.is_empty() && open_cells {
        return Err(unsolvable("palette is empty"));
    }
    if grid
        .playable_positions()
        .filter_map(|pos| grid.preset(pos))
        .any(|kind| !palette.contains(kind))
    {
        return Err(unsolvable("a preset kind is not in the palette"));
    }
    if palette.len() == 1 && has_playable_run(grid) {
        return Err(unsolvable("a single kind fills three cells in a row"));
    }
    Ok(())
}

/// Whether any row or column has `MIN_MATCH_LEN` consecutive playable cells
fn has_playable_run(grid: &Grid) -> bool {
    for axis in [Axis::Horizontal, Axis::Vertical] {
        for pos in grid.playable_positions() {
            let mut len = 1;
            let mut cursor = pos;
            while let Some(next) = cursor.step(axis.forward()).filter(|&p| grid.is_playable(p)) {
                len += 1;
                if len >= MIN_MATCH_LEN {
                    return true;
                }
                cursor = next;
            }
        }
    }
    false
}

/// One fill pass; false when the cells could not be completed within budget.
///
/// Open cells are visited row-major. Each gets its legal kinds in random order;
/// when a cell runs out of kinds the previous cell is re-rolled.
fn try_fill(grid: &mut Grid, palette: &Palette, rng: &mut SimpleRng) -> bool {
    let mut open = Vec::new();
    for pos in grid.playable_positions().collect::<Vec<_>>() {
        let preset = grid.preset(pos);
        // In bounds and playable: these writes cannot fail.
        let _ = grid.set(pos, preset);
        if preset.is_none() {
            open.push(pos);
        }
    }

    let mut options: Vec<Vec<TokenKind>> = Vec::with_capacity(open.len());
    let mut budget = open.len() * FILL_STEPS_PER_CELL + FILL_STEPS_PER_CELL;
    let mut i = 0;
    while i < open.len() {
        if budget == 0 {
            return false;
        }
        budget -= 1;

        if options.len() == i {
            let mut legal: Vec<TokenKind> = palette
                .kinds()
                .filter(|&kind| !completes_run(grid, open[i], kind))
                .collect();
            rng.shuffle(&mut legal);
            options.push(legal);
        }

        match options[i].pop() {
            Some(kind) => {
                let _ = grid.set(open[i], Some(kind));
                i += 1;
            }
            None => {
                options.pop();
                if i == 0 {
                    return false;
                }
                i -= 1;
                let _ = grid.set(open[i], None);
            }
        }
    }

    !matcher::has_match(grid)
}

fn completes_run(grid: &Grid, pos: Position, kind: TokenKind) -> bool {
    [Axis::Horizontal, Axis::Vertical]
        .into_iter()
        .any(|axis| matcher::run_len_with(grid, pos, kind, axis) >= MIN_MATCH_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoardLayout;

    #[test]
    fn test_populate_fills_without_matches() {
        for seed in 1..40 {
            let layout = BoardLayout::rectangular(8, 8).unwrap();
            let mut grid = Grid::new(&layout);
            let mut rng = SimpleRng::new(seed);
            populate(&mut grid, &Palette::default(), &mut rng).unwrap();
            assert!(grid.is_filled());
            assert!(matcher::all_matches(&grid).is_empty(), "seed {}", seed);
        }
    }

    #[test]
    fn test_populate_is_deterministic() {
        let layout = BoardLayout::starter();
        let mut a = Grid::new(&layout);
        let mut b = Grid::new(&layout);
        populate(&mut a, &Palette::default(), &mut SimpleRng::new(9)).unwrap();
        populate(&mut b, &Palette::default(), &mut SimpleRng::new(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_populate_keeps_presets_and_holes() {
        let layout = BoardLayout::starter();
        let mut grid = Grid::new(&layout);
        populate(&mut grid, &Palette::default(), &mut SimpleRng::new(5)).unwrap();
        assert_eq!(grid.token(Position::new(1, 9)), Some(TokenKind(2)));
        assert_eq!(grid.token(Position::new(2, 9)), Some(TokenKind(2)));
        assert_eq!(grid.get(Position::new(0, 0)), Ok(None));
        assert_eq!(grid.get(Position::new(3, 5)), Ok(None));
        assert!(grid.is_filled());
        assert!(!matcher::has_match(&grid));
    }

    #[test]
    fn test_two_kinds_still_avoid_matches() {
        let layout = BoardLayout::rectangular(6, 6).unwrap();
        let palette = Palette::uniform(2, 10).unwrap();
        let mut grid = Grid::new(&layout);
        populate(&mut grid, &palette, &mut SimpleRng::new(11)).unwrap();
        assert!(grid.is_filled());
        assert!(matcher::all_matches(&grid).is_empty());
    }

    #[test]
    fn test_single_kind_is_unsolvable_on_wide_board() {
        let layout = BoardLayout::rectangular(3, 1).unwrap();
        let palette = Palette::uniform(1, 10).unwrap();
        let mut grid = Grid::new(&layout);
        let err = populate(&mut grid, &palette, &mut SimpleRng::new(1)).unwrap_err();
        assert!(matches!(err, ShuffleError::NoSolvablePlacement { kinds: 1, .. }));
    }

    #[test]
    fn test_single_kind_fits_small_board() {
        let layout = BoardLayout::rectangular(2, 2).unwrap();
        let palette = Palette::uniform(1, 10).unwrap();
        let mut grid = Grid::new(&layout);
        populate(&mut grid, &palette, &mut SimpleRng::new(1)).unwrap();
        assert_eq!(grid.token_count(), 4);
    }

    #[test]
    fn test_empty_palette_is_unsolvable() {
        let layout = BoardLayout::rectangular(2, 2).unwrap();
        let palette = Palette::uniform(0, 10).unwrap();
        let mut grid = Grid::new(&layout);
        assert!(populate(&mut grid, &palette, &mut SimpleRng::new(1)).is_err());
    }

    #[test]
    fn test_deal_guarantees_a_move() {
        let layout = BoardLayout::starter();
        let mut grid = Grid::new(&layout);
        let attempts = deal(&mut grid, &Palette::default(), &mut SimpleRng::new(21)).unwrap();
        assert!(attempts >= 1);
        assert!(swap::has_move(&grid));
        assert!(!matcher::has_match(&grid));
    }

    #[test]
    fn test_deal_reports_boards_without_moves() {
        // A single column of three can never be rearranged into a match.
        let layout = BoardLayout::rectangular(1, 3).unwrap();
        let mut grid = Grid::new(&layout);
        let err = deal(&mut grid, &Palette::default(), &mut SimpleRng::new(2)).unwrap_err();
        assert_eq!(
            err,
            ShuffleError::NoPlayableMove {
                attempts: SHUFFLE_ATTEMPTS
            }
        );
    }
}
